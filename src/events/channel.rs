use serde::{Deserialize, Serialize};
use std::fmt;

/// Непрозрачный идентификатор канала. Пустая строка означает "ничего не отображается".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn none() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChannelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ChannelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "∅")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Позиция отображения канала
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Primary,
    Secondary,
}

impl Slot {
    /// Порядок вычисления: сначала основной слот, затем дополнительный
    pub const ALL: [Slot; 2] = [Slot::Primary, Slot::Secondary];

    pub fn other(self) -> Slot {
        match self {
            Slot::Primary => Slot::Secondary,
            Slot::Secondary => Slot::Primary,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Primary => write!(f, "primary"),
            Slot::Secondary => write!(f, "secondary"),
        }
    }
}

/// Узкий снимок состояния: какой канал показан в каждом из двух слотов
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewSnapshot {
    #[serde(default)]
    pub primary: ChannelId,
    #[serde(default)]
    pub secondary: ChannelId,
}

impl ViewSnapshot {
    pub fn new(primary: impl Into<ChannelId>, secondary: impl Into<ChannelId>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    pub fn channel(&self, slot: Slot) -> &ChannelId {
        match slot {
            Slot::Primary => &self.primary,
            Slot::Secondary => &self.secondary,
        }
    }

    /// Виден ли канал хотя бы в одном слоте
    pub fn is_visible(&self, channel_id: &ChannelId) -> bool {
        !channel_id.is_empty() && (&self.primary == channel_id || &self.secondary == channel_id)
    }
}

impl fmt::Display for ViewSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[primary={}, secondary={}]", self.primary, self.secondary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_channel_id() {
        assert!(ChannelId::none().is_empty());
        assert!(ChannelId::default().is_empty());
        assert!(!ChannelId::from("town-square").is_empty());
        assert_eq!(ChannelId::none().to_string(), "∅");
    }

    #[test]
    fn test_slot_other() {
        assert_eq!(Slot::Primary.other(), Slot::Secondary);
        assert_eq!(Slot::Secondary.other(), Slot::Primary);
        assert_eq!(Slot::ALL, [Slot::Primary, Slot::Secondary]);
    }

    #[test]
    fn test_snapshot_visibility() {
        let snapshot = ViewSnapshot::new("x", "");
        assert_eq!(snapshot.channel(Slot::Primary).as_str(), "x");
        assert!(snapshot.channel(Slot::Secondary).is_empty());
        assert!(snapshot.is_visible(&"x".into()));
        assert!(!snapshot.is_visible(&"y".into()));
        assert!(!snapshot.is_visible(&ChannelId::none()));
    }
}
