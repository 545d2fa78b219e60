use super::channel::{ChannelId, Slot};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Тип изменения видимости
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Removed,
}

/// Одно изменение видимости, вычисленное детектором
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisibilityChange {
    pub channel_id: ChannelId,
    pub kind: ChangeKind,
    /// Слот, переход которого вызвал изменение
    pub slot: Slot,
}

impl VisibilityChange {
    pub fn added(channel_id: ChannelId, slot: Slot) -> Self {
        Self {
            channel_id,
            kind: ChangeKind::Added,
            slot,
        }
    }

    pub fn removed(channel_id: ChannelId, slot: Slot) -> Self {
        Self {
            channel_id,
            kind: ChangeKind::Removed,
            slot,
        }
    }
}

impl fmt::Display for VisibilityChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.kind {
            ChangeKind::Added => '+',
            ChangeKind::Removed => '-',
        };
        write!(f, "{}{} ({})", sign, self.channel_id, self.slot)
    }
}

/// Событие видимости для получателя уведомлений
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityEvent {
    pub change: VisibilityChange,
    pub timestamp: std::time::Instant,
}

impl VisibilityEvent {
    pub fn new(change: VisibilityChange) -> Self {
        Self {
            change,
            timestamp: std::time::Instant::now(),
        }
    }

    pub fn channel_id(&self) -> &ChannelId {
        &self.change.channel_id
    }

    pub fn kind(&self) -> ChangeKind {
        self.change.kind
    }
}

impl fmt::Display for VisibilityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}ms ago)",
            self.change,
            self.timestamp.elapsed().as_millis()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_display() {
        let added = VisibilityChange::added("x".into(), Slot::Primary);
        assert_eq!(added.to_string(), "+x (primary)");

        let removed = VisibilityChange::removed("y".into(), Slot::Secondary);
        assert_eq!(removed.to_string(), "-y (secondary)");
    }

    #[test]
    fn test_event_creation() {
        let change = VisibilityChange::added("x".into(), Slot::Primary);
        let event = VisibilityEvent::new(change.clone());

        assert_eq!(event.change, change);
        assert_eq!(event.kind(), ChangeKind::Added);
        assert_eq!(event.channel_id().as_str(), "x");
    }
}
