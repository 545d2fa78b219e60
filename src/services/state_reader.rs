//! Чтение состояния приложения.
//!
//! Модуль отвечает ТОЛЬКО за проекцию снимка состояния приложения на два слота
//! отображения. Никаких решений о подписках здесь не принимается.

use crate::error::Result;
use crate::events::{ChannelId, ViewSnapshot};
use crate::watch_error;
use figment::{
    providers::{Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Снимок состояния приложения (та часть, что нужна наблюдателю)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppState {
    /// Канал, открытый в основном представлении
    #[serde(default)]
    pub current_channel_id: ChannelId,
    #[serde(default)]
    pub rhs: RhsState,
}

/// Состояние правой боковой панели
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RhsState {
    #[serde(default)]
    pub selected_channel_id: ChannelId,
}

pub fn primary_slot_channel(state: &AppState) -> ChannelId {
    state.current_channel_id.clone()
}

pub fn secondary_slot_channel(state: &AppState) -> ChannelId {
    state.rhs.selected_channel_id.clone()
}

impl ViewSnapshot {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            primary: primary_slot_channel(state),
            secondary: secondary_slot_channel(state),
        }
    }
}

/// Источник снимков состояния
pub trait StateProvider: Send + Sync {
    fn snapshot(&self) -> Result<ViewSnapshot>;
}

impl<F> StateProvider for F
where
    F: Fn() -> ViewSnapshot + Send + Sync,
{
    fn snapshot(&self) -> Result<ViewSnapshot> {
        Ok(self())
    }
}

/// Читает `AppState` из TOML-файла, который пишет внешнее приложение
pub struct FileStateProvider {
    path: PathBuf,
}

impl FileStateProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_state(&self) -> Result<AppState> {
        let contents = std::fs::read_to_string(&self.path)?;

        Figment::from(Toml::string(&contents))
            .extract()
            .map_err(|e| watch_error!(state_read, "{:?}: {}", self.path, e))
    }
}

impl StateProvider for FileStateProvider {
    fn snapshot(&self) -> Result<ViewSnapshot> {
        self.read_state().map(|state| ViewSnapshot::from_state(&state))
    }
}
