use crate::debug_if_enabled;
use crate::error::{Result, WatchError};
use crate::events::{ChangeKind, ChannelId, VisibilityEvent};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{info, warn};

/// Реестр каналов, подписанных на обновления в реальном времени.
///
/// Получает события видимости от наблюдателя и выполняет последующие действия:
/// подписку на только что показанный канал и отписку от скрытого.
/// В режиме dry-run учёт ведётся так же, но подписки только логируются как эмулируемые.
pub struct SubscriptionRegistry {
    dry_run: bool,
    subscriptions: DashMap<ChannelId, Instant>,
    added_total: AtomicU64,
    removed_total: AtomicU64,
}

/// Счётчики реестра
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriptionStats {
    pub active: usize,
    pub added_total: u64,
    pub removed_total: u64,
}

impl SubscriptionRegistry {
    pub fn new(dry_run: bool) -> Self {
        info!("Инициализация SubscriptionRegistry (dry_run: {})", dry_run);
        Self {
            dry_run,
            subscriptions: DashMap::new(),
            added_total: AtomicU64::new(0),
            removed_total: AtomicU64::new(0),
        }
    }

    pub async fn handle_event(&self, event: VisibilityEvent) -> Result<()> {
        debug_if_enabled!("Обработка события видимости: {}", event);

        match event.kind() {
            ChangeKind::Added => self.subscribe(event.channel_id().clone()),
            ChangeKind::Removed => self.unsubscribe(event.channel_id()),
        }
    }

    fn subscribe(&self, channel_id: ChannelId) -> Result<()> {
        match self.subscriptions.entry(channel_id) {
            Entry::Occupied(entry) => {
                warn!("Повторное добавление уже подписанного канала {}", entry.key());
                Err(WatchError::AlreadySubscribed(entry.key().as_str().to_string()))
            }
            Entry::Vacant(entry) => {
                if self.dry_run {
                    info!("Dry-run: эмулируем подписку на канал {}", entry.key());
                } else {
                    info!("Подписка на канал {}", entry.key());
                }

                entry.insert(Instant::now());
                self.added_total.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
        }
    }

    fn unsubscribe(&self, channel_id: &ChannelId) -> Result<()> {
        match self.subscriptions.remove(channel_id) {
            Some((_, since)) => {
                info!(
                    "Отписка от канала {} (был виден {}ms)",
                    channel_id,
                    since.elapsed().as_millis()
                );
                self.removed_total.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            None => {
                warn!("Удаление канала {}, который не был подписан", channel_id);
                Err(WatchError::NotSubscribed(channel_id.as_str().to_string()))
            }
        }
    }

    pub fn is_subscribed(&self, channel_id: &ChannelId) -> bool {
        self.subscriptions.contains_key(channel_id)
    }

    /// Отсортированный список подписанных каналов
    pub fn subscribed_channels(&self) -> Vec<ChannelId> {
        let mut channels: Vec<ChannelId> = self
            .subscriptions
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        channels.sort();
        channels
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn stats(&self) -> SubscriptionStats {
        SubscriptionStats {
            active: self.subscriptions.len(),
            added_total: self.added_total.load(Ordering::Relaxed),
            removed_total: self.removed_total.load(Ordering::Relaxed),
        }
    }

    /// Отписаться от всех каналов (при завершении работы)
    pub fn clear(&self) {
        let count = self.subscriptions.len();
        self.subscriptions.clear();
        if count > 0 {
            info!("Сняты все подписки ({})", count);
        }
    }
}
