use crate::config::Config;
use crate::error::Result;
use crate::events::VisibilityEvent;
use crate::services::state_reader::StateProvider;
use crate::services::{SubscriptionRegistry, VisibilityDetector};
use crate::services::visibility_detector::Changes;
use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::r#trait::VisibilityWatcherTrait;
use super::SharedView;

pub struct PollingWatcher {
    config: Arc<Config>,
    registry: Arc<SubscriptionRegistry>,
    provider: Box<dyn StateProvider>,
    detector: VisibilityDetector,
    /// Последний успешно обработанный снимок, доступный другим задачам
    current_view: SharedView,
    read_failing: bool,
}

impl PollingWatcher {
    pub fn new(
        config: Arc<Config>,
        registry: Arc<SubscriptionRegistry>,
        provider: Box<dyn StateProvider>,
        current_view: SharedView,
    ) -> Self {
        info!("Инициализация PollingWatcher");
        Self {
            config,
            registry,
            provider,
            detector: VisibilityDetector::new(),
            current_view,
            read_failing: false,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        info!(
            "PollingWatcher запущен с интервалом {}ms",
            self.config.watcher.polling_interval_ms
        );

        let mut interval = interval(Duration::from_millis(self.config.watcher.polling_interval_ms));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            self.tick().await;
        }
    }

    /// Одна итерация опроса. Возвращает число переданных событий.
    pub async fn tick(&mut self) -> usize {
        let changes = match self.detector.detect_from(self.provider.as_ref()) {
            Ok(changes) => {
                if self.read_failing {
                    info!("Чтение состояния восстановлено");
                    self.read_failing = false;
                }
                changes
            }
            Err(e) => {
                // Логируем только первый сбой подряд
                if !self.read_failing {
                    warn!("Не удалось получить снимок состояния: {}", e);
                    self.read_failing = true;
                }
                return 0;
            }
        };

        let snapshot = self.detector.previous().clone();
        if !changes.is_empty() {
            debug!("Смена отображаемых каналов: {}", snapshot);
        }
        *self.current_view.write() = snapshot;

        forward_changes(&self.registry, changes).await
    }
}

/// Передаёт изменения в реестр. Ошибки реестра не прерывают наблюдение.
pub(super) async fn forward_changes(registry: &SubscriptionRegistry, changes: Changes) -> usize {
    let count = changes.len();
    for change in changes {
        let event = VisibilityEvent::new(change);
        if let Err(e) = registry.handle_event(event).await {
            error!("Реестр подписок отклонил событие: {}", e);
        }
    }
    count
}

impl Drop for PollingWatcher {
    fn drop(&mut self) {
        info!("PollingWatcher завершает работу");
    }
}

#[async_trait::async_trait]
impl VisibilityWatcherTrait for PollingWatcher {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run().await
    }
}
