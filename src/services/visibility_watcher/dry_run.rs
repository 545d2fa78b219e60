use crate::config::Config;
use crate::error::Result;
use crate::events::ViewSnapshot;
use crate::services::{SubscriptionRegistry, VisibilityDetector};
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::info;

use super::polling::forward_changes;
use super::r#trait::VisibilityWatcherTrait;
use super::SharedView;

/// Эмулируемая последовательность: в каждом шаге меняется один слот,
/// цикл проходит через все ветви детектора и возвращается к пустому виду
const FAKE_VIEWS: [(&str, &str); 6] = [
    ("town-square", ""),
    ("town-square", "off-topic"),
    ("off-topic", "off-topic"),
    ("dev", "off-topic"),
    ("dev", ""),
    ("", ""),
];

pub struct DryRunWatcher {
    config: Arc<Config>,
    registry: Arc<SubscriptionRegistry>,
    detector: VisibilityDetector,
    current_view: SharedView,
    view_index: usize,
}

impl DryRunWatcher {
    pub fn new(
        config: Arc<Config>,
        registry: Arc<SubscriptionRegistry>,
        current_view: SharedView,
    ) -> Self {
        Self {
            config,
            registry,
            detector: VisibilityDetector::new(),
            current_view,
            view_index: 0,
        }
    }

    fn next_view(&mut self) -> ViewSnapshot {
        let (primary, secondary) = FAKE_VIEWS[self.view_index];
        self.view_index = (self.view_index + 1) % FAKE_VIEWS.len();
        ViewSnapshot::new(primary, secondary)
    }

    async fn step(&mut self) -> usize {
        let view = self.next_view();
        info!("Dry-run: эмулируем смену отображаемых каналов на {}", view);
        let changes = self.detector.evaluate(view.clone());
        *self.current_view.write() = view;
        forward_changes(&self.registry, changes).await
    }

    async fn run_impl(mut self) -> Result<()> {
        info!("Dry-run режим - VisibilityWatcher работает в режиме эмуляции");

        let mut interval = interval(Duration::from_millis(self.config.watcher.polling_interval_ms));

        loop {
            interval.tick().await;
            self.step().await;
        }
    }
}

#[async_trait::async_trait]
impl VisibilityWatcherTrait for DryRunWatcher {
    async fn run(self: Box<Self>) -> Result<()> {
        (*self).run_impl().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChannelId;
    use parking_lot::RwLock;

    #[tokio::test]
    async fn test_fake_cycle_is_consistent() {
        let registry = Arc::new(SubscriptionRegistry::new(true));
        let view: SharedView = Arc::new(RwLock::new(ViewSnapshot::default()));
        let mut watcher = DryRunWatcher::new(
            Arc::new(Config::default()),
            registry.clone(),
            view.clone(),
        );

        let counts = [
            watcher.step().await,
            watcher.step().await,
            watcher.step().await,
        ];
        assert_eq!(counts, [1, 1, 1]);
        assert_eq!(
            registry.subscribed_channels(),
            vec![ChannelId::from("off-topic")]
        );
        assert_eq!(*view.read(), ViewSnapshot::new("off-topic", "off-topic"));

        for _ in 0..3 {
            watcher.step().await;
        }
        assert!(registry.is_empty());

        // Второй проход цикла не вызывает ошибок реестра
        for _ in 0..FAKE_VIEWS.len() {
            watcher.step().await;
        }
        let stats = registry.stats();
        assert_eq!(stats.added_total, 6);
        assert_eq!(stats.removed_total, 6);
    }
}
