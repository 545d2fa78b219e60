use crate::config::Config;
use crate::error::Result;
use crate::services::state_reader::FileStateProvider;
use crate::services::SubscriptionRegistry;

use super::SharedView;
use std::sync::Arc;
use tracing::info;

/// Trait for visibility watchers that can run in different modes
#[async_trait::async_trait]
pub trait VisibilityWatcherTrait {
    /// Run the watcher until the task is aborted
    async fn run(self: Box<Self>) -> Result<()>;
}

/// Factory function to create an appropriate watcher based on the dry_run flag and configured mode
pub fn create_visibility_watcher(
    config: Arc<Config>,
    registry: Arc<SubscriptionRegistry>,
    current_view: SharedView,
    dry_run: bool,
) -> Result<Box<dyn VisibilityWatcherTrait + Send>> {
    config.validate()?;

    if dry_run || config.is_dry_run_mode() {
        Ok(Box::new(super::dry_run::DryRunWatcher::new(
            config,
            registry,
            current_view,
        )))
    } else {
        let provider = FileStateProvider::new(config.watcher.state_path.clone());
        info!("Файл состояния: {:?}", provider.path());
        Ok(Box::new(super::polling::PollingWatcher::new(
            config,
            registry,
            Box::new(provider),
            current_view,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WatchError;
    use crate::events::ViewSnapshot;
    use parking_lot::RwLock;

    fn shared_view() -> SharedView {
        Arc::new(RwLock::new(ViewSnapshot::default()))
    }

    #[test]
    fn test_factory_rejects_invalid_config() {
        let mut config = Config::default();
        config.watcher.polling_interval_ms = 0;
        let registry = Arc::new(SubscriptionRegistry::new(true));

        let result = create_visibility_watcher(Arc::new(config), registry, shared_view(), true);
        assert!(matches!(result, Err(WatchError::Config(_))));
    }

    #[test]
    fn test_factory_builds_both_modes() {
        let registry = Arc::new(SubscriptionRegistry::new(true));
        let config = Arc::new(Config::default());

        assert!(create_visibility_watcher(config.clone(), registry.clone(), shared_view(), true).is_ok());
        assert!(create_visibility_watcher(config, registry, shared_view(), false).is_ok());
    }
}
