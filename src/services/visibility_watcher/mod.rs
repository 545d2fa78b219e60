//! VisibilityWatcher service: responsibility and boundaries
//!
//! This module and its submodules are responsible ONLY for obtaining view snapshots
//! on a schedule, running them through the VisibilityDetector and forwarding the
//! resulting VisibilityEvent(s). Subscription bookkeeping lives exclusively in
//! SubscriptionRegistry.

use crate::events::ViewSnapshot;
use parking_lot::RwLock;
use std::sync::Arc;

mod dry_run;
mod polling;
mod r#trait;

pub use self::polling::PollingWatcher;
pub use self::r#trait::{create_visibility_watcher, VisibilityWatcherTrait};

/// Последний обработанный снимок слотов, общий для наблюдателя и читателей статуса
pub type SharedView = Arc<RwLock<ViewSnapshot>>;
