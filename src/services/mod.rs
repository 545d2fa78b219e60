pub mod state_reader;
pub mod subscription_registry;
pub mod visibility_detector;
pub mod visibility_watcher;

pub use state_reader::{AppState, FileStateProvider, StateProvider};
pub use subscription_registry::SubscriptionRegistry;
pub use visibility_detector::VisibilityDetector;
pub use visibility_watcher::{create_visibility_watcher, SharedView};
