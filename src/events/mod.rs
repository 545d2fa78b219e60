pub mod channel;
pub mod visibility;

pub use channel::{ChannelId, Slot, ViewSnapshot};
pub use visibility::{ChangeKind, VisibilityChange, VisibilityEvent};
