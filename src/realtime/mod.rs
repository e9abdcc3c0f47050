pub mod hub;
pub mod protocol;
pub mod session;

pub use hub::{FeedSubscription, RealtimeHub};
pub use protocol::{ClientFrame, ServerEvent};
