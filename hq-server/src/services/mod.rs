//! Services - bus, live feeds and notifications
//!
//! - [`MessageBus`]: in-process broadcast channel carrying sync signals and
//!   notifications
//! - [`RecordFeed`]: live record-list subscription for UI consumers
//! - [`NotificationService`]: fire-and-forget workflow notifications

pub mod bus;
pub mod notification;
pub mod record_feed;

pub use bus::MessageBus;
pub use notification::NotificationService;
pub use record_feed::{FeedGuard, RecordFeed};
