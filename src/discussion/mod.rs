pub mod scheduler;

pub use scheduler::{DiscussionContext, DiscussionScheduler, DiscussionWindow, ScheduledUtterance};
