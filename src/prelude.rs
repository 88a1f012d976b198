//! The user-facing surface in one import.

pub use crate::error::StreamError;
pub use crate::observer::{
  FnMutObserver, Notification, Observer, ObserverAll, SerializedObserver,
};
pub use crate::ops;
pub use crate::ops::{amb, merge};
pub use crate::scheduler::{
  pool_scheduler, timer_scheduler, ImmediateScheduler, Scheduler, TaskHandle,
  ThreadPoolScheduler, TimerScheduler,
};
pub use crate::stream;
pub use crate::stream::Stream;
pub use crate::subscriber::Subscriber;
pub use crate::subscription::{Subscription, SubscriptionLike};
