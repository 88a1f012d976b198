//! # rivulet: a minimal push-based reactive stream engine
//!
//! Lazy, resubscribable streams with a serialized notification contract.
//!
//! ## Quick Start
//!
//! ```rust
//! use rivulet::prelude::*;
//!
//! stream::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(|v| println!("value: {}", v));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Stream`] | An inert descriptor; the producer runs once per subscription |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`SerializedObserver`] | Funnels concurrent producers into serial delivery |
//! | [`Scheduler`] | Pluggable execution context for delayed and periodic work |
//!
//! Nothing runs at composition time: operators wrap descriptors, and each
//! `subscribe` re-executes the whole producer chain independently, which
//! is what makes a stream shareable and replayable. Within one
//! subscription the notification contract holds everywhere the engine is
//! in control: multi-source operators fan out behind a serializing
//! wrapper and cancellation propagates recursively; anything arriving
//! after a terminal event is dropped.
//!
//! [`Stream`]: stream::Stream
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`SerializedObserver`]: observer::SerializedObserver
//! [`Scheduler`]: scheduler::Scheduler

pub mod error;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod scheduler;
pub mod stream;
pub mod subscriber;
pub mod subscription;

pub use prelude::*;
