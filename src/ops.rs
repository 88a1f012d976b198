//! Operator library
//!
//! Every operator takes an upstream [`Stream`](crate::stream::Stream) and
//! returns a new one: pure composition, no execution. The multi-source
//! operators wrap their downstream in
//! [`SerializedObserver`](crate::observer::SerializedObserver) before
//! fanning out and give each source its own child subscription, so both
//! the notification contract and fail-fast cancellation hold no matter
//! which threads the sources run on.

mod amb;
mod combine_latest;
mod delay;
mod filter;
mod flat_map;
mod map;
mod merge;
mod merge_all;
mod observe_on;
mod start_with;
mod subscribe_on;
mod take;
mod with_latest_from;
mod zip;

pub use amb::amb;
pub use merge::merge;
