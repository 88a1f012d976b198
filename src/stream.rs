//! The Stream type and its source factories
//!
//! A `Stream<T>` is an inert descriptor: a producer function invoked once
//! per subscription. Composition (the operators in [`crate::ops`]) only
//! wraps descriptors; nothing executes until someone subscribes, and every
//! subscription gets an independent execution of the whole producer chain.

use std::sync::Arc;

use crate::error::StreamError;
use crate::observer::{FnMutObserver, Observer, ObserverAll};
use crate::subscriber::Subscriber;
use crate::subscription::Subscription;

mod create;
mod from_iter;
mod interval;
mod of;
mod range;
mod timer;
mod trivial;

pub use create::create;
pub use from_iter::{from_iter, from_results};
pub use interval::{interval, interval_on};
pub use of::of;
pub use range::range;
pub use timer::{timer, timer_on};
pub use trivial::{empty, never, throw};

/// A representation of any set of values over any amount of time. This is
/// the most basic building block of the engine.
///
/// Cloning a `Stream` shares the descriptor, not an execution; sharing one
/// across many subscribers is safe because producers are pure factories,
/// not stateful iterators.
pub struct Stream<Item> {
  producer: Arc<dyn Fn(Subscriber<Item>) + Send + Sync>,
}

impl<Item> Clone for Stream<Item> {
  fn clone(&self) -> Self {
    Stream { producer: self.producer.clone() }
  }
}

impl<Item: Send + 'static> Stream<Item> {
  /// Wraps a producer function into a stream.
  ///
  /// The producer is called once for every subscription, with a
  /// [`Subscriber`] to which new values can be `next`ed, an `error` can be
  /// raised, or `complete` can be called to notify of a successful
  /// completion. It may hand the subscriber off to a spawned thread; it
  /// must not share it between threads without
  /// [`SerializedObserver`](crate::observer::SerializedObserver).
  pub fn new(producer: impl Fn(Subscriber<Item>) + Send + Sync + 'static) -> Self {
    Stream { producer: Arc::new(producer) }
  }

  /// Runs the producer against an already-built subscriber. Operators use
  /// this to splice themselves into the chain without allocating a new
  /// subscription.
  pub(crate) fn subscribe_subscriber(&self, subscriber: Subscriber<Item>) {
    (self.producer)(subscriber);
  }

  /// Subscribes `observer` under an existing subscription, so that a
  /// composed operator's sources all hang off the downstream handle.
  pub(crate) fn actual_subscribe(
    &self,
    observer: impl Observer<Item> + 'static,
    subscription: Subscription,
  ) {
    self.subscribe_subscriber(Subscriber::new(observer, subscription));
  }

  /// Subscribes with a full observer, returning the cancellation handle.
  pub fn subscribe_with(&self, observer: impl Observer<Item> + 'static) -> Subscription {
    let subscription = Subscription::new();
    self.actual_subscribe(observer, subscription.clone());
    subscription
  }

  /// Subscribes caring only about values.
  ///
  /// Completion is ignored; an error reaching this subscriber is traced,
  /// not delivered. Use [`subscribe_all`](Stream::subscribe_all) to handle
  /// terminal events.
  pub fn subscribe(&self, next: impl FnMut(Item) + Send + 'static) -> Subscription {
    self.subscribe_with(FnMutObserver(next))
  }

  /// Subscribes with the three notification callbacks.
  pub fn subscribe_all(
    &self,
    next: impl FnMut(Item) + Send + 'static,
    error: impl FnMut(StreamError) + Send + 'static,
    complete: impl FnMut() + Send + 'static,
  ) -> Subscription {
    self.subscribe_with(ObserverAll { next, error, complete })
  }
}
