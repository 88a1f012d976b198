//! Subscriber: the raw guarded delivery path
//!
//! While [`Observer`] is the public API for consuming the values of a
//! stream, every observer gets wrapped into a `Subscriber` at subscribe
//! time, tying notification delivery to a [`Subscription`]. The subscriber
//! enforces the per-subscription half of the channel contract: nothing is
//! delivered after a terminal event or after cancellation, and a terminal
//! event closes the subscription, releasing timers and worker handles.
//!
//! A `Subscriber` is owned by exactly one producer at a time; it does not
//! serialize concurrent callers. Producers that fan several threads into
//! one downstream wrap it in
//! [`SerializedObserver`](crate::observer::SerializedObserver) instead.

use crate::error::StreamError;
use crate::observer::Observer;
use crate::subscription::Subscription;

pub struct Subscriber<Item> {
  observer: Box<dyn Observer<Item>>,
  subscription: Subscription,
  stopped: bool,
}

impl<Item> Subscriber<Item> {
  pub(crate) fn new(
    observer: impl Observer<Item> + 'static,
    subscription: Subscription,
  ) -> Self
  where
    Item: Send + 'static,
  {
    Subscriber { observer: Box::new(observer), subscription, stopped: false }
  }

  /// The subscription this delivery path is tied to. Producers register
  /// their resources (task handles, child subscriptions) here.
  pub fn subscription(&self) -> &Subscription {
    &self.subscription
  }
}

impl<Item: Send> Observer<Item> for Subscriber<Item> {
  fn next(&mut self, value: Item) {
    if !self.is_closed() {
      self.observer.next(value);
    }
  }

  fn error(&mut self, err: StreamError) {
    if !self.is_closed() {
      self.stopped = true;
      // Deliver before tearing down: unsubscribing first would make the
      // guards along the chain swallow the terminal event itself.
      self.observer.error(err);
      self.subscription.unsubscribe();
    }
  }

  fn complete(&mut self) {
    if !self.is_closed() {
      self.stopped = true;
      self.observer.complete();
      self.subscription.unsubscribe();
    }
  }

  fn is_closed(&self) -> bool {
    self.stopped || self.subscription.is_closed() || self.observer.is_closed()
  }
}
