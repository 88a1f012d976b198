//! Subscription handles
//!
//! A [`Subscription`] represents one active execution of a stream's
//! producer. Cancelling it stops future notification delivery and releases
//! every resource registered with it (timer tasks, worker handles, child
//! subscriptions), recursively and idempotently.

use std::sync::{Arc, Mutex};

use smallvec::SmallVec;

/// The cancellation capability.
///
/// Anything that can be torn down when a subscription ends implements this:
/// child subscriptions, scheduler task handles, drain-loop wakers.
pub trait SubscriptionLike: Send {
  /// Tears down this resource. Must be idempotent.
  fn unsubscribe(&mut self);

  fn is_closed(&self) -> bool;
}

/// The ownership handle returned by subscribing.
///
/// Clones share the same teardown tree; cancelling any clone cancels them
/// all. A terminal notification closes the subscription as well, so
/// resources never outlive the stream that owns them.
#[derive(Clone, Default)]
pub struct Subscription(Arc<Mutex<Inner>>);

#[derive(Default)]
struct Inner {
  closed: bool,
  teardown: SmallVec<[Box<dyn SubscriptionLike>; 1]>,
}

impl Subscription {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers a resource to tear down when this subscription closes.
  ///
  /// If the subscription is already closed the resource is torn down
  /// immediately, which covers the race where a child is attached while
  /// another thread cancels the parent.
  pub fn add<S: SubscriptionLike + 'static>(&self, subscription: S) {
    let mut subscription = subscription;
    {
      let mut inner = self.0.lock().unwrap();
      if !inner.closed {
        // Long-lived subscriptions (delay, interval) keep attaching task
        // handles; drop the ones that already finished.
        inner.teardown.retain(|s| !s.is_closed());
        inner.teardown.push(Box::new(subscription));
        return;
      }
    }
    subscription.unsubscribe();
  }

  /// Cancels this subscription and everything registered with it.
  pub fn unsubscribe(&self) {
    let teardown = {
      let mut inner = self.0.lock().unwrap();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    // Run teardowns outside the lock: a child's teardown may reach back
    // into other subscriptions.
    for mut subscription in teardown {
      subscription.unsubscribe();
    }
  }

  pub fn is_closed(&self) -> bool {
    self.0.lock().unwrap().closed
  }
}

impl SubscriptionLike for Subscription {
  #[inline]
  fn unsubscribe(&mut self) {
    Subscription::unsubscribe(self);
  }

  #[inline]
  fn is_closed(&self) -> bool {
    Subscription::is_closed(self)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::sync::atomic::{AtomicBool, Ordering};

  struct Flag(Arc<AtomicBool>);

  impl SubscriptionLike for Flag {
    fn unsubscribe(&mut self) {
      self.0.store(true, Ordering::SeqCst);
    }
    fn is_closed(&self) -> bool {
      self.0.load(Ordering::SeqCst)
    }
  }

  #[test]
  fn unsubscribe_propagates_to_children() {
    let parent = Subscription::new();
    let child = Subscription::new();
    let flag = Arc::new(AtomicBool::new(false));
    child.add(Flag(flag.clone()));
    parent.add(child.clone());

    parent.unsubscribe();
    assert!(parent.is_closed());
    assert!(child.is_closed());
    assert!(flag.load(Ordering::SeqCst));
  }

  #[test]
  fn add_after_close_tears_down_immediately() {
    let subscription = Subscription::new();
    subscription.unsubscribe();

    let flag = Arc::new(AtomicBool::new(false));
    subscription.add(Flag(flag.clone()));
    assert!(flag.load(Ordering::SeqCst));
  }

  #[test]
  fn unsubscribe_is_idempotent() {
    let subscription = Subscription::new();
    subscription.unsubscribe();
    subscription.unsubscribe();
    assert!(subscription.is_closed());
  }
}
