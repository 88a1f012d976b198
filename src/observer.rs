//! Observer trait and the serialized notification channel
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion). The channel contract: `next` zero or
//! more times, then at most one of `error` or `complete`, and nothing after
//! that.
//!
//! The engine guarantees the contract on every path it controls. Producers
//! that fan multiple threads into one observer must go through
//! [`SerializedObserver`], which funnels concurrent calls into strict serial
//! order; the unguarded path stays available for single-producer code.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::error::StreamError;

/// Observer trait: the consumer of data in reactive programming.
///
/// An Observer receives values, errors, and completion notifications from
/// a [`Stream`](crate::stream::Stream). Terminal methods take `&mut self`
/// rather than consuming the observer, because fan-in operators hold
/// observers behind shared handles; implementations are expected to ignore
/// calls arriving after a terminal event.
pub trait Observer<Item>: Send {
  /// Receive the next value from the stream.
  fn next(&mut self, value: Item);

  /// Receive a terminal error. No further calls may be delivered.
  fn error(&mut self, err: StreamError);

  /// Receive the completion notification. No further calls may be
  /// delivered.
  fn complete(&mut self);

  /// Checks if the observer is closed.
  ///
  /// This is primarily used by sources (like `from_iter`) to determine if
  /// they should stop emitting values early (e.g., due to a `take`
  /// operator or a cancelled subscription).
  fn is_closed(&self) -> bool {
    false
  }
}

/// A single event on the notification channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification<Item> {
  Next(Item),
  Error(StreamError),
  Complete,
}

impl<Item> Notification<Item> {
  /// `true` for `Error` and `Complete`, the events that close the channel.
  pub fn is_terminal(&self) -> bool {
    !matches!(self, Notification::Next(_))
  }
}

// ============================================================================
// Closure adapters
// ============================================================================

/// Blanket adapter turning a closure into an Observer.
///
/// This enables ergonomic subscription syntax:
/// `stream.subscribe(|v| println!("{}", v))`. The closure becomes the
/// `next` handler; completion is ignored and errors are only traced, since
/// the caller declined to handle them.
pub struct FnMutObserver<N>(pub N);

impl<N, Item> Observer<Item> for FnMutObserver<N>
where
  N: FnMut(Item) + Send,
{
  #[inline]
  fn next(&mut self, value: Item) {
    (self.0)(value);
  }

  fn error(&mut self, err: StreamError) {
    trace!(%err, "stream error reached a next-only subscriber");
  }

  fn complete(&mut self) {}
}

/// Adapter for the three-callback subscription form.
pub struct ObserverAll<N, E, C> {
  pub next: N,
  pub error: E,
  pub complete: C,
}

impl<N, E, C, Item> Observer<Item> for ObserverAll<N, E, C>
where
  N: FnMut(Item) + Send,
  E: FnMut(StreamError) + Send,
  C: FnMut() + Send,
{
  #[inline]
  fn next(&mut self, value: Item) {
    (self.next)(value);
  }

  #[inline]
  fn error(&mut self, err: StreamError) {
    (self.error)(err);
  }

  #[inline]
  fn complete(&mut self) {
    (self.complete)();
  }
}

// ============================================================================
// SerializedObserver
// ============================================================================

/// A cloneable wrapper that serializes concurrent notifications.
///
/// Any number of producer threads may share clones of this observer and
/// call it freely; each call is enqueued, and whichever producer finds the
/// queue idle becomes the drain, delivering queued notifications to the
/// wrapped observer one at a time in arrival order. No two downstream
/// callbacks ever execute concurrently.
///
/// Once a terminal notification has been drained the queue closes: anything
/// still queued is discarded and later calls are dropped, so a slow
/// producer racing past a terminal event cannot leak notifications or
/// buffer forever.
///
/// Every multi-source operator wraps its downstream in this before fanning
/// out. It is public so that `create` producers spawning their own threads
/// can opt into the same guarantee.
pub struct SerializedObserver<Item> {
  inner: Arc<Serialized<Item>>,
}

struct Serialized<Item> {
  queue: Mutex<Queue<Item>>,
  downstream: Mutex<Box<dyn Observer<Item>>>,
}

struct Queue<Item> {
  items: VecDeque<Notification<Item>>,
  draining: bool,
  closed: bool,
}

impl<Item> Clone for SerializedObserver<Item> {
  fn clone(&self) -> Self {
    SerializedObserver { inner: self.inner.clone() }
  }
}

impl<Item: Send + 'static> SerializedObserver<Item> {
  pub fn new(observer: impl Observer<Item> + 'static) -> Self {
    SerializedObserver {
      inner: Arc::new(Serialized {
        queue: Mutex::new(Queue {
          items: VecDeque::new(),
          draining: false,
          closed: false,
        }),
        downstream: Mutex::new(Box::new(observer)),
      }),
    }
  }

  fn push(&self, notification: Notification<Item>) {
    let mut queue = self.inner.queue.lock().unwrap();
    if queue.closed {
      trace!("dropping a notification that arrived after a terminal event");
      return;
    }
    queue.items.push_back(notification);
    if queue.draining {
      // Another producer owns the drain; it will deliver this one.
      return;
    }
    queue.draining = true;
    loop {
      let Some(item) = queue.items.pop_front() else {
        queue.draining = false;
        return;
      };
      let terminal = item.is_terminal();
      if terminal {
        queue.closed = true;
        queue.items.clear();
      }
      // Deliver without holding the queue lock, so producers stay
      // wait-free while the drain runs. `draining` keeps this exclusive.
      drop(queue);
      let mut downstream = self.inner.downstream.lock().unwrap();
      match item {
        Notification::Next(value) => downstream.next(value),
        Notification::Error(err) => downstream.error(err),
        Notification::Complete => downstream.complete(),
      }
      drop(downstream);
      if terminal {
        return;
      }
      queue = self.inner.queue.lock().unwrap();
    }
  }
}

impl<Item: Send + 'static> Observer<Item> for SerializedObserver<Item> {
  fn next(&mut self, value: Item) {
    self.push(Notification::Next(value));
  }

  fn error(&mut self, err: StreamError) {
    self.push(Notification::Error(err));
  }

  fn complete(&mut self) {
    self.push(Notification::Complete);
  }

  fn is_closed(&self) -> bool {
    self.inner.queue.lock().unwrap().closed
  }
}
