use std::sync::mpsc::{self, Sender};

use crate::error::StreamError;
use crate::observer::{Notification, Observer};
use crate::scheduler::Scheduler;
use crate::stream::Stream;
use crate::subscriber::Subscriber;
use crate::subscription::{Subscription, SubscriptionLike};

impl<Item: Send + 'static> Stream<Item> {
  /// Re-delivers notifications on a scheduler worker, decoupling the
  /// producer's thread from the observer's.
  ///
  /// Events flow through a channel drained by a single worker unit, so
  /// arrival order survives the thread hop and the observer never sees
  /// two callbacks at once. The drain parks between events; it ends at
  /// the first terminal notification or when the subscription is
  /// cancelled.
  ///
  /// The scheduler must run its units off the calling thread. On the
  /// immediate scheduler the drain would run inline, before the upstream
  /// subscription even happens.
  pub fn observe_on<S>(&self, scheduler: S) -> Stream<Item>
  where
    S: Scheduler + Clone + 'static,
  {
    let source = self.clone();
    Stream::new(move |subscriber: Subscriber<Item>| {
      let subscription = subscriber.subscription().clone();
      let (tx, rx) = mpsc::channel::<Notification<Item>>();

      let mut subscriber = subscriber;
      let drain = scheduler.schedule(
        None,
        Box::new(move || {
          while let Ok(notification) = rx.recv() {
            if subscriber.is_closed() {
              break;
            }
            let terminal = notification.is_terminal();
            match notification {
              Notification::Next(value) => subscriber.next(value),
              Notification::Error(err) => subscriber.error(err),
              Notification::Complete => subscriber.complete(),
            }
            if terminal {
              break;
            }
          }
        }),
      );
      subscription.add(drain);
      // Cancellation wake-up: an unsubscribe sends a sentinel so the
      // drain is not left parked on an idle channel.
      subscription.add(DrainWaker { tx: tx.clone(), fired: false });

      let child = Subscription::new();
      subscription.add(child.clone());
      source.actual_subscribe(ObserveOnObserver { tx }, child);
    })
  }
}

/// Forwards upstream events into the drain channel.
struct ObserveOnObserver<Item> {
  tx: Sender<Notification<Item>>,
}

impl<Item: Send> Observer<Item> for ObserveOnObserver<Item> {
  fn next(&mut self, value: Item) {
    let _ = self.tx.send(Notification::Next(value));
  }

  fn error(&mut self, err: StreamError) {
    let _ = self.tx.send(Notification::Error(err));
  }

  fn complete(&mut self) {
    let _ = self.tx.send(Notification::Complete);
  }
}

struct DrainWaker<Item> {
  tx: Sender<Notification<Item>>,
  fired: bool,
}

impl<Item: Send> SubscriptionLike for DrainWaker<Item> {
  fn unsubscribe(&mut self) {
    if !self.fired {
      self.fired = true;
      // The drain sees a closed subscriber and exits; the payload is
      // never delivered.
      let _ = self.tx.send(Notification::Complete);
    }
  }

  fn is_closed(&self) -> bool {
    self.fired
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::mpsc;
  use std::time::Duration;

  #[test]
  fn notifications_hop_threads_but_keep_their_order() {
    let (tx, rx) = mpsc::channel();
    let caller = std::thread::current().id();

    let done = tx.clone();
    stream::range(0, 50).observe_on(pool_scheduler()).subscribe_all(
      move |v| tx.send(Some((v, std::thread::current().id()))).unwrap(),
      |e| panic!("unexpected error: {e}"),
      move || done.send(None).unwrap(),
    );

    let mut seen = Vec::new();
    loop {
      match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
        Some((v, thread)) => {
          assert_ne!(thread, caller);
          seen.push(v);
        }
        None => break,
      }
    }
    assert_eq!(seen, (0..50).collect::<Vec<i32>>());
  }

  #[test]
  fn cancelling_releases_the_parked_drain() {
    let (tx, rx) = mpsc::channel();
    let subscription = stream::never::<i32>()
      .observe_on(pool_scheduler())
      .subscribe(move |v| {
        let _ = tx.send(v);
      });

    subscription.unsubscribe();
    // Nothing was ever emitted and nothing arrives after cancellation.
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
  }
}
