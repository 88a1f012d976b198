use crate::error::StreamError;
use crate::observer::Observer;
use crate::stream::Stream;
use crate::subscriber::Subscriber;

impl<Item: Send + 'static> Stream<Item> {
  /// Forwards the first `count` values, then completes and cancels
  /// upstream. Synchronous sources observe the cut through
  /// [`Observer::is_closed`] and stop iterating.
  pub fn take(&self, count: usize) -> Stream<Item> {
    let source = self.clone();
    Stream::new(move |mut subscriber: Subscriber<Item>| {
      if count == 0 {
        subscriber.complete();
        return;
      }
      let subscription = subscriber.subscription().clone();
      source.actual_subscribe(
        TakeObserver { downstream: subscriber, remaining: count },
        subscription,
      );
    })
  }
}

struct TakeObserver<O> {
  downstream: O,
  remaining: usize,
}

impl<Item, O> Observer<Item> for TakeObserver<O>
where
  O: Observer<Item>,
{
  fn next(&mut self, value: Item) {
    if self.remaining == 0 {
      return;
    }
    self.remaining -= 1;
    self.downstream.next(value);
    if self.remaining == 0 {
      self.downstream.complete();
    }
  }

  fn error(&mut self, err: StreamError) {
    self.downstream.error(err);
  }

  fn complete(&mut self) {
    self.downstream.complete();
  }

  fn is_closed(&self) -> bool {
    self.remaining == 0 || self.downstream.is_closed()
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn cuts_the_stream_short() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(Mutex::new(false));
    let c_seen = seen.clone();
    let c_completed = completed.clone();

    stream::range(0, 100).take(3).subscribe_all(
      move |v| c_seen.lock().unwrap().push(v),
      |e| panic!("unexpected error: {e}"),
      move || *c_completed.lock().unwrap() = true,
    );

    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    assert!(*completed.lock().unwrap());
  }

  #[test]
  fn upstream_stops_iterating_after_the_cut() {
    let pulled = Arc::new(Mutex::new(0));
    let c_pulled = pulled.clone();
    let counted = stream::from_iter(0..1000).map(move |v| {
      *c_pulled.lock().unwrap() += 1;
      v
    });

    counted.take(2).subscribe(|_| {});
    assert_eq!(*pulled.lock().unwrap(), 2);
  }

  #[test]
  fn take_zero_completes_without_subscribing_upstream() {
    let subscribed = Arc::new(Mutex::new(false));
    let c_subscribed = subscribed.clone();
    let source = Stream::new(move |mut subscriber: Subscriber<i32>| {
      *c_subscribed.lock().unwrap() = true;
      subscriber.complete();
    });

    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();
    source
      .take(0)
      .subscribe_all(|_| {}, |_| {}, move || *c_completed.lock().unwrap() = true);

    assert!(*completed.lock().unwrap());
    assert!(!*subscribed.lock().unwrap());
  }
}
