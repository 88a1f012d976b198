use crate::error::StreamError;
use crate::observer::Observer;
use crate::stream::Stream;
use crate::subscriber::Subscriber;

impl<Item: Send + 'static> Stream<Item> {
  /// Forwards only the values satisfying `predicate`; errors and
  /// completion pass through unchanged.
  pub fn filter<F>(&self, predicate: F) -> Stream<Item>
  where
    F: FnMut(&Item) -> bool + Clone + Send + Sync + 'static,
  {
    let source = self.clone();
    Stream::new(move |subscriber: Subscriber<Item>| {
      let subscription = subscriber.subscription().clone();
      source.actual_subscribe(
        FilterObserver { downstream: subscriber, predicate: predicate.clone() },
        subscription,
      );
    })
  }
}

struct FilterObserver<O, F> {
  downstream: O,
  predicate: F,
}

impl<Item, O, F> Observer<Item> for FilterObserver<O, F>
where
  O: Observer<Item>,
  F: FnMut(&Item) -> bool + Send,
{
  fn next(&mut self, value: Item) {
    if (self.predicate)(&value) {
      self.downstream.next(value);
    }
  }

  fn error(&mut self, err: StreamError) {
    self.downstream.error(err);
  }

  fn complete(&mut self) {
    self.downstream.complete();
  }

  fn is_closed(&self) -> bool {
    self.downstream.is_closed()
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn keeps_only_matching_values() {
    let evens = Arc::new(Mutex::new(Vec::new()));
    let odds = Arc::new(Mutex::new(Vec::new()));
    let c_evens = evens.clone();
    let c_odds = odds.clone();

    let numbers = stream::range(1, 10);
    numbers
      .filter(|v| v % 2 == 0)
      .subscribe(move |v| c_evens.lock().unwrap().push(v));
    numbers
      .filter(|v| v % 2 != 0)
      .subscribe(move |v| c_odds.lock().unwrap().push(v));

    assert_eq!(*evens.lock().unwrap(), vec![2, 4, 6, 8, 10]);
    assert_eq!(*odds.lock().unwrap(), vec![1, 3, 5, 7, 9]);
  }

  #[test]
  fn completion_passes_through() {
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();
    stream::range(0, 3).filter(|_| false).subscribe_all(
      |_| panic!("everything is filtered out"),
      |e| panic!("unexpected error: {e}"),
      move || *c_completed.lock().unwrap() = true,
    );
    assert!(*completed.lock().unwrap());
  }
}
