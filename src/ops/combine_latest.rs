use std::sync::{Arc, Mutex};

use crate::error::StreamError;
use crate::observer::{Observer, SerializedObserver};
use crate::stream::Stream;
use crate::subscriber::Subscriber;
use crate::subscription::Subscription;

impl<ItemA: Clone + Send + 'static> Stream<ItemA> {
  /// Emits a combined value on every emission from either side, once both
  /// sides have emitted at least once, using each side's most recent
  /// value. Completes when both sides have completed.
  pub fn combine_latest<ItemB>(
    &self,
    other: &Stream<ItemB>,
  ) -> Stream<(ItemA, ItemB)>
  where
    ItemB: Clone + Send + 'static,
  {
    self.combine_latest_with(other, |a, b| (a, b))
  }

  /// [`combine_latest`](Stream::combine_latest) through a combiner
  /// function instead of tuples.
  pub fn combine_latest_with<ItemB, Out, F>(
    &self,
    other: &Stream<ItemB>,
    combiner: F,
  ) -> Stream<Out>
  where
    ItemB: Clone + Send + 'static,
    Out: Send + 'static,
    F: FnMut(ItemA, ItemB) -> Out + Clone + Send + Sync + 'static,
  {
    let source_a = self.clone();
    let source_b = other.clone();
    Stream::new(move |subscriber: Subscriber<Out>| {
      let subscription = subscriber.subscription().clone();
      let downstream = SerializedObserver::new(subscriber);
      let state = Arc::new(Mutex::new(CombineLatestState {
        latest_a: None,
        latest_b: None,
        done_a: false,
        done_b: false,
        combiner: combiner.clone(),
      }));

      let child_a = Subscription::new();
      subscription.add(child_a.clone());
      source_a.actual_subscribe(
        LatestAObserver { state: state.clone(), downstream: downstream.clone() },
        child_a,
      );

      if !subscription.is_closed() {
        let child_b = Subscription::new();
        subscription.add(child_b.clone());
        source_b
          .actual_subscribe(LatestBObserver { state, downstream }, child_b);
      }
    })
  }
}

struct CombineLatestState<ItemA, ItemB, F> {
  latest_a: Option<ItemA>,
  latest_b: Option<ItemB>,
  done_a: bool,
  done_b: bool,
  combiner: F,
}

impl<ItemA, ItemB, F> CombineLatestState<ItemA, ItemB, F> {
  fn combine<Out>(&mut self) -> Option<Out>
  where
    ItemA: Clone,
    ItemB: Clone,
    F: FnMut(ItemA, ItemB) -> Out,
  {
    let pair = Option::zip(self.latest_a.clone(), self.latest_b.clone());
    pair.map(|(a, b)| (self.combiner)(a, b))
  }
}

struct LatestAObserver<ItemA, ItemB, F, Out> {
  state: Arc<Mutex<CombineLatestState<ItemA, ItemB, F>>>,
  downstream: SerializedObserver<Out>,
}

struct LatestBObserver<ItemA, ItemB, F, Out> {
  state: Arc<Mutex<CombineLatestState<ItemA, ItemB, F>>>,
  downstream: SerializedObserver<Out>,
}

impl<ItemA, ItemB, F, Out> Observer<ItemA>
  for LatestAObserver<ItemA, ItemB, F, Out>
where
  ItemA: Clone + Send,
  ItemB: Clone + Send,
  Out: Send + 'static,
  F: FnMut(ItemA, ItemB) -> Out + Send,
{
  fn next(&mut self, value: ItemA) {
    let emit = {
      let mut state = self.state.lock().unwrap();
      state.latest_a = Some(value);
      state.combine()
    };
    if let Some(out) = emit {
      self.downstream.next(out);
    }
  }

  fn error(&mut self, err: StreamError) {
    self.downstream.error(err);
  }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.lock().unwrap();
      state.done_a = true;
      state.done_a && state.done_b
    };
    if finished {
      self.downstream.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self.downstream.is_closed()
  }
}

impl<ItemA, ItemB, F, Out> Observer<ItemB>
  for LatestBObserver<ItemA, ItemB, F, Out>
where
  ItemA: Clone + Send,
  ItemB: Clone + Send,
  Out: Send + 'static,
  F: FnMut(ItemA, ItemB) -> Out + Send,
{
  fn next(&mut self, value: ItemB) {
    let emit = {
      let mut state = self.state.lock().unwrap();
      state.latest_b = Some(value);
      state.combine()
    };
    if let Some(out) = emit {
      self.downstream.next(out);
    }
  }

  fn error(&mut self, err: StreamError) {
    self.downstream.error(err);
  }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.lock().unwrap();
      state.done_b = true;
      state.done_a && state.done_b
    };
    if finished {
      self.downstream.complete();
    }
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
  fn waits_for_both_sides_then_tracks_every_emission() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(Mutex::new(false));
    let c_seen = seen.clone();
    let c_completed = completed.clone();

    // a runs to completion before b subscribes, so every b value pairs
    // with a's final (latest) value.
    stream::range(1, 3)
      .combine_latest(&stream::from_iter(vec!["x", "y"]))
      .subscribe_all(
        move |v| c_seen.lock().unwrap().push(v),
        |e| panic!("unexpected error: {e}"),
        move || *c_completed.lock().unwrap() = true,
      );

    assert_eq!(*seen.lock().unwrap(), vec![(3, "x"), (3, "y")]);
    assert!(*completed.lock().unwrap());
  }

  #[test]
  fn completes_only_after_both_sides() {
    let completed = Arc::new(Mutex::new(0));
    let c_completed = completed.clone();
    stream::of(1).combine_latest(&stream::of(2)).subscribe_all(
      |_| {},
      |e| panic!("unexpected error: {e}"),
      move || *c_completed.lock().unwrap() += 1,
    );
    assert_eq!(*completed.lock().unwrap(), 1);
  }

  #[test]
  fn an_error_on_either_side_fails_fast() {
    let errors = Arc::new(Mutex::new(0));
    let c_errors = errors.clone();
    stream::of(1)
      .combine_latest(&stream::throw::<i32>(StreamError::Upstream(
        "b died".to_owned(),
      )))
      .subscribe_all(
        |_| {},
        move |_| *c_errors.lock().unwrap() += 1,
        || panic!("must not complete"),
      );
    assert_eq!(*errors.lock().unwrap(), 1);
  }
}
