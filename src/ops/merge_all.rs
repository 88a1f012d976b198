use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::StreamError;
use crate::observer::{Observer, SerializedObserver};
use crate::stream::Stream;
use crate::subscriber::Subscriber;
use crate::subscription::Subscription;

impl<Item: Send + 'static> Stream<Stream<Item>> {
  /// Flattens a stream of streams, subscribing to at most `concurrent`
  /// inner streams at a time.
  ///
  /// Inner emissions are interleaved into the downstream in whatever
  /// order their producers deliver them; serialization (never ordering)
  /// across inner threads is guaranteed. Upstream values beyond the
  /// concurrency limit are buffered in arrival order and subscribed as
  /// slots free up. The result completes once the outer stream and every
  /// inner stream have completed; any error from the outer stream or an
  /// inner one fails fast, cancelling all sibling subscriptions.
  ///
  /// `concurrent == 0` cannot make progress and fails the subscription
  /// with [`StreamError::InvalidArgument`]; `concurrent == 1` is the
  /// strictly sequential, order-preserving mode `concat_map` relies on.
  pub fn merge_all(&self, concurrent: usize) -> Stream<Item> {
    let source = self.clone();
    Stream::new(move |mut subscriber: Subscriber<Item>| {
      if concurrent == 0 {
        subscriber.error(StreamError::InvalidArgument(
          "merge_all needs at least one concurrent slot".to_owned(),
        ));
        return;
      }
      let subscription = subscriber.subscription().clone();
      let downstream = SerializedObserver::new(subscriber);
      let state = Arc::new(Mutex::new(MergeAllState {
        backlog: VecDeque::new(),
        active: 0,
        concurrent,
        outer_done: false,
      }));
      let outer = Subscription::new();
      subscription.add(outer.clone());
      source.actual_subscribe(
        OuterObserver { state, downstream, subscription },
        outer,
      );
    })
  }
}

struct MergeAllState<Item> {
  backlog: VecDeque<Stream<Item>>,
  active: usize,
  concurrent: usize,
  outer_done: bool,
}

/// Watches the outer stream and admits inner subscriptions up to the
/// concurrency limit.
struct OuterObserver<Item> {
  state: Arc<Mutex<MergeAllState<Item>>>,
  downstream: SerializedObserver<Item>,
  subscription: Subscription,
}

/// Watches one inner stream; on completion it frees a slot and drains the
/// backlog.
struct InnerObserver<Item> {
  state: Arc<Mutex<MergeAllState<Item>>>,
  downstream: SerializedObserver<Item>,
  subscription: Subscription,
}

fn subscribe_inner<Item: Send + 'static>(
  inner: Stream<Item>,
  state: &Arc<Mutex<MergeAllState<Item>>>,
  downstream: &SerializedObserver<Item>,
  subscription: &Subscription,
) {
  // Every inner gets its own child subscription: an inner completing must
  // not tear down its siblings, while cancelling the downstream handle
  // must reach them all.
  let child = Subscription::new();
  subscription.add(child.clone());
  inner.actual_subscribe(
    InnerObserver {
      state: state.clone(),
      downstream: downstream.clone(),
      subscription: subscription.clone(),
    },
    child,
  );
}

impl<Item: Send + 'static> Observer<Stream<Item>> for OuterObserver<Item> {
  fn next(&mut self, inner: Stream<Item>) {
    let mut state = self.state.lock().unwrap();
    if state.active < state.concurrent {
      state.active += 1;
      drop(state);
      // Subscribe outside the lock: a synchronous inner calls straight
      // back into this state.
      subscribe_inner(inner, &self.state, &self.downstream, &self.subscription);
    } else {
      state.backlog.push_back(inner);
    }
  }

  fn error(&mut self, err: StreamError) {
    self.downstream.error(err);
  }

  fn complete(&mut self) {
    let mut state = self.state.lock().unwrap();
    state.outer_done = true;
    let finished = state.active == 0 && state.backlog.is_empty();
    drop(state);
    if finished {
      self.downstream.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self.downstream.is_closed()
  }
}

impl<Item: Send + 'static> Observer<Item> for InnerObserver<Item> {
  fn next(&mut self, value: Item) {
    self.downstream.next(value);
  }

  fn error(&mut self, err: StreamError) {
    self.downstream.error(err);
  }

  fn complete(&mut self) {
    let mut state = self.state.lock().unwrap();
    if let Some(next_inner) = state.backlog.pop_front() {
      // The freed slot goes straight to the oldest buffered value.
      drop(state);
      subscribe_inner(
        next_inner,
        &self.state,
        &self.downstream,
        &self.subscription,
      );
      return;
    }
    state.active -= 1;
    let finished = state.outer_done && state.active == 0;
    drop(state);
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
  fn flattens_in_subscription_order_when_sequential() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let c_seen = seen.clone();
    stream::from_iter(vec![stream::range(0, 2), stream::range(10, 2)])
      .merge_all(1)
      .subscribe(move |v| c_seen.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 10, 11]);
  }

  #[test]
  fn zero_concurrency_is_rejected() {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let c_errors = errors.clone();
    stream::from_iter(vec![stream::of(1)])
      .merge_all(0)
      .subscribe_all(
        |_| panic!("no value can be emitted"),
        move |e| c_errors.lock().unwrap().push(e),
        || panic!("must not complete"),
      );
    let errors = errors.lock().unwrap();
    assert!(matches!(errors[0], StreamError::InvalidArgument(_)));
  }

  #[test]
  fn completes_only_after_outer_and_all_inners() {
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let c_seen = seen.clone();

    stream::from_iter(vec![stream::of(1), stream::of(2), stream::empty()])
      .merge_all(2)
      .subscribe_all(
        move |v| c_seen.lock().unwrap().push(v),
        |e| panic!("unexpected error: {e}"),
        move || *c_completed.lock().unwrap() = true,
      );

    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    assert!(*completed.lock().unwrap());
  }

  #[test]
  fn an_inner_error_fails_fast() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let errors = Arc::new(Mutex::new(0));
    let c_seen = seen.clone();
    let c_errors = errors.clone();

    stream::from_iter(vec![
      stream::of(1),
      stream::throw(StreamError::Upstream("inner died".to_owned())),
      stream::of(3),
    ])
    .merge_all(1)
    .subscribe_all(
      move |v| c_seen.lock().unwrap().push(v),
      move |_| *c_errors.lock().unwrap() += 1,
      || panic!("must not complete after an error"),
    );

    assert_eq!(*seen.lock().unwrap(), vec![1]);
    assert_eq!(*errors.lock().unwrap(), 1);
  }
}
