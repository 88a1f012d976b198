use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::StreamError;
use crate::observer::{Observer, SerializedObserver};
use crate::stream::Stream;
use crate::subscriber::Subscriber;
use crate::subscription::Subscription;

impl<ItemA: Send + 'static> Stream<ItemA> {
  /// Pairs this stream with another, lock-step by arrival index.
  ///
  /// Each side buffers its pending values; a pair is emitted as soon as
  /// both sides have one, consuming the oldest from each. Completes when
  /// either side completes with an exhausted buffer: pairing goes by
  /// arrival index, never by time.
  pub fn zip<ItemB>(&self, other: &Stream<ItemB>) -> Stream<(ItemA, ItemB)>
  where
    ItemB: Send + 'static,
  {
    self.zip_with(other, |a, b| (a, b))
  }

  /// [`zip`](Stream::zip) through a combiner function instead of tuples.
  pub fn zip_with<ItemB, Out, F>(
    &self,
    other: &Stream<ItemB>,
    combiner: F,
  ) -> Stream<Out>
  where
    ItemB: Send + 'static,
    Out: Send + 'static,
    F: FnMut(ItemA, ItemB) -> Out + Clone + Send + Sync + 'static,
  {
    let source_a = self.clone();
    let source_b = other.clone();
    Stream::new(move |subscriber: Subscriber<Out>| {
      let subscription = subscriber.subscription().clone();
      let downstream = SerializedObserver::new(subscriber);
      let state = Arc::new(Mutex::new(ZipState {
        buffer_a: VecDeque::new(),
        buffer_b: VecDeque::new(),
        done_a: false,
        done_b: false,
        combiner: combiner.clone(),
      }));

      let child_a = Subscription::new();
      subscription.add(child_a.clone());
      source_a.actual_subscribe(
        ZipAObserver { state: state.clone(), downstream: downstream.clone() },
        child_a,
      );

      // A synchronous error on the first side already tore everything
      // down; subscribing the second side would only be discarded work.
      if !subscription.is_closed() {
        let child_b = Subscription::new();
        subscription.add(child_b.clone());
        source_b.actual_subscribe(ZipBObserver { state, downstream }, child_b);
      }
    })
  }
}

/// Shared state between the two sides.
struct ZipState<ItemA, ItemB, F> {
  buffer_a: VecDeque<ItemA>,
  buffer_b: VecDeque<ItemB>,
  done_a: bool,
  done_b: bool,
  combiner: F,
}

impl<ItemA, ItemB, F> ZipState<ItemA, ItemB, F> {
  /// No further pair can ever be formed.
  fn exhausted(&self) -> bool {
    (self.done_a && self.buffer_a.is_empty())
      || (self.done_b && self.buffer_b.is_empty())
  }
}

struct ZipAObserver<ItemA, ItemB, F, Out> {
  state: Arc<Mutex<ZipState<ItemA, ItemB, F>>>,
  downstream: SerializedObserver<Out>,
}

struct ZipBObserver<ItemA, ItemB, F, Out> {
  state: Arc<Mutex<ZipState<ItemA, ItemB, F>>>,
  downstream: SerializedObserver<Out>,
}

impl<ItemA, ItemB, F, Out> Observer<ItemA> for ZipAObserver<ItemA, ItemB, F, Out>
where
  ItemA: Send,
  ItemB: Send,
  Out: Send + 'static,
  F: FnMut(ItemA, ItemB) -> Out + Send,
{
  fn next(&mut self, value: ItemA) {
    let (emit, finished) = {
      let mut state = self.state.lock().unwrap();
      state.buffer_a.push_back(value);
      let emit = if state.buffer_b.is_empty() {
        None
      } else {
        let a = state.buffer_a.pop_front();
        let b = state.buffer_b.pop_front();
        Option::zip(a, b).map(|(a, b)| (state.combiner)(a, b))
      };
      (emit, state.exhausted())
    };
    if let Some(out) = emit {
      self.downstream.next(out);
      if finished {
        self.downstream.complete();
      }
    }
  }

  fn error(&mut self, err: StreamError) {
    self.downstream.error(err);
  }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.lock().unwrap();
      state.done_a = true;
      state.exhausted()
    };
    if finished {
      self.downstream.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self.downstream.is_closed()
  }
}

impl<ItemA, ItemB, F, Out> Observer<ItemB> for ZipBObserver<ItemA, ItemB, F, Out>
where
  ItemA: Send,
  ItemB: Send,
  Out: Send + 'static,
  F: FnMut(ItemA, ItemB) -> Out + Send,
{
  fn next(&mut self, value: ItemB) {
    let (emit, finished) = {
      let mut state = self.state.lock().unwrap();
      state.buffer_b.push_back(value);
      let emit = if state.buffer_a.is_empty() {
        None
      } else {
        let a = state.buffer_a.pop_front();
        let b = state.buffer_b.pop_front();
        Option::zip(a, b).map(|(a, b)| (state.combiner)(a, b))
      };
      (emit, state.exhausted())
    };
    if let Some(out) = emit {
      self.downstream.next(out);
      if finished {
        self.downstream.complete();
      }
    }
  }

  fn error(&mut self, err: StreamError) {
    self.downstream.error(err);
  }

  fn complete(&mut self) {
    let finished = {
      let mut state = self.state.lock().unwrap();
      state.done_b = true;
      state.exhausted()
    };
    if finished {
      self.downstream.complete();
    }
  }

  fn is_closed(&self) -> bool {
    self.downstream.is_closed()
  }
}
