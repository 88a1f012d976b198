use std::sync::{Arc, Mutex};

use crate::error::StreamError;
use crate::observer::{Observer, SerializedObserver};
use crate::stream::Stream;
use crate::subscriber::Subscriber;
use crate::subscription::Subscription;

impl<ItemA: Send + 'static> Stream<ItemA> {
  /// Emits only when this (primary) stream emits, pairing each value with
  /// the most recent value from `other`.
  ///
  /// Primary values arriving before `other` has emitted are suppressed,
  /// not buffered. Completion follows the primary stream; `other`
  /// completing on its own changes nothing. Errors from either side
  /// propagate.
  pub fn with_latest_from<ItemB, Out, F>(
    &self,
    other: &Stream<ItemB>,
    combiner: F,
  ) -> Stream<Out>
  where
    ItemB: Clone + Send + 'static,
    Out: Send + 'static,
    F: FnMut(ItemA, ItemB) -> Out + Clone + Send + Sync + 'static,
  {
    let source = self.clone();
    let sampled = other.clone();
    Stream::new(move |subscriber: Subscriber<Out>| {
      let subscription = subscriber.subscription().clone();
      let downstream = SerializedObserver::new(subscriber);
      let latest = Arc::new(Mutex::new(None));

      // The sampled side first, so a synchronous `other` has its value in
      // place before the primary starts emitting.
      let child_sampled = Subscription::new();
      subscription.add(child_sampled.clone());
      sampled.actual_subscribe(
        SampledObserver { latest: latest.clone(), downstream: downstream.clone() },
        child_sampled,
      );

      if !subscription.is_closed() {
        let child_primary = Subscription::new();
        subscription.add(child_primary.clone());
        source.actual_subscribe(
          PrimaryObserver { latest, downstream, combiner: combiner.clone() },
          child_primary,
        );
      }
    })
  }
}

/// Drives the output: combines each primary value with the sampled side's
/// latest. The combiner lives here, not behind the lock, since only the
/// primary's serial delivery path calls it.
struct PrimaryObserver<ItemB, F, Out> {
  latest: Arc<Mutex<Option<ItemB>>>,
  downstream: SerializedObserver<Out>,
  combiner: F,
}

/// Records the sampled side's most recent value.
struct SampledObserver<ItemB, Out> {
  latest: Arc<Mutex<Option<ItemB>>>,
  downstream: SerializedObserver<Out>,
}

impl<ItemA, ItemB, F, Out> Observer<ItemA> for PrimaryObserver<ItemB, F, Out>
where
  ItemB: Clone + Send,
  Out: Send + 'static,
  F: FnMut(ItemA, ItemB) -> Out + Send,
{
  fn next(&mut self, value: ItemA) {
    let latest = self.latest.lock().unwrap().clone();
    if let Some(sampled) = latest {
      let out = (self.combiner)(value, sampled);
      self.downstream.next(out);
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

impl<ItemB, Out> Observer<ItemB> for SampledObserver<ItemB, Out>
where
  ItemB: Clone + Send,
  Out: Send + 'static,
{
  fn next(&mut self, value: ItemB) {
    *self.latest.lock().unwrap() = Some(value);
  }

  fn error(&mut self, err: StreamError) {
    self.downstream.error(err);
  }

  fn complete(&mut self) {
    // The sampled side ending quietly leaves its last value in place.
  }

  fn is_closed(&self) -> bool {
    self.downstream.is_closed()
  }
}
