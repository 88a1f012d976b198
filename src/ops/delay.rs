use std::time::Duration;

use crate::error::StreamError;
use crate::observer::{Observer, SerializedObserver};
use crate::scheduler::{timer_scheduler, Scheduler};
use crate::stream::Stream;
use crate::subscriber::Subscriber;
use crate::subscription::Subscription;

impl<Item: Send + 'static> Stream<Item> {
  /// Re-emits each upstream value `duration` after it arrived, preserving
  /// relative order; completion is delayed the same way, so it lands
  /// after the last delayed value. Errors are not delayed; they fail
  /// fast. Runs on the shared timer scheduler.
  pub fn delay(&self, duration: Duration) -> Stream<Item> {
    self.delay_on(duration, timer_scheduler())
  }

  /// [`delay`](Stream::delay) on an explicit scheduler.
  ///
  /// Order preservation relies on the scheduler running equal deadlines
  /// in submission order, which the timer scheduler guarantees.
  pub fn delay_on<S>(&self, duration: Duration, scheduler: S) -> Stream<Item>
  where
    S: Scheduler + Clone + 'static,
  {
    let source = self.clone();
    Stream::new(move |subscriber: Subscriber<Item>| {
      let subscription = subscriber.subscription().clone();
      let downstream = SerializedObserver::new(subscriber);
      // Upstream hangs off a child: its own completion must not cancel
      // the delayed deliveries still sitting in the scheduler.
      let child = Subscription::new();
      subscription.add(child.clone());
      source.actual_subscribe(
        DelayObserver {
          duration,
          scheduler: scheduler.clone(),
          downstream,
          subscription,
        },
        child,
      );
    })
  }
}

struct DelayObserver<Item, S> {
  duration: Duration,
  scheduler: S,
  downstream: SerializedObserver<Item>,
  subscription: Subscription,
}

impl<Item, S> Observer<Item> for DelayObserver<Item, S>
where
  Item: Send + 'static,
  S: Scheduler,
{
  fn next(&mut self, value: Item) {
    let mut downstream = self.downstream.clone();
    let handle = self
      .scheduler
      .schedule(Some(self.duration), Box::new(move || downstream.next(value)));
    self.subscription.add(handle);
  }

  fn error(&mut self, err: StreamError) {
    self.downstream.error(err);
  }

  fn complete(&mut self) {
    let mut downstream = self.downstream.clone();
    let handle = self
      .scheduler
      .schedule(Some(self.duration), Box::new(move || downstream.complete()));
    self.subscription.add(handle);
  }

  fn is_closed(&self) -> bool {
    self.downstream.is_closed()
  }
}
