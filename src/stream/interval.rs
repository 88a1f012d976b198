use std::time::Duration;

use crate::observer::Observer;
use crate::scheduler::{timer_scheduler, Scheduler};
use crate::stream::Stream;

/// Creates a stream which emits `0, 1, 2, …` every `period`, forever,
/// until its subscription is cancelled. Runs on the shared timer
/// scheduler; the first value fires one `period` after subscribing.
pub fn interval(period: Duration) -> Stream<usize> {
  interval_on(period, timer_scheduler())
}

/// [`interval`] on an explicit scheduler.
pub fn interval_on<S>(period: Duration, scheduler: S) -> Stream<usize>
where
  S: Scheduler + Clone + 'static,
{
  Stream::new(move |subscriber| {
    let subscription = subscriber.subscription().clone();
    let mut subscriber = subscriber;
    let handle = scheduler
      .schedule_repeating(period, Box::new(move |tick| subscriber.next(tick)));
    subscription.add(handle);
  })
}
