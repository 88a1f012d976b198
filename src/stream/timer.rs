use std::time::Duration;

use crate::observer::Observer;
use crate::scheduler::{timer_scheduler, Scheduler};
use crate::stream::Stream;

/// Creates a stream which emits a single `0` once `delay` has elapsed,
/// then completes. Runs on the shared timer scheduler.
pub fn timer(delay: Duration) -> Stream<usize> {
  timer_on(delay, timer_scheduler())
}

/// [`timer`] on an explicit scheduler.
pub fn timer_on<S>(delay: Duration, scheduler: S) -> Stream<usize>
where
  S: Scheduler + Clone + 'static,
{
  Stream::new(move |subscriber| {
    let subscription = subscriber.subscription().clone();
    let mut subscriber = subscriber;
    let handle = scheduler.schedule(
      Some(delay),
      Box::new(move || {
        subscriber.next(0);
        subscriber.complete();
      }),
    );
    subscription.add(handle);
  })
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::mpsc;
  use std::time::Duration;

  #[test]
  fn fires_once_then_completes() {
    let (tx, rx) = mpsc::channel();
    let done = tx.clone();
    stream::timer(Duration::from_millis(5)).subscribe_all(
      move |v| tx.send(Some(v)).unwrap(),
      |e| panic!("unexpected error: {e}"),
      move || done.send(None).unwrap(),
    );

    assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), Some(0));
    assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), None);
    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
  }

  #[test]
  fn cancelling_before_the_deadline_suppresses_the_value() {
    let (tx, rx) = mpsc::channel();
    let subscription = stream::timer(Duration::from_millis(200))
      .subscribe(move |v| {
        let _ = tx.send(v);
      });
    subscription.unsubscribe();
    assert!(rx.recv_timeout(Duration::from_millis(400)).is_err());
  }
}
