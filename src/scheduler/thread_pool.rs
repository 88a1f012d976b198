use futures::executor::ThreadPool;
use futures_time::task::sleep;

use crate::scheduler::{Duration, OnceTask, RepeatTask, Scheduler, TaskHandle};

/// Hands scheduled work to a futures thread pool.
///
/// Delays are non-blocking timer futures, so a delayed task does not pin a
/// worker while it waits. Clones share the same pool; the process-wide
/// default is [`pool_scheduler`](crate::scheduler::pool_scheduler).
#[derive(Clone)]
pub struct ThreadPoolScheduler {
  pool: ThreadPool,
}

impl ThreadPoolScheduler {
  pub fn new() -> Self {
    let pool = ThreadPool::builder()
      .name_prefix("rivulet-pool-")
      .create()
      .expect("failed to start the worker pool");
    ThreadPoolScheduler { pool }
  }
}

impl Default for ThreadPoolScheduler {
  fn default() -> Self {
    Self::new()
  }
}

impl Scheduler for ThreadPoolScheduler {
  fn schedule(&self, delay: Option<Duration>, task: OnceTask) -> TaskHandle {
    let handle = TaskHandle::new();
    let task_handle = handle.clone();
    self.pool.spawn_ok(async move {
      if let Some(delay) = delay.filter(|d| !d.is_zero()) {
        sleep(delay.into()).await;
      }
      if task_handle.try_start() {
        task();
        task_handle.finish();
      }
    });
    handle
  }

  fn schedule_repeating(&self, period: Duration, mut task: RepeatTask) -> TaskHandle {
    let handle = TaskHandle::new();
    let task_handle = handle.clone();
    self.pool.spawn_ok(async move {
      let mut tick = 0;
      loop {
        sleep(period.into()).await;
        if !task_handle.try_start() {
          break;
        }
        task(tick);
        tick += 1;
        if !task_handle.rearm() {
          break;
        }
      }
    });
    handle
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::sync::mpsc;

  #[test]
  fn runs_off_the_calling_thread() {
    let (tx, rx) = mpsc::channel();
    let caller = std::thread::current().id();
    ThreadPoolScheduler::new().schedule(
      None,
      Box::new(move || {
        tx.send(std::thread::current().id()).unwrap();
      }),
    );
    let worker = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_ne!(worker, caller);
  }

  #[test]
  fn cancel_while_pending_prevents_the_run() {
    let (tx, rx) = mpsc::channel::<()>();
    let handle = ThreadPoolScheduler::new().schedule(
      Some(Duration::from_millis(200)),
      Box::new(move || {
        let _ = tx.send(());
      }),
    );
    handle.cancel();
    assert!(rx.recv_timeout(Duration::from_millis(500)).is_err());
  }
}
