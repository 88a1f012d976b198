use std::thread;

use crate::scheduler::{Duration, OnceTask, RepeatTask, Scheduler, TaskHandle};

/// Runs scheduled work inline, on the calling thread, inside the
/// `schedule` call itself.
///
/// Delays block the caller. Repeating work loops on the calling thread
/// and only returns once another thread cancels the handle; that suits a
/// test driving a tick or two, not an `interval` you intend to consume.
/// Use the timer scheduler for that.
#[derive(Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
  fn schedule(&self, delay: Option<Duration>, task: OnceTask) -> TaskHandle {
    let handle = TaskHandle::new();
    if let Some(delay) = delay.filter(|d| !d.is_zero()) {
      thread::sleep(delay);
    }
    if handle.try_start() {
      task();
      handle.finish();
    }
    handle
  }

  fn schedule_repeating(&self, period: Duration, mut task: RepeatTask) -> TaskHandle {
    let handle = TaskHandle::new();
    let mut tick = 0;
    loop {
      thread::sleep(period);
      if !handle.try_start() {
        break;
      }
      task(tick);
      tick += 1;
      if !handle.rearm() {
        break;
      }
    }
    handle
  }
}
