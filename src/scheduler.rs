//! Scheduler abstraction
//!
//! A Scheduler is a pluggable execution context: run a unit of work
//! immediately or after a delay, or repeat one at an interval. Time-based
//! operators (`interval`, `timer`, `delay`) and the threading operators
//! (`subscribe_on`, `observe_on`) are written against this trait, which is
//! what decouples the subscription-time thread from the notification
//! thread.
//!
//! Every scheduled unit moves through the state machine
//! `Pending → Running → {Completed, Cancelled}`; cancelling while `Pending`
//! guarantees the unit never runs.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

pub use std::time::{Duration, Instant};

use once_cell::sync::Lazy;

use crate::subscription::SubscriptionLike;

mod immediate;
mod thread_pool;
mod timer;

pub use immediate::ImmediateScheduler;
pub use thread_pool::ThreadPoolScheduler;
pub use timer::TimerScheduler;

/// A one-shot unit of work.
pub type OnceTask = Box<dyn FnOnce() + Send>;

/// A repeating unit of work, handed its tick counter.
pub type RepeatTask = Box<dyn FnMut(usize) + Send>;

/// An object that orders tasks and schedules their execution.
pub trait Scheduler: Send + Sync {
  /// Runs `task` once, after `delay` if one is given. Cancelling the
  /// returned handle while the task is still pending prevents it from
  /// ever running.
  fn schedule(&self, delay: Option<Duration>, task: OnceTask) -> TaskHandle;

  /// Runs `task` every `period`, starting one `period` from now, until
  /// the returned handle is cancelled.
  fn schedule_repeating(&self, period: Duration, task: RepeatTask) -> TaskHandle;
}

const PENDING: u8 = 0;
const RUNNING: u8 = 1;
const COMPLETED: u8 = 2;
const CANCELLED: u8 = 3;

/// The cancellation handle and state machine of one scheduled unit.
///
/// Implements [`SubscriptionLike`] so handles hook straight into a
/// subscription's teardown tree.
#[derive(Clone)]
pub struct TaskHandle(Arc<AtomicU8>);

impl TaskHandle {
  pub(crate) fn new() -> Self {
    TaskHandle(Arc::new(AtomicU8::new(PENDING)))
  }

  /// Cancels the unit. Pending units never run; a running repeating unit
  /// finishes its current tick and is not re-armed. Idempotent, and a
  /// no-op once the unit completed.
  pub fn cancel(&self) {
    let _ = self.0.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |state| {
      matches!(state, PENDING | RUNNING).then_some(CANCELLED)
    });
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::SeqCst) == CANCELLED
  }

  /// `Pending → Running`. False means the unit was cancelled (or already
  /// ran) and must not execute.
  pub(crate) fn try_start(&self) -> bool {
    self
      .0
      .compare_exchange(PENDING, RUNNING, Ordering::SeqCst, Ordering::SeqCst)
      .is_ok()
  }

  /// `Running → Completed`. Loses quietly against a concurrent cancel.
  pub(crate) fn finish(&self) {
    let _ = self.0.compare_exchange(
      RUNNING,
      COMPLETED,
      Ordering::SeqCst,
      Ordering::SeqCst,
    );
  }

  /// `Running → Pending`, between ticks of a repeating unit. False means
  /// the unit was cancelled mid-tick and must not be re-armed.
  pub(crate) fn rearm(&self) -> bool {
    self
      .0
      .compare_exchange(RUNNING, PENDING, Ordering::SeqCst, Ordering::SeqCst)
      .is_ok()
  }
}

impl SubscriptionLike for TaskHandle {
  fn unsubscribe(&mut self) {
    self.cancel();
  }

  fn is_closed(&self) -> bool {
    matches!(self.0.load(Ordering::SeqCst), COMPLETED | CANCELLED)
  }
}

static DEFAULT_POOL: Lazy<ThreadPoolScheduler> =
  Lazy::new(ThreadPoolScheduler::new);
static DEFAULT_TIMER: Lazy<TimerScheduler> = Lazy::new(TimerScheduler::new);

/// The process-wide worker pool scheduler, shared by `subscribe_on` /
/// `observe_on` callers that do not bring their own.
pub fn pool_scheduler() -> ThreadPoolScheduler {
  DEFAULT_POOL.clone()
}

/// The process-wide timer scheduler backing `interval`, `timer` and
/// `delay` by default: one dedicated thread, deadline order, submission
/// order among equal deadlines.
pub fn timer_scheduler() -> TimerScheduler {
  DEFAULT_TIMER.clone()
}
