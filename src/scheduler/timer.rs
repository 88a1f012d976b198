use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::sync::{Arc, Condvar, Mutex, Weak};
use std::thread;

use tracing::trace;

use crate::scheduler::{
  Duration, Instant, OnceTask, RepeatTask, Scheduler, TaskHandle,
};

/// A single-threaded timed scheduler: one dedicated worker thread drains a
/// deadline-ordered queue.
///
/// Tasks with equal deadlines run in submission order, which is the
/// property the `delay` operator leans on to keep re-emitted values in
/// their upstream order. The worker parks between deadlines on a condvar,
/// never spinning, and exits once the last handle to its scheduler is
/// dropped (pending work is abandoned at that point).
///
/// Clones share the same worker; the process-wide default is
/// [`timer_scheduler`](crate::scheduler::timer_scheduler).
#[derive(Clone)]
pub struct TimerScheduler {
  inner: Arc<TimerInner>,
}

struct TimerInner {
  state: Mutex<TimerState>,
  wakeup: Condvar,
}

#[derive(Default)]
struct TimerState {
  queue: BinaryHeap<TimerEntry>,
  seq: u64,
}

struct TimerEntry {
  deadline: Instant,
  seq: u64,
  handle: TaskHandle,
  work: TimerWork,
}

enum TimerWork {
  Once(OnceTask),
  Repeating { period: Duration, tick: usize, task: RepeatTask },
}

// The heap orders by (deadline, seq) only; reversed, so the earliest
// deadline surfaces first and submission order breaks ties.
impl PartialEq for TimerEntry {
  fn eq(&self, other: &Self) -> bool {
    self.deadline == other.deadline && self.seq == other.seq
  }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
  fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
    Some(self.cmp(other))
  }
}

impl Ord for TimerEntry {
  fn cmp(&self, other: &Self) -> CmpOrdering {
    other
      .deadline
      .cmp(&self.deadline)
      .then_with(|| other.seq.cmp(&self.seq))
  }
}

impl TimerScheduler {
  pub fn new() -> Self {
    let inner = Arc::new(TimerInner {
      state: Mutex::new(TimerState::default()),
      wakeup: Condvar::new(),
    });
    let weak = Arc::downgrade(&inner);
    thread::Builder::new()
      .name("rivulet-timer".into())
      .spawn(move || Self::run(weak))
      .expect("failed to spawn the timer thread");
    TimerScheduler { inner }
  }

  fn push(&self, deadline: Instant, handle: TaskHandle, work: TimerWork) {
    {
      let mut state = self.inner.state.lock().unwrap();
      let seq = state.seq;
      state.seq += 1;
      state.queue.push(TimerEntry { deadline, seq, handle, work });
    }
    self.inner.wakeup.notify_one();
  }

  fn run(weak: Weak<TimerInner>) {
    // Upper bound on a single park, so the worker notices when every
    // scheduler handle is gone and it should exit.
    const IDLE_WAIT: Duration = Duration::from_millis(250);

    loop {
      let Some(inner) = weak.upgrade() else {
        trace!("timer worker exiting: scheduler dropped");
        return;
      };
      let mut state = inner.state.lock().unwrap();
      loop {
        let now = Instant::now();
        let due = state.queue.peek().is_some_and(|entry| entry.deadline <= now);
        if !due {
          break;
        }
        let Some(entry) = state.queue.pop() else { break };
        drop(state);
        Self::fire(&inner, entry);
        state = inner.state.lock().unwrap();
      }
      let wait = state
        .queue
        .peek()
        .map_or(IDLE_WAIT, |entry| {
          entry.deadline.saturating_duration_since(Instant::now()).min(IDLE_WAIT)
        });
      let (guard, _) = inner.wakeup.wait_timeout(state, wait).unwrap();
      drop(guard);
    }
  }

  fn fire(inner: &Arc<TimerInner>, entry: TimerEntry) {
    if !entry.handle.try_start() {
      // Cancelled while pending; the unit never runs.
      return;
    }
    match entry.work {
      TimerWork::Once(task) => {
        task();
        entry.handle.finish();
      }
      TimerWork::Repeating { period, tick, mut task } => {
        task(tick);
        if entry.handle.rearm() {
          let mut state = inner.state.lock().unwrap();
          let seq = state.seq;
          state.seq += 1;
          state.queue.push(TimerEntry {
            deadline: Instant::now() + period,
            seq,
            handle: entry.handle,
            work: TimerWork::Repeating { period, tick: tick + 1, task },
          });
        }
      }
    }
  }
}

impl Default for TimerScheduler {
  fn default() -> Self {
    Self::new()
  }
}

impl Scheduler for TimerScheduler {
  fn schedule(&self, delay: Option<Duration>, task: OnceTask) -> TaskHandle {
    let handle = TaskHandle::new();
    let deadline = Instant::now() + delay.unwrap_or_default();
    self.push(deadline, handle.clone(), TimerWork::Once(task));
    handle
  }

  fn schedule_repeating(&self, period: Duration, task: RepeatTask) -> TaskHandle {
    let handle = TaskHandle::new();
    self.push(
      Instant::now() + period,
      handle.clone(),
      TimerWork::Repeating { period, tick: 0, task },
    );
    handle
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::sync::mpsc;

  #[test]
  fn equal_deadlines_run_in_submission_order() {
    let scheduler = TimerScheduler::new();
    let (tx, rx) = mpsc::channel();
    let delay = Some(Duration::from_millis(20));
    for label in 0..5 {
      let tx = tx.clone();
      scheduler.schedule(
        delay,
        Box::new(move || {
          let _ = tx.send(label);
        }),
      );
    }
    let order: Vec<i32> =
      (0..5).map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap()).collect();
    assert_eq!(order, vec![0, 1, 2, 3, 4]);
  }

  #[test]
  fn repeating_work_ticks_and_stops_on_cancel() {
    let scheduler = TimerScheduler::new();
    let (tx, rx) = mpsc::channel();
    let handle = scheduler.schedule_repeating(
      Duration::from_millis(5),
      Box::new(move |tick| {
        let _ = tx.send(tick);
      }),
    );

    assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), 0);
    assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), 1);
    handle.cancel();
    while rx.recv_timeout(Duration::from_millis(50)).is_ok() {}
    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
  }
}
