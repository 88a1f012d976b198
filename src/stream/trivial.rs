use crate::error::StreamError;
use crate::observer::Observer;
use crate::stream::Stream;

/// Creates a stream that emits no items, just terminates with an error.
pub fn throw<Item: Send + 'static>(err: StreamError) -> Stream<Item> {
  Stream::new(move |mut subscriber| subscriber.error(err.clone()))
}

/// Creates a stream that produces no values and completes immediately.
pub fn empty<Item: Send + 'static>() -> Stream<Item> {
  Stream::new(|mut subscriber| subscriber.complete())
}

/// Creates a stream that never notifies: no values, no completion, no
/// error. Useful for cancellation paths and tests.
pub fn never<Item: Send + 'static>() -> Stream<Item> {
  Stream::new(|_subscriber| {})
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn throw_delivers_only_the_error() {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let c_errors = errors.clone();
    stream::throw::<i32>(StreamError::Upstream("boom".to_owned())).subscribe_all(
      |_| panic!("no values"),
      move |e| c_errors.lock().unwrap().push(e),
      || panic!("no completion after an error"),
    );
    assert_eq!(
      *errors.lock().unwrap(),
      vec![StreamError::Upstream("boom".to_owned())]
    );
  }

  #[test]
  fn empty_completes_immediately() {
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();
    stream::empty::<i32>()
      .subscribe_all(|_| {}, |_| {}, move || *c_completed.lock().unwrap() = true);
    assert!(*completed.lock().unwrap());
  }

  #[test]
  fn never_stays_silent() {
    let touched = Arc::new(Mutex::new(false));
    let n = touched.clone();
    let e = touched.clone();
    let c = touched.clone();
    let subscription = stream::never::<i32>().subscribe_all(
      move |_| *n.lock().unwrap() = true,
      move |_| *e.lock().unwrap() = true,
      move || *c.lock().unwrap() = true,
    );
    assert!(!*touched.lock().unwrap());
    assert!(!subscription.is_closed());
  }
}
