use crate::error::StreamError;
use crate::observer::Observer;
use crate::stream::Stream;

/// Creates a stream that produces values from an iterator.
///
/// Emits each element in order, then completes. Emission stops early when
/// the observer closes (a `take` downstream, a cancelled subscription).
///
/// The iterable is cloned per subscription, which is what makes the stream
/// replayable: two subscribers each iterate independently.
///
/// # Examples
///
/// ```
/// use rivulet::prelude::*;
///
/// stream::from_iter(vec![0, 1, 2, 3]).subscribe(|v| println!("{}", v));
/// ```
pub fn from_iter<Iter>(iter: Iter) -> Stream<Iter::Item>
where
  Iter: IntoIterator + Clone + Send + Sync + 'static,
  Iter::Item: Send + 'static,
{
  Stream::new(move |mut subscriber| {
    for value in iter.clone() {
      if subscriber.is_closed() {
        return;
      }
      subscriber.next(value);
    }
    subscriber.complete();
  })
}

/// Creates a stream from fallible iteration.
///
/// Emits the `Ok` elements in order; the first `Err` terminates the stream
/// with that error and nothing further is consumed. This is how a source
/// whose iteration itself can fail surfaces the failure through the
/// channel, conventionally as [`StreamError::Source`].
pub fn from_results<Iter, Item>(iter: Iter) -> Stream<Item>
where
  Iter: IntoIterator<Item = Result<Item, StreamError>> + Clone + Send + Sync + 'static,
  Item: Send + 'static,
{
  Stream::new(move |mut subscriber| {
    for result in iter.clone() {
      if subscriber.is_closed() {
        return;
      }
      match result {
        Ok(value) => subscriber.next(value),
        Err(err) => {
          subscriber.error(err);
          return;
        }
      }
    }
    subscriber.complete();
  })
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn emits_all_then_completes() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let c_seen = seen.clone();
    stream::from_iter(0..4).subscribe(move |v| c_seen.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3]);
  }

  #[test]
  fn first_err_terminates_iteration() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let errors = Arc::new(Mutex::new(Vec::new()));
    let c_seen = seen.clone();
    let c_errors = errors.clone();

    let items = vec![
      Ok(1),
      Err(StreamError::source("disk went away")),
      Ok(2),
    ];
    stream::from_results(items).subscribe_all(
      move |v| c_seen.lock().unwrap().push(v),
      move |e| c_errors.lock().unwrap().push(e),
      || panic!("must not complete"),
    );

    assert_eq!(*seen.lock().unwrap(), vec![1]);
    assert_eq!(
      *errors.lock().unwrap(),
      vec![StreamError::Source("disk went away".to_owned())]
    );
  }
}
