use crate::observer::Observer;
use crate::stream::Stream;

/// Creates a stream producing a single value.
///
/// Completes immediately after emitting the value, synchronously at
/// subscribe time. Never emits an error. Multi-value sequences come from
/// [`from_iter`](crate::stream::from_iter).
///
/// # Examples
///
/// ```
/// use rivulet::prelude::*;
///
/// stream::of(123).subscribe(|v| println!("{}", v));
/// ```
pub fn of<Item>(value: Item) -> Stream<Item>
where
  Item: Clone + Send + Sync + 'static,
{
  Stream::new(move |mut subscriber| {
    subscriber.next(value.clone());
    subscriber.complete();
  })
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn emits_once_then_completes() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(Mutex::new(0));
    let c_seen = seen.clone();
    let c_completed = completed.clone();

    stream::of(7).subscribe_all(
      move |v| c_seen.lock().unwrap().push(v),
      |_| panic!("of never errors"),
      move || *c_completed.lock().unwrap() += 1,
    );

    assert_eq!(*seen.lock().unwrap(), vec![7]);
    assert_eq!(*completed.lock().unwrap(), 1);
  }
}
