use crate::stream::Stream;
use crate::subscriber::Subscriber;

/// Creates a stream from a raw producer function.
///
/// This is the factory underlying everything else. The producer runs at
/// subscribe time and may spawn its own thread, as long as a single thread
/// drives the subscriber:
///
/// ```
/// use rivulet::prelude::*;
///
/// let stream = stream::create(|mut subscriber: Subscriber<&str>| {
///   std::thread::spawn(move || {
///     subscriber.next("one");
///     subscriber.next("two");
///     subscriber.complete();
///   });
/// });
/// stream.subscribe(|v| println!("{}", v));
/// ```
///
/// A producer fanning several threads into one subscriber must funnel them
/// through [`SerializedObserver`](crate::observer::SerializedObserver);
/// handing the same observer to racing threads is the documented way to
/// break the notification contract.
pub fn create<Item, P>(producer: P) -> Stream<Item>
where
  Item: Send + 'static,
  P: Fn(Subscriber<Item>) + Send + Sync + 'static,
{
  Stream::new(producer)
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::mpsc;

  #[test]
  fn producer_thread_delivers_in_order() {
    let (tx, rx) = mpsc::channel();
    let stream = stream::create(|mut subscriber: Subscriber<i32>| {
      std::thread::spawn(move || {
        subscriber.next(1);
        subscriber.next(2);
        subscriber.complete();
      });
    });

    let done = tx.clone();
    stream.subscribe_all(
      move |v| tx.send(Some(v)).unwrap(),
      |_| {},
      move || done.send(None).unwrap(),
    );

    assert_eq!(rx.recv().unwrap(), Some(1));
    assert_eq!(rx.recv().unwrap(), Some(2));
    assert_eq!(rx.recv().unwrap(), None);
  }
}
