use crate::stream::{from_iter, Stream};

/// Subscribes to all `sources` concurrently at subscribe time and merges
/// their emissions into one serialized downstream.
///
/// Completes once every source has completed; the first error from any
/// source fails fast and cancels the rest. Each source keeps its own
/// serial stream, so merging is the composition-based answer to wanting
/// several producer threads behind a single observer.
pub fn merge<Item>(sources: impl IntoIterator<Item = Stream<Item>>) -> Stream<Item>
where
  Item: Send + 'static,
{
  let sources: Vec<Stream<Item>> = sources.into_iter().collect();
  from_iter(sources).merge_all(usize::MAX)
}

impl<Item: Send + 'static> Stream<Item> {
  /// Merges this stream with one other. See [`merge`].
  pub fn merge(&self, other: &Stream<Item>) -> Stream<Item> {
    merge([self.clone(), other.clone()])
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{mpsc, Arc, Mutex};

  #[test]
  fn merges_threaded_sources_into_one_serial_stream() {
    let spawned = |values: Vec<&'static str>| {
      stream::create(move |mut subscriber: Subscriber<&'static str>| {
        let values = values.clone();
        std::thread::spawn(move || {
          for v in values {
            subscriber.next(v);
          }
          subscriber.complete();
        });
      })
    };

    let a = spawned(vec!["one", "two"]);
    let b = spawned(vec!["three", "four"]);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let c_seen = seen.clone();
    let (tx, rx) = mpsc::channel();
    a.merge(&b).subscribe_all(
      move |v| c_seen.lock().unwrap().push(v),
      |e| panic!("unexpected error: {e}"),
      move || tx.send(()).unwrap(),
    );

    rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
    let mut seen = seen.lock().unwrap().clone();
    seen.sort_unstable();
    assert_eq!(seen, vec!["four", "one", "three", "two"]);
  }

  #[test]
  fn completes_exactly_once() {
    let completions = Arc::new(Mutex::new(0));
    let c_completions = completions.clone();
    merge([stream::of(1), stream::of(2)]).subscribe_all(
      |_| {},
      |e| panic!("unexpected error: {e}"),
      move || *c_completions.lock().unwrap() += 1,
    );
    assert_eq!(*completions.lock().unwrap(), 1);
  }

  #[test]
  fn yields_both_sources_in_some_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let c_seen = seen.clone();
    merge([stream::of(1), stream::of(2)])
      .subscribe(move |v| c_seen.lock().unwrap().push(v));
    let mut seen = seen.lock().unwrap().clone();
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2]);
  }
}
