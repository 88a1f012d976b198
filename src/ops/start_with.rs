use crate::observer::Observer;
use crate::stream::Stream;
use crate::subscriber::Subscriber;

impl<Item: Clone + Send + Sync + 'static> Stream<Item> {
  /// Emits `values` synchronously at subscribe time, before subscribing
  /// upstream.
  pub fn start_with(&self, values: Vec<Item>) -> Stream<Item> {
    let source = self.clone();
    Stream::new(move |mut subscriber: Subscriber<Item>| {
      for value in values.clone() {
        if subscriber.is_closed() {
          return;
        }
        subscriber.next(value);
      }
      source.subscribe_subscriber(subscriber);
    })
  }
}
