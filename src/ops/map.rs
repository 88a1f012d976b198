use std::fmt::Display;

use crate::error::StreamError;
use crate::observer::Observer;
use crate::stream::Stream;
use crate::subscriber::Subscriber;

impl<Item: Send + 'static> Stream<Item> {
  /// Creates a new stream which calls a closure on each element and uses
  /// its return as the value.
  ///
  /// Upstream errors pass through verbatim.
  pub fn map<Out, F>(&self, f: F) -> Stream<Out>
  where
    Out: Send + 'static,
    F: FnMut(Item) -> Out + Clone + Send + Sync + 'static,
  {
    let source = self.clone();
    Stream::new(move |subscriber: Subscriber<Out>| {
      let subscription = subscriber.subscription().clone();
      source.actual_subscribe(
        MapObserver { downstream: subscriber, f: f.clone() },
        subscription,
      );
    })
  }

  /// [`map`](Stream::map) with a fallible closure.
  ///
  /// An `Err` terminates downstream with [`StreamError::Transform`] and
  /// cancels the upstream subscription; nothing further is emitted.
  pub fn try_map<Out, E, F>(&self, f: F) -> Stream<Out>
  where
    Out: Send + 'static,
    E: Display,
    F: FnMut(Item) -> Result<Out, E> + Clone + Send + Sync + 'static,
  {
    let source = self.clone();
    Stream::new(move |subscriber: Subscriber<Out>| {
      let subscription = subscriber.subscription().clone();
      source.actual_subscribe(
        TryMapObserver { downstream: subscriber, f: f.clone() },
        subscription,
      );
    })
  }
}

struct MapObserver<O, F> {
  downstream: O,
  f: F,
}

impl<Item, Out, O, F> Observer<Item> for MapObserver<O, F>
where
  O: Observer<Out>,
  F: FnMut(Item) -> Out + Send,
{
  fn next(&mut self, value: Item) {
    let out = (self.f)(value);
    self.downstream.next(out);
  }

  fn error(&mut self, err: StreamError) {
    self.downstream.error(err);
  }

  fn complete(&mut self) {
    self.downstream.complete();
  }

  fn is_closed(&self) -> bool {
    self.downstream.is_closed()
  }
}

struct TryMapObserver<O, F> {
  downstream: O,
  f: F,
}

impl<Item, Out, E, O, F> Observer<Item> for TryMapObserver<O, F>
where
  O: Observer<Out>,
  E: Display,
  F: FnMut(Item) -> Result<Out, E> + Send,
{
  fn next(&mut self, value: Item) {
    match (self.f)(value) {
      Ok(out) => self.downstream.next(out),
      Err(err) => self.downstream.error(StreamError::transform(err)),
    }
  }

  fn error(&mut self, err: StreamError) {
    self.downstream.error(err);
  }

  fn complete(&mut self) {
    self.downstream.complete();
  }

  fn is_closed(&self) -> bool {
    self.downstream.is_closed()
  }
}
