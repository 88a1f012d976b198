use crate::scheduler::Scheduler;
use crate::stream::Stream;
use crate::subscriber::Subscriber;

impl<Item: Send + 'static> Stream<Item> {
  /// Runs the producer on a scheduler worker instead of the subscribing
  /// thread.
  ///
  /// `subscribe` itself returns immediately; the producer chain executes
  /// on the worker, which for synchronous sources is also where it
  /// notifies. Cancelling before the worker picks the unit up prevents
  /// the producer from ever running.
  pub fn subscribe_on<S>(&self, scheduler: S) -> Stream<Item>
  where
    S: Scheduler + Clone + 'static,
  {
    let source = self.clone();
    Stream::new(move |subscriber: Subscriber<Item>| {
      let subscription = subscriber.subscription().clone();
      let source = source.clone();
      let handle = scheduler
        .schedule(None, Box::new(move || source.subscribe_subscriber(subscriber)));
      subscription.add(handle);
    })
  }
}
