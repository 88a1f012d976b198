use std::sync::{Arc, Mutex};

use crate::error::StreamError;
use crate::observer::{Observer, SerializedObserver};
use crate::stream::Stream;
use crate::subscriber::Subscriber;
use crate::subscription::Subscription;

/// Subscribes to all `sources` and races them: the first to deliver any
/// notification (value, error or completion) wins, every other
/// subscription is cancelled on the spot, and downstream mirrors only the
/// winner from then on.
///
/// An empty source list completes immediately.
pub fn amb<Item>(sources: impl IntoIterator<Item = Stream<Item>>) -> Stream<Item>
where
  Item: Send + 'static,
{
  let sources: Vec<Stream<Item>> = sources.into_iter().collect();
  Stream::new(move |mut subscriber: Subscriber<Item>| {
    if sources.is_empty() {
      subscriber.complete();
      return;
    }
    let subscription = subscriber.subscription().clone();
    let downstream = SerializedObserver::new(subscriber);

    let children: Vec<Subscription> =
      sources.iter().map(|_| Subscription::new()).collect();
    for child in &children {
      subscription.add(child.clone());
    }
    let state = Arc::new(Mutex::new(AmbState { winner: None, children }));

    for (index, source) in sources.iter().enumerate() {
      // A synchronous earlier source may already have raced ahead; the
      // rest would be subscribed only to be cancelled.
      if state.lock().unwrap().winner.is_some() {
        break;
      }
      let child = state.lock().unwrap().children[index].clone();
      source.actual_subscribe(
        AmbObserver {
          index,
          state: state.clone(),
          downstream: downstream.clone(),
        },
        child,
      );
    }
  })
}

impl<Item: Send + 'static> Stream<Item> {
  /// Races this stream against another. See [`amb`].
  pub fn amb(&self, other: &Stream<Item>) -> Stream<Item> {
    amb([self.clone(), other.clone()])
  }
}

struct AmbState {
  winner: Option<usize>,
  children: Vec<Subscription>,
}

struct AmbObserver<Item> {
  index: usize,
  state: Arc<Mutex<AmbState>>,
  downstream: SerializedObserver<Item>,
}

impl<Item> AmbObserver<Item> {
  /// True when this source is the winner, claiming the race if it is
  /// still open. Claiming cancels every losing subscription immediately.
  fn wins(&self) -> bool {
    let losers = {
      let mut state = self.state.lock().unwrap();
      match state.winner {
        Some(winner) => return winner == self.index,
        None => {
          state.winner = Some(self.index);
          let index = self.index;
          state
            .children
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, child)| child.clone())
            .collect::<Vec<_>>()
        }
      }
    };
    for loser in losers {
      loser.unsubscribe();
    }
    true
  }
}

impl<Item: Send + 'static> Observer<Item> for AmbObserver<Item> {
  fn next(&mut self, value: Item) {
    if self.wins() {
      self.downstream.next(value);
    }
  }

  fn error(&mut self, err: StreamError) {
    if self.wins() {
      self.downstream.error(err);
    }
  }

  fn complete(&mut self) {
    if self.wins() {
      self.downstream.complete();
    }
  }

  fn is_closed(&self) -> bool {
    // A settled race closes every loser's path.
    let lost = self
      .state
      .lock()
      .unwrap()
      .winner
      .is_some_and(|winner| winner != self.index);
    lost || self.downstream.is_closed()
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};
  use std::time::Duration;

  #[test]
  fn the_first_synchronous_source_wins() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let c_seen = seen.clone();
    ops::amb([stream::range(0, 2), stream::range(10, 2)])
      .subscribe(move |v| c_seen.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![0, 1]);
  }

  #[test]
  fn a_fast_source_beats_a_slow_one() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let c_seen = seen.clone();
    let (tx, rx) = std::sync::mpsc::channel();

    let slow = stream::timer(Duration::from_millis(150)).map(|_| "slow");
    let fast = stream::timer(Duration::from_millis(5)).map(|_| "fast");
    slow.amb(&fast).subscribe_all(
      move |v| c_seen.lock().unwrap().push(v),
      |e| panic!("unexpected error: {e}"),
      move || tx.send(()).unwrap(),
    );

    rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec!["fast"]);
  }

  #[test]
  fn a_winning_completion_silences_the_rest() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let completed = Arc::new(Mutex::new(false));
    let c_seen = seen.clone();
    let c_completed = completed.clone();

    ops::amb([stream::empty(), stream::of(5)]).subscribe_all(
      move |v| c_seen.lock().unwrap().push(v),
      |e| panic!("unexpected error: {e}"),
      move || *c_completed.lock().unwrap() = true,
    );

    assert!(seen.lock().unwrap().is_empty());
    assert!(*completed.lock().unwrap());
  }
}
