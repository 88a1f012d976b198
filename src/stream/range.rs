use crate::error::StreamError;
use crate::observer::Observer;
use crate::stream::Stream;

/// Creates a stream producing `count` consecutive integers from `start`.
///
/// `range(5, 3)` emits `5, 6, 7` and completes. A negative `count` fails
/// the subscription with [`StreamError::InvalidArgument`] before any value
/// is emitted, as does a range whose end would overflow `i32`.
pub fn range(start: i32, count: i32) -> Stream<i32> {
  Stream::new(move |mut subscriber| {
    if count < 0 {
      subscriber.error(StreamError::InvalidArgument(format!(
        "range count must be non-negative, got {count}"
      )));
      return;
    }
    if count > 0 && start.checked_add(count - 1).is_none() {
      subscriber.error(StreamError::InvalidArgument(format!(
        "range {start}..{start}+{count} overflows i32"
      )));
      return;
    }
    for offset in 0..count {
      if subscriber.is_closed() {
        return;
      }
      subscriber.next(start + offset);
    }
    subscriber.complete();
  })
}
