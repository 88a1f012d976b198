//! The error taxonomy delivered through [`Observer::error`].
//!
//! Errors are terminal notifications: once one reaches an observer, the
//! subscription is over. The engine performs no retries; composing a retry
//! is caller territory.
//!
//! [`Observer::error`]: crate::observer::Observer::error

use thiserror::Error;

/// The error value carried by the notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
  /// A source factory failed while producing values, e.g. a fallible
  /// iterator yielded an error in [`from_results`](crate::stream::from_results).
  #[error("source failed: {0}")]
  Source(String),

  /// An operator callback failed, e.g. the closure given to
  /// [`try_map`](crate::stream::Stream::try_map) returned an error.
  #[error("transform failed: {0}")]
  Transform(String),

  /// An operator was composed with a malformed parameter, e.g. a negative
  /// `range` count or a zero `merge_all` concurrency.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// An error injected by a producer and passed through the composition
  /// unchanged.
  #[error("upstream error: {0}")]
  Upstream(String),
}

impl StreamError {
  /// Classifies any displayable failure as a `Transform` error.
  ///
  /// Used by the fallible operator callbacks to fold caller error types
  /// into the channel's error value.
  pub fn transform(err: impl std::fmt::Display) -> Self {
    StreamError::Transform(err.to_string())
  }

  /// Classifies any displayable failure as a `Source` error.
  pub fn source(err: impl std::fmt::Display) -> Self {
    StreamError::Source(err.to_string())
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn display_carries_context() {
    let err = StreamError::InvalidArgument("count < 0".to_owned());
    assert_eq!(err.to_string(), "invalid argument: count < 0");

    let err = StreamError::transform("parse failure");
    assert_eq!(err.to_string(), "transform failed: parse failure");
  }
}
