//! Pipeline errors.

use crate::context::ExecutionFlow;

/// Errors raised while resolving a pipeline.
///
/// Steps raise these themselves. The engine propagates them to the caller of
/// `resolve`/`resolve_sync` untouched: no retry, no wrapping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
  /// A step that requires one execution flow was invoked under the other.
  #[error("cannot use {step} on {flow} context")]
  ModeMismatch { step: String, flow: ExecutionFlow },

  /// A step received a previous value of the wrong shape.
  #[error("{step} argument must be {expected}")]
  TypeMismatch { step: String, expected: String },

  /// A step factory was given an argument it cannot work with.
  #[error("invalid argument for {step}: {message}")]
  InvalidArgument { step: String, message: String },

  /// A step failed for a reason of its own.
  #[error("{step} failed: {message}")]
  StepFailed { step: String, message: String },
}

impl PipelineError {
  /// Create a mode mismatch error for `step` running under `flow`.
  pub fn mode_mismatch(step: impl Into<String>, flow: ExecutionFlow) -> Self {
    Self::ModeMismatch {
      step: step.into(),
      flow,
    }
  }

  /// Create a shape violation error.
  pub fn type_mismatch(step: impl Into<String>, expected: impl Into<String>) -> Self {
    Self::TypeMismatch {
      step: step.into(),
      expected: expected.into(),
    }
  }

  /// Create an invalid argument error.
  pub fn invalid_argument(step: impl Into<String>, message: impl Into<String>) -> Self {
    Self::InvalidArgument {
      step: step.into(),
      message: message.into(),
    }
  }

  /// Create a generic step failure.
  pub fn step_failed(step: impl Into<String>, message: impl Into<String>) -> Self {
    Self::StepFailed {
      step: step.into(),
      message: message.into(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mode_mismatch_message() {
    let error = PipelineError::mode_mismatch("apply", ExecutionFlow::Sync);
    assert_eq!(error.to_string(), "cannot use apply on sync context");
  }

  #[test]
  fn test_type_mismatch_message() {
    let error = PipelineError::type_mismatch("chars", "a string");
    assert_eq!(error.to_string(), "chars argument must be a string");
  }
}
