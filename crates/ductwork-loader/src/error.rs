use ductwork_pipeline::PipelineError;
use thiserror::Error;

/// Errors that can occur while loading a pipeline definition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
  /// A `ref` step names a step the registry does not know.
  #[error("step not found: {name}")]
  UnknownStep { name: String },

  /// A nesting step or `extends` names a pipe the registry does not know.
  #[error("pipeline not found: {name}")]
  UnknownPipeline { name: String },

  /// The definition produces a pipe without steps.
  #[error("pipeline '{name}' has no steps")]
  EmptyPipeline { name: String },

  /// A step factory rejected its arguments.
  #[error("invalid step: {0}")]
  Step(#[from] PipelineError),
}
