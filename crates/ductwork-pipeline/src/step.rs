//! Steps and what they hand back to the engine.
//!
//! A step is a function `(previous_value, &Context) -> StepOutput`. The output
//! is either ready or pending, and either a plain value or a value carrying a
//! splice request:
//!
//! ```text
//! StepOutput
//! ├── Ready(Outcome)            - sync or async flow
//! └── Pending(StepFuture)       - async flow only
//!
//! Outcome
//! ├── Value(value)
//! └── Splice { value, mutation } - insert steps right after this one
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::context::{Context, ExecutionFlow};
use crate::error::PipelineError;
use crate::sequence::Pipeline;

/// A step result the engine still has to await.
pub type StepFuture = BoxFuture<'static, Result<Outcome, PipelineError>>;

type StepFn = dyn Fn(Value, &Context) -> Result<StepOutput, PipelineError> + Send + Sync;

type MutationFn = dyn Fn(&Pipeline) -> Vec<Step> + Send + Sync;

/// A request to splice steps into the running sequence.
///
/// The hook receives the sequence as it stands when the requesting step
/// completes and returns the steps to insert right after that step. The
/// engine consults it exactly once.
#[derive(Clone)]
pub struct Mutation {
  hook: Arc<MutationFn>,
}

impl Mutation {
  /// Create a mutation from a hook over the current sequence.
  pub fn new<F>(hook: F) -> Self
  where
    F: Fn(&Pipeline) -> Vec<Step> + Send + Sync + 'static,
  {
    Self {
      hook: Arc::new(hook),
    }
  }

  /// Create a mutation that always inserts the same steps.
  pub fn insert(steps: Vec<Step>) -> Self {
    Self::new(move |_| steps.clone())
  }

  /// Run the hook against the current sequence.
  pub fn apply(&self, pipeline: &Pipeline) -> Vec<Step> {
    (self.hook)(pipeline)
  }
}

impl fmt::Debug for Mutation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Mutation").finish_non_exhaustive()
  }
}

/// The value a step produced, optionally tagged with a splice request.
#[derive(Debug, Clone)]
pub enum Outcome {
  /// A plain value for the next step.
  Value(Value),
  /// A value plus steps to run before anything already scheduled.
  Splice { value: Value, mutation: Mutation },
}

impl Outcome {
  /// Produce `value` and insert `steps` right after the current step.
  pub fn splice(value: Value, steps: Vec<Step>) -> Self {
    Self::Splice {
      value,
      mutation: Mutation::insert(steps),
    }
  }

  /// The produced value.
  pub fn value(&self) -> &Value {
    match self {
      Self::Value(value) | Self::Splice { value, .. } => value,
    }
  }

  /// Split into the produced value and the splice request, if any.
  pub fn into_parts(self) -> (Value, Option<Mutation>) {
    match self {
      Self::Value(value) => (value, None),
      Self::Splice { value, mutation } => (value, Some(mutation)),
    }
  }
}

impl From<Value> for Outcome {
  fn from(value: Value) -> Self {
    Self::Value(value)
  }
}

/// What invoking a step returns: a ready outcome or one still to be awaited.
pub enum StepOutput {
  Ready(Outcome),
  Pending(StepFuture),
}

impl StepOutput {
  /// A ready plain value.
  pub fn ready(value: Value) -> Self {
    Self::Ready(Outcome::Value(value))
  }

  /// A pending plain value.
  pub fn pending<F>(future: F) -> Self
  where
    F: Future<Output = Result<Value, PipelineError>> + Send + 'static,
  {
    Self::Pending(Box::pin(async move { future.await.map(Outcome::Value) }))
  }

  /// Take the outcome without awaiting.
  ///
  /// A pending output cannot be resolved on a synchronous call stack, so it is
  /// reported as a mode mismatch for `step` under `flow`.
  pub fn into_ready(self, step: &str, flow: ExecutionFlow) -> Result<Outcome, PipelineError> {
    match self {
      Self::Ready(outcome) => Ok(outcome),
      Self::Pending(_) => Err(PipelineError::mode_mismatch(step, flow)),
    }
  }

  /// Await the outcome. A ready output resolves immediately.
  pub async fn into_outcome(self) -> Result<Outcome, PipelineError> {
    match self {
      Self::Ready(outcome) => Ok(outcome),
      Self::Pending(future) => future.await,
    }
  }
}

impl From<Outcome> for StepOutput {
  fn from(outcome: Outcome) -> Self {
    Self::Ready(outcome)
  }
}

impl From<Value> for StepOutput {
  fn from(value: Value) -> Self {
    Self::ready(value)
  }
}

impl fmt::Debug for StepOutput {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Ready(outcome) => f.debug_tuple("Ready").field(outcome).finish(),
      Self::Pending(_) => f.write_str("Pending(..)"),
    }
  }
}

/// A named transformation step.
///
/// Cloning is cheap; clones share the same function.
#[derive(Clone)]
pub struct Step {
  name: Arc<str>,
  func: Arc<StepFn>,
}

impl Step {
  /// Create a step from a function returning a raw [`StepOutput`].
  pub fn new<F>(name: impl Into<Arc<str>>, func: F) -> Self
  where
    F: Fn(Value, &Context) -> Result<StepOutput, PipelineError> + Send + Sync + 'static,
  {
    Self {
      name: name.into(),
      func: Arc::new(func),
    }
  }

  /// Create a step producing its value synchronously.
  ///
  /// Usable under both execution flows.
  pub fn from_fn<F>(name: impl Into<Arc<str>>, func: F) -> Self
  where
    F: Fn(Value, &Context) -> Result<Value, PipelineError> + Send + Sync + 'static,
  {
    Self::new(name, move |value, context| {
      func(value, context).map(StepOutput::ready)
    })
  }

  /// Create a step producing its value asynchronously.
  ///
  /// The future receives its own copy of the context. Invoking the step under
  /// a sync context fails with [`PipelineError::ModeMismatch`] before the
  /// future is created.
  pub fn from_future<F, Fut>(name: impl Into<Arc<str>>, func: F) -> Self
  where
    F: Fn(Value, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, PipelineError>> + Send + 'static,
  {
    let name: Arc<str> = name.into();
    let guard_name = name.clone();

    Self::new(name, move |value, context| {
      if context.execution_flow() != ExecutionFlow::Async {
        return Err(PipelineError::mode_mismatch(
          guard_name.to_string(),
          context.execution_flow(),
        ));
      }

      Ok(StepOutput::pending(func(value, context.clone())))
    })
  }

  /// The step's name, used in logs and error messages.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Invoke the step.
  pub fn call(&self, value: Value, context: &Context) -> Result<StepOutput, PipelineError> {
    (self.func)(value, context)
  }
}

impl fmt::Debug for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Step")
      .field("name", &self.name)
      .finish_non_exhaustive()
  }
}
