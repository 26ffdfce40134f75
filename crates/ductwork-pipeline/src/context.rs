//! Execution context.
//!
//! One context chain exists per resolution. Every step receives the context
//! reflecting the cumulative effect of all steps before it, and the engine
//! folds each step's outcome into a fresh context before moving on.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::PipelineError;
use crate::sequence::Pipeline;
use crate::step::{Mutation, Outcome, Step, StepOutput};

/// Whether a resolution awaits its steps.
///
/// Fixed for the lifetime of one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionFlow {
  Sync,
  Async,
}

impl ExecutionFlow {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Sync => "sync",
      Self::Async => "async",
    }
  }
}

impl fmt::Display for ExecutionFlow {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The record threaded through every step of a resolution.
///
/// `previous_values.len() == mutation_index` holds between steps.
#[derive(Debug, Clone)]
pub struct Context {
  call_value: Value,
  execution_flow: ExecutionFlow,
  mutation_index: usize,
  previous_value: Value,
  previous_values: Vec<Value>,
  mutate: Option<Mutation>,
}

impl Context {
  /// Create the context for a fresh resolution.
  ///
  /// `previous_value` starts as `Null`.
  pub fn new(call_value: Value, execution_flow: ExecutionFlow) -> Self {
    Self {
      call_value,
      execution_flow,
      mutation_index: 0,
      previous_value: Value::Null,
      previous_values: Vec::new(),
      mutate: None,
    }
  }

  /// The value the pipeline was invoked with.
  pub fn call_value(&self) -> &Value {
    &self.call_value
  }

  pub fn execution_flow(&self) -> ExecutionFlow {
    self.execution_flow
  }

  /// How many steps have produced output so far.
  pub fn mutation_index(&self) -> usize {
    self.mutation_index
  }

  /// The most recent step output.
  pub fn previous_value(&self) -> &Value {
    &self.previous_value
  }

  /// Every step output so far, oldest first.
  pub fn previous_values(&self) -> &[Value] {
    &self.previous_values
  }

  /// Whether a splice request is waiting to be applied.
  pub fn has_pending_mutation(&self) -> bool {
    self.mutate.is_some()
  }

  /// Invoke `step` with the current previous value and this context.
  pub fn call(&self, step: &Step) -> Result<StepOutput, PipelineError> {
    step.call(self.previous_value.clone(), self)
  }

  /// Fold a step outcome into the next context.
  ///
  /// Carries forward the call value and flow, advances the index by one and
  /// records the outcome's splice request, if any.
  pub fn update(self, outcome: Outcome) -> Self {
    let (value, mutation) = outcome.into_parts();
    let mut previous_values = self.previous_values;
    previous_values.push(value.clone());

    Self {
      call_value: self.call_value,
      execution_flow: self.execution_flow,
      mutation_index: self.mutation_index + 1,
      previous_value: value,
      previous_values,
      mutate: mutation.or(self.mutate),
    }
  }

  /// Apply the pending splice request, if any.
  ///
  /// The requested steps are inserted at `mutation_index` into a copy of
  /// `pipeline`, so they run right after the step that asked for them. The
  /// request is cleared even when it inserts nothing.
  pub fn apply_mutation(mut self, pipeline: Pipeline) -> (Self, Pipeline) {
    let Some(mutation) = self.mutate.take() else {
      return (self, pipeline);
    };

    let inserted = mutation.apply(&pipeline);

    debug!(
      at = self.mutation_index,
      inserted = inserted.len(),
      "pipeline_mutated"
    );

    let pipeline = pipeline.splice(self.mutation_index, inserted);

    (self, pipeline)
  }

  /// The context as it looked one step earlier.
  ///
  /// At index zero this is the context itself.
  pub fn downgrade(&self) -> Self {
    let mutation_index = self.mutation_index.saturating_sub(1);
    let previous_values: Vec<Value> = self
      .previous_values
      .iter()
      .take(mutation_index)
      .cloned()
      .collect();
    let previous_value = previous_values.last().cloned().unwrap_or(Value::Null);

    Self {
      call_value: self.call_value.clone(),
      execution_flow: self.execution_flow,
      mutation_index,
      previous_value,
      previous_values,
      mutate: self.mutate.clone(),
    }
  }

  /// Consume the context, returning the most recent step output.
  pub fn into_previous_value(self) -> Value {
    self.previous_value
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn noop(name: &'static str) -> Step {
    Step::from_fn(name, |value, _| Ok(value))
  }

  #[test]
  fn test_new_context() {
    let context = Context::new(json!(5), ExecutionFlow::Sync);

    assert_eq!(context.call_value(), &json!(5));
    assert_eq!(context.execution_flow(), ExecutionFlow::Sync);
    assert_eq!(context.mutation_index(), 0);
    assert_eq!(context.previous_value(), &Value::Null);
    assert!(context.previous_values().is_empty());
    assert!(!context.has_pending_mutation());
  }

  #[test]
  fn test_update_appends_history() {
    let context = Context::new(json!("call"), ExecutionFlow::Async)
      .update(Outcome::Value(json!(1)))
      .update(Outcome::Value(json!(2)));

    assert_eq!(context.call_value(), &json!("call"));
    assert_eq!(context.execution_flow(), ExecutionFlow::Async);
    assert_eq!(context.mutation_index(), 2);
    assert_eq!(context.previous_value(), &json!(2));
    assert_eq!(context.previous_values(), &[json!(1), json!(2)]);
  }

  #[test]
  fn test_update_records_mutation() {
    let context = Context::new(json!(null), ExecutionFlow::Sync)
      .update(Outcome::splice(json!(1), vec![noop("extra")]));

    assert!(context.has_pending_mutation());
  }

  #[test]
  fn test_apply_mutation_without_request_is_identity() {
    let pipeline = Pipeline::from_steps(vec![noop("a"), noop("b")]);
    let context = Context::new(json!(null), ExecutionFlow::Sync).update(json!(1).into());

    let (context, mutated) = context.apply_mutation(pipeline.clone());

    assert_eq!(context.mutation_index(), 1);
    assert_eq!(mutated.names(), pipeline.names());
  }

  #[test]
  fn test_apply_mutation_splices_after_current_step() {
    let pipeline = Pipeline::from_steps(vec![noop("a"), noop("b")]);
    let context = Context::new(json!(null), ExecutionFlow::Sync)
      .update(Outcome::splice(json!(1), vec![noop("x"), noop("y")]));

    let (context, mutated) = context.apply_mutation(pipeline.clone());

    assert_eq!(mutated.names(), vec!["a", "x", "y", "b"]);
    assert_eq!(pipeline.names(), vec!["a", "b"]);
    assert!(!context.has_pending_mutation());
  }

  #[test]
  fn test_apply_mutation_clears_empty_request() {
    let pipeline = Pipeline::from_steps(vec![noop("a")]);
    let context =
      Context::new(json!(null), ExecutionFlow::Sync).update(Outcome::splice(json!(1), vec![]));

    let (context, mutated) = context.apply_mutation(pipeline);

    assert_eq!(mutated.len(), 1);
    assert!(!context.has_pending_mutation());
  }

  #[test]
  fn test_mutation_hook_sees_current_pipeline() {
    let pipeline = Pipeline::from_steps(vec![noop("a"), noop("b")]);
    let mutation = Mutation::new(|current| {
      assert_eq!(current.len(), 2);
      vec![noop("seen")]
    });
    let context = Context::new(json!(null), ExecutionFlow::Sync).update(Outcome::Splice {
      value: json!(0),
      mutation,
    });

    let (_, mutated) = context.apply_mutation(pipeline);

    assert_eq!(mutated.names(), vec!["a", "seen", "b"]);
  }

  #[test]
  fn test_downgrade() {
    let context = Context::new(json!(null), ExecutionFlow::Sync)
      .update(json!(1).into())
      .update(json!(2).into())
      .update(json!(3).into());

    let previous = context.downgrade();

    assert_eq!(previous.mutation_index(), 2);
    assert_eq!(previous.previous_value(), &json!(2));
    assert_eq!(previous.previous_values(), &[json!(1), json!(2)]);

    let start = Context::new(json!(null), ExecutionFlow::Sync).downgrade();
    assert_eq!(start.mutation_index(), 0);
    assert_eq!(start.previous_value(), &Value::Null);
  }

  #[test]
  fn test_call_uses_previous_value() {
    let context = Context::new(json!("ignored"), ExecutionFlow::Sync).update(json!(10).into());
    let step = Step::from_fn("echo", |value, _| Ok(value));

    let outcome = context
      .call(&step)
      .unwrap()
      .into_ready("echo", ExecutionFlow::Sync)
      .unwrap();

    assert_eq!(outcome.value(), &json!(10));
  }

  #[test]
  fn test_execution_flow_display_and_serde() {
    assert_eq!(ExecutionFlow::Async.to_string(), "async");
    assert_eq!(
      serde_json::to_value(ExecutionFlow::Sync).unwrap(),
      json!("sync")
    );
  }
}
