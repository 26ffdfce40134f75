//! Resolution engine.
//!
//! Both entry points walk the same loop:
//!
//! ```text
//! while index < pipeline.len()        (re-read after every splice)
//! ├── step(previous_value, context)   (awaited in the async variant)
//! ├── context = context.update(outcome)
//! ├── (context, pipeline) = context.apply_mutation(pipeline)
//! └── index += 1
//! return context.previous_value
//! ```
//!
//! The engine owns the sequence it walks. A splice produces a new sequence
//! local to this resolution, never the one held by the caller.
//!
//! Splices land at the context's `mutation_index`, so a resolution must start
//! at `index == context.mutation_index()`. Any other start is rejected with
//! [`PipelineError::InvalidArgument`] before a step runs.

use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::context::Context;
use crate::error::PipelineError;
use crate::sequence::Pipeline;
use crate::step::Outcome;

/// Resolve `pipeline` from `index` onwards, awaiting every step.
///
/// Ready and pending step outputs are both accepted. `index` must equal
/// `context.mutation_index()`.
#[instrument(
  name = "pipeline_resolve",
  level = "debug",
  skip_all,
  fields(flow = %context.execution_flow(), start = index, steps = pipeline.len())
)]
pub async fn resolve(
  mut pipeline: Pipeline,
  mut index: usize,
  mut context: Context,
) -> Result<Value, PipelineError> {
  check_start(index, &context)?;

  while let Some(step) = pipeline.get(index).cloned() {
    trace!(step = step.name(), index, "step_started");

    let outcome = step
      .call(context.previous_value().clone(), &context)
      .inspect_err(|error| debug!(step = step.name(), index, %error, "step_failed"))?
      .into_outcome()
      .await
      .inspect_err(|error| debug!(step = step.name(), index, %error, "step_failed"))?;

    (context, pipeline) = advance(context, outcome, pipeline);
    index += 1;
  }

  Ok(context.into_previous_value())
}

/// Resolve `pipeline` from `index` onwards without suspending.
///
/// A step handing back a pending output cannot be awaited here and fails the
/// resolution with [`PipelineError::ModeMismatch`]. `index` must equal
/// `context.mutation_index()`.
#[instrument(
  name = "pipeline_resolve_sync",
  level = "debug",
  skip_all,
  fields(flow = %context.execution_flow(), start = index, steps = pipeline.len())
)]
pub fn resolve_sync(
  mut pipeline: Pipeline,
  mut index: usize,
  mut context: Context,
) -> Result<Value, PipelineError> {
  check_start(index, &context)?;

  while let Some(step) = pipeline.get(index).cloned() {
    trace!(step = step.name(), index, "step_started");

    let outcome = step
      .call(context.previous_value().clone(), &context)
      .and_then(|output| output.into_ready(step.name(), context.execution_flow()))
      .inspect_err(|error| debug!(step = step.name(), index, %error, "step_failed"))?;

    (context, pipeline) = advance(context, outcome, pipeline);
    index += 1;
  }

  Ok(context.into_previous_value())
}

fn check_start(index: usize, context: &Context) -> Result<(), PipelineError> {
  if index == context.mutation_index() {
    return Ok(());
  }

  Err(PipelineError::invalid_argument(
    "pipeline",
    format!(
      "start index {index} does not match mutation index {}",
      context.mutation_index()
    ),
  ))
}

fn advance(context: Context, outcome: Outcome, pipeline: Pipeline) -> (Context, Pipeline) {
  context.update(outcome).apply_mutation(pipeline)
}
