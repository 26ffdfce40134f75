//! The pipe handle.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::cache::ResultCache;
use crate::context::{Context, ExecutionFlow};
use crate::engine;
use crate::error::PipelineError;
use crate::sequence::Pipeline;
use crate::step::{Step, StepOutput};

/// A reusable async callable materialized from a pipe.
pub type AsyncPipeFn =
  Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value, PipelineError>> + Send + Sync>;

/// A reusable sync callable materialized from a pipe.
pub type SyncPipeFn = Arc<dyn Fn(Value) -> Result<Value, PipelineError> + Send + Sync>;

/// Runs one sequence under one flow, owning that flow's memo slot.
#[derive(Debug, Clone)]
struct Resolver {
  pipeline: Pipeline,
  memoized: bool,
  cache: ResultCache,
}

impl Resolver {
  fn new(pipeline: Pipeline, memoized: bool) -> Self {
    Self {
      pipeline,
      memoized,
      cache: ResultCache::new(),
    }
  }

  async fn resolve(&self, call_value: Value) -> Result<Value, PipelineError> {
    if let Some(result) = self.lookup(&call_value, ExecutionFlow::Async) {
      return Ok(result);
    }

    let resolution_id = self.start(ExecutionFlow::Async);
    let context = Context::new(call_value.clone(), ExecutionFlow::Async);
    let result = engine::resolve(self.pipeline.clone(), 0, context).await;

    self.finish(resolution_id, call_value, result)
  }

  fn resolve_sync(&self, call_value: Value) -> Result<Value, PipelineError> {
    if let Some(result) = self.lookup(&call_value, ExecutionFlow::Sync) {
      return Ok(result);
    }

    let resolution_id = self.start(ExecutionFlow::Sync);
    let context = Context::new(call_value.clone(), ExecutionFlow::Sync);
    let result = engine::resolve_sync(self.pipeline.clone(), 0, context);

    self.finish(resolution_id, call_value, result)
  }

  fn lookup(&self, call_value: &Value, flow: ExecutionFlow) -> Option<Value> {
    if !self.memoized {
      return None;
    }

    let result = self.cache.get(call_value)?;
    debug!(%flow, "memoized_hit");
    Some(result)
  }

  fn start(&self, flow: ExecutionFlow) -> Uuid {
    let resolution_id = Uuid::new_v4();
    debug!(
      %resolution_id,
      %flow,
      steps = self.pipeline.len(),
      "resolution_started"
    );
    resolution_id
  }

  fn finish(
    &self,
    resolution_id: Uuid,
    call_value: Value,
    result: Result<Value, PipelineError>,
  ) -> Result<Value, PipelineError> {
    match &result {
      Ok(value) => {
        debug!(%resolution_id, "resolution_completed");
        if self.memoized {
          self.cache.store(call_value, value.clone());
        }
      }
      Err(e) => {
        debug!(%resolution_id, error = %e, "resolution_failed");
        if self.memoized {
          self.cache.clear();
        }
      }
    }

    result
  }
}

/// Start a pipe whose sequence is `[step]`, without memoization.
pub fn pipe(step: Step) -> Pipe {
  Pipe::new(step, false)
}

/// A composable, reusable pipeline handle.
///
/// `pipe` derives a new handle and never touches this one, so a handle can be
/// branched any number of times. `resolve` and `resolve_sync` each own a memo
/// slot holding the last (call value, result) pair; clones of a handle share
/// those slots.
///
/// ```text
/// Pipe
/// ├── pipe(step) -> Pipe              - new handle, sequence + [step]
/// ├── resolve(value).await            - async resolution
/// ├── resolve_sync(value)             - sync resolution
/// ├── to_function() -> AsyncPipeFn    - fresh memo slot
/// ├── to_sync_function() -> SyncPipeFn
/// └── into_step() -> Step             - nest inside another pipe
/// ```
#[derive(Debug, Clone)]
pub struct Pipe {
  pipeline: Pipeline,
  memoized: bool,
  resolver: Resolver,
  sync_resolver: Resolver,
}

impl Pipe {
  /// Start a pipe whose sequence is `[step]`.
  pub fn new(step: Step, memoized: bool) -> Self {
    Self::from_pipeline(Pipeline::from_steps(vec![step]), memoized)
  }

  /// Start a pipe seeded with an existing sequence.
  pub fn from_pipeline(pipeline: Pipeline, memoized: bool) -> Self {
    Self {
      resolver: Resolver::new(pipeline.clone(), memoized),
      sync_resolver: Resolver::new(pipeline.clone(), memoized),
      pipeline,
      memoized,
    }
  }

  /// A new handle running this pipe's steps followed by `step`.
  ///
  /// The memoization flag carries over; the memo slots start empty.
  pub fn pipe(&self, step: Step) -> Pipe {
    Self::from_pipeline(self.pipeline.append(step), self.memoized)
  }

  /// The authored step sequence.
  pub fn pipeline(&self) -> &Pipeline {
    &self.pipeline
  }

  pub fn memoized(&self) -> bool {
    self.memoized
  }

  /// Resolve the pipe once under an async context.
  pub async fn resolve(&self, call_value: Value) -> Result<Value, PipelineError> {
    self.resolver.resolve(call_value).await
  }

  /// Resolve the pipe once under a sync context.
  pub fn resolve_sync(&self, call_value: Value) -> Result<Value, PipelineError> {
    self.sync_resolver.resolve_sync(call_value)
  }

  /// A reusable async callable with a memo slot of its own.
  pub fn to_function(&self) -> AsyncPipeFn {
    let resolver = Resolver::new(self.pipeline.clone(), self.memoized);

    Arc::new(move |call_value: Value| {
      let resolver = resolver.clone();
      async move { resolver.resolve(call_value).await }.boxed()
    })
  }

  /// A reusable sync callable with a memo slot of its own.
  pub fn to_sync_function(&self) -> SyncPipeFn {
    let resolver = Resolver::new(self.pipeline.clone(), self.memoized);

    Arc::new(move |call_value: Value| resolver.resolve_sync(call_value))
  }

  /// Use this pipe as a single step of another pipe.
  ///
  /// The previous value becomes the nested call value. The nested resolution
  /// follows the outer context's flow and shares this handle's memo slots.
  pub fn into_step(self) -> Step {
    Step::new("pipe", move |value, context| match context.execution_flow() {
      ExecutionFlow::Sync => self.resolve_sync(value).map(StepOutput::ready),
      ExecutionFlow::Async => {
        let pipe = self.clone();
        Ok(StepOutput::pending(async move { pipe.resolve(value).await }))
      }
    })
  }
}

impl From<Pipe> for Step {
  fn from(pipe: Pipe) -> Self {
    pipe.into_step()
  }
}
