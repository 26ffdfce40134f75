//! General purpose steps: seeding values, nesting pipes, error recovery and
//! adapting plain functions.

use std::future::Future;
use std::sync::Arc;

use ductwork_pipeline::{ExecutionFlow, Outcome, Pipe, PipelineError, Step, StepOutput};
use futures::FutureExt;
use serde_json::Value;
use tracing::warn;

use crate::guard::expect_flow;

/// Ignore the previous value and produce the call value.
pub fn use_call_value() -> Step {
  Step::from_fn("use_call_value", |_, context| Ok(context.call_value().clone()))
}

/// Pass the previous value through.
pub fn use_value() -> Step {
  Step::from_fn("use_value", |value, _| Ok(value))
}

/// Ignore the previous value and produce `value`.
pub fn put(value: Value) -> Step {
  Step::from_fn("put", move |_, _| Ok(value.clone()))
}

/// Resolve `pipe` asynchronously with the previous value as its call value.
///
/// Only usable under an async context.
pub fn apply(pipe: Pipe) -> Step {
  Step::new("apply", move |value, context| {
    expect_flow("apply", context, ExecutionFlow::Async)?;

    let pipe = pipe.clone();
    Ok(StepOutput::pending(async move { pipe.resolve(value).await }))
  })
}

/// Resolve `pipe` synchronously with the previous value as its call value.
///
/// Only usable under a sync context.
pub fn apply_sync(pipe: Pipe) -> Step {
  Step::new("apply_sync", move |value, context| {
    expect_flow("apply_sync", context, ExecutionFlow::Sync)?;

    pipe.resolve_sync(value).map(StepOutput::ready)
  })
}

/// Run `step`, producing `null` instead of failing.
pub fn safe_call(step: Step) -> Step {
  safe_call_or(step, Value::Null)
}

/// Run `step`, producing `fallback` instead of failing.
///
/// Failures of pending steps are recovered as well. A splice requested by a
/// successful run is kept.
pub fn safe_call_or(step: Step, fallback: Value) -> Step {
  Step::new("safe_call", move |value, context| {
    let output = match step.call(value, context) {
      Ok(output) => output,
      Err(e) => {
        warn!(step = step.name(), error = %e, "safe_call recovered from failure");
        return Ok(StepOutput::ready(fallback.clone()));
      }
    };

    match output {
      StepOutput::Ready(outcome) => Ok(StepOutput::Ready(outcome)),
      StepOutput::Pending(future) => {
        let name = step.name().to_string();
        let fallback = fallback.clone();

        Ok(StepOutput::Pending(
          async move {
            match future.await {
              Ok(outcome) => Ok(outcome),
              Err(e) => {
                warn!(step = %name, error = %e, "safe_call recovered from failure");
                Ok(Outcome::Value(fallback))
              }
            }
          }
          .boxed(),
        ))
      }
    }
  })
}

/// Curry a two-argument function into a step factory.
///
/// The factory fixes the first argument; the previous value becomes the
/// second.
///
/// ```ignore
/// let full_name = adapt("full_name", |name: String, surname: Value| {
///     Ok(json!(format!("{name} {}", surname.as_str().unwrap_or_default())))
/// });
///
/// pipe(use_call_value()).pipe(full_name("john".into())).resolve_sync(json!("snow"))?;
/// ```
pub fn adapt<A, F>(name: impl Into<Arc<str>>, func: F) -> impl Fn(A) -> Step
where
  A: Clone + Send + Sync + 'static,
  F: Fn(A, Value) -> Result<Value, PipelineError> + Send + Sync + 'static,
{
  let name: Arc<str> = name.into();
  let func = Arc::new(func);

  move |arg: A| {
    let func = func.clone();
    Step::from_fn(name.clone(), move |value, _| func(arg.clone(), value))
  }
}

/// Curry a two-argument async function into a step factory.
///
/// Steps built by the factory are async-only.
pub fn adapt_async<A, F, Fut>(name: impl Into<Arc<str>>, func: F) -> impl Fn(A) -> Step
where
  A: Clone + Send + Sync + 'static,
  F: Fn(A, Value) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<Value, PipelineError>> + Send + 'static,
{
  let name: Arc<str> = name.into();
  let func = Arc::new(func);

  move |arg: A| {
    let func = func.clone();
    Step::from_future(name.clone(), move |value, _| func(arg.clone(), value))
  }
}
