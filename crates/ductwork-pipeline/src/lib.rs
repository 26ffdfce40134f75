//! Pipeline composition and resolution.
//!
//! A pipe is a linear chain of steps applied in order to a call value. Each
//! step receives the previous step's output plus the execution context, and
//! may ask the engine to splice more steps in right after itself.
//!
//! # Architecture
//!
//! ```text
//! Pipe (handle)
//! ├── pipe(step) -> Pipe             - non-destructive append
//! ├── resolve / resolve_sync         - one memo slot each
//! └── to_function / to_sync_function - reusable callables
//!
//! engine::resolve / engine::resolve_sync
//! └── for each step: call -> Context::update -> Context::apply_mutation
//!
//! Context
//! └── call_value, execution_flow, mutation_index, previous_value(s), mutate
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use ductwork_pipeline::{pipe, Step};
//!
//! let double = Step::from_fn("double", |value, _| {
//!     Ok(serde_json::json!(value.as_i64().unwrap_or_default() * 2))
//! });
//! let handle = pipe(Step::from_fn("seed", |_, ctx| Ok(ctx.call_value().clone())))
//!     .pipe(double);
//!
//! assert_eq!(handle.resolve_sync(serde_json::json!(21))?, serde_json::json!(42));
//! ```

mod cache;
mod context;
pub mod engine;
mod error;
mod pipe;
mod sequence;
mod step;

pub use context::{Context, ExecutionFlow};
pub use error::PipelineError;
pub use pipe::{AsyncPipeFn, Pipe, SyncPipeFn, pipe};
pub use sequence::Pipeline;
pub use step::{Mutation, Outcome, Step, StepFuture, StepOutput};
