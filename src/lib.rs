//! Ductwork - composable linear pipelines over JSON values.
//!
//! A pipe is an ordered chain of steps applied to a call value, resolved
//! either synchronously or asynchronously. Steps see the previous output and
//! the execution context, and may splice further steps into the running
//! sequence.
//!
//! # Crates
//!
//! ```text
//! ductwork
//! ├── pipeline  - context, steps, engine, Pipe handle, memoization
//! ├── steps     - step library (math, array, string, object, logical, ...)
//! ├── config    - serializable pipeline definitions
//! └── loader    - definition -> Pipe via a step registry
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use ductwork::prelude::*;
//!
//! let vat = pipe(misc::use_call_value())
//!     .pipe(math::divide_by(100.0))
//!     .pipe(math::multiply_by(22.0))
//!     .to_sync_function();
//!
//! assert_eq!(vat(json!(1285))?, json!(282.7));
//! ```

pub use ductwork_config as config;
pub use ductwork_loader as loader;
pub use ductwork_pipeline as pipeline;
pub use ductwork_steps as steps;

pub use ductwork_pipeline::{
  Context, ExecutionFlow, Outcome, Pipe, Pipeline, PipelineError, Step, StepOutput, pipe,
};

/// The names most pipes are built from.
pub mod prelude {
  pub use ductwork_pipeline::{
    Context, ExecutionFlow, Outcome, Pipe, PipelineError, Step, StepOutput, pipe,
  };
  pub use ductwork_steps::{
    SwitchCase, ValueKind, array, boolean, convert, logical, math, misc, object, string,
  };
  pub use serde_json::{Value, json};
}

#[cfg(test)]
mod tests {
  use super::prelude::*;
  use crate::config::PipelineDef;
  use crate::loader::{Loader, MemoryRegistry, StandardLoader};

  #[tokio::test]
  async fn test_prelude_and_loader_agree() {
    let built = pipe(misc::use_call_value())
      .pipe(string::camel_case())
      .pipe(string::length());

    let def: PipelineDef = serde_json::from_value(json!({
      "name": "camel_length",
      "steps": [
        { "type": "use_call_value" },
        { "type": "camel_case" },
        { "type": "string_length" }
      ]
    }))
    .unwrap();
    let loaded = StandardLoader::new(MemoryRegistry::new()).load(&def).unwrap();

    let input = json!("hello world foo bar baz");
    assert_eq!(built.resolve_sync(input.clone()).unwrap(), json!(19));
    assert_eq!(loaded.resolve(input).await.unwrap(), json!(19));
  }
}
