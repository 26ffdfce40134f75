use std::collections::HashMap;

use ductwork_pipeline::{Pipe, Step};

/// Named steps and pipes a definition can refer to.
pub trait StepRegistry: Send + Sync {
  /// Get a registered step by name.
  fn step(&self, name: &str) -> Option<Step>;

  /// Get a registered pipe by name.
  fn pipe(&self, name: &str) -> Option<Pipe>;
}

/// In-memory registry.
///
/// ```ignore
/// let registry = MemoryRegistry::new()
///     .with_step("is_even", is_even)
///     .with_pipe("add_one", pipe(use_call_value()).pipe(add(1.0)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
  steps: HashMap<String, Step>,
  pipes: HashMap<String, Pipe>,
}

impl MemoryRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_step(mut self, name: impl Into<String>, step: Step) -> Self {
    self.register_step(name, step);
    self
  }

  pub fn with_pipe(mut self, name: impl Into<String>, pipe: Pipe) -> Self {
    self.register_pipe(name, pipe);
    self
  }

  /// Register `step`, replacing any step already registered under `name`.
  pub fn register_step(&mut self, name: impl Into<String>, step: Step) {
    self.steps.insert(name.into(), step);
  }

  /// Register `pipe`, replacing any pipe already registered under `name`.
  pub fn register_pipe(&mut self, name: impl Into<String>, pipe: Pipe) {
    self.pipes.insert(name.into(), pipe);
  }
}

impl StepRegistry for MemoryRegistry {
  fn step(&self, name: &str) -> Option<Step> {
    self.steps.get(name).cloned()
  }

  fn pipe(&self, name: &str) -> Option<Pipe> {
    self.pipes.get(name).cloned()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use ductwork_pipeline::pipe;
  use serde_json::json;

  #[test]
  fn test_lookup() {
    let echo = Step::from_fn("echo", |value, _| Ok(value));
    let registry = MemoryRegistry::new()
      .with_step("echo", echo.clone())
      .with_pipe("echo", pipe(echo));

    assert_eq!(registry.step("echo").map(|s| s.name().to_string()), Some("echo".to_string()));
    assert!(registry.step("missing").is_none());

    let handle = registry.pipe("echo").unwrap();
    assert_eq!(handle.resolve_sync(json!(1)).unwrap(), serde_json::Value::Null);
    assert!(registry.pipe("missing").is_none());
  }

  #[test]
  fn test_register_replaces() {
    let mut registry = MemoryRegistry::new();
    registry.register_step("s", Step::from_fn("first", |v, _| Ok(v)));
    registry.register_step("s", Step::from_fn("second", |v, _| Ok(v)));

    assert_eq!(registry.step("s").unwrap().name(), "second");
  }
}
