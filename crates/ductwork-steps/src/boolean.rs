//! Boolean steps.

use ductwork_pipeline::Step;
use serde_json::Value;

use crate::guard::expect_bool;

pub fn inverse() -> Step {
  Step::from_fn("inverse", |value, _| {
    Ok(Value::Bool(!expect_bool("inverse", &value)?))
  })
}

pub fn always_true() -> Step {
  Step::from_fn("always_true", |_, _| Ok(Value::Bool(true)))
}

pub fn always_false() -> Step {
  Step::from_fn("always_false", |_, _| Ok(Value::Bool(false)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use ductwork_pipeline::pipe;
  use serde_json::json;

  use crate::misc::use_call_value;

  #[test]
  fn test_inverse() {
    let handle = pipe(use_call_value()).pipe(inverse());

    assert_eq!(handle.resolve_sync(json!(true)).unwrap(), json!(false));
    assert!(handle.resolve_sync(json!(1)).is_err());
  }

  #[test]
  fn test_constants() {
    assert_eq!(pipe(always_true()).resolve_sync(json!(0)).unwrap(), json!(true));
    assert_eq!(pipe(always_false()).resolve_sync(json!(1)).unwrap(), json!(false));
  }
}
