//! Shape and flow guards shared by the step library.
//!
//! Every guard takes the name of the step it protects so the raised error
//! points at the step, not at the guard.

use ductwork_pipeline::{Context, ExecutionFlow, PipelineError};
use serde_json::{Map, Number, Value};

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Fail unless `context` runs under `flow`.
pub fn expect_flow(step: &str, context: &Context, flow: ExecutionFlow) -> Result<(), PipelineError> {
  if context.execution_flow() != flow {
    return Err(PipelineError::mode_mismatch(step, context.execution_flow()));
  }
  Ok(())
}

pub fn expect_array<'a>(step: &str, value: &'a Value) -> Result<&'a Vec<Value>, PipelineError> {
  value
    .as_array()
    .ok_or_else(|| PipelineError::type_mismatch(step, "an array"))
}

pub fn expect_str<'a>(step: &str, value: &'a Value) -> Result<&'a str, PipelineError> {
  value
    .as_str()
    .ok_or_else(|| PipelineError::type_mismatch(step, "a string"))
}

pub fn expect_object<'a>(step: &str, value: &'a Value) -> Result<&'a Map<String, Value>, PipelineError> {
  value
    .as_object()
    .ok_or_else(|| PipelineError::type_mismatch(step, "a valid object"))
}

pub fn expect_number(step: &str, value: &Value) -> Result<f64, PipelineError> {
  value
    .as_f64()
    .ok_or_else(|| PipelineError::type_mismatch(step, "a number"))
}

pub fn expect_bool(step: &str, value: &Value) -> Result<bool, PipelineError> {
  value
    .as_bool()
    .ok_or_else(|| PipelineError::type_mismatch(step, "a boolean"))
}

/// Every element of an array as a number.
pub fn expect_numbers(step: &str, value: &Value) -> Result<Vec<f64>, PipelineError> {
  expect_array(step, value)?
    .iter()
    .map(|item| {
      item
        .as_f64()
        .ok_or_else(|| PipelineError::type_mismatch(step, "a numbers array"))
    })
    .collect()
}

/// Loose truthiness: `null`, `false`, `0`, `""` are falsy, everything else
/// (including empty arrays and objects) is truthy.
pub fn is_truthy(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(flag) => *flag,
    Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
    Value::String(s) => !s.is_empty(),
    Value::Array(_) | Value::Object(_) => true,
  }
}

/// Render an `f64` result as a JSON value.
///
/// Integral results within the exact range become integers, other finite
/// results stay floats and non-finite results become `null`.
pub fn number(n: f64) -> Value {
  if !n.is_finite() {
    return Value::Null;
  }

  if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
    return Value::Number(Number::from(n as i64));
  }

  Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}
