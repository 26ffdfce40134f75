//! Arithmetic over numbers and numeric arrays.
//!
//! Results go through [`number`], so integral results come back as JSON
//! integers and undefined results (division by zero, even roots of negative
//! numbers) come back as `null`.

use ductwork_pipeline::{PipelineError, Step};
use serde_json::Value;

use crate::guard::{expect_number, expect_numbers, number};

fn unary<F>(name: &'static str, op: F) -> Step
where
  F: Fn(f64) -> f64 + Send + Sync + 'static,
{
  Step::from_fn(name, move |value, _| Ok(number(op(expect_number(name, &value)?))))
}

fn keep<F>(name: &'static str, predicate: F) -> Step
where
  F: Fn(f64) -> bool + Send + Sync + 'static,
{
  Step::from_fn(name, move |value, _| {
    let kept = expect_numbers(name, &value)?
      .into_iter()
      .filter(|n| predicate(*n))
      .map(number)
      .collect();
    Ok(Value::Array(kept))
  })
}

fn reduce<F>(name: &'static str, init: f64, op: F) -> Step
where
  F: Fn(f64, f64) -> f64 + Send + Sync + 'static,
{
  Step::from_fn(name, move |value, _| -> Result<Value, PipelineError> {
    let numbers = expect_numbers(name, &value)?;
    Ok(number(numbers.into_iter().fold(init, &op)))
  })
}

pub fn add(amount: f64) -> Step {
  unary("add", move |n| n + amount)
}

pub fn subtract(amount: f64) -> Step {
  unary("subtract", move |n| n - amount)
}

pub fn multiply_by(factor: f64) -> Step {
  unary("multiply_by", move |n| n * factor)
}

pub fn divide_by(divisor: f64) -> Step {
  unary("divide_by", move |n| n / divisor)
}

pub fn pow(exponent: f64) -> Step {
  unary("pow", move |n| n.powf(exponent))
}

/// The `degree`-th root.
pub fn root(degree: f64) -> Step {
  unary("root", move |n| n.powf(1.0 / degree))
}

pub fn increment() -> Step {
  unary("increment", |n| n + 1.0)
}

pub fn decrement() -> Step {
  unary("decrement", |n| n - 1.0)
}

pub fn change_sign() -> Step {
  unary("change_sign", |n| -n)
}

/// Negative absolute value.
pub fn negative() -> Step {
  unary("negative", |n| if n > 0.0 { -n } else { n })
}

/// Absolute value.
pub fn positive() -> Step {
  unary("positive", |n| if n > 0.0 { n } else { -n })
}

/// Keep the elements within `[start, end]`.
pub fn take_between(start: f64, end: f64) -> Step {
  keep("take_between", move |n| n >= start && n <= end)
}

/// Keep the elements outside `[start, end]`.
pub fn take_outer(start: f64, end: f64) -> Step {
  keep("take_outer", move |n| n < start || n > end)
}

pub fn take_greater_than(check: f64, inclusive: bool) -> Step {
  keep("take_greater_than", move |n| n > check || (inclusive && n == check))
}

pub fn take_lower_than(check: f64, inclusive: bool) -> Step {
  keep("take_lower_than", move |n| n < check || (inclusive && n == check))
}

/// The largest element; `null` for an empty array.
pub fn take_greater() -> Step {
  reduce("take_greater", f64::NEG_INFINITY, f64::max)
}

/// The smallest element; `null` for an empty array.
pub fn take_lower() -> Step {
  reduce("take_lower", f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
  use super::*;
  use ductwork_pipeline::{Context, ExecutionFlow};
  use serde_json::json;

  fn run(step: Step, value: Value) -> Result<Value, PipelineError> {
    let context = Context::new(json!(null), ExecutionFlow::Sync);
    step
      .call(value, &context)?
      .into_ready(step.name(), ExecutionFlow::Sync)
      .map(|outcome| outcome.value().clone())
  }

  #[test]
  fn test_arithmetic() {
    assert_eq!(run(add(20.0), json!(10)).unwrap(), json!(30));
    assert_eq!(run(subtract(1.5), json!(3)).unwrap(), json!(1.5));
    assert_eq!(run(multiply_by(2.0), json!(30)).unwrap(), json!(60));
    assert_eq!(run(divide_by(100.0), json!(1285)).unwrap(), json!(12.85));
    assert_eq!(run(pow(3.0), json!(10)).unwrap(), json!(1000));
    assert_eq!(run(root(2.0), json!(81)).unwrap(), json!(9));
    assert_eq!(run(increment(), json!(1)).unwrap(), json!(2));
    assert_eq!(run(decrement(), json!(1)).unwrap(), json!(0));
    assert_eq!(run(change_sign(), json!(4)).unwrap(), json!(-4));
    assert_eq!(run(negative(), json!(4)).unwrap(), json!(-4));
    assert_eq!(run(negative(), json!(-4)).unwrap(), json!(-4));
    assert_eq!(run(positive(), json!(-4)).unwrap(), json!(4));
  }

  #[test]
  fn test_division_by_zero_is_null() {
    assert_eq!(run(divide_by(0.0), json!(1)).unwrap(), Value::Null);
  }

  #[test]
  fn test_rejects_non_numbers() {
    let error = run(add(1.0), json!("1")).unwrap_err();
    assert_eq!(error.to_string(), "add argument must be a number");
  }

  #[test]
  fn test_array_filters() {
    let values = json!([1, 5, 10, 15, 20]);

    assert_eq!(run(take_between(5.0, 15.0), values.clone()).unwrap(), json!([5, 10, 15]));
    assert_eq!(run(take_outer(5.0, 15.0), values.clone()).unwrap(), json!([1, 20]));
    assert_eq!(run(take_greater_than(10.0, false), values.clone()).unwrap(), json!([15, 20]));
    assert_eq!(run(take_greater_than(10.0, true), values.clone()).unwrap(), json!([10, 15, 20]));
    assert_eq!(run(take_lower_than(10.0, false), values.clone()).unwrap(), json!([1, 5]));
    assert_eq!(run(take_lower_than(10.0, true), values.clone()).unwrap(), json!([1, 5, 10]));
    assert_eq!(run(take_greater(), values.clone()).unwrap(), json!(20));
    assert_eq!(run(take_lower(), values).unwrap(), json!(1));
  }

  #[test]
  fn test_extremes_of_empty_array() {
    assert_eq!(run(take_greater(), json!([])).unwrap(), Value::Null);
    assert_eq!(run(take_lower(), json!([])).unwrap(), Value::Null);
  }

  #[test]
  fn test_array_filters_reject_mixed_arrays() {
    let error = run(take_between(0.0, 1.0), json!([1, "a"])).unwrap_err();
    assert_eq!(error.to_string(), "take_between argument must be a numbers array");
  }
}
