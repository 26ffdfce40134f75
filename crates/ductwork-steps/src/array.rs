//! Array steps, including fan-out of a nested pipe over every element.

use ductwork_pipeline::{ExecutionFlow, Pipe, PipelineError, Step, StepOutput};
use futures::future::try_join_all;
use serde_json::Value;

use crate::convert::stringify;
use crate::guard::{expect_array, expect_flow};

/// Resolve `pipe` for every element concurrently, keeping element order.
///
/// Async-only. The first failing element fails the step.
pub fn apply_each(pipe: Pipe) -> Step {
  Step::new("apply_each", move |value, context| {
    expect_flow("apply_each", context, ExecutionFlow::Async)?;
    let items = expect_array("apply_each", &value)?.clone();

    let pipe = pipe.clone();
    Ok(StepOutput::pending(async move {
      let results = try_join_all(items.into_iter().map(|item| pipe.resolve(item))).await?;
      Ok(Value::Array(results))
    }))
  })
}

/// Resolve `pipe` for every element in turn.
///
/// Sync-only.
pub fn apply_each_sync(pipe: Pipe) -> Step {
  Step::from_fn("apply_each_sync", move |value, context| {
    expect_flow("apply_each_sync", context, ExecutionFlow::Sync)?;

    expect_array("apply_each_sync", &value)?
      .iter()
      .map(|item| pipe.resolve_sync(item.clone()))
      .collect::<Result<Vec<_>, _>>()
      .map(Value::Array)
  })
}

/// Append `items` to the array.
pub fn concat(items: Vec<Value>) -> Step {
  Step::from_fn("concat", move |value, _| {
    let mut joined = expect_array("concat", &value)?.clone();
    joined.extend(items.iter().cloned());
    Ok(Value::Array(joined))
  })
}

/// Keep the elements for which `predicate(element, index, array)` holds.
pub fn filter<F>(predicate: F) -> Step
where
  F: Fn(&Value, usize, &[Value]) -> bool + Send + Sync + 'static,
{
  Step::from_fn("filter", move |value, _| {
    let items = expect_array("filter", &value)?;
    let kept = items
      .iter()
      .enumerate()
      .filter(|(index, item)| predicate(*item, *index, items.as_slice()))
      .map(|(_, item)| item.clone())
      .collect();
    Ok(Value::Array(kept))
  })
}

/// Keep the elements equal to `target`.
pub fn filter_with(target: Value) -> Step {
  Step::from_fn("filter_with", move |value, _| {
    let kept = expect_array("filter_with", &value)?
      .iter()
      .filter(|item| **item == target)
      .cloned()
      .collect();
    Ok(Value::Array(kept))
  })
}

/// The first element for which `predicate(element, index, array)` holds, or
/// `null`.
pub fn find<F>(predicate: F) -> Step
where
  F: Fn(&Value, usize, &[Value]) -> bool + Send + Sync + 'static,
{
  Step::from_fn("find", move |value, _| {
    let items = expect_array("find", &value)?;
    Ok(
      items
        .iter()
        .enumerate()
        .find(|(index, item)| predicate(*item, *index, items.as_slice()))
        .map(|(_, item)| item.clone())
        .unwrap_or(Value::Null),
    )
  })
}

/// The first element equal to `target`, or `null`.
pub fn find_exact(target: Value) -> Step {
  Step::from_fn("find_exact", move |value, _| {
    Ok(
      expect_array("find_exact", &value)?
        .iter()
        .find(|item| **item == target)
        .cloned()
        .unwrap_or(Value::Null),
    )
  })
}

/// Join the elements into a string. `null` elements render as empty.
pub fn join(separator: impl Into<String>) -> Step {
  let separator = separator.into();

  Step::from_fn("join", move |value, _| {
    let parts: Vec<String> = expect_array("join", &value)?
      .iter()
      .map(|item| match item {
        Value::Null => String::new(),
        other => stringify(other),
      })
      .collect();
    Ok(Value::String(parts.join(&separator)))
  })
}

pub fn length() -> Step {
  Step::from_fn("length", |value, _| {
    Ok(Value::from(expect_array("length", &value)?.len()))
  })
}

/// The element at `index`, or `null` past the end.
pub fn nth(index: usize) -> Step {
  Step::from_fn("nth", move |value, _| {
    Ok(
      expect_array("nth", &value)?
        .get(index)
        .cloned()
        .unwrap_or(Value::Null),
    )
  })
}

/// A reversed copy of the array.
pub fn reverse() -> Step {
  Step::from_fn("reverse", |value, _| -> Result<Value, PipelineError> {
    let mut items = expect_array("reverse", &value)?.clone();
    items.reverse();
    Ok(Value::Array(items))
  })
}
