//! Object steps.

use ductwork_pipeline::Step;
use serde_json::{Map, Value};

use crate::guard::{expect_object, is_truthy};

/// Keep only `keys`, dropping any whose value is falsy.
pub fn pick<I, K>(keys: I) -> Step
where
  I: IntoIterator<Item = K>,
  K: Into<String>,
{
  let keys: Vec<String> = keys.into_iter().map(Into::into).collect();

  Step::from_fn("pick", move |value, _| {
    let object = expect_object("pick", &value)?;
    let picked: Map<String, Value> = keys
      .iter()
      .filter_map(|key| {
        object
          .get(key)
          .filter(|v| is_truthy(v))
          .map(|v| (key.clone(), v.clone()))
      })
      .collect();
    Ok(Value::Object(picked))
  })
}

/// Drop `keys`.
pub fn exclude<I, K>(keys: I) -> Step
where
  I: IntoIterator<Item = K>,
  K: Into<String>,
{
  let keys: Vec<String> = keys.into_iter().map(Into::into).collect();

  Step::from_fn("exclude", move |value, _| {
    let mut object = expect_object("exclude", &value)?.clone();
    for key in &keys {
      object.remove(key);
    }
    Ok(Value::Object(object))
  })
}

/// Shallow merge; keys of `target` win.
pub fn merge(target: Map<String, Value>) -> Step {
  Step::from_fn("merge", move |value, _| {
    let mut object = expect_object("merge", &value)?.clone();
    object.extend(target.iter().map(|(k, v)| (k.clone(), v.clone())));
    Ok(Value::Object(object))
  })
}

/// Whether the value has `key` as an own property.
///
/// Never fails: `null` and scalars have no properties, arrays have their
/// indices.
pub fn has_property(key: impl Into<String>) -> Step {
  let key = key.into();

  Step::from_fn("has_property", move |value, _| {
    let found = match &value {
      Value::Object(object) => object.contains_key(&key),
      Value::Array(items) => key.parse::<usize>().is_ok_and(|index| index < items.len()),
      _ => false,
    };
    Ok(Value::Bool(found))
  })
}
