//! Type conversion and type assertion steps.

use std::fmt;
use std::str::FromStr;

use ductwork_pipeline::{PipelineError, Step};
use serde_json::Value;

use crate::guard::{expect_array, is_truthy, number};

/// The JSON kind of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
  Null,
  Boolean,
  Number,
  String,
  Array,
  Object,
}

impl ValueKind {
  pub fn of(value: &Value) -> Self {
    match value {
      Value::Null => Self::Null,
      Value::Bool(_) => Self::Boolean,
      Value::Number(_) => Self::Number,
      Value::String(_) => Self::String,
      Value::Array(_) => Self::Array,
      Value::Object(_) => Self::Object,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Null => "null",
      Self::Boolean => "boolean",
      Self::Number => "number",
      Self::String => "string",
      Self::Array => "array",
      Self::Object => "object",
    }
  }
}

impl fmt::Display for ValueKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ValueKind {
  type Err = PipelineError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "null" => Ok(Self::Null),
      "boolean" => Ok(Self::Boolean),
      "number" => Ok(Self::Number),
      "string" => Ok(Self::String),
      "array" => Ok(Self::Array),
      "object" => Ok(Self::Object),
      other => Err(PipelineError::invalid_argument(
        "of_type",
        format!("unknown value kind '{other}'"),
      )),
    }
  }
}

/// Render a value as text.
///
/// Strings render raw, integral numbers without a fraction, arrays as their
/// elements joined by `,` (with `null` elements empty) and objects as JSON.
pub fn stringify(value: &Value) -> String {
  match value {
    Value::Null => "null".to_string(),
    Value::Bool(flag) => flag.to_string(),
    Value::String(s) => s.clone(),
    Value::Number(n) => match n.as_f64() {
      Some(f) if n.is_f64() => match number(f) {
        Value::Number(normalized) => normalized.to_string(),
        _ => f.to_string(),
      },
      _ => n.to_string(),
    },
    Value::Array(items) => items
      .iter()
      .map(|item| match item {
        Value::Null => String::new(),
        other => stringify(other),
      })
      .collect::<Vec<_>>()
      .join(","),
    Value::Object(_) => value.to_string(),
  }
}

fn parse_number(text: &str) -> Option<f64> {
  let text = text.trim();
  if text.is_empty() {
    return Some(0.0);
  }

  let radix = match text.get(..2) {
    Some("0x") | Some("0X") => Some(16),
    Some("0o") | Some("0O") => Some(8),
    Some("0b") | Some("0B") => Some(2),
    _ => None,
  };
  if let Some(radix) = radix {
    return u64::from_str_radix(&text[2..], radix).ok().map(|n| n as f64);
  }

  match text {
    "Infinity" | "+Infinity" => Some(f64::INFINITY),
    "-Infinity" => Some(f64::NEG_INFINITY),
    _ if text.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => None,
    _ => text.parse().ok(),
  }
}

/// Numeric coercion of any value; `null` when there is no numeric reading.
fn coerce_number(value: &Value) -> Value {
  match value {
    Value::Null => Value::from(0),
    Value::Bool(flag) => Value::from(u8::from(*flag)),
    Value::Number(_) => value.clone(),
    Value::String(s) => parse_number(s).map(number).unwrap_or(Value::Null),
    Value::Array(items) => match items.as_slice() {
      [] => Value::from(0),
      [single] => parse_number(&stringify(single)).map(number).unwrap_or(Value::Null),
      _ => Value::Null,
    },
    Value::Object(_) => Value::Null,
  }
}

/// Wrap the value in a one-element array.
pub fn to_array() -> Step {
  Step::from_fn("to_array", |value, _| Ok(Value::Array(vec![value])))
}

/// The value's truthiness.
pub fn to_boolean() -> Step {
  Step::from_fn("to_boolean", |value, _| Ok(Value::Bool(is_truthy(&value))))
}

/// Coerce to a number. Strings are parsed (blank is `0`), booleans become
/// `1`/`0`, `null` becomes `0`; anything unreadable becomes `null`.
pub fn to_number() -> Step {
  Step::from_fn("to_number", |value, _| Ok(coerce_number(&value)))
}

/// Render the value as a string.
pub fn to_string() -> Step {
  Step::from_fn("to_string", |value, _| Ok(Value::String(stringify(&value))))
}

/// Drop repeated elements, keeping first occurrences in order.
pub fn to_set() -> Step {
  Step::from_fn("to_set", |value, _| {
    let mut unique: Vec<Value> = Vec::new();
    for item in expect_array("to_set", &value)? {
      if !unique.contains(item) {
        unique.push(item.clone());
      }
    }
    Ok(Value::Array(unique))
  })
}

/// Pass the value through if it is of `kind`, fail otherwise.
pub fn of_type(kind: ValueKind) -> Step {
  Step::from_fn("of_type", move |value, _| {
    if ValueKind::of(&value) != kind {
      return Err(PipelineError::type_mismatch("of_type", format!("of type {kind}")));
    }
    Ok(value)
  })
}
