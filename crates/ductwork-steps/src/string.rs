//! String steps.

use ductwork_pipeline::{PipelineError, Step};
use regex::{NoExpand, Regex, RegexBuilder};
use serde_json::Value;

use crate::guard::{expect_array, expect_str};

fn is_word(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_'
}

/// Lower the first letter, upper the first letter of every later word and
/// every ASCII capital, drop whitespace.
fn camelize(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  let mut previous_is_word = false;

  for (offset, c) in input.char_indices() {
    let word = is_word(c);
    let starts_word = (word && !previous_is_word) || c.is_ascii_uppercase();
    previous_is_word = word;

    if starts_word && offset == 0 {
      out.extend(c.to_lowercase());
    } else if starts_word {
      out.extend(c.to_uppercase());
    } else if !c.is_whitespace() {
      out.push(c);
    }
  }

  out
}

fn string_step<F>(name: &'static str, op: F) -> Step
where
  F: Fn(&str) -> Value + Send + Sync + 'static,
{
  Step::from_fn(name, move |value, _| Ok(op(expect_str(name, &value)?)))
}

/// `"hello world"` becomes `"helloWorld"`.
pub fn camel_case() -> Step {
  string_step("camel_case", |s| Value::String(camelize(s)))
}

/// `"hello world"` becomes `"HelloWorld"`.
pub fn pascal_case() -> Step {
  string_step("pascal_case", |s| {
    let camel = camelize(s);
    let mut chars = camel.chars();
    let pascal = match chars.next() {
      Some(first) => first.to_uppercase().chain(chars).collect(),
      None => String::new(),
    };
    Value::String(pascal)
  })
}

/// Split into single-character strings.
pub fn chars() -> Step {
  string_step("chars", |s| {
    Value::Array(s.chars().map(|c| Value::String(c.to_string())).collect())
  })
}

/// Append `suffix`.
pub fn concat(suffix: impl Into<String>) -> Step {
  let suffix = suffix.into();
  string_step("concat", move |s| Value::String(format!("{s}{suffix}")))
}

pub fn includes(needle: impl Into<String>) -> Step {
  let needle = needle.into();
  string_step("includes", move |s| Value::Bool(s.contains(needle.as_str())))
}

/// Length in characters.
pub fn length() -> Step {
  string_step("length", |s| Value::from(s.chars().count()))
}

pub fn lowercase() -> Step {
  string_step("lowercase", |s| Value::String(s.to_lowercase()))
}

pub fn uppercase() -> Step {
  string_step("uppercase", |s| Value::String(s.to_uppercase()))
}

/// Append `count` further copies of the string to itself.
///
/// A result too large to allocate is an `InvalidArgument` error.
pub fn repeat(count: usize) -> Step {
  Step::from_fn("repeat", move |value, _| {
    let s = expect_str("repeat", &value)?;
    count
      .checked_add(1)
      .and_then(|copies| s.len().checked_mul(copies).map(|size| (copies, size)))
      .filter(|(_, size)| *size <= isize::MAX as usize)
      .map(|(copies, _)| Value::String(s.repeat(copies)))
      .ok_or_else(|| {
        PipelineError::invalid_argument("repeat", format!("{count} repetitions overflow"))
      })
  })
}

/// Replace every case-insensitive match of the `pattern` regex with the
/// literal `replacement`.
///
/// The pattern is compiled once, here; an invalid pattern is rejected before
/// any step exists.
pub fn replace_all(pattern: &str, replacement: impl Into<String>) -> Result<Step, PipelineError> {
  let regex: Regex = RegexBuilder::new(pattern)
    .case_insensitive(true)
    .build()
    .map_err(|e| PipelineError::invalid_argument("replace_all", e.to_string()))?;
  let replacement = replacement.into();

  Ok(string_step("replace_all", move |s| {
    Value::String(regex.replace_all(s, NoExpand(&replacement)).into_owned())
  }))
}

/// Every character as the binary string of its code point.
///
/// Splits through [`chars`] on the current context.
pub fn to_binary_array() -> Step {
  Step::from_fn("to_binary_array", |value, context| {
    expect_str("to_binary_array", &value)?;

    let split = context
      .call(&chars())?
      .into_ready("chars", context.execution_flow())?;

    let binary = expect_array("to_binary_array", split.value())?
      .iter()
      .filter_map(Value::as_str)
      .filter_map(|c| c.chars().next())
      .map(|c| Value::String(format!("{:b}", u32::from(c))))
      .collect();

    Ok(Value::Array(binary))
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use ductwork_pipeline::pipe;
  use serde_json::json;

  use crate::misc::use_call_value;

  fn run(step: Step, input: Value) -> Result<Value, PipelineError> {
    pipe(use_call_value()).pipe(step).resolve_sync(input)
  }

  #[test]
  fn test_case_conversion() {
    let input = json!("hello world foo bar baz");

    assert_eq!(run(camel_case(), input.clone()).unwrap(), json!("helloWorldFooBarBaz"));
    assert_eq!(run(pascal_case(), input).unwrap(), json!("HelloWorldFooBarBaz"));
    assert_eq!(run(camel_case(), json!("Hello World")).unwrap(), json!("helloWorld"));
    assert_eq!(run(camel_case(), json!("")).unwrap(), json!(""));
    assert_eq!(run(lowercase(), json!("AbC")).unwrap(), json!("abc"));
    assert_eq!(run(uppercase(), json!("AbC")).unwrap(), json!("ABC"));
  }

  #[test]
  fn test_replace_all() {
    let step = replace_all("l", "1").unwrap();
    assert_eq!(run(step, json!("hello")).unwrap(), json!("he11o"));

    let step = replace_all("L", "$0").unwrap();
    assert_eq!(run(step, json!("hello")).unwrap(), json!("he$0$0o"));

    let error = replace_all("(", "x").unwrap_err();
    assert!(matches!(error, PipelineError::InvalidArgument { .. }));
  }

  #[test]
  fn test_small_steps() {
    assert_eq!(run(chars(), json!("abc")).unwrap(), json!(["a", "b", "c"]));
    assert_eq!(run(concat("!"), json!("hey")).unwrap(), json!("hey!"));
    assert_eq!(run(includes("ell"), json!("hello")).unwrap(), json!(true));
    assert_eq!(run(includes("xyz"), json!("hello")).unwrap(), json!(false));
    assert_eq!(run(length(), json!("héllo")).unwrap(), json!(5));
    assert_eq!(run(repeat(2), json!("ab")).unwrap(), json!("ababab"));
    assert_eq!(run(repeat(0), json!("ab")).unwrap(), json!("ab"));
  }

  #[test]
  fn test_repeat_rejects_oversized_results() {
    let error = run(repeat(usize::MAX), json!("")).unwrap_err();
    assert!(matches!(error, PipelineError::InvalidArgument { .. }));

    let error = run(repeat(usize::MAX / 2), json!("abc")).unwrap_err();
    assert_eq!(
      error,
      PipelineError::invalid_argument(
        "repeat",
        format!("{} repetitions overflow", usize::MAX / 2)
      )
    );

    let error = run(repeat(isize::MAX as usize), json!("a")).unwrap_err();
    assert!(matches!(error, PipelineError::InvalidArgument { .. }));

    assert_eq!(run(repeat(3), json!("")).unwrap(), json!(""));
  }

  #[test]
  fn test_to_binary_array() {
    assert_eq!(run(to_binary_array(), json!("AB")).unwrap(), json!(["1000001", "1000010"]));
  }

  #[test]
  fn test_rejects_non_strings() {
    let error = run(chars(), json!(12)).unwrap_err();
    assert_eq!(error, PipelineError::type_mismatch("chars", "a string"));
  }
}
