use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::pipeline::PipelineRef;

fn one() -> usize {
  1
}

/// One step of a pipe definition, tagged by `type`.
///
/// Every data-parameterized step of the library has a variant here. Steps
/// taking code (filter predicates, adapted functions) cannot be written as
/// data; register them by name and use `ref`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepDef {
  /// A step registered under `name`.
  Ref { name: String },

  UseCallValue,
  UseValue,
  Put { value: Value },
  Apply { pipeline: PipelineRef },
  ApplySync { pipeline: PipelineRef },
  /// A nested pipe following the outer flow.
  Nested { pipeline: PipelineRef },
  SafeCall {
    step: Box<StepDef>,
    #[serde(default)]
    fallback: Value,
  },

  Add { value: f64 },
  Subtract { value: f64 },
  MultiplyBy { value: f64 },
  DivideBy { value: f64 },
  Pow { exponent: f64 },
  Root { degree: f64 },
  Increment,
  Decrement,
  ChangeSign,
  Negative,
  Positive,
  TakeBetween { start: f64, end: f64 },
  TakeOuter { start: f64, end: f64 },
  TakeGreater,
  TakeGreaterThan {
    check: f64,
    #[serde(default)]
    inclusive: bool,
  },
  TakeLower,
  TakeLowerThan {
    check: f64,
    #[serde(default)]
    inclusive: bool,
  },

  ApplyEach { pipeline: PipelineRef },
  ApplyEachSync { pipeline: PipelineRef },
  ArrayConcat { items: Vec<Value> },
  FilterWith { value: Value },
  FindExact { value: Value },
  Join {
    #[serde(default)]
    separator: String,
  },
  ArrayLength,
  Nth { index: usize },
  Reverse,

  CamelCase,
  PascalCase,
  Chars,
  StringConcat { suffix: String },
  Includes { needle: String },
  StringLength,
  Lowercase,
  Uppercase,
  Repeat {
    #[serde(default = "one")]
    count: usize,
  },
  ReplaceAll { pattern: String, replacement: String },
  ToBinaryArray,

  Pick { keys: Vec<String> },
  Exclude { keys: Vec<String> },
  Merge { target: Map<String, Value> },
  HasProperty { key: String },

  Inverse,
  AlwaysTrue,
  AlwaysFalse,

  Switch { cases: Vec<SwitchCaseDef> },
  Fold { left: Value, right: Value },

  ToArray,
  ToBoolean,
  ToNumber,
  ToString,
  ToSet,
  /// Fails unless the value is of `kind` (`null`, `boolean`, `number`,
  /// `string`, `array` or `object`).
  OfType { kind: String },
}

/// One arm of a `switch` step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SwitchCaseDef {
  Match { when: Value, then: Value },
  Default { default: Value },
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_tagged_steps() {
    let steps: Vec<StepDef> = serde_json::from_value(json!([
      { "type": "put", "value": [1, 2] },
      { "type": "multiply_by", "value": 2 },
      { "type": "take_greater_than", "check": 3 },
      { "type": "repeat" },
      { "type": "ref", "name": "custom" },
      { "type": "apply_each", "pipeline": "inner" },
    ]))
    .unwrap();

    assert_eq!(
      steps,
      vec![
        StepDef::Put { value: json!([1, 2]) },
        StepDef::MultiplyBy { value: 2.0 },
        StepDef::TakeGreaterThan {
          check: 3.0,
          inclusive: false
        },
        StepDef::Repeat { count: 1 },
        StepDef::Ref {
          name: "custom".to_string()
        },
        StepDef::ApplyEach {
          pipeline: PipelineRef::Named("inner".to_string())
        },
      ]
    );
  }

  #[test]
  fn test_safe_call_wraps_a_step() {
    let step: StepDef = serde_json::from_value(json!({
      "type": "safe_call",
      "step": { "type": "uppercase" }
    }))
    .unwrap();

    assert_eq!(
      step,
      StepDef::SafeCall {
        step: Box::new(StepDef::Uppercase),
        fallback: Value::Null,
      }
    );
  }

  #[test]
  fn test_switch_cases() {
    let step: StepDef = serde_json::from_value(json!({
      "type": "switch",
      "cases": [
        { "when": 1, "then": "one" },
        { "default": "other" }
      ]
    }))
    .unwrap();

    assert_eq!(
      step,
      StepDef::Switch {
        cases: vec![
          SwitchCaseDef::Match {
            when: json!(1),
            then: json!("one")
          },
          SwitchCaseDef::Default {
            default: json!("other")
          },
        ]
      }
    );
  }

  #[test]
  fn test_serializes_with_type_tag() {
    let value = serde_json::to_value(StepDef::StringConcat {
      suffix: "!".to_string(),
    })
    .unwrap();

    assert_eq!(value, json!({ "type": "string_concat", "suffix": "!" }));
  }

  #[test]
  fn test_unknown_type_is_rejected() {
    let result = serde_json::from_value::<StepDef>(json!({ "type": "teleport" }));
    assert!(result.is_err());
  }
}
