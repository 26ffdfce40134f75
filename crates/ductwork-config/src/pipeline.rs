use serde::{Deserialize, Serialize};

use crate::step::StepDef;

/// A pipe definition.
///
/// ```json
/// {
///   "name": "vat",
///   "memoized": true,
///   "steps": [
///     { "type": "use_call_value" },
///     { "type": "divide_by", "value": 100 },
///     { "type": "multiply_by", "value": 22 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDef {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub memoized: bool,
  /// Name of a registered pipe whose steps run before `steps`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub extends: Option<String>,
  #[serde(default)]
  pub steps: Vec<StepDef>,
}

/// A pipe used by a nesting step: registered by name, or defined inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PipelineRef {
  Named(String),
  Inline(Box<PipelineDef>),
}
