use ductwork_config::{PipelineDef, PipelineRef, StepDef, SwitchCaseDef};
use ductwork_pipeline::{Pipe, Pipeline, Step};
use ductwork_steps::{
  SwitchCase, ValueKind, array, boolean, convert, logical, math, misc, object, string,
};
use tracing::{info, instrument};

use crate::error::LoadError;
use crate::registry::StepRegistry;

/// Loader turns a pipeline definition into a runnable pipe.
pub trait Loader: Send + Sync {
  /// Load a pipeline definition.
  ///
  /// This process:
  /// 1. Seeds the sequence from the `extends` pipe, if any
  /// 2. Builds every step, resolving `ref` steps and nested pipes by name
  /// 3. Wraps the sequence in a pipe with the definition's memoization flag
  fn load(&self, def: &PipelineDef) -> Result<Pipe, LoadError>;
}

/// Standard loader implementation backed by a step registry.
pub struct StandardLoader<R: StepRegistry> {
  registry: R,
}

impl<R: StepRegistry> StandardLoader<R> {
  /// Create a new loader with the given registry.
  pub fn new(registry: R) -> Self {
    Self { registry }
  }

  pub fn registry(&self) -> &R {
    &self.registry
  }

  fn seed(&self, def: &PipelineDef) -> Result<Pipeline, LoadError> {
    match &def.extends {
      Some(name) => self
        .registry
        .pipe(name)
        .map(|base| base.pipeline().clone())
        .ok_or_else(|| LoadError::UnknownPipeline { name: name.clone() }),
      None => Ok(Pipeline::new()),
    }
  }

  fn nested(&self, pipeline: &PipelineRef) -> Result<Pipe, LoadError> {
    match pipeline {
      PipelineRef::Named(name) => self
        .registry
        .pipe(name)
        .ok_or_else(|| LoadError::UnknownPipeline { name: name.clone() }),
      PipelineRef::Inline(def) => self.load(def),
    }
  }

  /// Build a single step definition into a step.
  fn build_step(&self, def: &StepDef) -> Result<Step, LoadError> {
    let step = match def {
      StepDef::Ref { name } => self
        .registry
        .step(name)
        .ok_or_else(|| LoadError::UnknownStep { name: name.clone() })?,

      StepDef::UseCallValue => misc::use_call_value(),
      StepDef::UseValue => misc::use_value(),
      StepDef::Put { value } => misc::put(value.clone()),
      StepDef::Apply { pipeline } => misc::apply(self.nested(pipeline)?),
      StepDef::ApplySync { pipeline } => misc::apply_sync(self.nested(pipeline)?),
      StepDef::Nested { pipeline } => self.nested(pipeline)?.into_step(),
      StepDef::SafeCall { step, fallback } => {
        misc::safe_call_or(self.build_step(step)?, fallback.clone())
      }

      StepDef::Add { value } => math::add(*value),
      StepDef::Subtract { value } => math::subtract(*value),
      StepDef::MultiplyBy { value } => math::multiply_by(*value),
      StepDef::DivideBy { value } => math::divide_by(*value),
      StepDef::Pow { exponent } => math::pow(*exponent),
      StepDef::Root { degree } => math::root(*degree),
      StepDef::Increment => math::increment(),
      StepDef::Decrement => math::decrement(),
      StepDef::ChangeSign => math::change_sign(),
      StepDef::Negative => math::negative(),
      StepDef::Positive => math::positive(),
      StepDef::TakeBetween { start, end } => math::take_between(*start, *end),
      StepDef::TakeOuter { start, end } => math::take_outer(*start, *end),
      StepDef::TakeGreater => math::take_greater(),
      StepDef::TakeGreaterThan { check, inclusive } => math::take_greater_than(*check, *inclusive),
      StepDef::TakeLower => math::take_lower(),
      StepDef::TakeLowerThan { check, inclusive } => math::take_lower_than(*check, *inclusive),

      StepDef::ApplyEach { pipeline } => array::apply_each(self.nested(pipeline)?),
      StepDef::ApplyEachSync { pipeline } => array::apply_each_sync(self.nested(pipeline)?),
      StepDef::ArrayConcat { items } => array::concat(items.clone()),
      StepDef::FilterWith { value } => array::filter_with(value.clone()),
      StepDef::FindExact { value } => array::find_exact(value.clone()),
      StepDef::Join { separator } => array::join(separator.as_str()),
      StepDef::ArrayLength => array::length(),
      StepDef::Nth { index } => array::nth(*index),
      StepDef::Reverse => array::reverse(),

      StepDef::CamelCase => string::camel_case(),
      StepDef::PascalCase => string::pascal_case(),
      StepDef::Chars => string::chars(),
      StepDef::StringConcat { suffix } => string::concat(suffix.as_str()),
      StepDef::Includes { needle } => string::includes(needle.as_str()),
      StepDef::StringLength => string::length(),
      StepDef::Lowercase => string::lowercase(),
      StepDef::Uppercase => string::uppercase(),
      StepDef::Repeat { count } => string::repeat(*count),
      StepDef::ReplaceAll {
        pattern,
        replacement,
      } => string::replace_all(pattern, replacement.as_str())?,
      StepDef::ToBinaryArray => string::to_binary_array(),

      StepDef::Pick { keys } => object::pick(keys.iter().cloned()),
      StepDef::Exclude { keys } => object::exclude(keys.iter().cloned()),
      StepDef::Merge { target } => object::merge(target.clone()),
      StepDef::HasProperty { key } => object::has_property(key.as_str()),

      StepDef::Inverse => boolean::inverse(),
      StepDef::AlwaysTrue => boolean::always_true(),
      StepDef::AlwaysFalse => boolean::always_false(),

      StepDef::Switch { cases } => logical::switch(cases.iter().map(switch_case).collect()),
      StepDef::Fold { left, right } => logical::fold(left.clone(), right.clone()),

      StepDef::ToArray => convert::to_array(),
      StepDef::ToBoolean => convert::to_boolean(),
      StepDef::ToNumber => convert::to_number(),
      StepDef::ToString => convert::to_string(),
      StepDef::ToSet => convert::to_set(),
      StepDef::OfType { kind } => convert::of_type(kind.parse::<ValueKind>()?),
    };

    Ok(step)
  }
}

fn switch_case(def: &SwitchCaseDef) -> SwitchCase {
  match def {
    SwitchCaseDef::Match { when, then } => SwitchCase::matching(when.clone(), then.clone()),
    SwitchCaseDef::Default { default } => SwitchCase::Default(default.clone()),
  }
}

impl<R: StepRegistry> Loader for StandardLoader<R> {
  #[instrument(name = "pipeline_load", skip(self, def), fields(pipeline = %def.name))]
  fn load(&self, def: &PipelineDef) -> Result<Pipe, LoadError> {
    let seed = self.seed(def)?;

    let steps = def
      .steps
      .iter()
      .map(|step| self.build_step(step))
      .collect::<Result<Vec<_>, _>>()?;

    let pipeline = seed.concat(&Pipeline::from_steps(steps));
    if pipeline.is_empty() {
      return Err(LoadError::EmptyPipeline {
        name: def.name.clone(),
      });
    }

    info!(
      pipeline = %def.name,
      steps = pipeline.len(),
      memoized = def.memoized,
      "pipeline_loaded"
    );

    Ok(Pipe::from_pipeline(pipeline, def.memoized))
  }
}
