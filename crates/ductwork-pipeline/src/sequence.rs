//! The ordered step sequence.

use std::fmt;
use std::sync::Arc;

use crate::step::Step;

/// An ordered list of steps.
///
/// Every derivation (`append`, `concat`, `splice`) returns a new sequence;
/// a sequence already held by a pipe or a running resolution never changes.
#[derive(Clone, Default)]
pub struct Pipeline {
  steps: Arc<Vec<Step>>,
}

impl Pipeline {
  /// Create an empty sequence.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_steps(steps: Vec<Step>) -> Self {
    Self {
      steps: Arc::new(steps),
    }
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&Step> {
    self.steps.get(index)
  }

  pub fn steps(&self) -> &[Step] {
    &self.steps
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Step> {
    self.steps.iter()
  }

  /// Step names in order.
  pub fn names(&self) -> Vec<&str> {
    self.steps.iter().map(Step::name).collect()
  }

  /// A new sequence with `step` appended.
  pub fn append(&self, step: Step) -> Self {
    let mut steps = Vec::with_capacity(self.steps.len() + 1);
    steps.extend(self.steps.iter().cloned());
    steps.push(step);
    Self::from_steps(steps)
  }

  /// A new sequence with all of `other`'s steps after this one's.
  pub fn concat(&self, other: &Pipeline) -> Self {
    let mut steps = Vec::with_capacity(self.steps.len() + other.len());
    steps.extend(self.steps.iter().cloned());
    steps.extend(other.steps.iter().cloned());
    Self::from_steps(steps)
  }

  /// A new sequence with `inserted` placed before the step currently at `index`.
  ///
  /// An index past the end appends.
  pub fn splice(&self, index: usize, inserted: Vec<Step>) -> Self {
    let index = index.min(self.steps.len());
    let mut steps = self.steps.as_ref().clone();
    steps.splice(index..index, inserted);
    Self::from_steps(steps)
  }
}

impl FromIterator<Step> for Pipeline {
  fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
    Self::from_steps(iter.into_iter().collect())
  }
}

impl<'a> IntoIterator for &'a Pipeline {
  type Item = &'a Step;
  type IntoIter = std::slice::Iter<'a, Step>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl fmt::Debug for Pipeline {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.names()).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn step(name: &'static str) -> Step {
    Step::from_fn(name, |value, _| Ok(value))
  }

  #[test]
  fn test_append_does_not_touch_source() {
    let base = Pipeline::from_steps(vec![step("a")]);
    let left = base.append(step("b"));
    let right = base.append(step("c"));

    assert_eq!(base.names(), vec!["a"]);
    assert_eq!(left.names(), vec!["a", "b"]);
    assert_eq!(right.names(), vec!["a", "c"]);
  }

  #[test]
  fn test_concat() {
    let first: Pipeline = vec![step("a"), step("b")].into_iter().collect();
    let second = Pipeline::from_steps(vec![step("c")]);

    assert_eq!(first.concat(&second).names(), vec!["a", "b", "c"]);
    assert_eq!(first.len(), 2);
  }

  #[test]
  fn test_splice_positions() {
    let base = Pipeline::from_steps(vec![step("a"), step("b")]);

    assert_eq!(base.splice(0, vec![step("x")]).names(), vec!["x", "a", "b"]);
    assert_eq!(base.splice(1, vec![step("x")]).names(), vec!["a", "x", "b"]);
    assert_eq!(base.splice(2, vec![step("x")]).names(), vec!["a", "b", "x"]);
    assert_eq!(base.splice(9, vec![step("x")]).names(), vec!["a", "b", "x"]);
    assert_eq!(base.names(), vec!["a", "b"]);
  }

  #[test]
  fn test_empty() {
    let pipeline = Pipeline::new();
    assert!(pipeline.is_empty());
    assert!(pipeline.get(0).is_none());
  }
}
