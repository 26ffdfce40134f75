//! Branching on the previous value.

use ductwork_pipeline::Step;
use serde_json::Value;

use crate::guard::is_truthy;

/// One arm of a [`switch`].
#[derive(Debug, Clone, PartialEq)]
pub enum SwitchCase {
  /// Produce `then` when the value equals `when`.
  Match { when: Value, then: Value },
  /// Produce the value when no match arm applies.
  Default(Value),
}

impl SwitchCase {
  pub fn matching(when: Value, then: Value) -> Self {
    Self::Match { when, then }
  }
}

/// Map the value through `cases`.
///
/// Match arms are tested from the last one to the first; the first arm that
/// matches wins. Without a match the earliest default applies, and without a
/// default the result is `null`.
pub fn switch(cases: Vec<SwitchCase>) -> Step {
  Step::from_fn("switch", move |value, _| {
    let mut fallback = None;

    for case in cases.iter().rev() {
      match case {
        SwitchCase::Default(default) => fallback = Some(default),
        SwitchCase::Match { when, then } if *when == value => return Ok(then.clone()),
        SwitchCase::Match { .. } => {}
      }
    }

    Ok(fallback.cloned().unwrap_or(Value::Null))
  })
}

/// `right` for a truthy value, `left` otherwise.
pub fn fold(left: Value, right: Value) -> Step {
  Step::from_fn("fold", move |value, _| {
    Ok(if is_truthy(&value) { right.clone() } else { left.clone() })
  })
}
