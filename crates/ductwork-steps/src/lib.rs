//! Step library for ductwork pipelines.
//!
//! Every function here is a factory returning a [`Step`](ductwork_pipeline::Step).
//! Steps validate the shape of the value they receive and fail with
//! `TypeMismatch`; steps tied to one execution flow fail with `ModeMismatch`.
//!
//! ```text
//! guard    - shared shape/flow checks, truthiness, number normalization
//! misc     - use_call_value, use_value, put, apply(_sync), safe_call, adapt
//! math     - arithmetic and numeric array filters
//! array    - apply_each(_sync) fan-out, filter/find, join, nth, ...
//! string   - case conversion, replace_all, chars, to_binary_array, ...
//! object   - pick, exclude, merge, has_property
//! boolean  - inverse, always_true, always_false
//! logical  - switch, fold
//! convert  - to_array, to_boolean, to_number, to_string, to_set, of_type
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use ductwork_pipeline::pipe;
//! use ductwork_steps::{math, misc};
//!
//! let vat = pipe(misc::use_call_value())
//!     .pipe(math::divide_by(100.0))
//!     .pipe(math::multiply_by(22.0))
//!     .to_sync_function();
//!
//! assert_eq!(vat(json!(100))?, json!(22));
//! ```

pub mod array;
pub mod boolean;
pub mod convert;
pub mod guard;
pub mod logical;
pub mod math;
pub mod misc;
pub mod object;
pub mod string;

pub use convert::ValueKind;
pub use logical::SwitchCase;
