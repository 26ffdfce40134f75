//! Ductwork Config
//!
//! This crate contains the serializable pipeline definition types for ductwork.
//! These types describe a pipe before it is loaded: which library steps it
//! runs, with which arguments, and which registered steps or pipes it refers
//! to by name.
//!
//! Definitions are plain serde types. Reading them from JSON text, a database
//! blob or anywhere else is up to the embedding application; the loader
//! crate turns a definition into a runnable pipe.

mod pipeline;
mod step;

pub use pipeline::{PipelineDef, PipelineRef};
pub use step::{StepDef, SwitchCaseDef};
