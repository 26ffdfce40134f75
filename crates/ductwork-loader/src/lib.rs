//! Loads pipeline definitions into runnable pipes.
//!
//! # Architecture
//!
//! ```text
//! PipelineDef (ductwork-config)
//!     │
//!     ▼
//! StandardLoader<R: StepRegistry>
//! ├── extends  -> registry.pipe(name) sequence, then the defined steps
//! ├── ref      -> registry.step(name)
//! ├── apply / apply_each / nested -> registry.pipe(name) or inline load
//! └── other step types -> ductwork-steps factories
//!     │
//!     ▼
//! Pipe (ductwork-pipeline)
//! ```

mod error;
mod loader;
mod registry;

pub use error::LoadError;
pub use loader::{Loader, StandardLoader};
pub use registry::{MemoryRegistry, StepRegistry};
