//! Application layer: orchestration over the domain, behind ports.
//!
//! The services own the batch workflow; the ports define what they need
//! from the outside world (schema resolution, artifact output). Nothing
//! in this layer renders or classifies — that is domain and emit code.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use services::{BatchReport, GeneratorOptions, GeneratorService, MANIFEST_PATH, SUPPORT_PATH};
