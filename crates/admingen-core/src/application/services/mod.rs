//! Application services (use-case orchestration).

mod generator_service;

pub use generator_service::{
    BatchReport, GeneratorOptions, GeneratorService, MANIFEST_PATH, SUPPORT_PATH,
};
