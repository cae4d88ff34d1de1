//! Go source emitters and the source formatter driven by the upforge
//! pipeline

pub mod controller;
pub mod conversion;
pub mod examples;
pub mod format;
pub mod provider;
pub mod register;
pub mod types;
mod writer;

pub use controller::GoControllerGenerator;
pub use conversion::GoConversionGenerator;
pub use examples::ManifestExampleGenerator;
pub use format::{GoImportsFormatter, NoopFormatter};
pub use provider::GoProviderGenerator;
pub use register::GoRegisterGenerator;
pub use types::GoTypesGenerator;

/// First line of every generated Go file
pub const GENERATED_HEADER: &str = "// Code generated by upforge. DO NOT EDIT.";
