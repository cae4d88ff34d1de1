//! Core resource grouping, conversion classification and pipeline
//! orchestration for upforge

pub mod api_versions;
pub mod collaborators;
pub mod config;
pub mod controllers;
pub mod conversion;
pub mod error;
pub mod grouping;
pub mod layout;
pub mod pipeline;
pub mod resource;

pub use api_versions::{ApiVersionPackages, ApiVersionPackagesBuilder};
pub use collaborators::{
    Collaborators, ControllerGenerator, ConversionGenerator, ExampleGenerator, Formatter,
    ProviderGenerator, RegistrationGenerator, TypeGenerator,
};
pub use config::{BasePackages, ControllerMapEntry, ProviderConfig};
pub use controllers::{
    ControllerPackageAggregator, ControllerPackageMap, CONFIG_PACKAGE_KEY, MONOLITH_PACKAGE_KEY,
};
pub use conversion::{ConversionNodeKind, GroupConversions, NodeVersionsMap};
pub use error::{ConfigError, FormatError, GenerateError, PipelineError, PipelineResult};
pub use grouping::{group_resources, GroupingTable};
pub use layout::PackageLayout;
pub use pipeline::{Pipeline, PipelinePlan, RunSummary};
pub use resource::ResourceDefinition;
