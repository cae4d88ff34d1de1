use std::path::PathBuf;

use thiserror::Error;

use crate::conversion::ConversionNodeKind;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failure raised by a generation collaborator
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Format error: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Missing package: {0}")]
    MissingPackage(String),

    #[error("{0}")]
    Other(String),
}

/// Failure of the external source formatter
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("cannot run {program} in {}: {source}", dir.display())]
    Spawn {
        program: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed in {}: {output}", dir.display())]
    Failed {
        program: String,
        dir: PathBuf,
        output: String,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read provider config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse provider config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid provider config: {0}")]
    Invalid(String),
}

/// Fatal pipeline error. Every variant names the unit of work that failed.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    #[error("cannot generate types for group {group:?} version {version:?}")]
    TypeGeneration {
        group: String,
        version: String,
        #[source]
        source: GenerateError,
    },

    #[error("cannot generate controller for resource {resource}")]
    ControllerGeneration {
        resource: String,
        #[source]
        source: GenerateError,
    },

    #[error("cannot generate example manifest for resource {resource}")]
    ExampleGeneration {
        resource: String,
        #[source]
        source: GenerateError,
    },

    #[error("cannot generate the conversion {kind} functions for group {group:?} version {version:?}")]
    Conversion {
        group: String,
        version: String,
        kind: ConversionNodeKind,
        #[source]
        source: GenerateError,
    },

    #[error("kind {kind:?} in group {group:?} must have exactly one hub version, found {hubs:?}")]
    HubVersion {
        group: String,
        kind: String,
        hubs: Vec<String>,
    },

    #[error("cannot store examples")]
    StoreExamples(#[source] GenerateError),

    #[error("cannot generate register file")]
    Registration(#[source] GenerateError),

    #[error("cannot generate setup file")]
    ProviderSetup(#[source] GenerateError),

    #[error("cannot format generated sources in {}", dir.display())]
    Format {
        dir: PathBuf,
        #[source]
        source: FormatError,
    },
}
