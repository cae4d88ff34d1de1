//! Interfaces of the emitters and post-processors the pipeline drives
//!
//! The pipeline decides what gets generated and in which order; these
//! traits decide how. Every method is called synchronously and any error
//! aborts the run.

use std::path::Path;

use crate::api_versions::ApiVersionPackages;
use crate::controllers::ControllerPackageMap;
use crate::conversion::ConversionNodeKind;
use crate::error::{FormatError, GenerateError};
use crate::resource::ResourceDefinition;

/// Emits the API types of one (group, version)
pub trait TypeGenerator {
    /// Generate the API package for `resources` (sorted by name) and return
    /// its import path
    fn generate(
        &mut self,
        group: &str,
        version: &str,
        resources: &[&ResourceDefinition],
    ) -> Result<String, GenerateError>;
}

/// Emits the controller of one resource
pub trait ControllerGenerator {
    /// Generate the controller watching the API type in `watch_package` and
    /// return the controller's import path
    fn generate(
        &mut self,
        group: &str,
        resource: &ResourceDefinition,
        watch_package: &str,
        features_package: Option<&str>,
    ) -> Result<String, GenerateError>;
}

/// Emits conversion hub markers or spoke conversion functions
pub trait ConversionGenerator {
    /// Generate `kind` nodes for `resources`, all generated into `version`
    fn generate(
        &mut self,
        group: &str,
        version: &str,
        kind: ConversionNodeKind,
        resources: &[&ResourceDefinition],
    ) -> Result<(), GenerateError>;
}

/// Produces example manifests
pub trait ExampleGenerator {
    fn generate(
        &mut self,
        group: &str,
        version: &str,
        resource: &ResourceDefinition,
    ) -> Result<(), GenerateError>;

    /// Persist everything generated so far. Called once, after all groups.
    fn store(&mut self) -> Result<(), GenerateError>;
}

/// Emits the scheme registration of every API version package
pub trait RegistrationGenerator {
    fn generate(&mut self, packages: &ApiVersionPackages) -> Result<(), GenerateError>;
}

/// Emits the controller setup of every grouping key and, given a template,
/// the provider's main programs
pub trait ProviderGenerator {
    fn generate(
        &mut self,
        controllers: &ControllerPackageMap,
        main_template: Option<&Path>,
    ) -> Result<(), GenerateError>;
}

/// Post-processes the generated sources below a directory
pub trait Formatter {
    fn format(&self, dir: &Path) -> Result<(), FormatError>;
}

/// The set of collaborators a pipeline run drives
pub struct Collaborators<'a> {
    pub types: &'a mut dyn TypeGenerator,
    pub controllers: &'a mut dyn ControllerGenerator,
    pub conversions: &'a mut dyn ConversionGenerator,
    pub examples: &'a mut dyn ExampleGenerator,
    pub registration: &'a mut dyn RegistrationGenerator,
    pub provider: &'a mut dyn ProviderGenerator,
    pub formatter: &'a dyn Formatter,
}
