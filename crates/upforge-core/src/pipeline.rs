//! The code generation pipeline
//!
//! ```text
//! group -> [version -> [types -> controllers -> examples] -> hubs -> spokes]
//!       -> store examples -> aggregate -> register -> setup -> format
//! ```
//!
//! Stages run strictly in this order because each one consumes what the
//! previous one produced: controllers import the type package of their
//! version, conversions need every version of a group, and registration
//! and setup need every group. The first error aborts the run; artifacts
//! already written are left in place.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::api_versions::{ApiVersionPackages, ApiVersionPackagesBuilder};
use crate::collaborators::Collaborators;
use crate::config::ProviderConfig;
use crate::controllers::{ControllerPackageAggregator, ControllerPackageMap};
use crate::conversion::{nodes_by_version, ConversionNodeKind, GroupConversions};
use crate::error::{PipelineError, PipelineResult};
use crate::grouping::{group_resources, GroupVersions, GroupingTable};
use crate::layout::{short_group_of, PackageLayout};
use crate::resource::ResourceDefinition;

/// Directories below the output root that are formatted after generation
const FORMATTED_DIRS: [&str; 2] = ["apis", "internal"];

/// Outcome of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Number of resources processed
    pub resources: usize,
    pub groups: usize,
    pub versions: usize,
    pub api_packages: ApiVersionPackages,
    pub controller_packages: ControllerPackageMap,
}

/// Grouping and conversion classification of a config, without generating
/// anything
#[derive(Debug, Clone, Serialize)]
pub struct PipelinePlan {
    pub resources: usize,
    pub table: GroupingTable,
    pub conversions: Vec<GroupConversions>,
}

pub struct Pipeline<'a> {
    config: &'a ProviderConfig,
    output_root: PathBuf,
    layout: PackageLayout,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a ProviderConfig, output_root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            output_root: output_root.into(),
            layout: config.layout(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Group and classify the configured resources
    pub fn plan(&self) -> PipelineResult<PipelinePlan> {
        self.config.validate()?;
        let table = group_resources(&self.config.resources, &self.config.root_group);
        let conversions = table
            .groups()
            .map(|(group, versions)| {
                let conversions = GroupConversions::classify(group, versions);
                conversions.validate_hubs()?;
                Ok(conversions)
            })
            .collect::<PipelineResult<Vec<_>>>()?;
        Ok(PipelinePlan {
            resources: table.resource_count(),
            table,
            conversions,
        })
    }

    /// Run the whole pipeline, returning once every artifact is generated
    /// and formatted
    pub fn run(&self, mut collaborators: Collaborators<'_>) -> PipelineResult<RunSummary> {
        self.config.validate()?;
        let config = self.config;
        let table = group_resources(&config.resources, &config.root_group);
        info!(
            groups = table.group_count(),
            versions = table.version_count(),
            resources = table.resource_count(),
            "Grouped resources"
        );

        let mut api_packages =
            ApiVersionPackagesBuilder::with_base(&self.layout, &config.base_packages.api_version);
        let mut controller_packages = ControllerPackageAggregator::new();
        controller_packages.seed_controller_map(&self.layout, &config.base_packages.controller_map);
        controller_packages.seed_legacy_controllers(&self.layout, &config.base_packages.controller);

        let mut count = 0;
        let mut conversions = Vec::with_capacity(table.group_count());
        for (group, versions) in table.groups() {
            info!(group = %group, versions = versions.len(), "Generating group");
            for (version, bucket) in versions {
                let resources: Vec<_> = bucket.values().collect();
                let package = collaborators
                    .types
                    .generate(group, version, &resources)
                    .map_err(|source| PipelineError::TypeGeneration {
                        group: group.to_string(),
                        version: version.clone(),
                        source,
                    })?;
                debug!(group = %group, version = %version, package = %package, "Generated types");

                count += self.generate_controllers(
                    &mut collaborators,
                    &mut controller_packages,
                    group,
                    version,
                    &package,
                    &resources,
                )?;
                api_packages.push_generated(package);
            }

            let classification = GroupConversions::classify(group, versions);
            classification.validate_hubs()?;
            self.generate_conversions(&mut collaborators, group, versions)?;
            conversions.push(classification);
        }

        collaborators
            .examples
            .store()
            .map_err(PipelineError::StoreExamples)?;

        for classification in &conversions {
            api_packages.extend_conversions(&self.layout, classification, &table);
        }
        let api_packages = api_packages.finish();
        let controller_packages = controller_packages.finish();

        collaborators
            .registration
            .generate(&api_packages)
            .map_err(PipelineError::Registration)?;
        collaborators
            .provider
            .generate(&controller_packages, config.main_template.as_deref())
            .map_err(PipelineError::ProviderSetup)?;

        for dir in FORMATTED_DIRS {
            let dir = self.output_root.join(dir);
            collaborators
                .formatter
                .format(&dir)
                .map_err(|source| PipelineError::Format { dir, source })?;
        }

        info!("Generated {} resources!", count);
        Ok(RunSummary {
            resources: count,
            groups: table.group_count(),
            versions: table.version_count(),
            api_packages,
            controller_packages,
        })
    }

    fn generate_controllers(
        &self,
        collaborators: &mut Collaborators<'_>,
        controller_packages: &mut ControllerPackageAggregator,
        group: &str,
        version: &str,
        package: &str,
        resources: &[&ResourceDefinition],
    ) -> PipelineResult<usize> {
        let short_group = short_group_of(group);
        let features_package = self.config.features_package_path();
        for resource in resources {
            let watch_package = if resource.watch_version() == version {
                package.to_string()
            } else {
                self.layout.api_package(group, resource.watch_version())
            };
            let controller = collaborators
                .controllers
                .generate(group, resource, &watch_package, features_package.as_deref())
                .map_err(|source| PipelineError::ControllerGeneration {
                    resource: resource.name.clone(),
                    source,
                })?;
            controller_packages.add_resource_controller(short_group, &controller);

            collaborators
                .examples
                .generate(group, version, resource)
                .map_err(|source| PipelineError::ExampleGeneration {
                    resource: resource.name.clone(),
                    source,
                })?;
            debug!(resource = %resource.name, controller = %controller, "Generated controller");
        }
        Ok(resources.len())
    }

    fn generate_conversions(
        &self,
        collaborators: &mut Collaborators<'_>,
        group: &str,
        versions: &GroupVersions,
    ) -> PipelineResult<()> {
        for kind in [ConversionNodeKind::Hub, ConversionNodeKind::Spoke] {
            for (version, resources) in nodes_by_version(versions, kind) {
                collaborators
                    .conversions
                    .generate(group, version, kind, &resources)
                    .map_err(|source| PipelineError::Conversion {
                        group: group.to_string(),
                        version: version.to_string(),
                        kind,
                        source,
                    })?;
                debug!(
                    group = %group,
                    version = %version,
                    %kind,
                    nodes = resources.len(),
                    "Generated conversion nodes"
                );
            }
        }
        Ok(())
    }
}
