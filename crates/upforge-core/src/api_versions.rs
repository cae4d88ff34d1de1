//! The list of API version packages handed to the registration emitter

use serde::Serialize;

use crate::conversion::GroupConversions;
use crate::grouping::GroupingTable;
use crate::layout::{join_package, PackageLayout};

/// Ordered API version packages of a run.
///
/// The list is not deduplicated: a package can be both generated in this
/// run and implied by several conversion nodes. Consumers that need unique
/// entries use [`ApiVersionPackages::unique`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ApiVersionPackages(Vec<String>);

impl ApiVersionPackages {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Packages with repeats removed, first occurrence wins
    pub fn unique(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.iter().filter(|p| seen.insert(*p)).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ApiVersionPackagesBuilder {
    packages: Vec<String>,
}

impl ApiVersionPackagesBuilder {
    /// Start from the provider's base API packages (e.g. the ProviderConfig
    /// API), resolved against the module path
    pub fn with_base(layout: &PackageLayout, base: &[String]) -> Self {
        Self {
            packages: base.iter().map(|p| layout.package(p)).collect(),
        }
    }

    /// Record a version package generated in this run
    pub fn push_generated(&mut self, package: impl Into<String>) {
        self.packages.push(package.into());
    }

    /// Add the version packages implied by a group's conversion nodes.
    ///
    /// Every resource of the run is looked up by `"<short_group>.<kind>"` in
    /// the group's spoke and hub maps, so packages that only exist to take
    /// part in a conversion are registered too.
    pub fn extend_conversions(
        &mut self,
        layout: &PackageLayout,
        conversions: &GroupConversions,
        table: &GroupingTable,
    ) {
        let base = layout.api_group_base(&conversions.group);
        for resource in table.resources() {
            let key = resource.node_key();
            for nodes in [&conversions.spokes, &conversions.hubs] {
                if let Some(versions) = nodes.get(&key) {
                    self.packages
                        .extend(versions.iter().map(|v| join_package(&base, [v.as_str()])));
                }
            }
        }
    }

    pub fn finish(self) -> ApiVersionPackages {
        ApiVersionPackages(self.packages)
    }
}
