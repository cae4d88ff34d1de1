//! Controller package aggregation
//!
//! Controllers are wired into setup artifacts per grouping key. A key is
//! either a short group name or one of the reserved aggregate keys below.
//! Every package added under any key is also added under
//! [`MONOLITH_PACKAGE_KEY`], which therefore covers the whole provider.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::ControllerMapEntry;
use crate::layout::PackageLayout;

/// Key collecting the provider's own (non resource) controllers
pub const CONFIG_PACKAGE_KEY: &str = "config";

/// Key collecting every controller package of the provider
pub const MONOLITH_PACKAGE_KEY: &str = "monolith";

/// Grouping key -> controller packages in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ControllerPackageMap {
    packages: BTreeMap<String, Vec<String>>,
}

impl ControllerPackageMap {
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.packages.get(key).map(Vec::as_slice)
    }

    pub fn monolith(&self) -> &[String] {
        self.get(MONOLITH_PACKAGE_KEY).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.packages
            .iter()
            .map(|(key, packages)| (key.as_str(), packages.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Builder for [`ControllerPackageMap`].
///
/// Base packages must be seeded before resource controllers are added:
/// the controller map first, then the legacy flat list.
#[derive(Debug, Default)]
pub struct ControllerPackageAggregator {
    packages: BTreeMap<String, Vec<String>>,
}

impl ControllerPackageAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert_unique(&mut self, key: &str, path: &str) -> bool {
        let packages = self.packages.entry(key.to_string()).or_default();
        if packages.iter().any(|p| p == path) {
            return false;
        }
        packages.push(path.to_string());
        true
    }

    /// Add `path` under `key` and under the monolith key, skipping either
    /// insertion when the path is already present there.
    pub fn insert(&mut self, key: &str, path: &str) {
        self.insert_unique(key, path);
        if key != MONOLITH_PACKAGE_KEY {
            self.insert_unique(MONOLITH_PACKAGE_KEY, path);
        }
    }

    /// Seed base controller packages that name their own grouping key
    pub fn seed_controller_map(&mut self, layout: &PackageLayout, entries: &[ControllerMapEntry]) {
        for entry in entries {
            let path = layout.package(&entry.package);
            self.insert(&entry.key, &path);
        }
    }

    /// Seed the legacy flat list of base controllers under the config key.
    /// Entries already seeded from the controller map keep their position.
    pub fn seed_legacy_controllers(&mut self, layout: &PackageLayout, packages: &[String]) {
        for package in packages {
            let path = layout.package(package);
            self.insert(CONFIG_PACKAGE_KEY, &path);
        }
    }

    /// Record the controller package generated for a resource
    pub fn add_resource_controller(&mut self, short_group: &str, path: &str) {
        self.insert(short_group, path);
    }

    pub fn finish(self) -> ControllerPackageMap {
        ControllerPackageMap {
            packages: self.packages,
        }
    }
}
