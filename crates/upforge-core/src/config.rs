//! Provider configuration loaded from `upforge.toml`
//!
//! ```toml
//! root_group = "aws.upbound.io"
//! short_name = "aws"
//! module_path = "github.com/upbound/provider-aws"
//! features_package = "internal/features"
//!
//! [base_packages]
//! api_version = ["apis/v1beta1"]
//! controller = ["internal/controller/providerconfig"]
//!
//! [[resources]]
//! name = "aws_vpc"
//! short_group = "ec2"
//! version = "v1beta1"
//! kind = "VPC"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::layout::PackageLayout;
use crate::resource::ResourceDefinition;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API group every resource group is nested under
    pub root_group: String,
    /// Short provider name (e.g. `aws`)
    pub short_name: String,
    /// Go module path of the generated provider
    pub module_path: String,
    /// Module-relative package of the provider's feature flags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features_package: Option<String>,
    /// Template of the provider's main program, rendered per controller key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_template: Option<PathBuf>,
    #[serde(default)]
    pub base_packages: BasePackages,
    #[serde(default)]
    pub resources: Vec<ResourceDefinition>,
}

/// Hand-written packages that are wired in next to the generated ones.
/// All paths are relative to the module path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasePackages {
    /// API packages registered before any generated version package
    #[serde(default)]
    pub api_version: Vec<String>,
    /// Legacy flat list of controllers, grouped under the config key
    #[serde(default)]
    pub controller: Vec<String>,
    /// Controllers with an explicit grouping key. Processed before
    /// `controller`, so they win when both name the same package.
    #[serde(default)]
    pub controller_map: Vec<ControllerMapEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerMapEntry {
    pub package: String,
    pub key: String,
}

impl ProviderConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ProviderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file. A relative `main_template` is
    /// resolved against the directory of the config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;
        if let (Some(template), Some(dir)) = (config.main_template.as_mut(), path.parent()) {
            if template.is_relative() {
                *template = dir.join(&*template);
            }
        }
        info!(
            path = %path.display(),
            root_group = %config.root_group,
            resources = config.resources.len(),
            "Loaded provider config"
        );
        debug!(?config, "Provider config (full debug)");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_group.trim().is_empty() {
            return Err(ConfigError::Invalid("root_group must not be empty".into()));
        }
        if self.module_path.trim().is_empty() {
            return Err(ConfigError::Invalid("module_path must not be empty".into()));
        }
        for resource in &self.resources {
            if resource.name.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "resource of kind {:?} has an empty name",
                    resource.kind
                )));
            }
            if resource.version.is_empty() || resource.kind.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "resource {} must declare both version and kind",
                    resource.name
                )));
            }
        }
        Ok(())
    }

    pub fn layout(&self) -> PackageLayout {
        PackageLayout::new(self.module_path.clone())
    }

    /// Full import path of the features package, if one is configured
    pub fn features_package_path(&self) -> Option<String> {
        self.features_package
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| self.layout().package(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = r#"
root_group = "aws.upbound.io"
short_name = "aws"
module_path = "github.com/upbound/provider-aws"
features_package = "internal/features"
main_template = "templates/main.go.tmpl"

[base_packages]
api_version = ["apis/v1beta1"]
controller = ["internal/controller/providerconfig"]
controller_map = [{ package = "internal/controller/eks/clusterauth", key = "eks" }]

[[resources]]
name = "aws_vpc"
short_group = "ec2"
version = "v1beta1"
kind = "VPC"

[[resources]]
name = "aws_vpc_v2"
short_group = "ec2"
version = "v1beta2"
kind = "VPC"
hub_version = "v1beta1"
controller_reconcile_version = "v1beta1"
"#;

    #[test]
    fn test_parse_config() {
        let config = ProviderConfig::from_toml_str(CONFIG).unwrap();
        assert_eq!(config.root_group, "aws.upbound.io");
        assert_eq!(config.resources.len(), 2);
        assert_eq!(config.resources[1].crd_hub_version(), "v1beta1");
        assert_eq!(config.resources[1].watch_version(), "v1beta1");
        assert_eq!(
            config.base_packages.controller_map,
            vec![ControllerMapEntry {
                package: "internal/controller/eks/clusterauth".to_string(),
                key: "eks".to_string(),
            }]
        );
        assert_eq!(
            config.features_package_path().as_deref(),
            Some("github.com/upbound/provider-aws/internal/features")
        );
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let err = ProviderConfig::from_toml_str("root_group = \"x\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = ProviderConfig::from_toml_str(
            "root_group = \"\"\nshort_name = \"aws\"\nmodule_path = \"m\"",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_empty_resource_version_is_rejected() {
        let content = r#"
root_group = "aws.upbound.io"
short_name = "aws"
module_path = "m"

[[resources]]
name = "aws_vpc"
version = ""
kind = "VPC"
"#;
        let err = ProviderConfig::from_toml_str(content).unwrap_err();
        assert!(err.to_string().contains("aws_vpc"));
    }

    #[test]
    fn test_load_resolves_template_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upforge.toml");
        std::fs::write(&path, CONFIG).unwrap();

        let config = ProviderConfig::load(&path).unwrap();
        assert_eq!(
            config.main_template.unwrap(),
            dir.path().join("templates/main.go.tmpl")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = ProviderConfig::load(Path::new("/nonexistent/upforge.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
