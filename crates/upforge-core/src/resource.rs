//! Managed resource definitions as read from the provider configuration

use serde::{Deserialize, Serialize};

use crate::layout::group_name;

/// A single managed resource.
///
/// The pipeline only reads these; they are owned by the [`ProviderConfig`]
/// they were loaded from.
///
/// [`ProviderConfig`]: crate::config::ProviderConfig
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Unique key of the resource across the whole input (e.g. `aws_vpc`)
    pub name: String,
    /// Informational API group as written in the configuration. The
    /// effective group is always derived from `short_group`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    /// Short group name, empty for resources living in the root group
    #[serde(default)]
    pub short_group: String,
    pub version: String,
    pub kind: String,
    /// Version whose generated API type the controller watches, if it is
    /// not the resource's own version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller_reconcile_version: Option<String>,
    /// Version designated as the conversion hub for this kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_version: Option<String>,
    /// Upstream resource type reported by the generated accessors,
    /// defaults to `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terraform_resource_type: Option<String>,
}

impl ResourceDefinition {
    pub fn new(
        name: impl Into<String>,
        short_group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            group: String::new(),
            short_group: short_group.into(),
            version: version.into(),
            kind: kind.into(),
            controller_reconcile_version: None,
            hub_version: None,
            terraform_resource_type: None,
        }
    }

    pub fn with_hub_version(mut self, version: impl Into<String>) -> Self {
        self.hub_version = Some(version.into());
        self
    }

    pub fn with_controller_reconcile_version(mut self, version: impl Into<String>) -> Self {
        self.controller_reconcile_version = Some(version.into());
        self
    }

    /// The version acting as conversion hub for this resource's kind.
    ///
    /// A resource without an explicit hub is its own hub.
    pub fn crd_hub_version(&self) -> &str {
        match self.hub_version.as_deref() {
            Some(hub) if !hub.is_empty() => hub,
            _ => &self.version,
        }
    }

    /// The version whose API package the controller is generated against
    pub fn watch_version(&self) -> &str {
        match self.controller_reconcile_version.as_deref() {
            Some(version) if !version.is_empty() => version,
            _ => &self.version,
        }
    }

    /// Key used by the conversion classifier: `<short_group>.<kind>`
    pub fn node_key(&self) -> String {
        format!("{}.{}", self.short_group, self.kind)
    }

    /// Effective API group of this resource under `root_group`
    pub fn api_group(&self, root_group: &str) -> String {
        group_name(&self.short_group, root_group)
    }

    pub fn terraform_resource_type(&self) -> &str {
        self.terraform_resource_type.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_version_defaults_to_own_version() {
        let vpc = ResourceDefinition::new("vpc", "ec2", "v1beta2", "VPC");
        assert_eq!(vpc.crd_hub_version(), "v1beta2");

        let vpc = vpc.with_hub_version("v1beta1");
        assert_eq!(vpc.crd_hub_version(), "v1beta1");
    }

    #[test]
    fn test_empty_overrides_are_ignored() {
        let mut vpc = ResourceDefinition::new("vpc", "ec2", "v1beta1", "VPC")
            .with_hub_version("")
            .with_controller_reconcile_version("");
        assert_eq!(vpc.crd_hub_version(), "v1beta1");
        assert_eq!(vpc.watch_version(), "v1beta1");

        vpc.controller_reconcile_version = Some("v1beta2".to_string());
        assert_eq!(vpc.watch_version(), "v1beta2");
    }

    #[test]
    fn test_node_key_and_group() {
        let vpc = ResourceDefinition::new("aws_vpc", "EC2", "v1beta1", "VPC");
        assert_eq!(vpc.node_key(), "EC2.VPC");
        assert_eq!(vpc.api_group("aws.upbound.io"), "ec2.aws.upbound.io");
        assert_eq!(vpc.terraform_resource_type(), "aws_vpc");
    }
}
