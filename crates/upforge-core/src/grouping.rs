//! Partition a flat resource set into group -> version -> name buckets
//!
//! An example entry in the table would be:
//! `ec2.aws.upbound.io -> v1beta1 -> aws_vpc`
//!
//! Every level is a `BTreeMap`, so walking the table always yields groups,
//! versions and resource names in ascending order.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::resource::ResourceDefinition;

/// Resources of a single (group, version) bucket keyed by resource name
pub type VersionBucket = BTreeMap<String, ResourceDefinition>;

/// All version buckets of one group
pub type GroupVersions = BTreeMap<String, VersionBucket>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupingTable {
    groups: BTreeMap<String, GroupVersions>,
}

impl GroupingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resource into its bucket, returning the entry it replaced
    pub fn insert(
        &mut self,
        group: String,
        resource: ResourceDefinition,
    ) -> Option<ResourceDefinition> {
        self.groups
            .entry(group)
            .or_default()
            .entry(resource.version.clone())
            .or_default()
            .insert(resource.name.clone(), resource)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &GroupVersions)> {
        self.groups.iter().map(|(group, versions)| (group.as_str(), versions))
    }

    pub fn group(&self, group: &str) -> Option<&GroupVersions> {
        self.groups.get(group)
    }

    pub fn bucket(&self, group: &str, version: &str) -> Option<&VersionBucket> {
        self.groups.get(group)?.get(version)
    }

    /// Resource names of a bucket, ascending
    pub fn resource_names(&self, group: &str, version: &str) -> Vec<&str> {
        self.bucket(group, version)
            .map(|bucket| bucket.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Every resource in the table, ordered by group, version, then name
    pub fn resources(&self) -> impl Iterator<Item = &ResourceDefinition> {
        self.groups
            .values()
            .flat_map(|versions| versions.values())
            .flat_map(|bucket| bucket.values())
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn version_count(&self) -> usize {
        self.groups.values().map(BTreeMap::len).sum()
    }

    pub fn resource_count(&self) -> usize {
        self.resources().count()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Group resources by their effective API group and version.
///
/// Resource names are expected to be unique. A duplicate name in the same
/// bucket replaces the earlier entry.
pub fn group_resources<'a, I>(resources: I, root_group: &str) -> GroupingTable
where
    I: IntoIterator<Item = &'a ResourceDefinition>,
{
    let mut table = GroupingTable::new();
    for resource in resources {
        let group = resource.api_group(root_group);
        if let Some(replaced) = table.insert(group.clone(), resource.clone()) {
            warn!(
                resource = %replaced.name,
                group = %group,
                version = %replaced.version,
                "Duplicate resource name, keeping the last definition"
            );
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const ROOT: &str = "aws.upbound.io";

    fn sample() -> Vec<ResourceDefinition> {
        vec![
            ResourceDefinition::new("vpc", "ec2", "v1beta1", "VPC").with_hub_version("v1beta1"),
            ResourceDefinition::new("subnet", "ec2", "v1beta1", "Subnet")
                .with_hub_version("v1beta1"),
            ResourceDefinition::new("vpc2", "ec2", "v1beta2", "VPC").with_hub_version("v1beta1"),
            ResourceDefinition::new("providerconfig", "", "v1beta1", "ProviderConfig"),
        ]
    }

    #[test]
    fn test_groups_and_buckets() {
        let table = group_resources(&sample(), ROOT);

        let groups: Vec<&str> = table.groups().map(|(g, _)| g).collect();
        assert_eq!(groups, vec!["aws.upbound.io", "ec2.aws.upbound.io"]);
        assert_eq!(
            table.resource_names("ec2.aws.upbound.io", "v1beta1"),
            vec!["subnet", "vpc"]
        );
        assert_eq!(table.resource_names("ec2.aws.upbound.io", "v1beta2"), vec!["vpc2"]);
        assert_eq!(
            table.resource_names("aws.upbound.io", "v1beta1"),
            vec!["providerconfig"]
        );
        assert_eq!(table.group_count(), 2);
        assert_eq!(table.version_count(), 3);
        assert_eq!(table.resource_count(), 4);
    }

    #[test]
    fn test_short_group_is_lowercased() {
        let resources = vec![ResourceDefinition::new("bucket", "S3", "v1", "Bucket")];
        let table = group_resources(&resources, ROOT);
        assert!(table.group("s3.aws.upbound.io").is_some());
    }

    #[test]
    fn test_duplicate_name_last_write_wins() {
        let resources = vec![
            ResourceDefinition::new("vpc", "ec2", "v1beta1", "VPC"),
            ResourceDefinition::new("vpc", "ec2", "v1beta1", "DefaultVPC"),
        ];
        let table = group_resources(&resources, ROOT);
        let bucket = table.bucket("ec2.aws.upbound.io", "v1beta1").unwrap();
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket["vpc"].kind, "DefaultVPC");
    }

    fn resource_strategy() -> impl Strategy<Value = ResourceDefinition> {
        (
            "[a-z]{1,8}",
            prop_oneof![Just(String::new()), "[a-zA-Z]{1,4}"],
            prop_oneof![Just("v1"), Just("v1beta1"), Just("v1beta2")],
            "[A-Z][a-z]{0,5}",
        )
            .prop_map(|(name, short, version, kind)| {
                ResourceDefinition::new(name, short, version, kind)
            })
    }

    proptest! {
        #[test]
        fn prop_grouping_is_deterministic(resources in prop::collection::vec(resource_strategy(), 0..24)) {
            let first = group_resources(&resources, ROOT);
            let second = group_resources(&resources, ROOT);
            prop_assert_eq!(&first, &second);

            for (group, versions) in first.groups() {
                for version in versions.keys() {
                    let names = first.resource_names(group, version);
                    prop_assert!(names.windows(2).all(|w| w[0] < w[1]));
                }
            }
        }

        #[test]
        fn prop_every_resource_lands_in_its_group(resources in prop::collection::vec(resource_strategy(), 1..24)) {
            let table = group_resources(&resources, ROOT);
            for resource in &resources {
                let expected = if resource.short_group.is_empty() {
                    ROOT.to_string()
                } else {
                    format!("{}.{}", resource.short_group.to_lowercase(), ROOT)
                };
                let bucket = table.bucket(&expected, &resource.version);
                prop_assert!(bucket.map_or(false, |b| b.contains_key(&resource.name)));
            }
        }
    }
}
