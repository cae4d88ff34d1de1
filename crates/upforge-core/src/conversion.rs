//! Hub/spoke classification of resource versions for schema conversion
//!
//! For every `(short_group, kind)` of a group, exactly one version is the
//! hub (the conversion target) and every other version is a spoke that
//! converts to and from it. The classifier only records which versions
//! satisfy a predicate; what gets emitted is decided by the pipeline.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};
use crate::grouping::GroupVersions;
use crate::resource::ResourceDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionNodeKind {
    Hub,
    Spoke,
}

impl ConversionNodeKind {
    /// Name of the generated file holding this kind of conversion node
    pub fn file_name(self) -> &'static str {
        match self {
            ConversionNodeKind::Hub => "zz_generated.conversion_hubs.go",
            ConversionNodeKind::Spoke => "zz_generated.conversion_spokes.go",
        }
    }

    /// Whether `resource`, generated into the `file_version` package, is a
    /// node of this kind
    pub fn matches(self, resource: &ResourceDefinition, file_version: &str) -> bool {
        let is_hub = resource.crd_hub_version() == file_version;
        match self {
            ConversionNodeKind::Hub => is_hub,
            ConversionNodeKind::Spoke => !is_hub,
        }
    }
}

impl fmt::Display for ConversionNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionNodeKind::Hub => write!(f, "hub"),
            ConversionNodeKind::Spoke => write!(f, "spoke"),
        }
    }
}

/// `"<short_group>.<kind>"` -> versions satisfying a classification
/// predicate, in the order they were encountered and without repeats
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NodeVersionsMap {
    nodes: BTreeMap<String, Vec<String>>,
}

impl NodeVersionsMap {
    fn record(&mut self, key: String, version: &str) {
        let versions = self.nodes.entry(key).or_default();
        if !versions.iter().any(|v| v == version) {
            versions.push(version.to_string());
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.nodes.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.nodes
            .iter()
            .map(|(key, versions)| (key.as_str(), versions.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Classify every resource of a group against `predicate`, evaluated with
/// the version bucket the resource was generated into.
pub fn classify<F>(versions: &GroupVersions, predicate: F) -> NodeVersionsMap
where
    F: Fn(&ResourceDefinition, &str) -> bool,
{
    let mut map = NodeVersionsMap::default();
    for (version, bucket) in versions {
        for resource in bucket.values() {
            if predicate(resource, version.as_str()) {
                map.record(resource.node_key(), version);
            }
        }
    }
    map
}

/// Resources of each version that are nodes of `kind`. Versions without a
/// single matching resource are left out.
pub fn nodes_by_version(
    versions: &GroupVersions,
    kind: ConversionNodeKind,
) -> Vec<(&str, Vec<&ResourceDefinition>)> {
    versions
        .iter()
        .filter_map(|(version, bucket)| {
            let nodes: Vec<_> = bucket
                .values()
                .filter(|resource| kind.matches(resource, version))
                .collect();
            (!nodes.is_empty()).then_some((version.as_str(), nodes))
        })
        .collect()
}

/// Hub and spoke classification of one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupConversions {
    pub group: String,
    pub hubs: NodeVersionsMap,
    pub spokes: NodeVersionsMap,
    #[serde(skip)]
    kinds: BTreeSet<String>,
}

impl GroupConversions {
    /// Run the hub pass and the spoke pass over a group
    pub fn classify(group: &str, versions: &GroupVersions) -> Self {
        let kinds = versions
            .values()
            .flat_map(|bucket| bucket.values())
            .map(ResourceDefinition::node_key)
            .collect();
        Self {
            group: group.to_string(),
            hubs: classify(versions, |r, v| ConversionNodeKind::Hub.matches(r, v)),
            spokes: classify(versions, |r, v| ConversionNodeKind::Spoke.matches(r, v)),
            kinds,
        }
    }

    pub fn nodes(&self, kind: ConversionNodeKind) -> &NodeVersionsMap {
        match kind {
            ConversionNodeKind::Hub => &self.hubs,
            ConversionNodeKind::Spoke => &self.spokes,
        }
    }

    /// Every kind observed in the group must have exactly one hub version.
    pub fn validate_hubs(&self) -> PipelineResult<()> {
        for key in &self.kinds {
            let hubs = self.hubs.get(key).unwrap_or_default();
            if hubs.len() != 1 {
                let kind = key.split_once('.').map_or(key.as_str(), |(_, kind)| kind);
                return Err(PipelineError::HubVersion {
                    group: self.group.clone(),
                    kind: kind.to_string(),
                    hubs: hubs.to_vec(),
                });
            }
        }
        Ok(())
    }
}
