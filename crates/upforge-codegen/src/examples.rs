//! Example manifest generation
//!
//! Manifests are collected in memory while the pipeline walks the
//! resources and written out in one go by [`ExampleGenerator::store`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;
use upforge_core::layout::short_group_of;
use upforge_core::{ExampleGenerator, GenerateError, ResourceDefinition};

use crate::writer::write_file;

/// Annotation carrying the example's identity
const EXAMPLE_ID_ANNOTATION: &str = "meta.upbound.io/example-id";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleManifest {
    pub api_version: String,
    pub kind: String,
    pub metadata: ExampleMetadata,
    pub spec: ExampleSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExampleMetadata {
    pub name: String,
    pub annotations: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleSpec {
    pub for_provider: BTreeMap<String, serde_yaml::Value>,
}

/// Collects one example manifest per resource below
/// `<root>/examples-generated/<short group>/<version>/`
pub struct ManifestExampleGenerator {
    root: PathBuf,
    pending: BTreeMap<PathBuf, ExampleManifest>,
}

impl ManifestExampleGenerator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pending: BTreeMap::new(),
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl ExampleGenerator for ManifestExampleGenerator {
    fn generate(
        &mut self,
        group: &str,
        version: &str,
        resource: &ResourceDefinition,
    ) -> Result<(), GenerateError> {
        let short_group = short_group_of(group).to_lowercase();
        let kind = resource.kind.to_lowercase();
        let path = self
            .root
            .join("examples-generated")
            .join(&short_group)
            .join(version)
            .join(format!("{}.yaml", resource.name.replace('_', "-")));

        let mut annotations = BTreeMap::new();
        annotations.insert(
            EXAMPLE_ID_ANNOTATION.to_string(),
            format!("{}/{}/{}", short_group, version, kind),
        );
        let manifest = ExampleManifest {
            api_version: format!("{}/{}", group, version),
            kind: resource.kind.clone(),
            metadata: ExampleMetadata {
                name: format!("example-{}", kind),
                annotations,
            },
            spec: ExampleSpec {
                for_provider: BTreeMap::new(),
            },
        };
        self.pending.insert(path, manifest);
        Ok(())
    }

    fn store(&mut self) -> Result<(), GenerateError> {
        let count = self.pending.len();
        for (path, manifest) in std::mem::take(&mut self.pending) {
            let yaml = serde_yaml::to_string(&manifest)?;
            write_file(&path, &yaml)?;
        }
        info!(count, "Stored example manifests");
        Ok(())
    }
}
