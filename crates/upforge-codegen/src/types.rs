//! API type emitter
//!
//! For every version package this writes one `zz_<kind>_types.go` per
//! resource, the resource accessors in `zz_generated_resources.go` and the
//! scheme registration in `zz_groupversion_info.go`.

use std::fmt::Write;
use std::path::PathBuf;

use tracing::debug;
use upforge_core::{GenerateError, PackageLayout, ResourceDefinition, TypeGenerator};

use crate::writer::{go_file, go_package_name, write_file};

pub struct GoTypesGenerator {
    root: PathBuf,
    layout: PackageLayout,
}

impl GoTypesGenerator {
    pub fn new(root: impl Into<PathBuf>, layout: PackageLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }
}

impl TypeGenerator for GoTypesGenerator {
    fn generate(
        &mut self,
        group: &str,
        version: &str,
        resources: &[&ResourceDefinition],
    ) -> Result<String, GenerateError> {
        let dir = self.layout.api_dir(&self.root, group, version);
        let package = go_package_name(version);

        for resource in resources {
            let file = dir.join(format!("zz_{}_types.go", resource.kind.to_lowercase()));
            write_file(&file, &render_resource_types(&package, version, resource)?)?;
        }
        write_file(
            &dir.join("zz_generated_resources.go"),
            &render_resource_accessors(&package, resources)?,
        )?;
        write_file(
            &dir.join("zz_groupversion_info.go"),
            &render_group_version_info(&package, group, version, resources)?,
        )?;

        debug!(group = %group, version = %version, resources = resources.len(), "Generated API types");
        Ok(self.layout.api_package(group, version))
    }
}

fn render_resource_types(
    package: &str,
    version: &str,
    resource: &ResourceDefinition,
) -> Result<String, GenerateError> {
    let kind = &resource.kind;
    let mut out = go_file(package);
    writeln!(out)?;
    writeln!(out, "import (")?;
    writeln!(out, "\tmetav1 \"k8s.io/apimachinery/pkg/apis/meta/v1\"")?;
    writeln!(out, ")")?;
    writeln!(out)?;
    writeln!(out, "// {}Parameters are the configurable fields of a {}.", kind, kind)?;
    writeln!(out, "type {}Parameters struct{{}}", kind)?;
    writeln!(out)?;
    writeln!(out, "// {}Observation are the observable fields of a {}.", kind, kind)?;
    writeln!(out, "type {}Observation struct{{}}", kind)?;
    writeln!(out)?;
    writeln!(out, "// {}Spec defines the desired state of {}", kind, kind)?;
    writeln!(out, "type {}Spec struct {{", kind)?;
    writeln!(out, "\tForProvider {}Parameters `json:\"forProvider\"`", kind)?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "// {}Status defines the observed state of {}.", kind, kind)?;
    writeln!(out, "type {}Status struct {{", kind)?;
    writeln!(out, "\tAtProvider {}Observation `json:\"atProvider,omitempty\"`", kind)?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "// +kubebuilder:object:root=true")?;
    if resource.crd_hub_version() == version {
        writeln!(out, "// +kubebuilder:storageversion")?;
    }
    writeln!(out)?;
    writeln!(out, "// {} is the Schema for the {}s API.", kind, kind)?;
    writeln!(out, "type {} struct {{", kind)?;
    writeln!(out, "\tmetav1.TypeMeta   `json:\",inline\"`")?;
    writeln!(out, "\tmetav1.ObjectMeta `json:\"metadata,omitempty\"`")?;
    writeln!(out, "\tSpec   {}Spec   `json:\"spec\"`", kind)?;
    writeln!(out, "\tStatus {}Status `json:\"status,omitempty\"`", kind)?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "// +kubebuilder:object:root=true")?;
    writeln!(out)?;
    writeln!(out, "// {}List contains a list of {}s", kind, kind)?;
    writeln!(out, "type {}List struct {{", kind)?;
    writeln!(out, "\tmetav1.TypeMeta `json:\",inline\"`")?;
    writeln!(out, "\tmetav1.ListMeta `json:\"metadata,omitempty\"`")?;
    writeln!(out, "\tItems []{} `json:\"items\"`", kind)?;
    writeln!(out, "}}")?;
    Ok(out)
}

fn render_resource_accessors(
    package: &str,
    resources: &[&ResourceDefinition],
) -> Result<String, GenerateError> {
    let mut out = go_file(package);
    for resource in resources {
        writeln!(out)?;
        writeln!(
            out,
            "// GetTerraformResourceType returns the upstream resource type for this {}",
            resource.kind
        )?;
        writeln!(out, "func (mg *{}) GetTerraformResourceType() string {{", resource.kind)?;
        writeln!(out, "\treturn {:?}", resource.terraform_resource_type())?;
        writeln!(out, "}}")?;
    }
    Ok(out)
}

fn render_group_version_info(
    package: &str,
    group: &str,
    version: &str,
    resources: &[&ResourceDefinition],
) -> Result<String, GenerateError> {
    let mut out = String::new();
    writeln!(out, "{}", crate::GENERATED_HEADER)?;
    writeln!(out)?;
    writeln!(out, "// +kubebuilder:object:generate=true")?;
    writeln!(out, "// +groupName={}", group)?;
    writeln!(out, "// +versionName={}", version)?;
    writeln!(out, "package {}", package)?;
    writeln!(out)?;
    writeln!(out, "import (")?;
    writeln!(out, "\t\"k8s.io/apimachinery/pkg/runtime/schema\"")?;
    writeln!(out, "\t\"sigs.k8s.io/controller-runtime/pkg/scheme\"")?;
    writeln!(out, ")")?;
    writeln!(out)?;
    writeln!(out, "// Package type metadata.")?;
    writeln!(out, "const (")?;
    writeln!(out, "\tCRDGroup   = {:?}", group)?;
    writeln!(out, "\tCRDVersion = {:?}", version)?;
    writeln!(out, ")")?;
    writeln!(out)?;
    writeln!(out, "var (")?;
    writeln!(out, "\t// CRDGroupVersion is the API Group Version used to register the objects")?;
    writeln!(out, "\tCRDGroupVersion = schema.GroupVersion{{Group: CRDGroup, Version: CRDVersion}}")?;
    writeln!(out)?;
    writeln!(out, "\t// SchemeBuilder is used to add go types to the GroupVersionKind scheme")?;
    writeln!(out, "\tSchemeBuilder = &scheme.Builder{{GroupVersion: CRDGroupVersion}}")?;
    writeln!(out)?;
    writeln!(out, "\t// AddToScheme adds the types in this group-version to the given scheme.")?;
    writeln!(out, "\tAddToScheme = SchemeBuilder.AddToScheme")?;
    writeln!(out, ")")?;
    writeln!(out)?;
    writeln!(out, "func init() {{")?;
    for resource in resources {
        writeln!(
            out,
            "\tSchemeBuilder.Register(&{}{{}}, &{}List{{}})",
            resource.kind, resource.kind
        )?;
    }
    writeln!(out, "}}")?;
    Ok(out)
}
