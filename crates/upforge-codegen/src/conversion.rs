//! Conversion hub and spoke emitter

use std::fmt::Write;
use std::path::PathBuf;

use upforge_core::{
    ConversionGenerator, ConversionNodeKind, GenerateError, PackageLayout, ResourceDefinition,
};

use crate::writer::{go_file, go_package_name, write_file};

pub struct GoConversionGenerator {
    root: PathBuf,
    layout: PackageLayout,
}

impl GoConversionGenerator {
    pub fn new(root: impl Into<PathBuf>, layout: PackageLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }
}

impl ConversionGenerator for GoConversionGenerator {
    fn generate(
        &mut self,
        group: &str,
        version: &str,
        kind: ConversionNodeKind,
        resources: &[&ResourceDefinition],
    ) -> Result<(), GenerateError> {
        let path = self
            .layout
            .api_dir(&self.root, group, version)
            .join(kind.file_name());
        let package = go_package_name(version);
        let source = match kind {
            ConversionNodeKind::Hub => render_hubs(&package, resources)?,
            ConversionNodeKind::Spoke => render_spokes(&package, resources)?,
        };
        write_file(&path, &source)
    }
}

fn render_hubs(package: &str, resources: &[&ResourceDefinition]) -> Result<String, GenerateError> {
    let mut out = go_file(package);
    for resource in resources {
        writeln!(out)?;
        writeln!(out, "// Hub marks this type as a conversion hub.")?;
        writeln!(out, "func (tr *{}) Hub() {{}}", resource.kind)?;
    }
    Ok(out)
}

fn render_spokes(
    package: &str,
    resources: &[&ResourceDefinition],
) -> Result<String, GenerateError> {
    let mut out = go_file(package);
    writeln!(out)?;
    writeln!(out, "import (")?;
    writeln!(out, "\t\"encoding/json\"")?;
    writeln!(out)?;
    writeln!(out, "\t\"sigs.k8s.io/controller-runtime/pkg/conversion\"")?;
    writeln!(out, ")")?;
    for resource in resources {
        let kind = &resource.kind;
        writeln!(out)?;
        writeln!(
            out,
            "// ConvertTo converts this {} to the hub type ({}).",
            kind,
            resource.crd_hub_version()
        )?;
        writeln!(out, "func (tr *{}) ConvertTo(dstRaw conversion.Hub) error {{", kind)?;
        writeln!(out, "\treturn roundTrip(dstRaw, tr)")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "// ConvertFrom converts from the hub type to the {} type.", kind)?;
        writeln!(out, "func (tr *{}) ConvertFrom(srcRaw conversion.Hub) error {{", kind)?;
        writeln!(out, "\treturn roundTrip(tr, srcRaw)")?;
        writeln!(out, "}}")?;
    }
    writeln!(out)?;
    writeln!(out, "func roundTrip(dst, src any) error {{")?;
    writeln!(out, "\tb, err := json.Marshal(src)")?;
    writeln!(out, "\tif err != nil {{")?;
    writeln!(out, "\t\treturn err")?;
    writeln!(out, "\t}}")?;
    writeln!(out, "\treturn json.Unmarshal(b, dst)")?;
    writeln!(out, "}}")?;
    Ok(out)
}
