//! Controller emitter

use std::fmt::Write;
use std::path::PathBuf;

use upforge_core::{ControllerGenerator, GenerateError, PackageLayout, ResourceDefinition};

use crate::writer::{go_file, go_package_name, write_file};

/// Writes `internal/controller/<short group>/<kind>/zz_controller.go`
pub struct GoControllerGenerator {
    root: PathBuf,
    layout: PackageLayout,
}

impl GoControllerGenerator {
    pub fn new(root: impl Into<PathBuf>, layout: PackageLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }
}

impl ControllerGenerator for GoControllerGenerator {
    fn generate(
        &mut self,
        group: &str,
        resource: &ResourceDefinition,
        watch_package: &str,
        features_package: Option<&str>,
    ) -> Result<String, GenerateError> {
        if watch_package.is_empty() {
            return Err(GenerateError::MissingPackage(format!(
                "no API package to watch for resource {}",
                resource.name
            )));
        }
        let dir = self.layout.controller_dir(&self.root, group, &resource.kind);
        let package = go_package_name(&resource.kind);

        let mut out = go_file(&package);
        writeln!(out)?;
        writeln!(out, "import (")?;
        writeln!(out, "\tctrl \"sigs.k8s.io/controller-runtime\"")?;
        writeln!(out)?;
        writeln!(out, "\tv1 {:?}", watch_package)?;
        if let Some(features) = features_package {
            writeln!(out, "\t_ {:?}", features)?;
        }
        writeln!(out, ")")?;
        writeln!(out)?;
        writeln!(
            out,
            "// Setup adds a controller that reconciles {} managed resources.",
            resource.kind
        )?;
        writeln!(out, "func Setup(mgr ctrl.Manager) error {{")?;
        writeln!(
            out,
            "\tname := \"managed/{}.{}\"",
            resource.kind.to_lowercase(),
            group
        )?;
        writeln!(out, "\treturn ctrl.NewControllerManagedBy(mgr).")?;
        writeln!(out, "\t\tNamed(name).")?;
        writeln!(out, "\t\tFor(&v1.{}{{}}).", resource.kind)?;
        writeln!(out, "\t\tComplete(nil)")?;
        writeln!(out, "}}")?;
        write_file(&dir.join("zz_controller.go"), &out)?;

        Ok(self.layout.controller_package(group, &resource.kind))
    }
}
