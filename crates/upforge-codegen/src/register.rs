//! Scheme registration emitter

use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::PathBuf;

use upforge_core::{ApiVersionPackages, GenerateError, RegistrationGenerator};

use crate::writer::{import_alias, write_file};

/// Writes `apis/zz_register.go`, registering every API version package
/// once, in first-seen order
pub struct GoRegisterGenerator {
    root: PathBuf,
}

impl GoRegisterGenerator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl RegistrationGenerator for GoRegisterGenerator {
    fn generate(&mut self, packages: &ApiVersionPackages) -> Result<(), GenerateError> {
        let mut taken = BTreeSet::new();
        let imports: Vec<(String, &str)> = packages
            .unique()
            .into_iter()
            .map(|package| (import_alias(package, &mut taken), package))
            .collect();

        let mut out = String::new();
        writeln!(out, "{}", crate::GENERATED_HEADER)?;
        writeln!(out)?;
        writeln!(out, "// Package apis contains Kubernetes API for the provider.")?;
        writeln!(out, "package apis")?;
        writeln!(out)?;
        writeln!(out, "import (")?;
        writeln!(out, "\t\"k8s.io/apimachinery/pkg/runtime\"")?;
        if !imports.is_empty() {
            writeln!(out)?;
        }
        for (alias, package) in &imports {
            writeln!(out, "\t{} {:?}", alias, package)?;
        }
        writeln!(out, ")")?;
        writeln!(out)?;
        writeln!(out, "func init() {{")?;
        writeln!(out, "\t// Register the types with the Scheme so the components can map objects to GroupVersionKinds and back")?;
        writeln!(out, "\tAddToSchemes = append(AddToSchemes,")?;
        for (alias, _) in &imports {
            writeln!(out, "\t\t{}.SchemeBuilder.AddToScheme,", alias)?;
        }
        writeln!(out, "\t)")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        writeln!(out, "// AddToSchemes may be used to add all resources defined in the project to a Scheme")?;
        writeln!(out, "var AddToSchemes runtime.SchemeBuilder")?;
        writeln!(out)?;
        writeln!(out, "// AddToScheme adds all Resources to the Scheme")?;
        writeln!(out, "func AddToScheme(s *runtime.Scheme) error {{")?;
        writeln!(out, "\treturn AddToSchemes.AddToScheme(s)")?;
        writeln!(out, "}}")?;

        write_file(&self.root.join("apis").join("zz_register.go"), &out)
    }
}
