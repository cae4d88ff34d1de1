//! Provider setup emitter
//!
//! Writes one `internal/controller/zz_<key>_setup.go` per controller
//! grouping key. When a main template is configured, it is rendered into
//! `cmd/provider/<key>/zz_main.go` for every key as well. The template may
//! reference `{{ .Group }}` and `{{ .ModulePath }}`.

use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use tracing::info;
use upforge_core::{
    ControllerPackageMap, GenerateError, PackageLayout, ProviderGenerator, MONOLITH_PACKAGE_KEY,
};

use crate::writer::{go_file, go_package_name, import_alias, write_file};

pub struct GoProviderGenerator {
    root: PathBuf,
    layout: PackageLayout,
}

impl GoProviderGenerator {
    pub fn new(root: impl Into<PathBuf>, layout: PackageLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    fn render_setup(&self, key: &str, packages: &[String]) -> Result<String, GenerateError> {
        let mut taken = BTreeSet::new();
        let imports: Vec<(String, &str)> = packages
            .iter()
            .map(|package| (import_alias(package, &mut taken), package.as_str()))
            .collect();

        let mut out = go_file("controller");
        writeln!(out)?;
        writeln!(out, "import (")?;
        writeln!(out, "\tctrl \"sigs.k8s.io/controller-runtime\"")?;
        if !imports.is_empty() {
            writeln!(out)?;
        }
        for (alias, package) in &imports {
            writeln!(out, "\t{} {:?}", alias, package)?;
        }
        writeln!(out, ")")?;
        writeln!(out)?;
        let func = setup_func_name(key);
        writeln!(
            out,
            "// {} creates all controllers with the supplied logger and adds them to",
            func
        )?;
        writeln!(out, "// the supplied manager.")?;
        writeln!(out, "func {}(mgr ctrl.Manager) error {{", func)?;
        writeln!(out, "\tfor _, setup := range []func(ctrl.Manager) error{{")?;
        for (alias, _) in &imports {
            writeln!(out, "\t\t{}.Setup,", alias)?;
        }
        writeln!(out, "\t}} {{")?;
        writeln!(out, "\t\tif err := setup(mgr); err != nil {{")?;
        writeln!(out, "\t\t\treturn err")?;
        writeln!(out, "\t\t}}")?;
        writeln!(out, "\t}}")?;
        writeln!(out, "\treturn nil")?;
        writeln!(out, "}}")?;
        Ok(out)
    }

    fn render_main(&self, template: &str, key: &str) -> String {
        template
            .replace("{{ .Group }}", key)
            .replace("{{ .ModulePath }}", self.layout.module_path())
    }
}

/// The monolith key gets the plain `Setup`, every other key `Setup_<key>`
fn setup_func_name(key: &str) -> String {
    if key == MONOLITH_PACKAGE_KEY {
        "Setup".to_string()
    } else {
        format!("Setup_{}", go_package_name(key))
    }
}

impl ProviderGenerator for GoProviderGenerator {
    fn generate(
        &mut self,
        controllers: &ControllerPackageMap,
        main_template: Option<&Path>,
    ) -> Result<(), GenerateError> {
        let controller_dir = self.root.join("internal").join("controller");
        for (key, packages) in controllers.iter() {
            let file = controller_dir.join(format!("zz_{}_setup.go", go_package_name(key)));
            write_file(&file, &self.render_setup(key, packages)?)?;
        }

        if let Some(template_path) = main_template {
            let template = std::fs::read_to_string(template_path).map_err(|e| {
                GenerateError::Template(format!(
                    "cannot read main template {}: {}",
                    template_path.display(),
                    e
                ))
            })?;
            for key in controllers.keys() {
                let file = self
                    .root
                    .join("cmd")
                    .join("provider")
                    .join(go_package_name(key))
                    .join("zz_main.go");
                write_file(&file, &self.render_main(&template, key))?;
            }
        }

        info!(keys = controllers.len(), "Generated provider setup");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upforge_core::ControllerPackageAggregator;

    fn controllers() -> ControllerPackageMap {
        let mut aggregator = ControllerPackageAggregator::new();
        aggregator.seed_legacy_controllers(
            &PackageLayout::new("m"),
            &["internal/controller/providerconfig".to_string()],
        );
        aggregator.add_resource_controller("ec2", "m/internal/controller/ec2/vpc");
        aggregator.finish()
    }

    #[test]
    fn test_setup_file_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = GoProviderGenerator::new(dir.path(), PackageLayout::new("m"));
        generator.generate(&controllers(), None).unwrap();

        let controller_dir = dir.path().join("internal/controller");
        let ec2 = std::fs::read_to_string(controller_dir.join("zz_ec2_setup.go")).unwrap();
        assert!(ec2.contains("func Setup_ec2(mgr ctrl.Manager) error {"));
        assert!(ec2.contains("\t\tec2vpc.Setup,"));

        let monolith =
            std::fs::read_to_string(controller_dir.join("zz_monolith_setup.go")).unwrap();
        assert!(monolith.contains("func Setup(mgr ctrl.Manager) error {"));
        assert!(monolith.contains("controllerproviderconfig.Setup,"));
        assert!(monolith.contains("ec2vpc.Setup,"));
        assert!(controller_dir.join("zz_config_setup.go").exists());
        assert!(!dir.path().join("cmd").exists());
    }

    #[test]
    fn test_main_template_is_rendered_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("main.go.tmpl");
        std::fs::write(
            &template,
            "package main\n\n// group {{ .Group }} of {{ .ModulePath }}\n",
        )
        .unwrap();

        let mut generator = GoProviderGenerator::new(dir.path(), PackageLayout::new("m"));
        generator.generate(&controllers(), Some(&template)).unwrap();

        let main = std::fs::read_to_string(dir.path().join("cmd/provider/ec2/zz_main.go")).unwrap();
        assert_eq!(main, "package main\n\n// group ec2 of m\n");
        assert!(dir.path().join("cmd/provider/monolith/zz_main.go").exists());
    }

    #[test]
    fn test_missing_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = GoProviderGenerator::new(dir.path(), PackageLayout::new("m"));
        let err = generator
            .generate(&controllers(), Some(Path::new("/nonexistent/main.go.tmpl")))
            .unwrap_err();
        assert!(matches!(err, GenerateError::Template(_)));
    }
}
