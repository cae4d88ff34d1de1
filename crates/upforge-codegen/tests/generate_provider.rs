//! End-to-end generation of a small provider with the Go emitters

use std::path::Path;

use pretty_assertions::assert_eq;
use upforge_codegen::{
    GoControllerGenerator, GoConversionGenerator, GoProviderGenerator, GoRegisterGenerator,
    GoTypesGenerator, ManifestExampleGenerator, NoopFormatter,
};
use upforge_core::{Collaborators, Pipeline, ProviderConfig, RunSummary};

const CONFIG: &str = r#"
root_group = "aws.upbound.io"
short_name = "aws"
module_path = "github.com/upbound/provider-aws"
features_package = "internal/features"

[base_packages]
api_version = ["apis/v1beta1"]
controller = ["internal/controller/providerconfig"]

[[resources]]
name = "aws_vpc"
short_group = "ec2"
version = "v1beta1"
kind = "VPC"
hub_version = "v1beta1"

[[resources]]
name = "aws_vpc_v1beta2"
short_group = "ec2"
version = "v1beta2"
kind = "VPC"
hub_version = "v1beta1"
controller_reconcile_version = "v1beta1"

[[resources]]
name = "aws_s3_bucket"
short_group = "s3"
version = "v1beta1"
kind = "Bucket"
"#;

fn generate(config: &ProviderConfig, root: &Path) -> RunSummary {
    let layout = config.layout();
    let mut types = GoTypesGenerator::new(root, layout.clone());
    let mut controllers = GoControllerGenerator::new(root, layout.clone());
    let mut conversions = GoConversionGenerator::new(root, layout.clone());
    let mut examples = ManifestExampleGenerator::new(root);
    let mut registration = GoRegisterGenerator::new(root);
    let mut provider = GoProviderGenerator::new(root, layout);

    Pipeline::new(config, root)
        .run(Collaborators {
            types: &mut types,
            controllers: &mut controllers,
            conversions: &mut conversions,
            examples: &mut examples,
            registration: &mut registration,
            provider: &mut provider,
            formatter: &NoopFormatter,
        })
        .expect("pipeline run")
}

fn read(root: &Path, rel: &str) -> String {
    std::fs::read_to_string(root.join(rel)).unwrap_or_else(|e| panic!("{}: {}", rel, e))
}

#[test]
fn test_generates_full_provider_tree() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let config = ProviderConfig::from_toml_str(CONFIG).unwrap();

    let summary = generate(&config, root);
    assert_eq!(summary.resources, 3);
    assert_eq!(summary.groups, 2);
    assert_eq!(summary.versions, 3);

    for rel in [
        "apis/ec2/v1beta1/zz_vpc_types.go",
        "apis/ec2/v1beta1/zz_groupversion_info.go",
        "apis/ec2/v1beta1/zz_generated.conversion_hubs.go",
        "apis/ec2/v1beta2/zz_vpc_types.go",
        "apis/ec2/v1beta2/zz_generated.conversion_spokes.go",
        "apis/s3/v1beta1/zz_bucket_types.go",
        "apis/zz_register.go",
        "internal/controller/ec2/vpc/zz_controller.go",
        "internal/controller/s3/bucket/zz_controller.go",
        "internal/controller/zz_ec2_setup.go",
        "internal/controller/zz_s3_setup.go",
        "internal/controller/zz_config_setup.go",
        "internal/controller/zz_monolith_setup.go",
        "examples-generated/ec2/v1beta1/aws-vpc.yaml",
        "examples-generated/ec2/v1beta2/aws-vpc-v1beta2.yaml",
        "examples-generated/s3/v1beta1/aws-s3-bucket.yaml",
    ] {
        assert!(root.join(rel).is_file(), "missing {}", rel);
    }
    assert!(!root
        .join("apis/ec2/v1beta2/zz_generated.conversion_hubs.go")
        .exists());
    assert!(!root.join("cmd").exists());
}

#[test]
fn test_override_version_controller_watches_hub_package() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProviderConfig::from_toml_str(CONFIG).unwrap();
    generate(&config, dir.path());

    // Both VPC versions share one controller; the v1beta2 pass wrote it last.
    let controller = read(dir.path(), "internal/controller/ec2/vpc/zz_controller.go");
    assert!(controller.contains("\tv1 \"github.com/upbound/provider-aws/apis/ec2/v1beta1\""));
    assert!(controller.contains("\t_ \"github.com/upbound/provider-aws/internal/features\""));

    let setup = read(dir.path(), "internal/controller/zz_ec2_setup.go");
    assert_eq!(setup.matches(".Setup,").count(), 1);
}

#[test]
fn test_registration_lists_each_package_once() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProviderConfig::from_toml_str(CONFIG).unwrap();
    let summary = generate(&config, dir.path());
    assert!(summary.api_packages.len() > summary.api_packages.unique().len());

    let register = read(dir.path(), "apis/zz_register.go");
    assert_eq!(register.matches("SchemeBuilder.AddToScheme,").count(), 4);
    let base = register
        .find("apisv1beta1.SchemeBuilder")
        .expect("base package registered");
    let ec2 = register
        .find("ec2v1beta1.SchemeBuilder")
        .expect("ec2 package registered");
    assert!(base < ec2);
}

#[test]
fn test_monolith_setup_wires_every_controller() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProviderConfig::from_toml_str(CONFIG).unwrap();
    let summary = generate(&config, dir.path());

    assert_eq!(summary.controller_packages.monolith().len(), 3);
    let monolith = read(dir.path(), "internal/controller/zz_monolith_setup.go");
    assert!(monolith.contains("func Setup(mgr ctrl.Manager) error {"));
    for alias in ["controllerproviderconfig", "ec2vpc", "s3bucket"] {
        assert!(
            monolith.contains(&format!("\t\t{}.Setup,", alias)),
            "monolith missing {}",
            alias
        );
    }
}

#[test]
fn test_examples_are_stored_as_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let config = ProviderConfig::from_toml_str(CONFIG).unwrap();
    generate(&config, dir.path());

    let example: serde_yaml::Value =
        serde_yaml::from_str(&read(dir.path(), "examples-generated/s3/v1beta1/aws-s3-bucket.yaml"))
            .unwrap();
    assert_eq!(example["apiVersion"].as_str(), Some("s3.aws.upbound.io/v1beta1"));
    assert_eq!(example["kind"].as_str(), Some("Bucket"));
}
