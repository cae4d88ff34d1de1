//! Package path arithmetic shared by the pipeline and the emitters
//!
//! Package locations are Go import paths, so they are always joined with
//! `/` regardless of the host platform. Output directories are host paths.

use std::path::{Path, PathBuf};

/// Effective API group for a short group under the provider's root group.
///
/// An empty short group means the resource lives in the root group itself.
pub fn group_name(short_group: &str, root_group: &str) -> String {
    if short_group.is_empty() {
        root_group.to_string()
    } else {
        format!("{}.{}", short_group.to_lowercase(), root_group)
    }
}

/// First dot-separated label of a group (`ec2.aws.upbound.io` -> `ec2`)
pub fn short_group_of(group: &str) -> &str {
    group.split('.').next().unwrap_or(group)
}

/// Join import path segments, dropping empty segments and duplicate slashes
pub fn join_package<'a>(base: &'a str, parts: impl IntoIterator<Item = &'a str>) -> String {
    let absolute = base.starts_with('/');
    let joined = std::iter::once(base)
        .chain(parts)
        .flat_map(|part| part.split('/'))
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Where generated packages live, relative to the provider's Go module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    module_path: String,
}

impl PackageLayout {
    pub fn new(module_path: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
        }
    }

    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    /// Resolve a module-relative package (e.g. `apis/v1beta1`)
    pub fn package(&self, relative: &str) -> String {
        join_package(&self.module_path, [relative])
    }

    /// `<module>/apis/<short group>`
    pub fn api_group_base(&self, group: &str) -> String {
        join_package(
            &self.module_path,
            ["apis", &short_group_of(group).to_lowercase()],
        )
    }

    /// `<module>/apis/<short group>/<version>`
    pub fn api_package(&self, group: &str, version: &str) -> String {
        join_package(&self.api_group_base(group), [version])
    }

    /// `<module>/internal/controller/<short group>/<lowercase kind>`
    pub fn controller_package(&self, group: &str, kind: &str) -> String {
        join_package(
            &self.module_path,
            [
                "internal",
                "controller",
                &short_group_of(group).to_lowercase(),
                &kind.to_lowercase(),
            ],
        )
    }

    pub fn api_dir(&self, root: &Path, group: &str, version: &str) -> PathBuf {
        root.join("apis")
            .join(short_group_of(group).to_lowercase())
            .join(version)
    }

    pub fn controller_dir(&self, root: &Path, group: &str, kind: &str) -> PathBuf {
        root.join("internal")
            .join("controller")
            .join(short_group_of(group).to_lowercase())
            .join(kind.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_name() {
        assert_eq!(group_name("", "aws.upbound.io"), "aws.upbound.io");
        assert_eq!(group_name("ec2", "aws.upbound.io"), "ec2.aws.upbound.io");
        assert_eq!(group_name("EC2", "aws.upbound.io"), "ec2.aws.upbound.io");
    }

    #[test]
    fn test_short_group_of() {
        assert_eq!(short_group_of("ec2.aws.upbound.io"), "ec2");
        assert_eq!(short_group_of("aws"), "aws");
        assert_eq!(short_group_of(""), "");
    }

    #[test]
    fn test_join_package_cleans_segments() {
        assert_eq!(
            join_package("github.com/upbound/provider-aws/", ["/apis//v1beta1/"]),
            "github.com/upbound/provider-aws/apis/v1beta1"
        );
        assert_eq!(join_package("/abs", ["./x"]), "/abs/x");
    }

    #[test]
    fn test_layout_packages() {
        let layout = PackageLayout::new("github.com/upbound/provider-aws");
        assert_eq!(
            layout.api_package("ec2.aws.upbound.io", "v1beta1"),
            "github.com/upbound/provider-aws/apis/ec2/v1beta1"
        );
        assert_eq!(
            layout.controller_package("ec2.aws.upbound.io", "VPC"),
            "github.com/upbound/provider-aws/internal/controller/ec2/vpc"
        );
        // root group resources land under the root group's first label
        assert_eq!(
            layout.api_package("aws.upbound.io", "v1beta1"),
            "github.com/upbound/provider-aws/apis/aws/v1beta1"
        );
        assert_eq!(
            layout.api_dir(Path::new("/out"), "ec2.aws.upbound.io", "v1beta1"),
            PathBuf::from("/out/apis/ec2/v1beta1")
        );
    }
}
