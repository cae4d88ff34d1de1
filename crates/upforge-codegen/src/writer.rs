use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;
use upforge_core::GenerateError;

use crate::GENERATED_HEADER;

/// Write a generated file, creating its parent directories
pub(crate) fn write_file(path: &Path, contents: &str) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    debug!(path = %path.display(), bytes = contents.len(), "Wrote generated file");
    Ok(())
}

/// Header and package clause of a generated Go file
pub(crate) fn go_file(package: &str) -> String {
    format!("{}\n\npackage {}\n", GENERATED_HEADER, package)
}

/// Go package name for a directory name (`v1beta1`, `vpc`)
pub(crate) fn go_package_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect::<String>()
        .to_lowercase();
    match sanitized.chars().next() {
        Some(c) if c.is_ascii_digit() => format!("p{}", sanitized),
        Some(_) => sanitized,
        None => "generated".to_string(),
    }
}

/// Unique import alias built from the last two segments of `package`
pub(crate) fn import_alias(package: &str, taken: &mut BTreeSet<String>) -> String {
    let segments: Vec<&str> = package.rsplit('/').take(2).collect();
    let base = go_package_name(
        &segments
            .iter()
            .rev()
            .copied()
            .collect::<Vec<_>>()
            .join(""),
    );
    let mut alias = base.clone();
    let mut suffix = 1;
    while !taken.insert(alias.clone()) {
        suffix += 1;
        alias = format!("{}{}", base, suffix);
    }
    alias
}
