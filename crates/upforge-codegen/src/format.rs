//! Post-generation formatting of emitted Go sources

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};
use upforge_core::{FormatError, Formatter};
use walkdir::WalkDir;

/// Runs `goimports -w` over every generated (`zz_` prefixed) Go file
/// below a directory
#[derive(Debug, Clone)]
pub struct GoImportsFormatter {
    program: String,
}

impl Default for GoImportsFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl GoImportsFormatter {
    pub fn new() -> Self {
        Self::with_program("goimports")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn generated_files(dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| is_generated_go_file(entry.path()))
            .map(|entry| entry.into_path())
            .collect()
    }
}

fn is_generated_go_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| {
            let lower = name.to_lowercase();
            lower.starts_with("zz_") && lower.ends_with(".go")
        })
        .unwrap_or(false)
}

impl Formatter for GoImportsFormatter {
    fn format(&self, dir: &Path) -> Result<(), FormatError> {
        if !dir.exists() {
            debug!(dir = %dir.display(), "Nothing to format");
            return Ok(());
        }
        let files = Self::generated_files(dir);
        if files.is_empty() {
            debug!(dir = %dir.display(), "No generated Go files to format");
            return Ok(());
        }

        let output = Command::new(&self.program)
            .arg("-w")
            .args(&files)
            .current_dir(dir)
            .output()
            .map_err(|source| FormatError::Spawn {
                program: self.program.clone(),
                dir: dir.to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(FormatError::Failed {
                program: self.program.clone(),
                dir: dir.to_path_buf(),
                output: combined,
            });
        }

        info!(dir = %dir.display(), files = files.len(), "Formatted generated files");
        Ok(())
    }
}

/// Leaves generated files untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFormatter;

impl Formatter for NoopFormatter {
    fn format(&self, _dir: &Path) -> Result<(), FormatError> {
        Ok(())
    }
}
