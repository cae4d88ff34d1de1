//! Library interface for the upforge CLI

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use upforge_codegen::{
    GoControllerGenerator, GoConversionGenerator, GoImportsFormatter, GoProviderGenerator,
    GoRegisterGenerator, GoTypesGenerator, ManifestExampleGenerator, NoopFormatter,
};
use upforge_core::{Collaborators, Formatter, Pipeline, PipelinePlan, ProviderConfig, RunSummary};

/// Generate a provider below `output` from the config at `config_path`
pub fn run_generate(config_path: &Path, output: &Path, skip_format: bool) -> Result<RunSummary> {
    let config = ProviderConfig::load(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory {}", output.display()))?;

    let layout = config.layout();
    let mut types = GoTypesGenerator::new(output, layout.clone());
    let mut controllers = GoControllerGenerator::new(output, layout.clone());
    let mut conversions = GoConversionGenerator::new(output, layout.clone());
    let mut examples = ManifestExampleGenerator::new(output);
    let mut registration = GoRegisterGenerator::new(output);
    let mut provider = GoProviderGenerator::new(output, layout);
    let goimports = GoImportsFormatter::new();
    let formatter: &dyn Formatter = if skip_format {
        &NoopFormatter
    } else {
        &goimports
    };

    let pipeline = Pipeline::new(&config, output);
    let summary = pipeline
        .run(Collaborators {
            types: &mut types,
            controllers: &mut controllers,
            conversions: &mut conversions,
            examples: &mut examples,
            registration: &mut registration,
            provider: &mut provider,
            formatter,
        })
        .with_context(|| format!("Failed to generate provider into {}", output.display()))?;

    info!(
        output = %output.display(),
        groups = summary.groups,
        versions = summary.versions,
        "Provider generated"
    );
    Ok(summary)
}

/// Group and classify the configured resources without writing anything
pub fn run_plan(config_path: &Path) -> Result<PipelinePlan> {
    let config = ProviderConfig::load(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    Pipeline::new(&config, ".")
        .plan()
        .context("Failed to plan provider generation")
}
