//! `nixbom generate` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use nixbom_core::config::NixbomConfig;
use nixbom_sbom_builder::{
    BuildReport, BuildRequest, JsonInventoryFile, SbomBuilder, SbomBuilderConfig,
};

use crate::cli::GenerateArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `generate` command.
///
/// Loads the configuration (falling back to defaults when the file is absent),
/// applies CLI overrides and runs the blocking build pipeline off the async runtime.
pub async fn execute(
    args: GenerateArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = NixbomConfig::load_or_default(config_path).await?;
    let builder_config = builder_config(&config, &args)?;

    info!(
        inventory = %args.inventory.display(),
        target = %args.target,
        meta = ?args.meta,
        "generating sbom"
    );

    let inventory_path = args.inventory.display().to_string();
    let inventory = JsonInventoryFile::new(&args.inventory, builder_config.max_input_size);
    let request = build_request(args);

    let build = tokio::task::spawn_blocking(move || {
        SbomBuilder::new(builder_config).run(&inventory, &request)
    })
    .await
    .map_err(|e| CliError::Command(format!("spawn_blocking failed: {e}")))??;

    let report = GenerateReport {
        inventory: inventory_path,
        build,
    };
    writer.render(&report)?;

    Ok(())
}

/// Derive the builder configuration from `[sbom]` plus CLI flags.
fn builder_config(
    config: &NixbomConfig,
    args: &GenerateArgs,
) -> Result<SbomBuilderConfig, CliError> {
    let mut builder_config = SbomBuilderConfig::from_core(&config.sbom);
    if args.strict_root {
        builder_config.strict_root = true;
    }
    builder_config.validate()?;
    Ok(builder_config)
}

fn build_request(args: GenerateArgs) -> BuildRequest {
    BuildRequest {
        target: args.target,
        meta_path: args.meta,
        cdx_path: args.cdx,
        csv_path: args.csv,
    }
}

/// Summary of one `generate` run.
#[derive(Serialize)]
pub struct GenerateReport {
    /// Inventory file path
    pub inventory: String,
    #[serde(flatten)]
    pub build: BuildReport,
}

impl Render for GenerateReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let build = &self.build;
        writeln!(w, "SBOM: {}", build.target.bold())?;
        writeln!(w, "  Serial:      {}", build.serial_number)?;
        writeln!(w, "  Inventory:   {} records ({})", build.inventory_records, self.inventory)?;
        match build.catalog_entries {
            Some(entries) => writeln!(w, "  Meta info:   {entries} entries")?,
            None => writeln!(w, "  Meta info:   {}", "none".dimmed())?,
        }
        writeln!(
            w,
            "  Components:  {} ({} duplicate rows dropped)",
            build.emitted_components, build.duplicates_dropped
        )?;
        if build.root_found {
            writeln!(w, "  Root:        {}", "found".green())?;
        } else {
            writeln!(w, "  Root:        {}", "not found".yellow().bold())?;
        }

        if !build.outputs.is_empty() {
            writeln!(w)?;
            for output in &build.outputs {
                writeln!(w, "  {:<10} {}", output.kind.to_string(), output.path.display())?;
            }
        }

        Ok(())
    }
}
