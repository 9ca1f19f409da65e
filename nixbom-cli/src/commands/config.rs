//! `nixbom config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use nixbom_core::config::NixbomConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Execute the config validate subcommand.
///
/// Unlike `generate`, a missing file is reported as invalid.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails (missing file, invalid values, parse errors).
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = match NixbomConfig::load(config_path).await {
        Ok(_) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Execute the config show subcommand.
///
/// Displays the effective configuration (file + env overrides + defaults).
async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = NixbomConfig::load_or_default(config_path).await?;
    let report = build_config_report(&config, config_path, section.as_deref())?;
    writer.render(&report)?;

    Ok(())
}

fn build_config_report(
    config: &NixbomConfig,
    config_path: &Path,
    section: Option<&str>,
) -> Result<ConfigReport, CliError> {
    let (config_toml, config_json) = match section {
        None => section_views(config)?,
        Some("general") => section_views(&config.general)?,
        Some("sbom") => section_views(&config.sbom)?,
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {other} (expected: general, sbom)"
            )));
        }
    };

    Ok(ConfigReport {
        source: config_path.display().to_string(),
        section: section.map(str::to_owned),
        config: config_json,
        config_toml,
    })
}

/// TOML text for `--output text`, JSON value for `--output json`.
fn section_views<T: Serialize>(value: &T) -> Result<(String, serde_json::Value), CliError> {
    Ok((toml::to_string_pretty(value)?, serde_json::to_value(value)?))
}

/// Configuration display report.
///
/// Text output prints `config_toml`; JSON output carries the same values in `config`.
#[derive(Debug, Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Effective configuration values
    pub config: serde_json::Value,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_full_config() {
        let report =
            build_config_report(&NixbomConfig::default(), Path::new("nixbom.toml"), None).unwrap();
        assert!(report.section.is_none());
        assert!(report.config_toml.contains("[general]"));
        assert!(report.config_toml.contains("[sbom]"));
        assert!(report.config_toml.contains("license_source = \"short\""));
    }

    #[test]
    fn test_show_sbom_section() {
        let report = build_config_report(
            &NixbomConfig::default(),
            Path::new("nixbom.toml"),
            Some("sbom"),
        )
        .unwrap();
        assert_eq!(report.section.as_deref(), Some("sbom"));
        assert!(report.config_toml.contains("strict_root = false"));
        assert!(!report.config_toml.contains("log_level"));
    }

    #[test]
    fn test_show_unknown_section() {
        let err = build_config_report(
            &NixbomConfig::default(),
            Path::new("nixbom.toml"),
            Some("network"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown section: network"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_validation_report_rendering() {
        colored::control::set_override(false);
        let report = ConfigValidationReport {
            source: "nixbom.toml".to_owned(),
            valid: false,
            errors: vec!["invalid config value for 'sbom.license_source'".to_owned()],
        };
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("INVALID"));
        assert!(output.contains("sbom.license_source"));
    }

    #[test]
    fn test_config_report_json_skips_toml() {
        let report = ConfigReport {
            source: "nixbom.toml".to_owned(),
            section: None,
            config: serde_json::json!({}),
            config_toml: "[general]".to_owned(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["source"], "nixbom.toml");
        assert!(json.get("config_toml").is_none());
        assert!(json.get("section").is_none());
    }

    #[test]
    fn test_show_json_output_carries_values() {
        let mut config = NixbomConfig::default();
        config.sbom.license_source = "spdx".to_owned();
        config.sbom.strict_root = true;
        let report = build_config_report(&config, Path::new("nixbom.toml"), Some("sbom")).unwrap();

        let writer = OutputWriter::new(crate::cli::OutputFormat::Json);
        let mut buffer = Vec::new();
        writer.render_to(&report, &mut buffer).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(json["section"], "sbom");
        assert_eq!(json["config"]["license_source"], "spdx");
        assert_eq!(json["config"]["strict_root"], true);
        assert!(json["config"].get("log_level").is_none());
    }

    #[test]
    fn test_show_full_config_json_has_both_sections() {
        let report =
            build_config_report(&NixbomConfig::default(), Path::new("nixbom.toml"), None).unwrap();
        assert_eq!(report.config["general"]["log_format"], "pretty");
        assert_eq!(report.config["sbom"]["tool_name"], "nixbom");
    }
}
