//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// nixbom -- CycloneDX SBOM generator for Nix store closures.
///
/// Use `nixbom <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "nixbom", version, about, long_about = None)]
pub struct Cli {
    /// Path to the nixbom.toml configuration file.
    #[arg(short, long, default_value = "nixbom.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a CycloneDX SBOM and/or CSV for a store path.
    Generate(GenerateArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- generate ----

/// Merge a package inventory with optional nixpkgs meta info and write the SBOM.
#[derive(Args, Debug)]
#[command(group(
    clap::ArgGroup::new("outputs")
        .required(true)
        .multiple(true)
        .args(["cdx", "csv"])
))]
pub struct GenerateArgs {
    /// JSON inventory file (array of {store_path, name, pname, version, cpe}).
    #[arg(short, long)]
    pub inventory: PathBuf,

    /// Store path of the build target; becomes metadata.component.
    #[arg(short, long)]
    pub target: String,

    /// nixpkgs meta JSON (`nix-env -qa --meta --json`).
    #[arg(short, long)]
    pub meta: Option<PathBuf>,

    /// Write the CycloneDX JSON document to this path.
    #[arg(long)]
    pub cdx: Option<PathBuf>,

    /// Write the merged component table as CSV to this path.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Fail when the target store path is not in the inventory.
    #[arg(long)]
    pub strict_root: bool,
}

// ---- config ----

/// Manage nixbom configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, sbom).
        #[arg(long)]
        section: Option<String>,
    },
}
