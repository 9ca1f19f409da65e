//! CLI-specific error types and exit code mapping

use nixbom_core::error::NixbomError;
use nixbom_sbom_builder::SbomBuilderError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// SBOM build failed (bad input, missing root in strict mode).
    #[error("build error: {0}")]
    Build(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// TOML serialisation failed (`config show`).
    #[error("toml output error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from nixbom-core.
    #[error("{0}")]
    Core(#[from] NixbomError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                              |
    /// |------|--------------------------------------|
    /// | 0    | Success                              |
    /// | 1    | General / command error              |
    /// | 2    | Configuration error                  |
    /// | 5    | SBOM build failure                   |
    /// | 10   | IO error                             |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(NixbomError::Config(_)) => 2,
            Self::Build(_) => 5,
            Self::Io(_) | Self::Core(NixbomError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::TomlSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<SbomBuilderError> for CliError {
    fn from(e: SbomBuilderError) -> Self {
        match e {
            SbomBuilderError::Io { path, source } => {
                Self::Io(std::io::Error::new(source.kind(), format!("{path}: {source}")))
            }
            SbomBuilderError::Config { .. } => Self::Config(e.to_string()),
            other => Self::Build(other.to_string()),
        }
    }
}
