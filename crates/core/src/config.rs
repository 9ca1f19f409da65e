//! 설정 관리 -- nixbom.toml 파싱 및 런타임 설정
//!
//! [`NixbomConfig`]는 CLI와 SBOM 빌더가 공유하는 최상위 설정 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`NIXBOM_SBOM_STRICT_ROOT=true` 형식)
//! 3. 설정 파일 (`nixbom.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), nixbom_core::error::NixbomError> {
//! use nixbom_core::config::NixbomConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = NixbomConfig::load("nixbom.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = NixbomConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, NixbomError};

/// 라이선스 출력 소스로 허용되는 값
pub const LICENSE_SOURCES: [&str; 2] = ["short", "spdx"];

/// 허용되는 로그 레벨
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 로그 레벨 값을 검증합니다.
///
/// CLI `--log-level`처럼 설정 파일 밖에서 들어오는 값도 같은 규칙으로 검사합니다.
pub fn validate_log_level(level: &str) -> Result<(), NixbomError> {
    if LOG_LEVELS.contains(&level) {
        return Ok(());
    }
    Err(ConfigError::InvalidValue {
        field: "general.log_level".to_owned(),
        reason: format!("must be one of: {}", LOG_LEVELS.join(", ")),
    }
    .into())
}

/// nixbom 통합 설정
///
/// `nixbom.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NixbomConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// SBOM 빌더 설정
    #[serde(default)]
    pub sbom: SbomConfig,
}

impl NixbomConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증 (오버라이드 이후 한 번만)
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, NixbomError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 파일이 없으면 기본값에서 시작하는 [`load`](Self::load) 변형입니다.
    ///
    /// 파일 이외의 에러(권한, 파싱 실패)는 그대로 전파합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, NixbomError> {
        let path = path.as_ref();
        let mut config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(NixbomError::Config(ConfigError::FileNotFound { .. })) => {
                debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드, 검증 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, NixbomError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                NixbomError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                NixbomError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, NixbomError> {
        toml::from_str(toml_str).map_err(|e| {
            NixbomError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `NIXBOM_{SECTION}_{FIELD}`
    /// 예: `NIXBOM_SBOM_LICENSE_SOURCE=spdx`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "NIXBOM_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "NIXBOM_GENERAL_LOG_FORMAT");

        // SBOM
        override_string(&mut self.sbom.tool_vendor, "NIXBOM_SBOM_TOOL_VENDOR");
        override_string(&mut self.sbom.tool_name, "NIXBOM_SBOM_TOOL_NAME");
        override_string(
            &mut self.sbom.license_source,
            "NIXBOM_SBOM_LICENSE_SOURCE",
        );
        override_bool(&mut self.sbom.strict_root, "NIXBOM_SBOM_STRICT_ROOT");
        override_string(
            &mut self.sbom.catalog_dump_path,
            "NIXBOM_SBOM_CATALOG_DUMP_PATH",
        );
        override_u64(&mut self.sbom.max_input_size, "NIXBOM_SBOM_MAX_INPUT_SIZE");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), NixbomError> {
        validate_log_level(&self.general.log_level)?;

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if !LICENSE_SOURCES.contains(&self.sbom.license_source.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "sbom.license_source".to_owned(),
                reason: format!("must be one of: {}", LICENSE_SOURCES.join(", ")),
            }
            .into());
        }

        if self.sbom.tool_name.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sbom.tool_name".to_owned(),
                reason: "tool name must not be empty".to_owned(),
            }
            .into());
        }

        if self.sbom.max_input_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sbom.max_input_size".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// SBOM 빌더 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SbomConfig {
    /// 문서 `metadata.tools[].vendor`
    pub tool_vendor: String,
    /// 문서 `metadata.tools[].name`
    pub tool_name: String,
    /// 라이선스 출력 소스 (short, spdx)
    pub license_source: String,
    /// 대상 store path에 해당하는 컴포넌트가 없으면 실패
    pub strict_root: bool,
    /// 로드한 메타데이터 카탈로그를 CSV로 덤프할 경로 (빈 문자열이면 비활성)
    pub catalog_dump_path: String,
    /// 입력 파일 최대 크기 (바이트)
    pub max_input_size: u64,
}

impl Default for SbomConfig {
    fn default() -> Self {
        Self {
            tool_vendor: "nixbom".to_owned(),
            tool_name: "nixbom".to_owned(),
            license_source: "short".to_owned(),
            strict_root: false,
            catalog_dump_path: String::new(),
            max_input_size: 256 * 1024 * 1024, // 256MB, nixpkgs meta dump 전체 수용
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
