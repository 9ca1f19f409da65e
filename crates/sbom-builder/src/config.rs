//! SBOM 빌더 설정
//!
//! [`SbomBuilderConfig`]는 core의 [`SbomConfig`](nixbom_core::config::SbomConfig)를
//! 타입이 있는 형태로 변환하고, 도구 버전 등 빌더 고유 필드를 추가합니다.
//!
//! # 사용 예시
//!
//! ```
//! use nixbom_sbom_builder::{LicenseSource, SbomBuilderConfigBuilder};
//!
//! let config = SbomBuilderConfigBuilder::new()
//!     .license_source(LicenseSource::Spdx)
//!     .strict_root(true)
//!     .build()
//!     .unwrap();
//! assert!(config.strict_root);
//! ```

use std::path::PathBuf;

use crate::cyclonedx::{CdxTool, LicenseSource};
use crate::error::SbomBuilderError;

/// 입력 파일 최대 허용 크기 상한 (4 GB)
const MAX_INPUT_SIZE_LIMIT: u64 = 4 * 1024 * 1024 * 1024;
/// 도구 이름/벤더 최대 길이
const MAX_TOOL_FIELD_LEN: usize = 256;

/// SBOM 빌더 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbomBuilderConfig {
    /// `metadata.tools[].vendor`
    pub tool_vendor: String,
    /// `metadata.tools[].name`
    pub tool_name: String,
    /// `metadata.tools[].version`
    pub tool_version: String,
    /// 라이선스 출력 소스
    pub license_source: LicenseSource,
    /// 대상 store path가 인벤토리에 없으면 실패
    pub strict_root: bool,
    /// 파싱된 카탈로그를 CSV로 덤프할 경로
    pub catalog_dump_path: Option<PathBuf>,
    /// 입력 파일 최대 크기 (바이트)
    pub max_input_size: u64,
}

impl Default for SbomBuilderConfig {
    fn default() -> Self {
        Self {
            tool_vendor: "nixbom".to_owned(),
            tool_name: "nixbom".to_owned(),
            tool_version: env!("CARGO_PKG_VERSION").to_owned(),
            license_source: LicenseSource::Short,
            strict_root: false,
            catalog_dump_path: None,
            max_input_size: 256 * 1024 * 1024, // 256 MB
        }
    }
}

impl SbomBuilderConfig {
    /// core의 `SbomConfig`에서 빌더 설정을 생성합니다.
    ///
    /// 알 수 없는 `license_source` 값은 `Short`로 처리합니다.
    /// core 설정은 로드 시점에 이미 검증되므로 이 경우는 직접 생성한 설정에서만 발생합니다.
    pub fn from_core(core: &nixbom_core::config::SbomConfig) -> Self {
        let license_source =
            LicenseSource::from_str_loose(&core.license_source).unwrap_or_default();
        let catalog_dump_path =
            (!core.catalog_dump_path.is_empty()).then(|| PathBuf::from(&core.catalog_dump_path));

        Self {
            tool_vendor: core.tool_vendor.clone(),
            tool_name: core.tool_name.clone(),
            license_source,
            strict_root: core.strict_root,
            catalog_dump_path,
            max_input_size: core.max_input_size,
            ..Self::default()
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `tool_vendor`, `tool_name`: 비어있지 않고 256자 이하
    /// - `max_input_size`: 1-4294967296
    pub fn validate(&self) -> Result<(), SbomBuilderError> {
        for (field, value) in [("tool_vendor", &self.tool_vendor), ("tool_name", &self.tool_name)] {
            if value.is_empty() {
                return Err(SbomBuilderError::Config {
                    field: field.to_owned(),
                    reason: "must not be empty".to_owned(),
                });
            }
            if value.len() > MAX_TOOL_FIELD_LEN {
                return Err(SbomBuilderError::Config {
                    field: field.to_owned(),
                    reason: format!("exceeds maximum length {MAX_TOOL_FIELD_LEN}"),
                });
            }
        }

        if self.max_input_size == 0 || self.max_input_size > MAX_INPUT_SIZE_LIMIT {
            return Err(SbomBuilderError::Config {
                field: "max_input_size".to_owned(),
                reason: format!("must be 1-{MAX_INPUT_SIZE_LIMIT}"),
            });
        }

        Ok(())
    }

    /// 문서 `metadata.tools`에 기록할 도구 정보
    pub fn tool(&self) -> CdxTool {
        CdxTool {
            vendor: self.tool_vendor.clone(),
            name: self.tool_name.clone(),
            version: self.tool_version.clone(),
        }
    }
}

/// [`SbomBuilderConfig`] 빌더
///
/// 빌드 시 유효성 검증을 수행합니다.
#[derive(Default)]
pub struct SbomBuilderConfigBuilder {
    config: SbomBuilderConfig,
}

impl SbomBuilderConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 도구 벤더를 설정합니다.
    pub fn tool_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.config.tool_vendor = vendor.into();
        self
    }

    /// 도구 이름을 설정합니다.
    pub fn tool_name(mut self, name: impl Into<String>) -> Self {
        self.config.tool_name = name.into();
        self
    }

    /// 도구 버전을 설정합니다.
    pub fn tool_version(mut self, version: impl Into<String>) -> Self {
        self.config.tool_version = version.into();
        self
    }

    /// 라이선스 출력 소스를 설정합니다.
    pub fn license_source(mut self, source: LicenseSource) -> Self {
        self.config.license_source = source;
        self
    }

    /// strict root 모드를 설정합니다.
    pub fn strict_root(mut self, strict: bool) -> Self {
        self.config.strict_root = strict;
        self
    }

    /// 카탈로그 덤프 경로를 설정합니다.
    pub fn catalog_dump_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.catalog_dump_path = Some(path.into());
        self
    }

    /// 입력 파일 최대 크기를 설정합니다.
    pub fn max_input_size(mut self, size: u64) -> Self {
        self.config.max_input_size = size;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    pub fn build(self) -> Result<SbomBuilderConfig, SbomBuilderError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
