//! SBOM 빌더 에러 타입
//!
//! [`SbomBuilderError`]는 SBOM 빌더 모듈 내에서 발생할 수 있는 모든 에러를 나타냅니다.
//! CLI는 이 에러를 종료 코드가 있는 자체 에러 타입으로 직접 변환합니다.
//!
//! # 에러 카테고리
//!
//! - **입력 파싱**: `CatalogParse`, `InventoryParse`
//! - **문서 조립**: `RootComponentNotFound`, `Purl`, `Serialize`
//! - **설정**: `Config`
//! - **파일 I/O**: `Io`, `FileTooBig`
//!
//! 누락된 선택 필드(라이선스, homepage, CPE 등)는 에러가 아니며 빈 값으로 채워집니다.

/// SBOM 빌더 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum SbomBuilderError {
    /// 메타데이터 카탈로그 파싱 실패 (JSON 아님, 최상위가 객체 아님)
    #[error("catalog parse error: {path}: {reason}")]
    CatalogParse {
        /// 카탈로그 파일 경로
        path: String,
        /// 파싱 실패 사유
        reason: String,
    },

    /// 인벤토리 파싱 실패
    #[error("inventory parse error: {path}: {reason}")]
    InventoryParse {
        /// 인벤토리 파일 경로
        path: String,
        /// 파싱 실패 사유
        reason: String,
    },

    /// 대상 store path에 해당하는 컴포넌트 없음 (strict root 모드에서만)
    #[error("root component not found: {target}")]
    RootComponentNotFound {
        /// 대상 store path
        target: String,
    },

    /// purl 생성 실패 (`packageurl`이 입력을 거부함)
    #[error("purl error: '{name}': {reason}")]
    Purl {
        /// 패키지 이름 (`pname`)
        name: String,
        /// 실패 사유
        reason: String,
    },

    /// 문서 직렬화 실패
    #[error("serialization error: {0}")]
    Serialize(String),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 파일 I/O 에러 (입력 없음, 출력 경로 열기 실패 포함)
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 파일 크기 초과
    #[error("file too large: {path}: {size} bytes (max: {max})")]
    FileTooBig {
        /// 파일 경로
        path: String,
        /// 실제 파일 크기 (바이트)
        size: u64,
        /// 최대 허용 크기 (바이트)
        max: u64,
    },
}

impl SbomBuilderError {
    /// 경로 정보를 붙여 I/O 에러를 감쌉니다.
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// 입력 파일이 존재하지 않아 발생한 에러인지 확인합니다.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_parse_error_display() {
        let err = SbomBuilderError::CatalogParse {
            path: "meta.json".to_owned(),
            reason: "top-level value is not an object".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("meta.json"));
        assert!(msg.contains("not an object"));
    }

    #[test]
    fn root_not_found_display() {
        let err = SbomBuilderError::RootComponentNotFound {
            target: "/nix/store/aaa-foo-1.0".to_owned(),
        };
        assert!(err.to_string().contains("/nix/store/aaa-foo-1.0"));
    }

    #[test]
    fn io_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = SbomBuilderError::io(std::path::Path::new("/tmp/meta.json"), io_err);
        assert!(err.to_string().contains("/tmp/meta.json"));
        assert!(err.is_not_found());
    }

    #[test]
    fn permission_error_is_not_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = SbomBuilderError::io(std::path::Path::new("/root/out.json"), io_err);
        assert!(!err.is_not_found());
    }

    #[test]
    fn file_too_big_error_display() {
        let err = SbomBuilderError::FileTooBig {
            path: "meta.json".to_owned(),
            size: 20_000_000,
            max: 10_000_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("20000000"));
        assert!(msg.contains("10000000"));
    }

    #[test]
    fn purl_error_display() {
        let err = SbomBuilderError::Purl {
            name: "foo".to_owned(),
            reason: "invalid package type".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'foo'"));
        assert!(msg.contains("invalid package type"));
    }
}
