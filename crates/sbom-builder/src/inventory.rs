//! 패키지 인벤토리 소스
//!
//! store 그래프 탐색 자체는 외부 도구의 몫이며, 이 모듈은 그 결과를
//! [`InventoryRecord`] 목록으로 제공하는 인터페이스만 정의합니다.
//!
//! # 구현
//!
//! - [`StaticInventory`]: 메모리에 이미 있는 레코드
//! - [`JsonInventoryFile`]: 레코드 객체의 JSON 배열 파일

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SbomBuilderError;
use crate::types::InventoryRecord;
use crate::util;

/// 인벤토리 소스 trait
///
/// 한 번 호출되어 빌드 대상의 전체 런타임 클로저를 반환합니다.
/// 같은 `store_path`가 여러 번 나와도 됩니다 (병합 단계에서 제거).
pub trait InventorySource: Send + Sync {
    /// 에러 메시지와 로그에 쓰이는 소스 설명
    fn describe(&self) -> String;

    /// 인벤토리 레코드를 읽어옵니다.
    fn load(&self) -> Result<Vec<InventoryRecord>, SbomBuilderError>;
}

/// 메모리 내 인벤토리
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    records: Vec<InventoryRecord>,
}

impl StaticInventory {
    /// 레코드 목록으로 생성합니다.
    pub fn new(records: Vec<InventoryRecord>) -> Self {
        Self { records }
    }
}

impl From<Vec<InventoryRecord>> for StaticInventory {
    fn from(records: Vec<InventoryRecord>) -> Self {
        Self::new(records)
    }
}

impl InventorySource for StaticInventory {
    fn describe(&self) -> String {
        format!("static inventory ({} records)", self.records.len())
    }

    fn load(&self) -> Result<Vec<InventoryRecord>, SbomBuilderError> {
        Ok(self.records.clone())
    }
}

/// JSON 배열 인벤토리 파일
///
/// ```json
/// [
///   {"store_path": "/nix/store/aaa-foo-1.0", "name": "foo-1.0", "pname": "foo", "version": "1.0"}
/// ]
/// ```
///
/// 누락된 키와 `null`은 빈 문자열로, 알 수 없는 키는 무시합니다.
#[derive(Debug, Clone)]
pub struct JsonInventoryFile {
    path: PathBuf,
    max_file_size: u64,
}

impl JsonInventoryFile {
    /// 파일 경로와 최대 크기로 생성합니다.
    pub fn new(path: impl Into<PathBuf>, max_file_size: u64) -> Self {
        Self {
            path: path.into(),
            max_file_size,
        }
    }

    /// 인벤토리 파일 경로
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InventorySource for JsonInventoryFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<InventoryRecord>, SbomBuilderError> {
        let content = util::read_to_string_limited(&self.path, self.max_file_size)?;
        parse_inventory(&content, &self.describe())
    }
}

/// JSON 배열 텍스트를 인벤토리 레코드로 파싱합니다.
///
/// # Errors
///
/// 유효한 JSON이 아니거나, 최상위가 배열이 아니거나, 원소가 객체가 아니면
/// `SbomBuilderError::InventoryParse`
pub fn parse_inventory(
    content: &str,
    source_path: &str,
) -> Result<Vec<InventoryRecord>, SbomBuilderError> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| SbomBuilderError::InventoryParse {
            path: source_path.to_owned(),
            reason: e.to_string(),
        })?;

    let serde_json::Value::Array(items) = value else {
        return Err(SbomBuilderError::InventoryParse {
            path: source_path.to_owned(),
            reason: "top-level value is not an array".to_owned(),
        });
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            if !item.is_object() {
                return Err(SbomBuilderError::InventoryParse {
                    path: source_path.to_owned(),
                    reason: format!("record {idx} is not an object"),
                });
            }
            serde_json::from_value::<InventoryRecord>(item).map_err(|e| {
                SbomBuilderError::InventoryParse {
                    path: source_path.to_owned(),
                    reason: format!("record {idx}: {e}"),
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(path = source_path, records = records.len(), "inventory parsed");
    Ok(records)
}
