//! 메타데이터 카탈로그 로더 -- nixpkgs meta JSON 정규화
//!
//! [`MetadataCatalogLoader`]는 `nix-env -qa --meta --json` 형식의 JSON 파일을 읽어
//! 최상위 키 하나당 [`MetadataRecord`] 한 행을 생성합니다. 행 순서는 파일 순서와 같습니다.
//!
//! # 입력 형식 예시
//!
//! ```json
//! {
//!   "hello": {
//!     "name": "hello-2.12.1",
//!     "pname": "hello",
//!     "version": "2.12.1",
//!     "meta": {
//!       "homepage": "https://www.gnu.org/software/hello/",
//!       "position": "pkgs/by-name/he/hello/package.nix:34",
//!       "license": { "shortName": "gpl3Plus", "spdxId": "GPL-3.0-or-later" },
//!       "maintainers": [{ "email": "someone@example.org" }]
//!     }
//!   }
//! }
//! ```
//!
//! `meta.license`와 `meta.maintainers`는 없을 수도, 단일 객체일 수도,
//! 객체/문자열 목록일 수도 있습니다. [`MetaField`]가 이 세 가지 형태를 표현합니다.

use std::path::Path;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::SbomBuilderError;
use crate::types::MetadataRecord;
use crate::util;

/// 라이선스/메인테이너 필드의 형태
#[derive(Debug, Clone, PartialEq)]
pub enum MetaField {
    /// 필드 없음 (또는 `null`, 문자열이 아닌 스칼라)
    Absent,
    /// 단일 객체
    Single(Map<String, Value>),
    /// 목록
    List(Vec<MetaItem>),
}

/// [`MetaField::List`]의 원소
#[derive(Debug, Clone, PartialEq)]
pub enum MetaItem {
    /// 객체 원소 -- 지정한 키의 값을 꺼냄
    Object(Map<String, Value>),
    /// 문자열 원소 -- 그대로 사용
    Text(String),
    /// 그 밖의 값 -- 무시
    Other,
}

impl MetaField {
    /// JSON 값에서 필드 형태를 판별합니다.
    ///
    /// 목록 위치가 아닌 곳의 단일 문자열은 원소 하나짜리 목록으로 취급합니다.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) | Some(Value::Bool(_)) | Some(Value::Number(_)) => {
                Self::Absent
            }
            Some(Value::Object(map)) => Self::Single(map.clone()),
            Some(Value::String(s)) => Self::List(vec![MetaItem::Text(s.clone())]),
            Some(Value::Array(items)) => Self::List(items.iter().map(MetaItem::from_value).collect()),
        }
    }

    /// `key`에 해당하는 비어 있지 않은 값을 순서대로 반환합니다.
    pub fn values(&self, key: &str) -> Vec<&str> {
        match self {
            Self::Absent => Vec::new(),
            Self::Single(map) => string_at(map, key).into_iter().collect(),
            Self::List(items) => items.iter().filter_map(|item| item.value(key)).collect(),
        }
    }

    /// [`values`](Self::values) 결과를 `;`로 연결합니다.
    pub fn joined(&self, key: &str) -> String {
        self.values(key).join(";")
    }
}

impl MetaItem {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::Object(map.clone()),
            Value::String(s) => Self::Text(s.clone()),
            _ => Self::Other,
        }
    }

    fn value(&self, key: &str) -> Option<&str> {
        match self {
            Self::Object(map) => string_at(map, key),
            Self::Text(s) if !s.is_empty() => Some(s.as_str()),
            Self::Text(_) | Self::Other => None,
        }
    }
}

/// 객체에서 비어 있지 않은 문자열 값을 꺼냅니다.
fn string_at<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    match map.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

/// 스칼라 필드를 문자열로 변환합니다.
///
/// 문자열은 그대로, `null`/누락은 빈 문자열, 문자열 목록은 `;` 연결,
/// 그 밖의 값은 JSON 텍스트로 변환합니다.
fn scalar_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(";"),
        Some(other) => other.to_string(),
    }
}

/// 메타데이터 카탈로그 로더
///
/// 누락된 필드는 빈 문자열로 채우며, 부분 레코드를 거부하지 않습니다.
pub struct MetadataCatalogLoader {
    /// 카탈로그 파일 최대 크기 (바이트)
    max_file_size: u64,
}

impl MetadataCatalogLoader {
    /// 파일 크기 제한을 지정하여 로더를 생성합니다.
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// 카탈로그 파일을 읽어 정규화된 레코드 목록을 반환합니다.
    ///
    /// # Errors
    ///
    /// - 파일이 없거나 읽을 수 없으면 `SbomBuilderError::Io`
    /// - 크기 제한 초과 시 `SbomBuilderError::FileTooBig`
    /// - JSON이 아니거나 최상위가 객체가 아니면 `SbomBuilderError::CatalogParse`
    pub fn load(&self, path: &Path) -> Result<Vec<MetadataRecord>, SbomBuilderError> {
        info!(path = %path.display(), "loading meta info");
        let content = util::read_to_string_limited(path, self.max_file_size)?;
        parse_catalog(&content, &path.display().to_string())
    }
}

/// 카탈로그 JSON 문자열을 파싱합니다.
///
/// `source_path`는 에러 메시지에만 사용됩니다.
pub fn parse_catalog(
    content: &str,
    source_path: &str,
) -> Result<Vec<MetadataRecord>, SbomBuilderError> {
    let entries: IndexMap<String, Value> =
        serde_json::from_str(content).map_err(|e| SbomBuilderError::CatalogParse {
            path: source_path.to_owned(),
            reason: e.to_string(),
        })?;

    let mut records = Vec::with_capacity(entries.len());
    for (attr, pkg) in &entries {
        let pkg = pkg.as_object().ok_or_else(|| SbomBuilderError::CatalogParse {
            path: source_path.to_owned(),
            reason: format!("entry '{attr}' is not an object"),
        })?;
        records.push(normalize_entry(attr, pkg));
    }

    debug!(path = source_path, entries = records.len(), "catalog parsed");
    Ok(records)
}

/// 카탈로그 엔트리 하나를 레코드로 변환합니다.
fn normalize_entry(attr: &str, pkg: &Map<String, Value>) -> MetadataRecord {
    let empty = Map::new();
    let meta = pkg.get("meta").and_then(Value::as_object).unwrap_or(&empty);

    let license = MetaField::from_value(meta.get("license"));
    let maintainers = MetaField::from_value(meta.get("maintainers"));

    MetadataRecord {
        nixpkgs: attr.to_owned(),
        name: scalar_text(pkg.get("name")),
        pname: scalar_text(pkg.get("pname")),
        version: scalar_text(pkg.get("version")),
        meta_homepage: scalar_text(meta.get("homepage")),
        meta_position: scalar_text(meta.get("position")),
        meta_license_short: license.joined("shortName"),
        meta_license_spdxid: license.joined("spdxId"),
        meta_maintainers_email: maintainers.joined("email"),
    }
}
