//! 도메인 타입 -- 파이프라인 단계별 레코드 구조
//!
//! 각 단계는 고정된 레코드 타입을 주고받습니다.
//!
//! ```text
//! InventoryRecord --+
//!                   +--> CanonicalComponent (CanonicalTable) --> CdxComponent
//! MetadataRecord ---+
//! ```
//!
//! 모든 텍스트 필드는 `String`이며, 값이 없으면 빈 문자열입니다.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// `null` 또는 누락된 값을 빈 문자열로 역직렬화합니다.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// 패키지 인벤토리 레코드
///
/// 외부 인벤토리 소스(store 그래프 탐색기)가 생성하는 한 행입니다.
/// `store_path`는 물리적 빌드마다 고유한 설치 경로입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryRecord {
    /// 설치 경로 (예: `/nix/store/aaa-foo-1.0`)
    #[serde(deserialize_with = "null_as_empty")]
    pub store_path: String,
    /// 표시 이름, 버전 포함 (예: `foo-1.0`)
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    /// 짧은 패키지 이름 (예: `foo`)
    #[serde(deserialize_with = "null_as_empty")]
    pub pname: String,
    /// 버전 문자열
    #[serde(deserialize_with = "null_as_empty")]
    pub version: String,
    /// CPE 식별자
    #[serde(deserialize_with = "null_as_empty")]
    pub cpe: String,
}

impl InventoryRecord {
    /// CSV 내보내기 컬럼 순서
    pub const COLUMNS: [&'static str; 5] = ["store_path", "name", "pname", "version", "cpe"];

    /// 필수 필드로 레코드를 생성합니다.
    pub fn new(
        store_path: impl Into<String>,
        name: impl Into<String>,
        pname: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            store_path: store_path.into(),
            name: name.into(),
            pname: pname.into(),
            version: version.into(),
            cpe: String::new(),
        }
    }

    /// CPE를 설정합니다.
    pub fn with_cpe(mut self, cpe: impl Into<String>) -> Self {
        self.cpe = cpe.into();
        self
    }
}

impl fmt::Display for InventoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.store_path)
    }
}

/// 메타데이터 카탈로그 레코드
///
/// 카탈로그의 최상위 키 하나당 한 행입니다. 같은 `name`이 여러 번 나올 수 있습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// 카탈로그 엔트리 키 (nixpkgs attribute)
    pub nixpkgs: String,
    /// 조인 키
    pub name: String,
    /// 짧은 패키지 이름
    pub pname: String,
    /// 버전
    pub version: String,
    /// `meta.homepage`
    pub meta_homepage: String,
    /// `meta.position`
    pub meta_position: String,
    /// `;`로 연결된 라이선스 short name
    pub meta_license_short: String,
    /// `;`로 연결된 SPDX 라이선스 ID
    pub meta_license_spdxid: String,
    /// `;`로 연결된 메인테이너 이메일
    pub meta_maintainers_email: String,
}

impl MetadataRecord {
    /// CSV 덤프 컬럼 순서
    pub const COLUMNS: [&'static str; 9] = [
        "nixpkgs",
        "name",
        "pname",
        "version",
        "meta_homepage",
        "meta_position",
        "meta_license_short",
        "meta_license_spdxid",
        "meta_maintainers_email",
    ];

    /// [`COLUMNS`](Self::COLUMNS) 순서의 필드 값
    pub fn fields(&self) -> [&str; 9] {
        [
            &self.nixpkgs,
            &self.name,
            &self.pname,
            &self.version,
            &self.meta_homepage,
            &self.meta_position,
            &self.meta_license_short,
            &self.meta_license_spdxid,
            &self.meta_maintainers_email,
        ]
    }
}

/// 병합 결과 레코드
///
/// 인벤토리 필드에 매칭된 카탈로그 필드를 더한 것입니다.
/// 양쪽에 모두 있는 컬럼(조인 키 제외)은 카탈로그 쪽에 `_meta` 접미사를 붙입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalComponent {
    pub store_path: String,
    pub name: String,
    pub pname: String,
    pub version: String,
    pub cpe: String,
    pub nixpkgs: String,
    pub pname_meta: String,
    pub version_meta: String,
    pub meta_homepage: String,
    pub meta_position: String,
    pub meta_license_short: String,
    pub meta_license_spdxid: String,
    pub meta_maintainers_email: String,
}

impl CanonicalComponent {
    /// 카탈로그가 병합된 경우 인벤토리 컬럼 뒤에 붙는 컬럼
    pub const METADATA_COLUMNS: [&'static str; 8] = [
        "nixpkgs",
        "pname_meta",
        "version_meta",
        "meta_homepage",
        "meta_position",
        "meta_license_short",
        "meta_license_spdxid",
        "meta_maintainers_email",
    ];

    /// 카탈로그 매칭이 없는 행을 생성합니다.
    pub fn from_inventory(record: &InventoryRecord) -> Self {
        Self {
            store_path: record.store_path.clone(),
            name: record.name.clone(),
            pname: record.pname.clone(),
            version: record.version.clone(),
            cpe: record.cpe.clone(),
            ..Self::default()
        }
    }

    /// 인벤토리 행과 카탈로그 행을 결합합니다.
    pub fn joined(record: &InventoryRecord, meta: &MetadataRecord) -> Self {
        Self {
            nixpkgs: meta.nixpkgs.clone(),
            pname_meta: meta.pname.clone(),
            version_meta: meta.version.clone(),
            meta_homepage: meta.meta_homepage.clone(),
            meta_position: meta.meta_position.clone(),
            meta_license_short: meta.meta_license_short.clone(),
            meta_license_spdxid: meta.meta_license_spdxid.clone(),
            meta_maintainers_email: meta.meta_maintainers_email.clone(),
            ..Self::from_inventory(record)
        }
    }

    /// [`InventoryRecord::COLUMNS`] 순서의 필드 값
    pub fn inventory_fields(&self) -> [&str; 5] {
        [
            &self.store_path,
            &self.name,
            &self.pname,
            &self.version,
            &self.cpe,
        ]
    }

    /// [`METADATA_COLUMNS`](Self::METADATA_COLUMNS) 순서의 필드 값
    pub fn metadata_fields(&self) -> [&str; 8] {
        [
            &self.nixpkgs,
            &self.pname_meta,
            &self.version_meta,
            &self.meta_homepage,
            &self.meta_position,
            &self.meta_license_short,
            &self.meta_license_spdxid,
            &self.meta_maintainers_email,
        ]
    }
}

impl fmt::Display for CanonicalComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.pname, self.version, self.store_path)
    }
}

/// 중복 제거된 병합 결과 전체
///
/// 행 순서는 인벤토리 순서를 따르며 `store_path`당 정확히 한 행입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalTable {
    /// 정규화된 행 목록
    pub rows: Vec<CanonicalComponent>,
    /// 메타데이터 카탈로그가 병합에 사용되었는지 여부 (CSV 컬럼 집합 결정)
    pub has_metadata: bool,
}

impl CanonicalTable {
    /// 행 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 빈 테이블인지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// store path로 행을 찾습니다.
    pub fn find(&self, store_path: &str) -> Option<&CanonicalComponent> {
        self.rows.iter().find(|row| row.store_path == store_path)
    }

    /// CSV 헤더 컬럼 목록을 반환합니다.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = InventoryRecord::COLUMNS.to_vec();
        if self.has_metadata {
            columns.extend(CanonicalComponent::METADATA_COLUMNS);
        }
        columns
    }

    /// 헤더와 같은 순서의 행 값을 반환합니다.
    pub fn row_fields<'a>(&self, row: &'a CanonicalComponent) -> Vec<&'a str> {
        let mut fields = row.inventory_fields().to_vec();
        if self.has_metadata {
            fields.extend(row.metadata_fields());
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_record_missing_fields_default_to_empty() {
        let record: InventoryRecord =
            serde_json::from_str(r#"{"store_path": "/nix/store/aaa-foo-1.0", "cpe": null}"#)
                .unwrap();
        assert_eq!(record.store_path, "/nix/store/aaa-foo-1.0");
        assert_eq!(record.name, "");
        assert_eq!(record.cpe, "");
    }

    #[test]
    fn inventory_record_ignores_unknown_fields() {
        let record: InventoryRecord = serde_json::from_str(
            r#"{"store_path": "/nix/store/a", "pname": "a", "outputs": ["out"]}"#,
        )
        .unwrap();
        assert_eq!(record.pname, "a");
    }

    #[test]
    fn joined_suffixes_overlapping_columns() {
        let inv = InventoryRecord::new("/nix/store/aaa-foo-1.0", "foo-1.0", "foo", "1.0");
        let meta = MetadataRecord {
            nixpkgs: "foo".to_owned(),
            name: "foo-1.0".to_owned(),
            pname: "foo-meta".to_owned(),
            version: "1.0-meta".to_owned(),
            meta_license_short: "mit".to_owned(),
            ..MetadataRecord::default()
        };
        let row = CanonicalComponent::joined(&inv, &meta);
        assert_eq!(row.pname, "foo");
        assert_eq!(row.pname_meta, "foo-meta");
        assert_eq!(row.version, "1.0");
        assert_eq!(row.version_meta, "1.0-meta");
        assert_eq!(row.meta_license_short, "mit");
    }

    #[test]
    fn from_inventory_leaves_metadata_empty() {
        let inv = InventoryRecord::new("/nix/store/b", "b-2", "b", "2").with_cpe("cpe:2.3:a:b:b:2");
        let row = CanonicalComponent::from_inventory(&inv);
        assert_eq!(row.cpe, "cpe:2.3:a:b:b:2");
        assert!(row.metadata_fields().iter().all(|f| f.is_empty()));
    }

    #[test]
    fn table_columns_depend_on_metadata_flag() {
        let mut table = CanonicalTable::default();
        assert_eq!(table.columns().len(), 5);
        table.has_metadata = true;
        assert_eq!(table.columns().len(), 13);
        assert_eq!(table.columns()[5], "nixpkgs");
    }

    #[test]
    fn table_row_fields_align_with_columns() {
        let inv = InventoryRecord::new("/nix/store/c", "c-1", "c", "1");
        let table = CanonicalTable {
            rows: vec![CanonicalComponent::from_inventory(&inv)],
            has_metadata: true,
        };
        let fields = table.row_fields(&table.rows[0]);
        assert_eq!(fields.len(), table.columns().len());
        assert_eq!(fields[0], "/nix/store/c");
        assert!(table.find("/nix/store/c").is_some());
        assert!(table.find("/nix/store/d").is_none());
    }

    #[test]
    fn canonical_display() {
        let inv = InventoryRecord::new("/nix/store/aaa-foo-1.0", "foo-1.0", "foo", "1.0");
        let row = CanonicalComponent::from_inventory(&inv);
        assert_eq!(row.to_string(), "foo@1.0 (/nix/store/aaa-foo-1.0)");
    }
}
