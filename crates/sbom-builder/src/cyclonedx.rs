//! CycloneDX 1.3 JSON 문서 모델 및 컴포넌트 투영
//!
//! [CycloneDX](https://cyclonedx.org/) 1.3 사양의 부분집합을 표현합니다.
//! [`project_component`]는 정규화된 행 하나를 [`CdxComponent`] 하나로 변환합니다.

use packageurl::PackageUrl;
use serde::{Deserialize, Serialize};

use crate::error::SbomBuilderError;
use crate::types::CanonicalComponent;

/// `bomFormat` 값
pub const BOM_FORMAT: &str = "CycloneDX";
/// `specVersion` 값
pub const SPEC_VERSION: &str = "1.3";
/// purl 타입 토큰
pub const PURL_TYPE: &str = "nix";
/// 루트가 아닌 모든 컴포넌트의 `type`
pub const COMPONENT_TYPE: &str = "application";

/// 라이선스 출력 소스
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseSource {
    /// `meta_license_short` -> `{license: {name}}`
    #[default]
    Short,
    /// `meta_license_spdxid` -> `{license: {id}}`, 비어 있으면 `Short`로 대체
    Spdx,
}

impl LicenseSource {
    /// 문자열에서 라이선스 소스를 파싱합니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "short" | "shortname" | "name" => Some(Self::Short),
            "spdx" | "spdxid" | "id" => Some(Self::Spdx),
            _ => None,
        }
    }
}

/// CycloneDX BOM 루트 구조
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdxBom {
    pub bom_format: String,
    pub spec_version: String,
    pub version: u32,
    pub serial_number: String,
    pub metadata: CdxMetadata,
    pub components: Vec<CdxComponent>,
}

impl CdxBom {
    /// 빈 문서를 생성합니다. 일련번호는 매번 새로운 v4 UUID입니다.
    pub fn new(tool: CdxTool) -> Self {
        Self {
            bom_format: BOM_FORMAT.to_owned(),
            spec_version: SPEC_VERSION.to_owned(),
            version: 1,
            serial_number: format!("urn:uuid:{}", uuid::Uuid::new_v4()),
            metadata: CdxMetadata {
                tools: vec![tool],
                component: None,
            },
            components: Vec::new(),
        }
    }

    /// 2칸 들여쓰기 JSON으로 직렬화합니다.
    pub fn to_json_pretty(&self) -> Result<String, SbomBuilderError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            SbomBuilderError::Serialize(format!("CycloneDX serialization failed: {e}"))
        })
    }

    /// 루트를 포함한 전체 컴포넌트 수
    pub fn component_count(&self) -> usize {
        self.components.len() + usize::from(self.metadata.component.is_some())
    }
}

/// CycloneDX 메타데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdxMetadata {
    pub tools: Vec<CdxTool>,
    /// 루트(빌드 대상) 컴포넌트
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<CdxComponent>,
}

/// CycloneDX 도구 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdxTool {
    pub vendor: String,
    pub name: String,
    pub version: String,
}

/// CycloneDX 컴포넌트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdxComponent {
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(rename = "bom-ref")]
    pub bom_ref: String,
    pub name: String,
    pub version: String,
    pub purl: String,
    pub cpe: String,
    /// 라이선스가 없으면 키 자체를 생략
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub licenses: Option<Vec<CdxLicenseChoice>>,
}

/// `licenses[]` 원소
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdxLicenseChoice {
    pub license: CdxLicense,
}

/// 라이선스 이름 또는 SPDX ID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdxLicense {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// nix 패키지의 Package URL을 생성합니다.
///
/// 이름과 버전은 purl 규칙에 따라 퍼센트 인코딩됩니다 (`libsigc++` -> `libsigc%2B%2B`).
/// 버전이 비어 있으면 `@version` 부분을 생략합니다.
/// 이름이 비어 있으면 purl을 만들 수 없으므로 빈 문자열을 반환합니다.
///
/// # Errors
///
/// `packageurl`이 입력을 거부하면 `SbomBuilderError::Purl`
pub fn make_purl(name: &str, version: &str) -> Result<String, SbomBuilderError> {
    if name.is_empty() {
        return Ok(String::new());
    }

    let mut purl = PackageUrl::new(PURL_TYPE, name).map_err(|e| SbomBuilderError::Purl {
        name: name.to_owned(),
        reason: e.to_string(),
    })?;
    if !version.is_empty() {
        purl.with_version(version);
    }
    Ok(purl.to_string())
}

/// `;`로 연결된 라이선스 문자열을 라이선스 목록으로 변환합니다.
///
/// 빈 구간은 건너뜁니다. 결과가 비면 `None`을 반환합니다.
fn license_entries(
    joined: &str,
    make: fn(String) -> CdxLicense,
) -> Option<Vec<CdxLicenseChoice>> {
    let entries: Vec<CdxLicenseChoice> = joined
        .split(';')
        .filter(|segment| !segment.is_empty())
        .map(|segment| CdxLicenseChoice {
            license: make(segment.to_owned()),
        })
        .collect();
    (!entries.is_empty()).then_some(entries)
}

fn by_name(name: String) -> CdxLicense {
    CdxLicense {
        id: None,
        name: Some(name),
    }
}

fn by_id(id: String) -> CdxLicense {
    CdxLicense {
        id: Some(id),
        name: None,
    }
}

/// 정규화된 행 하나를 CycloneDX 컴포넌트로 투영합니다.
///
/// 누락된 선택 필드는 에러가 아니라 "데이터 없음"으로 처리합니다.
pub fn project_component(
    row: &CanonicalComponent,
    license_source: LicenseSource,
) -> Result<CdxComponent, SbomBuilderError> {
    let licenses = match license_source {
        LicenseSource::Spdx => license_entries(&row.meta_license_spdxid, by_id)
            .or_else(|| license_entries(&row.meta_license_short, by_name)),
        LicenseSource::Short => license_entries(&row.meta_license_short, by_name),
    };

    Ok(CdxComponent {
        component_type: COMPONENT_TYPE.to_owned(),
        bom_ref: row.store_path.clone(),
        name: row.pname.clone(),
        version: row.version.clone(),
        purl: make_purl(&row.pname, &row.version)?,
        cpe: row.cpe.clone(),
        licenses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(license_short: &str) -> CanonicalComponent {
        CanonicalComponent {
            store_path: "/nix/store/aaa-foo-1.2.3".to_owned(),
            name: "foo-1.2.3".to_owned(),
            pname: "foo".to_owned(),
            version: "1.2.3".to_owned(),
            meta_license_short: license_short.to_owned(),
            ..CanonicalComponent::default()
        }
    }

    #[test]
    fn purl_is_deterministic() {
        assert_eq!(make_purl("foo", "1.2.3").unwrap(), "pkg:nix/foo@1.2.3");
        assert_eq!(
            make_purl("foo", "1.2.3").unwrap(),
            make_purl("foo", "1.2.3").unwrap()
        );
    }

    #[test]
    fn purl_without_version() {
        assert_eq!(make_purl("source", "").unwrap(), "pkg:nix/source");
    }

    #[test]
    fn purl_encodes_plus_in_name() {
        assert_eq!(
            make_purl("libsigc++", "2.12.0").unwrap(),
            "pkg:nix/libsigc%2B%2B@2.12.0"
        );
    }

    #[test]
    fn purl_encodes_at_in_name() {
        let purl = make_purl("foo@bar", "1.0").unwrap();
        assert_eq!(purl, "pkg:nix/foo%40bar@1.0");
        assert_eq!(purl.matches('@').count(), 1);
    }

    #[test]
    fn purl_for_empty_name_is_empty() {
        assert_eq!(make_purl("", "1.0").unwrap(), "");
    }

    #[test]
    fn projection_encodes_purl_but_keeps_raw_name() {
        let mut r = row("");
        r.pname = "gtk+3".to_owned();
        r.version = "3.24.41".to_owned();
        let c = project_component(&r, LicenseSource::Short).unwrap();
        assert_eq!(c.name, "gtk+3");
        assert_eq!(c.purl, "pkg:nix/gtk%2B3@3.24.41");
    }

    #[test]
    fn projection_copies_fields() {
        let mut r = row("");
        r.cpe = "cpe:2.3:a:foo:foo:1.2.3:*:*:*:*:*:*:*".to_owned();
        let c = project_component(&r, LicenseSource::Short).unwrap();
        assert_eq!(c.component_type, "application");
        assert_eq!(c.bom_ref, "/nix/store/aaa-foo-1.2.3");
        assert_eq!(c.name, "foo");
        assert_eq!(c.version, "1.2.3");
        assert_eq!(c.purl, "pkg:nix/foo@1.2.3");
        assert_eq!(c.cpe, "cpe:2.3:a:foo:foo:1.2.3:*:*:*:*:*:*:*");
    }

    #[test]
    fn empty_license_omits_key() {
        let c = project_component(&row(""), LicenseSource::Short).unwrap();
        assert!(c.licenses.is_none());
        let json = serde_json::to_value(&c).unwrap();
        assert!(json.get("licenses").is_none());
        assert_eq!(json["cpe"], "");
    }

    #[test]
    fn license_segments_become_entries() {
        let c = project_component(&row("mit;asl20;;bsd3"), LicenseSource::Short).unwrap();
        let licenses = c.licenses.unwrap();
        assert_eq!(licenses.len(), 3);
        assert_eq!(licenses[1].license.name.as_deref(), Some("asl20"));
        assert!(licenses[1].license.id.is_none());
    }

    #[test]
    fn license_entry_json_shape() {
        let c = project_component(&row("mit"), LicenseSource::Short).unwrap();
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["licenses"], serde_json::json!([{"license": {"name": "mit"}}]));
        assert_eq!(json["bom-ref"], "/nix/store/aaa-foo-1.2.3");
        assert_eq!(json["type"], "application");
    }

    #[test]
    fn spdx_source_prefers_ids() {
        let mut r = row("gpl3Plus");
        r.meta_license_spdxid = "GPL-3.0-or-later".to_owned();
        let c = project_component(&r, LicenseSource::Spdx).unwrap();
        let licenses = c.licenses.unwrap();
        assert_eq!(licenses.len(), 1);
        assert_eq!(licenses[0].license.id.as_deref(), Some("GPL-3.0-or-later"));
    }

    #[test]
    fn spdx_source_falls_back_to_short_names() {
        let c = project_component(&row("unfree"), LicenseSource::Spdx).unwrap();
        let licenses = c.licenses.unwrap();
        assert_eq!(licenses[0].license.name.as_deref(), Some("unfree"));
    }

    #[test]
    fn new_bom_has_fixed_header() {
        let bom = CdxBom::new(CdxTool {
            vendor: "nixbom".to_owned(),
            name: "nixbom".to_owned(),
            version: "0.1.0".to_owned(),
        });
        let json: serde_json::Value = serde_json::from_str(&bom.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["bomFormat"], "CycloneDX");
        assert_eq!(json["specVersion"], "1.3");
        assert_eq!(json["version"], 1);
        assert!(json["serialNumber"].as_str().unwrap().starts_with("urn:uuid:"));
        assert!(json["metadata"].get("component").is_none());
        assert_eq!(json["metadata"]["tools"][0]["vendor"], "nixbom");
        assert!(json["components"].as_array().unwrap().is_empty());
    }

    #[test]
    fn serial_numbers_are_unique() {
        let tool = CdxTool {
            vendor: "v".to_owned(),
            name: "n".to_owned(),
            version: "0".to_owned(),
        };
        let a = CdxBom::new(tool.clone());
        let b = CdxBom::new(tool);
        assert_ne!(a.serial_number, b.serial_number);
    }

    #[test]
    fn pretty_json_uses_two_space_indent() {
        let bom = CdxBom::new(CdxTool {
            vendor: "v".to_owned(),
            name: "n".to_owned(),
            version: "0".to_owned(),
        });
        let text = bom.to_json_pretty().unwrap();
        assert!(text.starts_with("{\n  \"bomFormat\": \"CycloneDX\""));
    }

    #[test]
    fn license_source_from_str_loose() {
        assert_eq!(LicenseSource::from_str_loose("short"), Some(LicenseSource::Short));
        assert_eq!(LicenseSource::from_str_loose("SPDX"), Some(LicenseSource::Spdx));
        assert_eq!(LicenseSource::from_str_loose("xml"), None);
    }
}
