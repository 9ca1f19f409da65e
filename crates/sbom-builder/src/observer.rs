//! 빌드 진행 관찰자
//!
//! [`BuildObserver`]는 빌드 단계마다 호출되는 콜백 집합입니다.
//! 기본 구현 [`TracingObserver`]는 `tracing` 이벤트를 남기고 메트릭 카운터를 증가시킵니다.
//! 테스트에서는 직접 구현한 관찰자로 호출 순서와 인자를 검증할 수 있습니다.

use std::fmt;
use std::path::Path;

use metrics::counter;
use serde::Serialize;
use tracing::{info, warn};

use nixbom_core::metrics as m;

use crate::merge::MergeStats;

/// 출력 파일 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// CycloneDX JSON 문서
    #[serde(rename = "cyclonedx")]
    CycloneDx,
    /// 병합 결과 CSV
    Csv,
    /// 메타데이터 카탈로그 CSV 덤프
    CatalogDump,
}

impl OutputKind {
    /// 메트릭 레이블 값
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CycloneDx => "cyclonedx",
            Self::Csv => "csv",
            Self::CatalogDump => "catalog_dump",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 빌드 단계 관찰자
///
/// 모든 메서드는 기본 구현이 비어 있으므로 필요한 것만 재정의하면 됩니다.
pub trait BuildObserver: Send + Sync {
    /// 인벤토리를 읽은 직후
    fn inventory_loaded(&self, _records: usize) {}

    /// 카탈로그를 파싱한 직후
    fn catalog_loaded(&self, _path: &Path, _entries: usize) {}

    /// 병합과 중복 제거가 끝난 직후
    fn components_merged(&self, _stats: &MergeStats, _canonical_rows: usize) {}

    /// 대상 store path에 해당하는 컴포넌트가 없을 때
    fn root_missing(&self, _target: &str) {}

    /// 문서가 조립된 직후
    fn document_assembled(&self, _components: usize) {}

    /// 출력 파일을 기록한 직후
    fn file_written(&self, _path: &Path, _kind: OutputKind) {}
}

/// `tracing` 이벤트와 메트릭 카운터로 진행 상황을 보고하는 기본 관찰자
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl BuildObserver for TracingObserver {
    fn inventory_loaded(&self, records: usize) {
        counter!(m::SBOM_INVENTORY_RECORDS_TOTAL).increment(records as u64);
        info!(records, "inventory loaded");
    }

    fn catalog_loaded(&self, path: &Path, entries: usize) {
        counter!(m::SBOM_CATALOG_ENTRIES_TOTAL).increment(entries as u64);
        info!(path = %path.display(), entries, "meta info loaded");
    }

    fn components_merged(&self, stats: &MergeStats, canonical_rows: usize) {
        counter!(m::SBOM_JOIN_FANOUT_ROWS_TOTAL).increment(stats.fanout_rows() as u64);
        counter!(m::SBOM_DUPLICATES_DROPPED_TOTAL).increment(stats.duplicates_dropped as u64);
        if stats.fanout_rows() > 0 {
            warn!(
                extra_rows = stats.fanout_rows(),
                "meta info has duplicate names, keeping first match per store path"
            );
        }
        info!(
            inventory = stats.inventory_rows,
            matched = stats.matched_rows,
            dropped = stats.duplicates_dropped,
            components = canonical_rows,
            "components merged"
        );
    }

    fn root_missing(&self, target: &str) {
        counter!(m::SBOM_ROOT_MISSING_TOTAL).increment(1);
        warn!(
            store_path = target,
            "target store path not found in inventory, sbom has no root component"
        );
    }

    fn document_assembled(&self, components: usize) {
        counter!(m::SBOM_COMPONENTS_EMITTED_TOTAL).increment(components as u64);
    }

    fn file_written(&self, path: &Path, kind: OutputKind) {
        counter!(m::SBOM_OUTPUTS_WRITTEN_TOTAL, m::LABEL_OUTPUT => kind.as_str()).increment(1);
        info!(path = %path.display(), output = %kind, "wrote output");
    }
}
