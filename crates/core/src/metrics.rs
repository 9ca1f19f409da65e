//! 메트릭 상수 및 설명 등록
//!
//! SBOM 생성 파이프라인이 기록하는 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않은 경우 기록은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `nixbom_sbom_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(nixbom_core::metrics::SBOM_COMPONENTS_EMITTED_TOTAL).increment(1);
//! ```

use metrics::{Unit, describe_counter};

/// 출력 종류 레이블 키 (cyclonedx, csv, catalog_dump)
pub const LABEL_OUTPUT: &str = "output";

/// 로드된 인벤토리 레코드 수 (counter)
pub const SBOM_INVENTORY_RECORDS_TOTAL: &str = "nixbom_sbom_inventory_records_total";

/// 로드된 메타데이터 카탈로그 엔트리 수 (counter)
pub const SBOM_CATALOG_ENTRIES_TOTAL: &str = "nixbom_sbom_catalog_entries_total";

/// 조인 fan-out으로 추가 생성된 행 수 (counter)
pub const SBOM_JOIN_FANOUT_ROWS_TOTAL: &str = "nixbom_sbom_join_fanout_rows_total";

/// 중복 store path 제거로 버려진 행 수 (counter)
pub const SBOM_DUPLICATES_DROPPED_TOTAL: &str = "nixbom_sbom_duplicates_dropped_total";

/// 문서에 포함된 컴포넌트 수 (counter)
pub const SBOM_COMPONENTS_EMITTED_TOTAL: &str = "nixbom_sbom_components_emitted_total";

/// 루트 컴포넌트를 찾지 못한 빌드 수 (counter)
pub const SBOM_ROOT_MISSING_TOTAL: &str = "nixbom_sbom_root_missing_total";

/// 기록된 출력 파일 수 (counter, label: output)
pub const SBOM_OUTPUTS_WRITTEN_TOTAL: &str = "nixbom_sbom_outputs_written_total";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더 설치 직후 한 번 호출합니다.
pub fn describe_all() {
    describe_counter!(
        SBOM_INVENTORY_RECORDS_TOTAL,
        Unit::Count,
        "Inventory records loaded from the inventory source"
    );
    describe_counter!(
        SBOM_CATALOG_ENTRIES_TOTAL,
        Unit::Count,
        "Metadata catalog entries loaded"
    );
    describe_counter!(
        SBOM_JOIN_FANOUT_ROWS_TOTAL,
        Unit::Count,
        "Extra rows produced by duplicate catalog names during the join"
    );
    describe_counter!(
        SBOM_DUPLICATES_DROPPED_TOTAL,
        Unit::Count,
        "Rows discarded by store path deduplication"
    );
    describe_counter!(
        SBOM_COMPONENTS_EMITTED_TOTAL,
        Unit::Count,
        "Components written into CycloneDX documents"
    );
    describe_counter!(
        SBOM_ROOT_MISSING_TOTAL,
        Unit::Count,
        "Builds whose target store path matched no component"
    );
    describe_counter!(
        SBOM_OUTPUTS_WRITTEN_TOTAL,
        Unit::Count,
        "Output files written"
    );
}
