//! 컴포넌트 병합 -- 인벤토리 x 카탈로그 left join 및 store path 중복 제거
//!
//! # 알고리즘
//!
//! ```text
//! inventory --+
//!             +--> left join on name (fan-out) --> dedup by store_path (first wins) --> CanonicalTable
//! catalog ----+
//! ```
//!
//! 카탈로그에 같은 `name`이 여러 번 있으면 인벤토리 한 행이 매칭 수만큼 늘어납니다.
//! fan-out 행은 카탈로그 파일 순서로 생성되고 중복 제거는 첫 행을 남기므로,
//! 파일 순서상 첫 번째 카탈로그 엔트리가 항상 선택됩니다.

use std::collections::HashMap;

use tracing::debug;

use crate::types::{CanonicalComponent, CanonicalTable, InventoryRecord, MetadataRecord};

/// 병합 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// 입력 인벤토리 행 수
    pub inventory_rows: usize,
    /// 카탈로그와 매칭된 인벤토리 행 수
    pub matched_rows: usize,
    /// 조인 결과 행 수 (fan-out 포함)
    pub joined_rows: usize,
    /// 중복 제거로 버려진 행 수
    pub duplicates_dropped: usize,
}

impl MergeStats {
    /// fan-out으로 추가된 행 수
    pub fn fanout_rows(&self) -> usize {
        self.joined_rows.saturating_sub(self.inventory_rows)
    }
}

/// 인벤토리와 메타데이터 카탈로그를 병합합니다.
pub struct ComponentMerger;

impl ComponentMerger {
    /// 정규화된 컴포넌트 테이블을 생성합니다.
    ///
    /// 카탈로그가 없으면 인벤토리를 그대로(중복 제거만) 사용합니다.
    /// 결과는 입력에 대한 순수 함수입니다.
    pub fn merge(
        inventory: &[InventoryRecord],
        catalog: Option<&[MetadataRecord]>,
    ) -> (CanonicalTable, MergeStats) {
        let mut stats = MergeStats {
            inventory_rows: inventory.len(),
            ..MergeStats::default()
        };

        let joined = match catalog {
            Some(catalog) => {
                let (rows, matched) = left_join(inventory, catalog);
                stats.matched_rows = matched;
                rows
            }
            None => inventory.iter().map(CanonicalComponent::from_inventory).collect(),
        };
        stats.joined_rows = joined.len();

        let (rows, dropped) = dedup_by_store_path(joined);
        stats.duplicates_dropped = dropped;

        debug!(
            inventory = stats.inventory_rows,
            joined = stats.joined_rows,
            canonical = rows.len(),
            "components merged"
        );

        let table = CanonicalTable {
            rows,
            has_metadata: catalog.is_some(),
        };
        (table, stats)
    }
}

/// `name` 기준 left outer join
///
/// 인벤토리 순서를 유지하며, 각 인벤토리 행에 대해 매칭된 카탈로그 행을 파일 순서대로
/// 하나씩 결합합니다. 빈 `name`은 매칭하지 않습니다.
///
/// 반환값: (조인 결과, 매칭된 인벤토리 행 수)
pub fn left_join(
    inventory: &[InventoryRecord],
    catalog: &[MetadataRecord],
) -> (Vec<CanonicalComponent>, usize) {
    let mut index: HashMap<&str, Vec<&MetadataRecord>> = HashMap::new();
    for meta in catalog.iter().filter(|m| !m.name.is_empty()) {
        index.entry(meta.name.as_str()).or_default().push(meta);
    }

    let mut rows = Vec::with_capacity(inventory.len());
    let mut matched = 0;
    for record in inventory {
        match index.get(record.name.as_str()) {
            Some(metas) if !record.name.is_empty() => {
                matched += 1;
                rows.extend(metas.iter().map(|meta| CanonicalComponent::joined(record, meta)));
            }
            _ => rows.push(CanonicalComponent::from_inventory(record)),
        }
    }
    (rows, matched)
}

/// store path 기준 중복 제거
///
/// 각 store path의 첫 행만 남기고 상대 순서를 유지합니다.
///
/// 반환값: (남은 행, 버려진 행 수)
pub fn dedup_by_store_path(rows: Vec<CanonicalComponent>) -> (Vec<CanonicalComponent>, usize) {
    let total = rows.len();
    let mut seen = std::collections::HashSet::with_capacity(total);
    let kept: Vec<CanonicalComponent> = rows
        .into_iter()
        .filter(|row| seen.insert(row.store_path.clone()))
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inv(path: &str, name: &str) -> InventoryRecord {
        let (pname, version) = name.rsplit_once('-').unwrap_or((name, ""));
        InventoryRecord::new(path, name, pname, version)
    }

    fn meta(attr: &str, name: &str, license: &str) -> MetadataRecord {
        MetadataRecord {
            nixpkgs: attr.to_owned(),
            name: name.to_owned(),
            meta_license_short: license.to_owned(),
            ..MetadataRecord::default()
        }
    }

    #[test]
    fn merge_without_catalog_keeps_inventory() {
        let inventory = vec![inv("/nix/store/a", "a-1"), inv("/nix/store/b", "b-2")];
        let (table, stats) = ComponentMerger::merge(&inventory, None);
        assert!(!table.has_metadata);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1].pname, "b");
        assert_eq!(stats.matched_rows, 0);
        assert_eq!(stats.duplicates_dropped, 0);
    }

    #[test]
    fn dedup_keeps_first_occurrence_in_order() {
        let mut first = inv("/nix/store/a", "a-1");
        first.cpe = "first".to_owned();
        let mut second = inv("/nix/store/a", "a-1");
        second.cpe = "second".to_owned();
        let inventory = vec![first, inv("/nix/store/b", "b-1"), second, inv("/nix/store/c", "c-1")];

        let (table, stats) = ComponentMerger::merge(&inventory, None);
        let paths: Vec<_> = table.rows.iter().map(|r| r.store_path.as_str()).collect();
        assert_eq!(paths, vec!["/nix/store/a", "/nix/store/b", "/nix/store/c"]);
        assert_eq!(table.rows[0].cpe, "first");
        assert_eq!(stats.duplicates_dropped, 1);
    }

    #[test]
    fn merge_is_deterministic() {
        let inventory = vec![inv("/nix/store/a", "a-1"), inv("/nix/store/a", "a-1"), inv("/nix/store/b", "b-1")];
        let catalog = vec![meta("a", "a-1", "mit"), meta("a2", "a-1", "gpl2")];
        let first = ComponentMerger::merge(&inventory, Some(&catalog));
        let second = ComponentMerger::merge(&inventory, Some(&catalog));
        assert_eq!(first, second);
    }

    #[test]
    fn left_join_keeps_unmatched_rows() {
        let inventory = vec![inv("/nix/store/a", "a-1"), inv("/nix/store/b", "b-1")];
        let catalog = vec![meta("a", "a-1", "mit")];
        let (table, stats) = ComponentMerger::merge(&inventory, Some(&catalog));
        assert!(table.has_metadata);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].meta_license_short, "mit");
        assert_eq!(table.rows[1].meta_license_short, "");
        assert_eq!(stats.matched_rows, 1);
    }

    #[test]
    fn left_join_with_empty_catalog_keeps_everything() {
        let inventory = vec![inv("/nix/store/a", "a-1")];
        let (table, _) = ComponentMerger::merge(&inventory, Some(&[]));
        assert_eq!(table.len(), 1);
        assert!(table.has_metadata);
    }

    #[test]
    fn left_join_fans_out_on_duplicate_names() {
        let inventory = vec![inv("/nix/store/a", "a-1")];
        let catalog = vec![meta("first", "a-1", "mit"), meta("second", "a-1", "gpl2")];
        let (rows, matched) = left_join(&inventory, &catalog);
        assert_eq!(matched, 1);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].nixpkgs, "first");
        assert_eq!(rows[1].nixpkgs, "second");
    }

    #[test]
    fn fanout_resolves_to_first_catalog_entry() {
        let inventory = vec![inv("/nix/store/a", "a-1"), inv("/nix/store/b", "b-1")];
        let catalog = vec![
            meta("b", "b-1", "bsd3"),
            meta("first", "a-1", "mit"),
            meta("second", "a-1", "gpl2"),
        ];
        let (table, stats) = ComponentMerger::merge(&inventory, Some(&catalog));
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].nixpkgs, "first");
        assert_eq!(table.rows[0].meta_license_short, "mit");
        assert_eq!(table.rows[1].meta_license_short, "bsd3");
        assert_eq!(stats.joined_rows, 3);
        assert_eq!(stats.fanout_rows(), 1);
        assert_eq!(stats.duplicates_dropped, 1);
    }

    #[test]
    fn empty_names_never_match() {
        let inventory = vec![InventoryRecord::new("/nix/store/x", "", "", "")];
        let catalog = vec![meta("nameless", "", "unfree")];
        let (rows, matched) = left_join(&inventory, &catalog);
        assert_eq!(matched, 0);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].meta_license_short, "");
    }

    #[test]
    fn every_inventory_path_survives_merge() {
        let inventory: Vec<_> = (0..20)
            .map(|i| inv(&format!("/nix/store/p{}", i % 7), &format!("pkg{}-1.{}", i % 5, i)))
            .collect();
        let catalog: Vec<_> = (0..5)
            .flat_map(|i| {
                vec![
                    meta(&format!("a{i}"), &format!("pkg{i}-1.{i}"), "mit"),
                    meta(&format!("b{i}"), &format!("pkg{i}-1.{i}"), "gpl3"),
                ]
            })
            .collect();
        let (table, _) = ComponentMerger::merge(&inventory, Some(&catalog));

        let mut expected: Vec<_> = inventory.iter().map(|r| r.store_path.clone()).collect();
        expected.sort();
        expected.dedup();
        let mut actual: Vec<_> = table.rows.iter().map(|r| r.store_path.clone()).collect();
        actual.sort();
        assert_eq!(actual, expected);
    }

    // Property-based tests using proptest
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn inventory_strategy() -> impl Strategy<Value = Vec<InventoryRecord>> {
            prop::collection::vec((0u8..12, 0u8..6), 0..40).prop_map(|pairs| {
                pairs
                    .into_iter()
                    .map(|(path, name)| inv(&format!("/nix/store/p{path}"), &format!("n{name}-1")))
                    .collect()
            })
        }

        fn catalog_strategy() -> impl Strategy<Value = Vec<MetadataRecord>> {
            prop::collection::vec(0u8..8, 0..20).prop_map(|names| {
                names
                    .into_iter()
                    .enumerate()
                    .map(|(i, name)| meta(&format!("attr{i}"), &format!("n{name}-1"), &format!("l{i}")))
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn merged_store_paths_are_unique(inventory in inventory_strategy(), catalog in catalog_strategy()) {
                let (table, stats) = ComponentMerger::merge(&inventory, Some(&catalog));
                let unique: std::collections::HashSet<_> =
                    table.rows.iter().map(|r| r.store_path.as_str()).collect();
                prop_assert_eq!(unique.len(), table.len());
                prop_assert_eq!(stats.joined_rows - stats.duplicates_dropped, table.len());
            }

            #[test]
            fn every_inventory_path_survives(inventory in inventory_strategy(), catalog in catalog_strategy()) {
                let (table, _) = ComponentMerger::merge(&inventory, Some(&catalog));
                for record in &inventory {
                    prop_assert!(table.find(&record.store_path).is_some());
                }
            }

            #[test]
            fn first_catalog_match_wins(inventory in inventory_strategy(), catalog in catalog_strategy()) {
                let (table, _) = ComponentMerger::merge(&inventory, Some(&catalog));
                for row in &table.rows {
                    let expected = catalog
                        .iter()
                        .find(|m| m.name == row.name)
                        .map(|m| m.nixpkgs.as_str())
                        .unwrap_or("");
                    prop_assert_eq!(row.nixpkgs.as_str(), expected);
                }
            }
        }
    }
}
