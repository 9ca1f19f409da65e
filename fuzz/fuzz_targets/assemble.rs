#![no_main]

use std::collections::HashSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use nixbom_sbom_builder::{
    ComponentMerger, InventoryRecord, LicenseSource, MetadataRecord, SbomBuilderConfig,
    assemble_document,
};

/// 퍼저용 구조적 병합 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    inventory: Vec<FuzzInventory>,
    catalog: Option<Vec<FuzzMeta>>,
    target_index: u8,
    spdx: bool,
}

#[derive(Arbitrary, Debug)]
struct FuzzInventory {
    /// 작은 값으로 store path 충돌을 유도
    path_id: u8,
    name_id: u8,
    version: String,
    cpe: String,
}

#[derive(Arbitrary, Debug)]
struct FuzzMeta {
    name_id: u8,
    license_short: String,
    license_spdxid: String,
}

fuzz_target!(|input: FuzzInput| {
    let inventory: Vec<InventoryRecord> = input
        .inventory
        .iter()
        .take(200)
        .map(|r| {
            let pname = format!("pkg{}", r.name_id % 16);
            InventoryRecord::new(
                format!("/nix/store/{}", r.path_id % 32),
                format!("{pname}-{}", r.version),
                pname,
                r.version.clone(),
            )
            .with_cpe(r.cpe.clone())
        })
        .collect();

    let catalog: Option<Vec<MetadataRecord>> = input.catalog.as_ref().map(|entries| {
        entries
            .iter()
            .take(200)
            .enumerate()
            .map(|(i, m)| MetadataRecord {
                nixpkgs: format!("attr{i}"),
                name: inventory
                    .get(m.name_id as usize % inventory.len().max(1))
                    .map(|r| r.name.clone())
                    .unwrap_or_default(),
                meta_license_short: m.license_short.clone(),
                meta_license_spdxid: m.license_spdxid.clone(),
                ..MetadataRecord::default()
            })
            .collect()
    });

    let (table, stats) = ComponentMerger::merge(&inventory, catalog.as_deref());

    // 중복 제거 후 store path는 유일하고, 인벤토리의 모든 경로가 남아야 한다
    let paths: HashSet<&str> = table.rows.iter().map(|r| r.store_path.as_str()).collect();
    assert_eq!(paths.len(), table.len());
    assert!(inventory.iter().all(|r| paths.contains(r.store_path.as_str())));
    assert_eq!(stats.joined_rows - stats.duplicates_dropped, table.len());

    let target = table
        .rows
        .get(input.target_index as usize % table.len().max(1))
        .map(|r| r.store_path.clone())
        .unwrap_or_default();
    let license_source = if input.spdx {
        LicenseSource::Spdx
    } else {
        LicenseSource::Short
    };
    // purl은 인코딩되므로 임의의 버전 문자열에도 조립은 실패하지 않는다
    let (bom, root_found) = assemble_document(
        &table,
        &target,
        SbomBuilderConfig::default().tool(),
        license_source,
    )
    .expect("assembly must succeed for any version string");
    assert_eq!(root_found, !table.is_empty());
    assert_eq!(bom.component_count(), table.len());

    for component in bom.components.iter().chain(bom.metadata.component.as_ref()) {
        // 인코딩된 purl에는 버전 구분자 `@`가 최대 하나
        assert!(component.purl.matches('@').count() <= 1, "{}", component.purl);
        if let Some(licenses) = &component.licenses {
            assert!(!licenses.is_empty());
        }
    }

    let json = bom.to_json_pretty().expect("serialization must succeed");
    let _: serde_json::Value = serde_json::from_str(&json).expect("output must be valid JSON");
});
