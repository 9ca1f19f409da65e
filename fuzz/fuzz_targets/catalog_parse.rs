#![no_main]

use libfuzzer_sys::fuzz_target;
use nixbom_sbom_builder::parse_catalog;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(records) = parse_catalog(content, "fuzz/meta.json") {
            // 정규화된 레코드의 모든 필드에 접근 가능해야 한다
            for record in &records {
                let _ = record.fields();
            }
        }
    }
});
