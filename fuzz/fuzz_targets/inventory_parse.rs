#![no_main]

use libfuzzer_sys::fuzz_target;
use nixbom_sbom_builder::parse_inventory;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let _ = parse_inventory(content, "fuzz/inventory.json");
    }
});
