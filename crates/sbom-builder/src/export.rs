//! 출력 기록 -- CycloneDX JSON 파일, CSV 내보내기
//!
//! CSV는 헤더 한 줄 뒤에 행마다 한 줄을 씁니다. `,`, `"`, CR, LF를 포함한 필드는
//! 큰따옴표로 감싸고 내부의 `"`는 두 번 씁니다.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cyclonedx::CdxBom;
use crate::error::SbomBuilderError;
use crate::types::{CanonicalTable, MetadataRecord};

/// CSV 필드 하나를 인용 규칙에 맞게 변환합니다.
pub fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn write_csv_line<W: Write>(writer: &mut W, fields: &[&str]) -> std::io::Result<()> {
    let line = fields
        .iter()
        .map(|field| csv_field(field))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{line}")
}

/// 병합 결과 테이블을 CSV로 씁니다.
pub fn write_table_csv<W: Write>(table: &CanonicalTable, writer: &mut W) -> std::io::Result<()> {
    write_csv_line(writer, &table.columns())?;
    for row in &table.rows {
        write_csv_line(writer, &table.row_fields(row))?;
    }
    Ok(())
}

/// 메타데이터 카탈로그를 CSV로 씁니다.
pub fn write_catalog_csv<W: Write>(
    catalog: &[MetadataRecord],
    writer: &mut W,
) -> std::io::Result<()> {
    write_csv_line(writer, &MetadataRecord::COLUMNS)?;
    for record in catalog {
        write_csv_line(writer, &record.fields())?;
    }
    Ok(())
}

/// 대상 경로에 버퍼링된 쓰기를 수행합니다.
///
/// 파일을 열 수 없거나 쓰기에 실패하면 경로 정보를 붙인 `Io` 에러를 반환합니다.
fn write_file<F>(path: &Path, write: F) -> Result<(), SbomBuilderError>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path).map_err(|e| SbomBuilderError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).map_err(|e| SbomBuilderError::io(path, e))?;
    writer.flush().map_err(|e| SbomBuilderError::io(path, e))
}

/// CycloneDX 문서를 2칸 들여쓰기 JSON 파일로 씁니다.
pub fn write_cdx_json(bom: &CdxBom, path: &Path) -> Result<(), SbomBuilderError> {
    let json = bom.to_json_pretty()?;
    write_file(path, |w| {
        w.write_all(json.as_bytes())?;
        w.write_all(b"\n")
    })
}

/// 병합 결과 테이블을 CSV 파일로 씁니다.
pub fn write_csv(table: &CanonicalTable, path: &Path) -> Result<(), SbomBuilderError> {
    write_file(path, |w| write_table_csv(table, w))
}

/// 메타데이터 카탈로그를 CSV 파일로 씁니다.
pub fn write_catalog_dump(catalog: &[MetadataRecord], path: &Path) -> Result<(), SbomBuilderError> {
    write_file(path, |w| write_catalog_csv(catalog, w))
}
