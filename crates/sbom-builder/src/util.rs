//! 입력 파일 읽기 유틸리티 -- 공유 헬퍼 함수

use std::path::Path;

use crate::error::SbomBuilderError;

/// 크기 제한을 확인한 뒤 파일 전체를 UTF-8 문자열로 읽습니다.
///
/// # Errors
///
/// - 파일이 없거나 읽을 수 없으면 `SbomBuilderError::Io`
/// - 파일 크기가 `max_size`를 넘으면 `SbomBuilderError::FileTooBig`
pub fn read_to_string_limited(path: &Path, max_size: u64) -> Result<String, SbomBuilderError> {
    let metadata = std::fs::metadata(path).map_err(|e| SbomBuilderError::io(path, e))?;

    let size = metadata.len();
    if size > max_size {
        return Err(SbomBuilderError::FileTooBig {
            path: path.display().to_string(),
            size,
            max: max_size,
        });
    }

    std::fs::read_to_string(path).map_err(|e| SbomBuilderError::io(path, e))
}
