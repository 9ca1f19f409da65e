//! SBOM 빌더 오케스트레이터 -- 전체 생성 흐름 관리
//!
//! # 내부 아키텍처
//!
//! ```text
//! InventorySource --+
//!                   +--> ComponentMerger --> CanonicalTable --+--> assemble --> CdxBom --> JSON
//! catalog (opt) ----+                                         |
//!                                                             +--> CSV
//! ```
//!
//! 모든 단계는 동기적으로 실행되며 각 단계는 입력 전체를 소비합니다.
//! 비동기 런타임에서는 `spawn_blocking` 안에서 호출합니다.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::catalog::MetadataCatalogLoader;
use crate::config::SbomBuilderConfig;
use crate::cyclonedx::{CdxBom, CdxTool, LicenseSource, project_component};
use crate::error::SbomBuilderError;
use crate::export;
use crate::inventory::InventorySource;
use crate::merge::{ComponentMerger, MergeStats};
use crate::observer::{BuildObserver, OutputKind, TracingObserver};
use crate::types::{CanonicalTable, MetadataRecord};

/// 정규화된 테이블로 CycloneDX 문서를 조립합니다.
///
/// `store_path`가 `target`과 같은 행은 `metadata.component`가 되고,
/// 나머지는 테이블 순서대로 `components`에 추가됩니다.
///
/// 반환값: (문서, 루트 발견 여부)
///
/// # Errors
///
/// `packageurl`이 행의 이름이나 버전을 거부하면 `SbomBuilderError::Purl`
pub fn assemble_document(
    table: &CanonicalTable,
    target: &str,
    tool: CdxTool,
    license_source: LicenseSource,
) -> Result<(CdxBom, bool), SbomBuilderError> {
    let mut bom = CdxBom::new(tool);
    bom.components.reserve(table.len());

    for row in &table.rows {
        let component = project_component(row, license_source)?;
        if row.store_path == target && bom.metadata.component.is_none() {
            bom.metadata.component = Some(component);
        } else {
            bom.components.push(component);
        }
    }

    let root_found = bom.metadata.component.is_some();
    Ok((bom, root_found))
}

/// 한 번의 빌드 요청
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    /// 루트 컴포넌트가 될 store path
    pub target: String,
    /// 메타데이터 카탈로그 파일
    pub meta_path: Option<PathBuf>,
    /// CycloneDX JSON 출력 경로
    pub cdx_path: Option<PathBuf>,
    /// CSV 출력 경로
    pub csv_path: Option<PathBuf>,
}

impl BuildRequest {
    /// 대상 store path로 요청을 생성합니다.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// 메타데이터 카탈로그 경로를 설정합니다.
    pub fn meta(mut self, path: impl Into<PathBuf>) -> Self {
        self.meta_path = Some(path.into());
        self
    }

    /// CycloneDX 출력 경로를 설정합니다.
    pub fn cdx(mut self, path: impl Into<PathBuf>) -> Self {
        self.cdx_path = Some(path.into());
        self
    }

    /// CSV 출력 경로를 설정합니다.
    pub fn csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_path = Some(path.into());
        self
    }
}

/// 기록된 출력 파일
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenOutput {
    pub kind: OutputKind,
    pub path: PathBuf,
}

/// 빌드 결과 요약
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    /// 대상 store path
    pub target: String,
    /// 문서 일련번호
    pub serial_number: String,
    /// 입력 인벤토리 레코드 수
    pub inventory_records: usize,
    /// 카탈로그 엔트리 수 (카탈로그를 쓰지 않았으면 `None`)
    pub catalog_entries: Option<usize>,
    /// 중복 제거 후 컴포넌트 수
    pub canonical_components: usize,
    /// 문서에 포함된 컴포넌트 수 (루트 포함)
    pub emitted_components: usize,
    /// 중복 제거로 버려진 행 수
    pub duplicates_dropped: usize,
    /// 루트 컴포넌트 발견 여부
    pub root_found: bool,
    /// 기록된 파일 목록
    pub outputs: Vec<WrittenOutput>,
}

/// SBOM 빌더
///
/// 인벤토리 로드, 카탈로그 병합, 문서 조립, 출력 기록을 순서대로 수행합니다.
/// 진행 상황은 생성 시 넘겨받은 [`BuildObserver`]로 보고합니다.
pub struct SbomBuilder {
    config: SbomBuilderConfig,
    observer: Arc<dyn BuildObserver>,
    catalog_loader: MetadataCatalogLoader,
}

impl SbomBuilder {
    /// 기본 관찰자([`TracingObserver`])로 빌더를 생성합니다.
    pub fn new(config: SbomBuilderConfig) -> Self {
        Self::with_observer(config, Arc::new(TracingObserver))
    }

    /// 관찰자를 지정하여 빌더를 생성합니다.
    pub fn with_observer(config: SbomBuilderConfig, observer: Arc<dyn BuildObserver>) -> Self {
        let catalog_loader = MetadataCatalogLoader::new(config.max_input_size);
        Self {
            config,
            observer,
            catalog_loader,
        }
    }

    /// 빌더 설정
    pub fn config(&self) -> &SbomBuilderConfig {
        &self.config
    }

    /// 메타데이터 카탈로그를 로드합니다.
    ///
    /// 덤프 경로가 설정되어 있으면 로드한 카탈로그를 CSV로 기록합니다.
    pub fn load_catalog(&self, path: &Path) -> Result<Vec<MetadataRecord>, SbomBuilderError> {
        let catalog = self.catalog_loader.load(path)?;
        self.observer.catalog_loaded(path, catalog.len());

        if let Some(dump_path) = &self.config.catalog_dump_path {
            export::write_catalog_dump(&catalog, dump_path)?;
            self.observer.file_written(dump_path, OutputKind::CatalogDump);
        }
        Ok(catalog)
    }

    /// 인벤토리와 (선택적) 카탈로그를 병합하여 정규화된 테이블을 만듭니다.
    pub fn merge(
        &self,
        inventory: &dyn InventorySource,
        catalog: Option<&[MetadataRecord]>,
    ) -> Result<(CanonicalTable, MergeStats), SbomBuilderError> {
        debug!(source = %inventory.describe(), "loading inventory");
        let records = inventory.load()?;
        self.observer.inventory_loaded(records.len());

        let (table, stats) = ComponentMerger::merge(&records, catalog);
        self.observer.components_merged(&stats, table.len());
        Ok((table, stats))
    }

    /// CycloneDX 문서를 조립합니다.
    ///
    /// 대상 store path가 테이블에 없으면 관찰자에 경고를 보내고 루트 없이 조립합니다.
    /// strict root 모드에서는 `RootComponentNotFound`로 실패합니다.
    pub fn assemble(&self, table: &CanonicalTable, target: &str) -> Result<CdxBom, SbomBuilderError> {
        let (bom, root_found) =
            assemble_document(table, target, self.config.tool(), self.config.license_source)?;

        if !root_found {
            if self.config.strict_root {
                return Err(SbomBuilderError::RootComponentNotFound {
                    target: target.to_owned(),
                });
            }
            self.observer.root_missing(target);
        }

        self.observer.document_assembled(bom.component_count());
        Ok(bom)
    }

    /// CycloneDX 문서를 파일로 기록합니다.
    pub fn write_cdx(&self, bom: &CdxBom, path: &Path) -> Result<(), SbomBuilderError> {
        export::write_cdx_json(bom, path)?;
        self.observer.file_written(path, OutputKind::CycloneDx);
        Ok(())
    }

    /// 정규화된 테이블을 CSV 파일로 기록합니다.
    pub fn write_csv(&self, table: &CanonicalTable, path: &Path) -> Result<(), SbomBuilderError> {
        export::write_csv(table, path)?;
        self.observer.file_written(path, OutputKind::Csv);
        Ok(())
    }

    /// 전체 파이프라인을 실행합니다.
    ///
    /// 부분 출력 복구는 하지 않으며 첫 에러에서 중단합니다.
    pub fn run(
        &self,
        inventory: &dyn InventorySource,
        request: &BuildRequest,
    ) -> Result<BuildReport, SbomBuilderError> {
        let catalog = request
            .meta_path
            .as_deref()
            .map(|path| self.load_catalog(path))
            .transpose()?;

        let (table, stats) = self.merge(inventory, catalog.as_deref())?;
        let bom = self.assemble(&table, &request.target)?;

        let mut outputs = Vec::new();
        if let Some(path) = &request.cdx_path {
            self.write_cdx(&bom, path)?;
            outputs.push(WrittenOutput {
                kind: OutputKind::CycloneDx,
                path: path.clone(),
            });
        }
        if let Some(path) = &request.csv_path {
            self.write_csv(&table, path)?;
            outputs.push(WrittenOutput {
                kind: OutputKind::Csv,
                path: path.clone(),
            });
        }

        Ok(BuildReport {
            target: request.target.clone(),
            serial_number: bom.serial_number.clone(),
            inventory_records: stats.inventory_rows,
            catalog_entries: catalog.as_ref().map(Vec::len),
            canonical_components: table.len(),
            emitted_components: bom.component_count(),
            duplicates_dropped: stats.duplicates_dropped,
            root_found: bom.metadata.component.is_some(),
            outputs,
        })
    }
}
