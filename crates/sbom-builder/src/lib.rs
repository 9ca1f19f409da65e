#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`SbomBuilderError`)
//! - [`config`]: Builder configuration (`SbomBuilderConfig`, builder)
//! - [`types`]: Per-stage records (`InventoryRecord`, `MetadataRecord`, `CanonicalComponent`, `CanonicalTable`)
//! - [`inventory`]: Inventory sources (`InventorySource` trait, `StaticInventory`, `JsonInventoryFile`)
//! - [`catalog`]: nixpkgs meta catalog loader (`MetadataCatalogLoader`, `MetaField`)
//! - [`merge`]: Left join and store path dedup (`ComponentMerger`, `MergeStats`)
//! - [`cyclonedx`]: CycloneDX 1.3 document model and component projection
//! - [`export`]: JSON and CSV writers
//! - [`observer`]: Build progress reporting (`BuildObserver`, `TracingObserver`)
//! - [`builder`]: Main orchestrator (`SbomBuilder`, `BuildRequest`, `BuildReport`)

pub mod builder;
pub mod catalog;
pub mod config;
pub mod cyclonedx;
pub mod error;
pub mod export;
pub mod inventory;
pub mod merge;
pub mod observer;
pub mod types;
mod util;

// --- Public API Re-exports ---

// Builder (main orchestrator)
pub use builder::{BuildReport, BuildRequest, SbomBuilder, WrittenOutput, assemble_document};

// Configuration
pub use config::{SbomBuilderConfig, SbomBuilderConfigBuilder};

// Error
pub use error::SbomBuilderError;

// Types
pub use types::{CanonicalComponent, CanonicalTable, InventoryRecord, MetadataRecord};

// Inputs
pub use catalog::{MetadataCatalogLoader, parse_catalog};
pub use inventory::{InventorySource, JsonInventoryFile, StaticInventory, parse_inventory};

// Merge
pub use merge::{ComponentMerger, MergeStats};

// CycloneDX
pub use cyclonedx::{CdxBom, CdxComponent, CdxTool, LicenseSource, make_purl, project_component};

// Observer
pub use observer::{BuildObserver, OutputKind, TracingObserver};
