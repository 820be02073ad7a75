//! # Sheetload - XML export repair and workbook conversion
//!
//! Sheetload converts semi-structured, record-oriented XML exports into
//! multi-sheet Excel workbooks, tolerating the malformed markup that
//! upstream tools produce when they embed raw HTML inside data fields.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  XML File   │────▶│  Repairer   │────▶│   Mapper    │────▶│  Workbook   │
//! │ (any enc.)  │     │ (entities)  │     │ (schema inf)│     │  (.xlsx)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sheetload::{convert_file, ConvertOptions};
//! use std::path::Path;
//!
//! let report = convert_file(Path::new("export.xml"), ConvertOptions::default())?;
//! println!("Wrote {} sheets", report.sheets.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`source`] - File reading with encoding auto-detection
//! - [`repair`] - Entity repairer for ill-formed spans
//! - [`tree`] - Owned XML element tree
//! - [`mapper`] - Sheet Groups, union schema, output grids
//! - [`sink`] - Workbook writer
//! - [`pipeline`] - End-to-end orchestration

// Core modules
pub mod error;

// Reading
pub mod source;

// Repair
pub mod repair;

// Parsing
pub mod tree;

// Mapping
pub mod mapper;

// Writing
pub mod sink;

// Orchestration
pub mod pipeline;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ParseError, PipelineError, SinkError, SourceError};

// =============================================================================
// Re-exports - Source
// =============================================================================

pub use source::{read_document, Document};

// =============================================================================
// Re-exports - Repair
// =============================================================================

pub use repair::{count_spans, repair_document, repair_span_text};

// =============================================================================
// Re-exports - Tree
// =============================================================================

pub use tree::{parse_document, Element};

// =============================================================================
// Re-exports - Mapper
// =============================================================================

pub use mapper::{map_tree, SheetGroup};

// =============================================================================
// Re-exports - Sink
// =============================================================================

pub use sink::write_workbook;

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{
    convert_file, inspect_file, repair_file, ConvertOptions, ConvertReport, InspectReport,
    RepairReport, SheetSummary,
};
