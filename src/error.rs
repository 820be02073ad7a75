//! Error types for the Sheetload conversion pipeline.
//!
//! This module defines one error type per pipeline stage:
//!
//! - [`SourceError`] - reading and decoding the input document
//! - [`ParseError`] - XML parsing of the repaired document
//! - [`SinkError`] - writing the output workbook
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! A record missing some of its Sheet Group's columns is *not* an
//! error anywhere in this hierarchy; the mapper fills blank cells.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// File Source Errors
// =============================================================================

/// Errors while reading the source document.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The input path does not exist or is not a regular file.
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read the file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// XML Parse Errors
// =============================================================================

/// Errors while parsing the repaired XML.
///
/// Repair is best-effort: unbalanced markup outside data-bearing spans
/// can still reach the parser, and surfaces here with the underlying
/// diagnostic.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not well-formed XML.
    #[error("Malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    /// The document contains no root element.
    #[error("Document has no root element")]
    NoRoot,
}

// =============================================================================
// Tabular Sink Errors
// =============================================================================

/// Errors while writing the output workbook.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The workbook writer rejected a sheet or failed to serialize.
    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// Destination could not be written.
    #[error("Failed to write workbook: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::pipeline::convert_file`].
/// No stage is retried; the run aborts with the first diagnostic and the
/// workbook artifact is never written on failure.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Source reading error.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// XML parsing error.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Workbook writing error.
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// IO error outside source/sink (e.g. writing the repaired artifact).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // SourceError -> PipelineError
        let src_err = SourceError::NotFound(PathBuf::from("missing.xml"));
        let pipeline_err: PipelineError = src_err.into();
        assert!(pipeline_err.to_string().contains("missing.xml"));

        // ParseError -> PipelineError
        let parse_err = ParseError::Malformed {
            position: 42,
            message: "unexpected end tag".into(),
        };
        let pipeline_err: PipelineError = parse_err.into();
        assert!(pipeline_err.to_string().contains("byte 42"));
    }

    #[test]
    fn test_parse_error_format() {
        let err = ParseError::Malformed {
            position: 7,
            message: "ill-formed document".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("byte 7"));
        assert!(msg.contains("ill-formed document"));
    }
}
