//! File source with encoding auto-detection and lossy decoding.
//!
//! Reads the raw XML export into memory. Exports from upstream tools
//! arrive in whatever encoding the tool felt like using, so the bytes
//! are sniffed with chardet and decoded with a replacement policy:
//! undecodable sequences become U+FFFD instead of failing the run.

use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

use crate::error::{SourceError, SourceResult};

/// A decoded source document with read metadata.
#[derive(Debug, Clone)]
pub struct Document {
    /// Decoded text content.
    pub text: String,
    /// Detected encoding label.
    pub encoding: String,
    /// Whether any bytes were replaced during decoding.
    pub had_replacements: bool,
}

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes with the given encoding label, substituting U+FFFD for
/// anything undecodable. Unknown labels fall back to UTF-8.
pub fn decode_text(bytes: &[u8], encoding: &str) -> (String, bool) {
    let encoding = Encoding::for_label(encoding.as_bytes()).unwrap_or(UTF_8);
    let (text, _, had_replacements) = encoding.decode(bytes);
    (text.into_owned(), had_replacements)
}

/// Read a source document from disk.
///
/// The path must resolve to a regular file; anything else is reported as
/// [`SourceError::NotFound`] before any bytes are read. Decoding never
/// fails: bad bytes are replaced, and the caller can inspect
/// [`Document::had_replacements`] to warn about it.
pub fn read_document<P: AsRef<Path>>(path: P) -> SourceResult<Document> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;
    let encoding = detect_encoding(&bytes);
    let (text, had_replacements) = decode_text(&bytes, &encoding);

    Ok(Document {
        text,
        encoding,
        had_replacements,
    })
}
