//! High-level pipeline API: source → repair → parse → map → sink.
//!
//! Each function processes exactly one input document; no state is held
//! across runs, and the stages execute strictly in sequence. Failures
//! are never retried: the first diagnostic aborts the run and no
//! workbook artifact is written.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheetload::pipeline::{convert_file, ConvertOptions};
//! use std::path::Path;
//!
//! let report = convert_file(Path::new("export.xml"), ConvertOptions::default())?;
//! println!("Wrote {} sheets to {}", report.sheets.len(), report.workbook.display());
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::PipelineResult;
use crate::mapper::{map_tree, SheetGroup};
use crate::repair::{count_spans, repair_document};
use crate::sink::write_workbook;
use crate::source::read_document;
use crate::tree::parse_document;

/// Suffix inserted before the extension of the repaired artifact.
const REPAIRED_SUFFIX: &str = "_repaired";

/// Extension of the output workbook.
const WORKBOOK_EXT: &str = "xlsx";

/// Options for the conversion pipeline.
///
/// The whole configuration surface: the output workbook name. Everything
/// else is derived from the input path.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Workbook file name override; the `.xlsx` extension is appended
    /// when absent. Defaults to the source base name.
    pub output: Option<String>,
}

/// Per-sheet summary for reports.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SheetSummary {
    /// Final sheet identifier.
    pub name: String,
    /// Number of record rows.
    pub records: usize,
    /// Number of columns in the inferred schema.
    pub columns: usize,
}

impl SheetSummary {
    fn from_group(group: &SheetGroup) -> Self {
        Self {
            name: group.name.clone(),
            records: group.rows.len(),
            columns: group.columns.len(),
        }
    }
}

/// Result of a full conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    /// Input document path.
    pub source: PathBuf,
    /// Path of the repaired XML artifact.
    pub repaired: PathBuf,
    /// Path of the workbook written.
    pub workbook: PathBuf,
    /// Detected source encoding.
    pub encoding: String,
    /// Number of data-bearing spans visited by the repairer.
    pub spans: usize,
    /// Per-sheet summaries, in document order.
    pub sheets: Vec<SheetSummary>,
}

/// Result of a repair-only run.
#[derive(Debug, Clone, Serialize)]
pub struct RepairReport {
    /// Input document path.
    pub source: PathBuf,
    /// Path of the repaired XML artifact.
    pub repaired: PathBuf,
    /// Detected source encoding.
    pub encoding: String,
    /// Number of data-bearing spans visited.
    pub spans: usize,
    /// Whether the repair changed anything.
    pub changed: bool,
}

/// Result of an inspect run (no artifacts written).
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    /// Input document path.
    pub source: PathBuf,
    /// Detected source encoding.
    pub encoding: String,
    /// Number of data-bearing spans visited.
    pub spans: usize,
    /// Per-sheet summaries, in document order.
    pub sheets: Vec<SheetSummary>,
}

/// Convert one XML export into a workbook.
///
/// 1. Reads and decodes the source (replacement policy for bad bytes)
/// 2. Repairs data-bearing spans and writes the `_repaired` artifact
/// 3. Parses the repaired text
/// 4. Maps the tree to Sheet Groups
/// 5. Writes the workbook
pub fn convert_file(path: &Path, options: ConvertOptions) -> PipelineResult<ConvertReport> {
    let document = read_document(path)?;

    let repaired_text = repair_document(&document.text);
    let repaired = repaired_path(path);
    std::fs::write(&repaired, &repaired_text)?;

    let root = parse_document(&repaired_text)?;
    let sheets = map_tree(&root);

    let workbook = workbook_path(path, options.output.as_deref());
    write_workbook(&workbook, &sheets)?;

    Ok(ConvertReport {
        source: path.to_path_buf(),
        repaired,
        workbook,
        encoding: document.encoding,
        spans: count_spans(&document.text),
        sheets: sheets.iter().map(SheetSummary::from_group).collect(),
    })
}

/// Run only the entity repairer and write the `_repaired` artifact.
pub fn repair_file(path: &Path) -> PipelineResult<RepairReport> {
    let document = read_document(path)?;

    let repaired_text = repair_document(&document.text);
    let repaired = repaired_path(path);
    std::fs::write(&repaired, &repaired_text)?;

    Ok(RepairReport {
        source: path.to_path_buf(),
        repaired,
        changed: repaired_text != document.text,
        encoding: document.encoding,
        spans: count_spans(&document.text),
    })
}

/// Repair, parse and map in memory without writing any artifact.
pub fn inspect_file(path: &Path) -> PipelineResult<InspectReport> {
    let document = read_document(path)?;

    let repaired_text = repair_document(&document.text);
    let root = parse_document(&repaired_text)?;
    let sheets = map_tree(&root);

    Ok(InspectReport {
        source: path.to_path_buf(),
        encoding: document.encoding,
        spans: count_spans(&document.text),
        sheets: sheets.iter().map(SheetSummary::from_group).collect(),
    })
}

/// Path of the repaired artifact: `_repaired` inserted before the
/// original extension, alongside the original.
pub fn repaired_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, REPAIRED_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, REPAIRED_SUFFIX),
    };

    path.with_file_name(file_name)
}

/// Path of the output workbook.
///
/// Defaults to the source base name with the workbook extension; an
/// explicit override is used as given, gaining the extension only when
/// absent. Relative overrides resolve next to the source document.
pub fn workbook_path(source: &Path, output: Option<&str>) -> PathBuf {
    match output {
        Some(name) => {
            let named = PathBuf::from(name);
            let named = match named.extension() {
                Some(ext) if ext.eq_ignore_ascii_case(WORKBOOK_EXT) => named,
                _ => PathBuf::from(format!("{}.{}", name, WORKBOOK_EXT)),
            };
            if named.is_absolute() || named.parent().is_some_and(|p| !p.as_os_str().is_empty()) {
                named
            } else {
                source.with_file_name(named)
            }
        }
        None => source.with_extension(WORKBOOK_EXT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use std::fs;

    const SAMPLE: &str = "<export>\
        <Sales>\
          <record>\
            <column name=\"id\">1</column>\
            <column name=\"note\"><b>Big & bold</b>&bogus;</column>\
          </record>\
          <record>\
            <column name=\"id\">2</column>\
            <column name=\"total\">9.50</column>\
          </record>\
        </Sales>\
        <Sales>\
          <record><column name=\"id\">3</column></record>\
        </Sales>\
      </export>";

    fn write_sample(dir: &Path) -> PathBuf {
        let path = dir.join("export.xml");
        fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn test_repaired_path_inserts_suffix_before_extension() {
        assert_eq!(
            repaired_path(Path::new("/data/export.xml")),
            PathBuf::from("/data/export_repaired.xml")
        );
        assert_eq!(
            repaired_path(Path::new("noext")),
            PathBuf::from("noext_repaired")
        );
    }

    #[test]
    fn test_workbook_path_defaults_to_source_base_name() {
        assert_eq!(
            workbook_path(Path::new("/data/export.xml"), None),
            PathBuf::from("/data/export.xlsx")
        );
    }

    #[test]
    fn test_workbook_path_override_gains_extension() {
        assert_eq!(
            workbook_path(Path::new("/data/export.xml"), Some("report")),
            PathBuf::from("/data/report.xlsx")
        );
        assert_eq!(
            workbook_path(Path::new("/data/export.xml"), Some("report.xlsx")),
            PathBuf::from("/data/report.xlsx")
        );
        assert_eq!(
            workbook_path(Path::new("/data/export.xml"), Some("/tmp/out")),
            PathBuf::from("/tmp/out.xlsx")
        );
    }

    #[test]
    fn test_convert_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());

        let report = convert_file(&input, ConvertOptions::default()).unwrap();

        assert_eq!(report.encoding, "utf-8");
        assert_eq!(report.spans, 5);
        assert_eq!(report.repaired, dir.path().join("export_repaired.xml"));
        assert_eq!(report.workbook, dir.path().join("export.xlsx"));
        assert!(report.repaired.is_file());
        assert!(report.workbook.is_file());

        let summaries: Vec<(&str, usize, usize)> = report
            .sheets
            .iter()
            .map(|s| (s.name.as_str(), s.records, s.columns))
            .collect();
        assert_eq!(
            summaries,
            vec![("Sales", 2, 3), ("Sales_1", 1, 1)]
        );

        // The repaired artifact is parseable and the span content is safe.
        let repaired = fs::read_to_string(&report.repaired).unwrap();
        assert!(repaired.contains("&lt;b&gt;Big &amp; bold&lt;/b&gt;"));
        assert!(!repaired.contains("&bogus;"));
    }

    #[test]
    fn test_convert_missing_file_is_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_file(&dir.path().join("none.xml"), ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Source(_)));
    }

    #[test]
    fn test_convert_unparseable_input_writes_no_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.xml");
        // Unbalanced tags outside any data-bearing span; repair cannot help.
        fs::write(&input, "<root><open></root>").unwrap();

        let err = convert_file(&input, ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Parse(_)));
        assert!(!dir.path().join("broken.xlsx").exists());
        // The repair artifact is the repair step's own output and exists.
        assert!(dir.path().join("broken_repaired.xml").exists());
    }

    #[test]
    fn test_convert_with_output_override() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());

        let report = convert_file(
            &input,
            ConvertOptions {
                output: Some("custom-name".to_string()),
            },
        )
        .unwrap();

        assert_eq!(report.workbook, dir.path().join("custom-name.xlsx"));
        assert!(report.workbook.is_file());
    }

    #[test]
    fn test_repair_file_reports_changes() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());

        let report = repair_file(&input).unwrap();
        assert!(report.changed);
        assert_eq!(report.spans, 5);
        assert!(report.repaired.is_file());

        // Re-running on the repaired artifact is a no-op.
        let again = repair_file(&report.repaired).unwrap();
        assert!(!again.changed);
    }

    #[test]
    fn test_inspect_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());

        let report = inspect_file(&input).unwrap();
        assert_eq!(report.sheets.len(), 2);
        assert_eq!(report.sheets[0].name, "Sales");

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("export.xml")]);
    }
}
