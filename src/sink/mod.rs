//! Tabular sink: persist sheet grids as an Excel workbook.
//!
//! One worksheet per [`SheetGroup`], header in row 0, record rows from
//! row 1, every cell written as a string at its explicit (row, column)
//! coordinate. Sheet identifiers arrive already sanitized and
//! deduplicated by the mapper; no renaming happens here.

use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::error::SinkResult;
use crate::mapper::SheetGroup;

/// Write the groups to a workbook at `path`.
///
/// A run with no groups still saves a valid workbook (the writer
/// supplies a blank default sheet). On error no usable partial artifact
/// is guaranteed.
pub fn write_workbook<P: AsRef<Path>>(path: P, sheets: &[SheetGroup]) -> SinkResult<()> {
    let mut workbook = Workbook::new();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name.as_str())?;

        for (col, header) in sheet.columns.iter().enumerate() {
            worksheet.write_string(0, col as u16, header.as_str())?;
        }

        for (row, values) in sheet.rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                worksheet.write_string(row as u32 + 1, col as u16, value.as_str())?;
            }
        }
    }

    workbook.save(path.as_ref())?;
    Ok(())
}
