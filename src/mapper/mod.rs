//! Tabular mapper: element tree to rectangular sheet grids.
//!
//! Each direct child of the document root becomes one Sheet Group.
//! Within a group, `record` descendants are rows and `column` children
//! carrying a `name` attribute are cells. The group's schema is the
//! *union* of field names across its records, never the intersection: a
//! record missing a field renders as a blank cell, never as a rejected
//! row.
//!
//! ```text
//! <export>                     Sheet "orders"
//!   <orders>                   ┌───────┬───────┐
//!     <record>                 │ id    │ total │
//!       <column name="id">7    ├───────┼───────┤
//!       <column name="total">9 │ 7     │ 9     │
//!     </record>                └───────┴───────┘
//!   </orders>
//!   ...
//! </export>
//! ```

pub mod names;

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use serde::Serialize;

use crate::tree::Element;

/// Element tag that marks a row.
const RECORD_TAG: &str = "record";

/// Element tag that marks a cell.
const COLUMN_TAG: &str = "column";

/// Attribute that names a cell's column.
const NAME_ATTR: &str = "name";

/// One sheet's identifier and output grid.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SheetGroup {
    /// Sheet identifier, already sanitized to the sink's constraints.
    pub name: String,
    /// Header row: the sorted union of field names seen in the group.
    pub columns: Vec<String>,
    /// One row per record, values aligned to `columns`, blanks for
    /// missing fields.
    pub rows: Vec<Vec<String>>,
}

/// Map a parsed document to its ordered sequence of Sheet Groups.
///
/// Root children are visited in document order; their tag names are
/// sanitized, truncated and disambiguated against the names already
/// assigned (see [`names`]).
pub fn map_tree(root: &Element) -> Vec<SheetGroup> {
    let mut used: HashSet<String> = HashSet::new();
    let mut sheets = Vec::with_capacity(root.children.len());

    for child in &root.children {
        let candidate = names::sanitize_candidate(&child.tag);
        let name = names::disambiguate(&candidate, &used);
        used.insert(name.clone());
        sheets.push(map_group(name, child));
    }

    sheets
}

/// Build one Sheet Group from a root child.
///
/// Two passes over the group's records: the first fixes the Column Set
/// as the sorted union of field names, the second emits rows against
/// that fixed set.
fn map_group(name: String, group: &Element) -> SheetGroup {
    let records = collect_records(group);
    let field_maps: Vec<IndexMap<String, String>> =
        records.iter().map(|r| record_fields(r)).collect();

    // Pass 1: union of field names, sorted.
    let mut column_set: BTreeSet<&str> = BTreeSet::new();
    for fields in &field_maps {
        column_set.extend(fields.keys().map(String::as_str));
    }
    let columns: Vec<String> = column_set.into_iter().map(String::from).collect();

    // Pass 2: emit the grid against the fixed Column Set.
    let rows = field_maps
        .iter()
        .map(|fields| {
            columns
                .iter()
                .map(|column| fields.get(column).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    SheetGroup {
        name,
        columns,
        rows,
    }
}

/// Collect `record` descendants of a group element in document order.
fn collect_records(group: &Element) -> Vec<&Element> {
    let mut records = Vec::new();
    walk_records(group, &mut records);
    records
}

fn walk_records<'a>(element: &'a Element, out: &mut Vec<&'a Element>) {
    for child in &element.children {
        if child.tag == RECORD_TAG {
            out.push(child);
        }
        walk_records(child, out);
    }
}

/// Extract one record's fields as an insertion-ordered name-to-text map.
///
/// Columns without a `name` attribute are excluded entirely. Duplicate
/// names within one record resolve to the last occurrence in document
/// order.
fn record_fields(record: &Element) -> IndexMap<String, String> {
    let mut fields = IndexMap::new();

    for child in &record.children {
        if child.tag != COLUMN_TAG {
            continue;
        }
        if let Some(name) = child.attribute(NAME_ATTR) {
            fields.insert(name.to_string(), child.text.clone());
        }
    }

    fields
}
