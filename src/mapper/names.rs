//! Sheet identifier derivation.
//!
//! The sink caps sheet names at 31 characters and requires uniqueness
//! within a workbook. Disambiguation is a pure function over the
//! candidate name and the set of names already taken, so the only
//! cross-sheet shared state in the pipeline is passed explicitly.

use std::collections::HashSet;

/// Maximum sheet identifier length imposed by the sink.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Characters the sink rejects in sheet names.
const FORBIDDEN: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Normalize a tag name into a sheet name candidate.
///
/// XML tags may legally contain characters (`:` in particular) that
/// the sink rejects; those become underscores. An empty tag is not
/// producible by the parser, but the fallback keeps this total.
pub fn sanitize_candidate(tag: &str) -> String {
    let sanitized: String = tag
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();

    if sanitized.is_empty() {
        "Sheet".to_string()
    } else {
        sanitized
    }
}

/// Truncate to the maximum identifier length, by characters.
pub fn truncate(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME_LEN).collect()
}

/// Resolve a candidate against the names already in use.
///
/// The candidate is truncated first; on collision, `_N` is appended for
/// the smallest positive N, trimming the base so the suffixed name
/// still fits the length cap. This terminates even when many tags share
/// a 31-character truncated prefix, since the suffix itself always
/// survives the final truncation.
pub fn disambiguate(candidate: &str, used: &HashSet<String>) -> String {
    let base = truncate(candidate);
    if !used.contains(&base) {
        return base;
    }

    let mut n: u32 = 1;
    loop {
        let suffix = format!("_{}", n);
        let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
        let trimmed: String = base.chars().take(keep).collect();
        let name = format!("{}{}", trimmed, suffix);
        if !used.contains(&name) {
            return name;
        }
        n += 1;
    }
}
