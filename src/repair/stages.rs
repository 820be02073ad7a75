//! Ordered text-transform stages applied inside a data-bearing span.
//!
//! Each stage is a pure `&str -> String` transform. Their order is
//! load-bearing: running [`escape_bare_ampersands`] before the standard
//! entities are protected would corrupt already-valid markup. The
//! composition lives in [`super::repair_span_text`].

use once_cell::sync::Lazy;
use regex::Regex;

/// Typographic and HTML named entities normalized to plain text.
///
/// This is a deliberate, lossy normalization for spreadsheet cells,
/// not a faithful entity decode.
const TYPOGRAPHIC_ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&ndash;", "-"),
    ("&mdash;", "-"),
    ("&copy;", "(c)"),
    ("&reg;", "(r)"),
    ("&trade;", "(tm)"),
    ("&lsquo;", "'"),
    ("&rsquo;", "'"),
    ("&ldquo;", "\""),
    ("&rdquo;", "\""),
    ("&bull;", "*"),
    ("&hellip;", "..."),
    ("&prime;", "'"),
    ("&Prime;", "\""),
    ("&frasl;", "/"),
    ("&euro;", "EUR"),
    ("&pound;", "GBP"),
    ("&yen;", "JPY"),
];

/// The five standard XML entities and their placeholder tokens.
///
/// Placeholders contain `_`, which the unknown-entity pattern does not
/// match, so protected entities survive [`strip_unknown_entities`].
/// Assumption: these tokens do not occur naturally in the input.
const STANDARD_ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&_amp_temp;"),
    ("&lt;", "&_lt_temp;"),
    ("&gt;", "&_gt_temp;"),
    ("&quot;", "&_quot_temp;"),
    ("&apos;", "&_apos_temp;"),
];

/// Entity tails that may legally follow `&` in repaired output.
const STANDARD_TAILS: [&str; 5] = ["amp;", "lt;", "gt;", "quot;", "apos;"];

/// Any named or numeric entity reference.
static ENTITY_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&[a-zA-Z0-9#]+;").expect("entity pattern is valid"));

/// Stage 1: rewrite literal `<` and `>` to their XML-safe entities.
///
/// Spans may contain raw HTML fragments that a strict parser would
/// misread as nested markup.
pub fn escape_angle_brackets(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Stage 2: normalize common typographic/HTML entities to plain text.
pub fn normalize_typographic(text: &str) -> String {
    let mut out = text.to_string();
    for (entity, replacement) in TYPOGRAPHIC_ENTITIES {
        out = out.replace(entity, replacement);
    }
    out
}

/// Stage 3: substitute the five standard XML entities with placeholder
/// tokens so later stages cannot touch them.
pub fn protect_standard_entities(text: &str) -> String {
    let mut out = text.to_string();
    for (entity, placeholder) in STANDARD_ENTITIES {
        out = out.replace(entity, placeholder);
    }
    out
}

/// Stage 4: delete any remaining named or numeric entity reference.
///
/// Unknown entities are assumed unrecoverable and dropped rather than
/// guessed.
pub fn strip_unknown_entities(text: &str) -> String {
    ENTITY_REFERENCE.replace_all(text, "").into_owned()
}

/// Stage 5: restore the protected standard entities verbatim.
pub fn restore_standard_entities(text: &str) -> String {
    let mut out = text.to_string();
    for (entity, placeholder) in STANDARD_ENTITIES {
        out = out.replace(placeholder, entity);
    }
    out
}

/// Stage 6: escape any `&` that does not introduce a standard entity.
///
/// Must run last: by this point every legal `&` starts one of the five
/// standard entities, so anything else is a stray separator. The regex
/// crate has no negative lookahead, hence the linear scan.
pub fn escape_bare_ampersands(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];
        if STANDARD_TAILS.iter().any(|tail| after.starts_with(tail)) {
            out.push('&');
        } else {
            out.push_str("&amp;");
        }
        rest = after;
    }

    out.push_str(rest);
    out
}
