//! Entity repairer for ill-formed XML exports.
//!
//! Upstream tools embed raw HTML-like content inside `<column>` data
//! fields, producing markup that a strict XML parser rejects. This
//! module rewrites every character or entity inside those data-bearing
//! spans into a well-formed equivalent while leaving markup outside the
//! spans untouched.
//!
//! The rewrite is an ordered pipeline of pure text stages (see
//! [`stages`]); re-running the repairer on its own output produces no
//! further changes.
//!
//! Known limitations, inherited from the span matcher:
//!
//! - Matching is non-greedy and does not recurse; if `column` elements
//!   ever nest, only the outermost span per match is repaired.
//! - A literal `</column>` inside already-escaped span text ends the
//!   span early. Behavior is undefined upstream; it is not second-guessed
//!   here.

pub mod stages;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use stages::{
    escape_angle_brackets, escape_bare_ampersands, normalize_typographic,
    protect_standard_entities, restore_standard_entities, strip_unknown_entities,
};

/// A data-bearing span: `<column ...>` content `</column>`, non-greedy,
/// DOTALL so spans may contain newlines.
static SPAN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)(<column[^>]*>)(.*?)(</column>)").expect("span pattern is valid"));

/// Repair the text content of one data-bearing span.
///
/// Stage order is load-bearing: angle brackets first (so freshly
/// produced `&lt;`/`&gt;` are then protected like pre-existing ones),
/// typographic normalization before the protect/strip/restore phase,
/// and bare-`&` escaping strictly last.
pub fn repair_span_text(content: &str) -> String {
    let content = escape_angle_brackets(content);
    let content = normalize_typographic(&content);
    let content = protect_standard_entities(&content);
    let content = strip_unknown_entities(&content);
    let content = restore_standard_entities(&content);
    escape_bare_ampersands(&content)
}

/// Repair a whole document.
///
/// Only the interiors of data-bearing spans are rewritten; the span
/// delimiters themselves and everything outside them pass through
/// verbatim. Input with no spans comes back unchanged.
pub fn repair_document(text: &str) -> String {
    SPAN_PATTERN
        .replace_all(text, |caps: &Captures<'_>| {
            format!("{}{}{}", &caps[1], repair_span_text(&caps[2]), &caps[3])
        })
        .into_owned()
}

/// Number of data-bearing spans the repairer would visit.
pub fn count_spans(text: &str) -> usize {
    SPAN_PATTERN.find_iter(text).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_html_inside_span_is_escaped() {
        let input = r#"<column name="body"><p>Hello <b>world</b></p></column>"#;
        let repaired = repair_document(input);
        assert_eq!(
            repaired,
            r#"<column name="body">&lt;p&gt;Hello &lt;b&gt;world&lt;/b&gt;&lt;/p&gt;</column>"#
        );
    }

    #[test]
    fn test_markup_outside_spans_is_untouched() {
        let input = "<root>\n  <column name=\"a\">x & y</column>\n  <other>&raw;</other>\n</root>";
        let repaired = repair_document(input);
        assert!(repaired.contains("<column name=\"a\">x &amp; y</column>"));
        // Outside spans nothing is rewritten, not even invalid entities.
        assert!(repaired.contains("<other>&raw;</other>"));
    }

    #[test]
    fn test_unknown_entity_elision() {
        let input = r#"<column name="x">Value&weirdentity;End</column>"#;
        let repaired = repair_document(input);
        assert_eq!(repaired, r#"<column name="x">ValueEnd</column>"#);
    }

    #[test]
    fn test_numeric_entities_are_dropped() {
        let input = r#"<column name="x">a&#160;b&#x2019;c</column>"#;
        let repaired = repair_document(input);
        assert_eq!(repaired, r#"<column name="x">abc</column>"#);
    }

    #[test]
    fn test_standard_entities_survive_verbatim() {
        let input = r#"<column name="x">&amp; &lt; &gt; &quot; &apos;</column>"#;
        assert_eq!(repair_document(input), input);
    }

    #[test]
    fn test_typographic_normalization_in_span() {
        let input = r#"<column name="x">A&nbsp;&ndash;&nbsp;B&trade;</column>"#;
        let repaired = repair_document(input);
        assert_eq!(repaired, r#"<column name="x">A - B(tm)</column>"#);
    }

    #[test]
    fn test_bare_ampersand_is_escaped_last() {
        let input = r#"<column name="x">Fish & Chips &amp; Sons</column>"#;
        let repaired = repair_document(input);
        assert_eq!(
            repaired,
            r#"<column name="x">Fish &amp; Chips &amp; Sons</column>"#
        );
    }

    #[test]
    fn test_repair_is_idempotent() {
        let input = "<data><column name=\"html\"><div class=\"x\">5 &gt; 3 &amp; 2 &lt; 4</div> &copy; &bogus; R&D</column><column name=\"plain\">ok</column></data>";
        let once = repair_document(input);
        let twice = repair_document(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_entity_safety_property() {
        let input = "<column name=\"x\"><a href=\"?a=1&b=2\">link</a> &unknown; & end</column>";
        let repaired = repair_document(input);
        let caps = SPAN_PATTERN.captures(&repaired).unwrap();
        let span = caps.get(2).unwrap().as_str();

        assert!(!span.contains('<'));
        assert!(!span.contains('>'));
        // Every ampersand starts one of the five standard entities.
        assert_eq!(span, stages::escape_bare_ampersands(span));
    }

    #[test]
    fn test_multiline_span_is_matched() {
        let input = "<column name=\"x\">line one\n<br>\nline two</column>";
        let repaired = repair_document(input);
        assert!(repaired.contains("line one\n&lt;br&gt;\nline two"));
    }

    #[test]
    fn test_attributes_in_open_tag_are_preserved() {
        let input = r#"<column name="x" type="note">1 < 2</column>"#;
        let repaired = repair_document(input);
        assert!(repaired.starts_with(r#"<column name="x" type="note">"#));
        assert!(repaired.contains("1 &lt; 2"));
    }

    #[test]
    fn test_no_spans_means_no_changes() {
        let input = "<root><record><field>a & b</field></record></root>";
        assert_eq!(repair_document(input), input);
    }

    #[test]
    fn test_nested_spans_only_outermost_match_is_repaired() {
        // Nested column tags: the non-greedy match ends at the first
        // closing tag, so the trailing close tag is left as-is.
        let input = "<column name=\"a\">x<column name=\"b\">y</column>z</column>";
        let repaired = repair_document(input);
        assert!(repaired.contains("x&lt;column name=\"b\"&gt;y"));
        assert!(repaired.ends_with("z</column>"));
    }

    #[test]
    fn test_count_spans() {
        let input = "<r><column name=\"a\">1</column><column name=\"b\">2</column></r>";
        assert_eq!(count_spans(input), 2);
        assert_eq!(count_spans("<r/>"), 0);
    }
}
