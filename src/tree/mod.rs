//! Owned XML element tree built from quick-xml events.
//!
//! The converter works on whole documents, so the streaming events are
//! assembled into a plain tree once and the raw text is dropped. Tag
//! names, attributes and children keep document order; direct text
//! content (including CDATA) is concatenated per element.
//!
//! Namespaces are not interpreted: a tag `ns:table` is just the string
//! `ns:table`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{ParseError, ParseResult};

/// One node of the parsed document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Tag name as written in the document.
    pub tag: String,
    /// Attribute (name, value) pairs in document order.
    pub attributes: Vec<(String, String)>,
    /// Concatenated direct text content.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<Element>,
}

impl Element {
    fn new(tag: String) -> Self {
        Self {
            tag,
            ..Default::default()
        }
    }

    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Parse a document into its root element.
///
/// The input is expected to have gone through the entity repairer; any
/// remaining ill-formedness (unbalanced tags outside data-bearing
/// spans, stray markup) surfaces here with the parser diagnostic and
/// byte position.
pub fn parse_document(xml: &str) -> ParseResult<Element> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                stack.push(element_from_start(&start, position)?);
            }
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&start, position)?;
                attach(element, &mut stack, &mut root, position)?;
            }
            Ok(Event::End(_)) => {
                // Mismatched end tags are already rejected by the reader.
                let element = stack.pop().ok_or_else(|| ParseError::Malformed {
                    position,
                    message: "end tag without matching start tag".into(),
                })?;
                attach(element, &mut stack, &mut root, position)?;
            }
            Ok(Event::Text(text)) => {
                if let Some(top) = stack.last_mut() {
                    let decoded = text.unescape().map_err(|e| ParseError::Malformed {
                        position,
                        message: e.to_string(),
                    })?;
                    top.text.push_str(&decoded);
                }
            }
            Ok(Event::CData(cdata)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&cdata));
                }
            }
            Ok(Event::Eof) => break,
            // Declarations, comments, PIs and doctypes carry no data.
            Ok(_) => {}
            Err(e) => {
                return Err(ParseError::Malformed {
                    position: reader.buffer_position(),
                    message: e.to_string(),
                })
            }
        }
    }

    if !stack.is_empty() {
        return Err(ParseError::Malformed {
            position: reader.buffer_position(),
            message: "unclosed element at end of document".into(),
        });
    }

    root.ok_or(ParseError::NoRoot)
}

fn element_from_start(start: &BytesStart<'_>, position: u64) -> ParseResult<Element> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(tag);

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| ParseError::Malformed {
            position,
            message: e.to_string(),
        })?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| ParseError::Malformed {
                position,
                message: e.to_string(),
            })?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn attach(
    element: Element,
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    position: u64,
) -> ParseResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_some() {
                return Err(ParseError::Malformed {
                    position,
                    message: "multiple root elements".into(),
                });
            }
            *root = Some(element);
        }
    }
    Ok(())
}
