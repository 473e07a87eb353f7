//! Markup front end: turns program text into the [`Node`] tree the
//! interpreter consumes. The interpreter itself never touches markup
//! syntax; everything here is glue around the `quick-xml` event reader.
//!
//! Programs must be well-formed: tags balanced, attributes quoted, void
//! tags written self-closing (`<input/>`). Multiple top-level elements
//! are allowed and become children of a synthetic document root.

use crate::error::{HtmlPlError, Span};
use crate::node::Node;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

struct OpenElement {
    tag: String,
    attributes: HashMap<String, String>,
    children: Vec<Node>,
    start: usize,
}

pub fn parse(source: &str) -> Result<Node, HtmlPlError> {
    let mut reader = Reader::from_str(source);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut top_level: Vec<Node> = Vec::new();

    loop {
        let event_start = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let (tag, attributes) = element_parts(&e, event_start, &reader)?;
                stack.push(OpenElement {
                    tag,
                    attributes,
                    children: Vec::new(),
                    start: event_start,
                });
            }
            Ok(Event::Empty(e)) => {
                let (tag, attributes) = element_parts(&e, event_start, &reader)?;
                let node = Node::Element {
                    tag,
                    attributes,
                    children: Vec::new(),
                    span: Span::new(event_start, reader.buffer_position()),
                };
                attach(&mut stack, &mut top_level, node);
            }
            Ok(Event::End(_)) => {
                let open = stack.pop().ok_or_else(|| {
                    HtmlPlError::parse_error(
                        Span::new(event_start, reader.buffer_position()),
                        "Closing tag without a matching opening tag".to_string(),
                    )
                })?;
                let node = Node::Element {
                    tag: open.tag,
                    attributes: open.attributes,
                    children: open.children,
                    span: Span::new(open.start, reader.buffer_position()),
                };
                attach(&mut stack, &mut top_level, node);
            }
            Ok(Event::Text(t)) => {
                let content = t.unescape().map_err(|e| markup_error(e, &reader))?;
                let node = Node::Text {
                    content: content.into_owned(),
                    span: Span::new(event_start, reader.buffer_position()),
                };
                attach(&mut stack, &mut top_level, node);
            }
            Ok(Event::CData(t)) => {
                let node = Node::Text {
                    content: String::from_utf8_lossy(&t.into_inner()).into_owned(),
                    span: Span::new(event_start, reader.buffer_position()),
                };
                attach(&mut stack, &mut top_level, node);
            }
            Ok(Event::Comment(_)) => {
                let node = Node::Comment {
                    span: Span::new(event_start, reader.buffer_position()),
                };
                attach(&mut stack, &mut top_level, node);
            }
            // Declarations and processing instructions carry no program
            // content.
            Ok(Event::Decl(_)) | Ok(Event::PI(_)) | Ok(Event::DocType(_)) => {}
            Ok(Event::Eof) => {
                if let Some(open) = stack.pop() {
                    return Err(HtmlPlError::parse_error(
                        Span::new(open.start, source.len().max(open.start + 1)),
                        format!("Unclosed <{}> element", open.tag.to_lowercase()),
                    ));
                }
                break;
            }
            Err(e) => return Err(markup_error(e, &reader)),
        }
    }

    Ok(Node::Document {
        children: top_level,
        span: Span::new(0, source.len().max(1)),
    })
}

/// Tag names are case-insensitive in markup; they are canonicalized to
/// uppercase here so the classifier can compare exactly. Attribute names
/// are canonicalized to lowercase.
fn element_parts(
    e: &BytesStart,
    event_start: usize,
    reader: &Reader<&[u8]>,
) -> Result<(String, HashMap<String, String>), HtmlPlError> {
    let tag = String::from_utf8_lossy(e.name().as_ref()).to_ascii_uppercase();

    let mut attributes = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| {
            HtmlPlError::parse_error(
                Span::new(event_start, reader.buffer_position()),
                format!("Bad attribute syntax: {}", err),
            )
        })?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
        let value = attr
            .unescape_value()
            .map_err(|err| {
                HtmlPlError::parse_error(
                    Span::new(event_start, reader.buffer_position()),
                    format!("Bad attribute value: {}", err),
                )
            })?
            .into_owned();
        attributes.insert(name, value);
    }

    Ok((tag, attributes))
}

fn attach(stack: &mut Vec<OpenElement>, top_level: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => top_level.push(node),
    }
}

fn markup_error(e: quick_xml::Error, reader: &Reader<&[u8]>) -> HtmlPlError {
    HtmlPlError::parse_error(
        Span::single(reader.buffer_position().saturating_sub(1)),
        format!("Malformed markup: {}", e),
    )
}
