use std::io::Cursor;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use quick_xml::Writer;

use super::text::{cdata_sections, validate_chars};
use super::{Document, Element, Node, RenderError};

/// Serialization settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per nesting level. `0` writes everything on one line.
    pub indent: usize,
    /// Emit `<?xml version="1.0" encoding="UTF-8"?>` first.
    pub xml_declaration: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            xml_declaration: true,
        }
    }
}

pub(super) fn write_document(doc: &Document, options: &WriteOptions) -> Result<String, RenderError> {
    let cursor = Cursor::new(Vec::new());
    let mut writer = if options.indent > 0 {
        Writer::new_with_indent(cursor, b' ', options.indent)
    } else {
        Writer::new(cursor)
    };

    if options.xml_declaration {
        write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }

    let declarations: Vec<(String, &str)> = doc
        .namespaces()
        .iter()
        .map(|ns| (format!("xmlns:{}", ns.prefix()), ns.uri()))
        .collect();
    write_element(&mut writer, doc.root(), &declarations)?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| RenderError::Write(e.to_string()))
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    element: &Element,
    declarations: &[(String, &str)],
) -> Result<(), RenderError> {
    let mut start = BytesStart::new(element.name());
    for (key, value) in element.attributes() {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    for (key, uri) in declarations {
        start.push_attribute((key.as_str(), *uri));
    }

    if element.children().is_empty() {
        return write(writer, Event::Empty(start));
    }

    write(writer, Event::Start(start))?;
    for child in element.children() {
        match child {
            Node::Element(inner) => write_element(writer, inner, &[])?,
            Node::Text(text) => write(writer, Event::Text(BytesText::new(text)))?,
            Node::CData(text) => {
                for section in cdata_sections(text) {
                    write(writer, Event::CData(BytesCData::new(section)))?;
                }
            }
        }
    }
    write(writer, Event::End(BytesEnd::new(element.name())))
}

fn write<W: std::io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), RenderError> {
    writer
        .write_event(event)
        .map_err(|e| RenderError::Write(e.to_string()))
}

/// Checks that `xml` is well-formed and that every element prefix is bound.
///
/// Uses the namespace-aware reader from `quick-xml`, tracking open elements so
/// unclosed elements and stray content after the root are reported too. Text,
/// CDATA and attribute values are decoded and held to the XML 1.0 character
/// range, which the reader itself does not enforce.
///
/// # Errors
///
/// [`RenderError::Malformed`] describing the first problem found.
pub fn check_well_formed(xml: &str) -> Result<(), RenderError> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut open: Vec<String> = Vec::new();
    let mut roots: usize = 0;

    loop {
        let (resolved, event) = reader.read_resolved_event().map_err(malformed)?;
        let unbound = match resolved {
            ResolveResult::Unknown(prefix) => Some(String::from_utf8_lossy(&prefix).into_owned()),
            _ => None,
        };

        match &event {
            Event::Start(e) | Event::Empty(e) => {
                if let Some(prefix) = unbound {
                    return Err(RenderError::Malformed(format!(
                        "unbound namespace prefix '{}'",
                        prefix
                    )));
                }
                if open.is_empty() {
                    roots += 1;
                    if roots > 1 {
                        return Err(RenderError::Malformed(
                            "more than one root element".to_string(),
                        ));
                    }
                }

                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                for attr in e.attributes() {
                    let attr = attr.map_err(malformed)?;
                    let value = attr
                        .decode_and_unescape_value(reader.decoder())
                        .map_err(malformed)?;
                    validate_chars(&name, &value).map_err(malformed)?;
                }
                if matches!(event, Event::Start(_)) {
                    open.push(name);
                }
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Text(_) | Event::CData(_) if open.is_empty() => {
                return Err(RenderError::Malformed(
                    "content outside the root element".to_string(),
                ));
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(malformed)?;
                validate_chars(current(&open), &text).map_err(malformed)?;
            }
            Event::CData(c) => {
                let text = std::str::from_utf8(c).map_err(malformed)?;
                validate_chars(current(&open), text).map_err(malformed)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err(RenderError::Malformed(format!(
            "{} element(s) left unclosed",
            open.len()
        )));
    }
    if roots == 0 {
        return Err(RenderError::Malformed("no root element".to_string()));
    }
    Ok(())
}

fn current(open: &[String]) -> &str {
    open.last().map(String::as_str).unwrap_or_default()
}

fn malformed(e: impl std::fmt::Display) -> RenderError {
    RenderError::Malformed(e.to_string())
}
