use super::{Node, RenderError};

/// How a free-text field is written: escaped text or a CDATA section.
///
/// Chosen per entity instance at render time from its `prefer_cdata` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextPolicy {
    /// Standard entity escaping of `&`, `<`, `>` and quotes.
    #[default]
    Raw,
    /// Verbatim content inside CDATA. An embedded `]]>` is split across two
    /// sections when written so the section never closes early.
    Cdata,
}

impl TextPolicy {
    pub fn from_prefer_cdata(prefer_cdata: bool) -> Self {
        if prefer_cdata {
            TextPolicy::Cdata
        } else {
            TextPolicy::Raw
        }
    }

    /// Produces the text node for `value`, the content of `<element>`.
    ///
    /// # Errors
    ///
    /// [`RenderError::InvalidCharacter`] if `value` holds a character XML 1.0
    /// forbids. Neither escaping nor CDATA can carry those.
    pub fn node(self, element: &str, value: &str) -> Result<Node, RenderError> {
        validate_chars(element, value)?;
        Ok(match self {
            TextPolicy::Raw => Node::Text(value.to_owned()),
            TextPolicy::Cdata => Node::CData(value.to_owned()),
        })
    }
}

/// Checks that every character of `value` is allowed by the XML 1.0 `Char` production.
///
/// Rejects C0 controls except tab (0x09), newline (0x0A) and carriage return
/// (0x0D), plus the non-characters U+FFFE and U+FFFF. Surrogates cannot occur
/// in a Rust `str`.
///
/// The fast path is a byte scan: clean ASCII control-free input never decodes chars.
pub fn validate_chars(element: &str, value: &str) -> Result<(), RenderError> {
    let suspicious = value
        .bytes()
        .any(|b| (b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d) || b == 0xef);
    if !suspicious {
        return Ok(());
    }

    match value.chars().find(|&c| !is_xml_char(c)) {
        Some(character) => Err(RenderError::InvalidCharacter {
            element: element.to_owned(),
            character,
        }),
        None => Ok(()),
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Splits CDATA content so no piece contains the `]]>` terminator.
///
/// `"a]]>b"` becomes `["a]]", ">b"]`; writing each piece as its own section
/// reproduces the original text exactly when parsed.
pub(crate) fn cdata_sections(value: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = value;
    while let Some(pos) = rest.find("]]>") {
        // Cut between "]]" and ">"
        sections.push(&rest[..pos + 2]);
        rest = &rest[pos + 2..];
    }
    sections.push(rest);
    sections
}
