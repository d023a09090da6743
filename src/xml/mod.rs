//! In-memory XML tree used as the render target for feed entities.
//!
//! Every renderable entity produces a self-contained value from this module:
//!
//! - [`Element`] - a named element with attributes and child nodes
//! - [`Fragment`] - the children of a neutral wrapper, appended directly into
//!   a parent element (the wrapper itself never reaches the output)
//! - [`Document`] - a root element plus the namespace declarations its tree needs
//!
//! Parents splice child sub-trees in by value, so there is no cross-document
//! node ownership to reason about.
//!
//! # Architecture
//!
//! - [`text`] - raw-text vs. CDATA policy and character validation
//! - [`writer`] - serialization with `quick-xml` and the well-formedness check

mod text;
mod writer;

use thiserror::Error;

pub use text::{validate_chars, TextPolicy};
pub use writer::{check_well_formed, WriteOptions};

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while building or serializing a document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A field contains a character that XML 1.0 cannot represent, escaped or not.
    #[error("Invalid XML character {character:?} in <{element}>")]
    InvalidCharacter { element: String, character: char },

    /// A Unix timestamp outside the range chrono can represent.
    #[error("Timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    /// The underlying XML writer failed.
    #[error("XML write error: {0}")]
    Write(String),

    /// Serialized output did not parse back as well-formed, namespace-bound XML.
    #[error("Malformed XML: {0}")]
    Malformed(String),
}

// ============================================================================
// Namespaces
// ============================================================================

/// Extension namespaces the renderer knows how to declare.
///
/// Declaration order on the root follows variant order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Atom,
    Itunes,
    Content,
    DublinCore,
}

impl Namespace {
    pub const ALL: [Namespace; 4] = [
        Namespace::Atom,
        Namespace::Itunes,
        Namespace::Content,
        Namespace::DublinCore,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            Namespace::Atom => "atom",
            Namespace::Itunes => "itunes",
            Namespace::Content => "content",
            Namespace::DublinCore => "dc",
        }
    }

    pub fn uri(self) -> &'static str {
        match self {
            Namespace::Atom => "http://www.w3.org/2005/Atom",
            Namespace::Itunes => "http://www.itunes.com/dtds/podcast-1.0.dtd",
            Namespace::Content => "http://purl.org/rss/1.0/modules/content/",
            Namespace::DublinCore => "http://purl.org/dc/elements/1.1/",
        }
    }

    /// Qualified name `prefix:local` in this namespace.
    pub fn qualify(self, local: &str) -> String {
        format!("{}:{}", self.prefix(), local)
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ns| ns.prefix() == prefix)
    }
}

fn prefix_of(name: &str) -> Option<&str> {
    name.split_once(':').map(|(prefix, _)| prefix)
}

// ============================================================================
// Tree
// ============================================================================

/// A node in the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Text escaped at serialization.
    Text(String),
    /// Text written verbatim inside one or more CDATA sections.
    CData(String),
}

/// A named element with ordered attributes and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builds `<name>value</name>` with raw (escaped) text.
    ///
    /// Fails if `value` contains characters XML cannot carry.
    pub fn text(name: impl Into<String>, value: &str) -> Result<Self, RenderError> {
        Self::with_policy(name, value, TextPolicy::Raw)
    }

    /// Builds `<name>value</name>` with the text node chosen by `policy`.
    pub fn with_policy(
        name: impl Into<String>,
        value: &str,
        policy: TextPolicy,
    ) -> Result<Self, RenderError> {
        let name = name.into();
        let node = policy.node(&name, value)?;
        let mut element = Self::new(name);
        element.children.push(node);
        Ok(element)
    }

    /// Adds an attribute, validating its value. Insertion order is preserved.
    pub fn attr(mut self, key: impl Into<String>, value: &str) -> Result<Self, RenderError> {
        validate_chars(&self.name, value)?;
        self.attributes.push((key.into(), value.to_owned()));
        Ok(self)
    }

    /// Appends a child element. Its content was validated when it was built.
    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Appends any node, checking text and CDATA content for characters XML
    /// cannot represent.
    ///
    /// # Errors
    ///
    /// [`RenderError::InvalidCharacter`] naming this element.
    pub fn push_node(&mut self, node: Node) -> Result<(), RenderError> {
        if let Node::Text(text) | Node::CData(text) = &node {
            validate_chars(&self.name, text)?;
        }
        self.children.push(node);
        Ok(())
    }

    /// Appends the children of a fragment, discarding its wrapper.
    pub fn extend(&mut self, fragment: Fragment) {
        self.children.extend(fragment.nodes);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements only, skipping text nodes.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Child elements with the given qualified name.
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    /// Concatenated text and CDATA content of the direct children.
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) | Node::CData(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    fn collect_namespaces(&self, used: &mut Vec<Namespace>) {
        let names = std::iter::once(self.name.as_str())
            .chain(self.attributes.iter().map(|(k, _)| k.as_str()));
        for name in names {
            if let Some(ns) = prefix_of(name).and_then(Namespace::from_prefix) {
                if !used.contains(&ns) {
                    used.push(ns);
                }
            }
        }
        for child in self.elements() {
            child.collect_namespaces(used);
        }
    }
}

/// Children of a neutral wrapper element.
///
/// Produced by renderers whose output is merged into a parent rather than
/// nested under its own element (podcast metadata inside `<channel>` or `<item>`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    nodes: Vec<Node>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, child: Element) {
        self.nodes.push(Node::Element(child));
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

/// A complete document: root element plus the namespaces it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
    namespaces: Vec<Namespace>,
}

impl Document {
    /// Wraps `root`, declaring every known namespace used anywhere in the tree.
    pub fn new(root: Element) -> Self {
        let mut used = Vec::new();
        root.collect_namespaces(&mut used);
        let namespaces = Namespace::ALL
            .into_iter()
            .filter(|ns| used.contains(ns))
            .collect();
        Self { root, namespaces }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    /// Serializes with the default options (declaration, two-space indent).
    pub fn to_xml(&self) -> Result<String, RenderError> {
        self.to_xml_with(&WriteOptions::default())
    }

    pub fn to_xml_with(&self, options: &WriteOptions) -> Result<String, RenderError> {
        writer::write_document(self, options)
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let xml = self.to_xml().map_err(|_| std::fmt::Error)?;
        f.write_str(&xml)
    }
}
