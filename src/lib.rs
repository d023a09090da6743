//! Build RSS 2.0 documents as typed values and render them to XML.
//!
//! - [`feed`] - `Feed`, `Channel`, `Item`, `PodcastExtension` builders
//! - [`xml`] - the rendered tree, namespaces, serialization, well-formedness check
//! - [`manifest`] - TOML/JSON feed descriptions converted into a `Feed`
//! - [`config`] - output settings for the command-line front end

pub mod config;
pub mod feed;
pub mod manifest;
pub mod xml;

pub use feed::{Category, Channel, Feed, Item, PodcastExtension};
pub use xml::{Document, RenderError};
