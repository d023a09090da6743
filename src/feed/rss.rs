use super::Channel;
use crate::xml::{Document, Element, RenderError, WriteOptions};

/// Root of an RSS 2.0 document: an ordered list of channels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    channels: Vec<Channel>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a channel. Channels render in the order they were added.
    pub fn add_channel(&mut self, channel: Channel) -> &mut Self {
        self.channels.push(channel);
        self
    }

    /// Builder form of [`add_channel`](Self::add_channel).
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channels.push(channel);
        self
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Builds the complete `<rss version="2.0">` document.
    ///
    /// Namespace declarations are added to the root for each extension the
    /// tree actually uses (Atom, iTunes, content, Dublin Core). The feed
    /// itself is not modified, so repeated calls yield equal documents.
    ///
    /// # Errors
    ///
    /// The first [`RenderError`] raised by any channel; no partial document
    /// is returned.
    pub fn render(&self) -> Result<Document, RenderError> {
        let mut rss = Element::new("rss").attr("version", "2.0")?;
        for channel in &self.channels {
            rss.push(channel.render()?);
        }

        let doc = Document::new(rss);
        tracing::debug!(
            channels = self.channels.len(),
            namespaces = doc.namespaces().len(),
            "Rendered feed"
        );
        Ok(doc)
    }

    /// Renders and serializes with the default [`WriteOptions`].
    pub fn to_xml(&self) -> Result<String, RenderError> {
        self.render()?.to_xml()
    }

    pub fn to_xml_with(&self, options: &WriteOptions) -> Result<String, RenderError> {
        self.render()?.to_xml_with(options)
    }
}
