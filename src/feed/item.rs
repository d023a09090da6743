use chrono::{DateTime, Utc};

use super::date::format_rss_date;
use super::{Channel, PodcastExtension};
use crate::xml::{Element, Namespace, RenderError, TextPolicy};

/// `<enclosure>` media attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    /// Size in bytes. `0` when unknown.
    pub length: u64,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ItemCategory {
    name: String,
    domain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Guid {
    value: String,
    is_permalink: bool,
}

/// A single feed entry.
///
/// Every field is optional; unset fields produce no element. `description`
/// follows the [`prefer_cdata`](Self::prefer_cdata) flag, `content:encoded`
/// is always CDATA.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    title: Option<String>,
    url: Option<String>,
    description: Option<String>,
    content_encoded: Option<String>,
    categories: Vec<ItemCategory>,
    guid: Option<Guid>,
    pub_date: Option<DateTime<Utc>>,
    enclosure: Option<Enclosure>,
    author: Option<String>,
    creator: Option<String>,
    podcast: Option<PodcastExtension>,
    prefer_cdata: bool,
}

impl Item {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Entry URL, written as `<link>`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Full HTML body, written as `<content:encoded>` inside CDATA.
    pub fn content_encoded(mut self, content: impl Into<String>) -> Self {
        self.content_encoded = Some(content.into());
        self
    }

    /// Appends a category. Repeated calls accumulate.
    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.categories.push(ItemCategory {
            name: name.into(),
            domain: None,
        });
        self
    }

    /// Appends a category with a `domain` attribute.
    pub fn category_with_domain(mut self, name: impl Into<String>, domain: impl Into<String>) -> Self {
        self.categories.push(ItemCategory {
            name: name.into(),
            domain: Some(domain.into()),
        });
        self
    }

    pub fn guid(mut self, guid: impl Into<String>, is_permalink: bool) -> Self {
        self.guid = Some(Guid {
            value: guid.into(),
            is_permalink,
        });
        self
    }

    pub fn pub_date(mut self, date: DateTime<Utc>) -> Self {
        self.pub_date = Some(date);
        self
    }

    pub fn enclosure(
        mut self,
        url: impl Into<String>,
        length: u64,
        mime_type: impl Into<String>,
    ) -> Self {
        self.enclosure = Some(Enclosure {
            url: url.into(),
            length,
            mime_type: mime_type.into(),
        });
        self
    }

    /// Author email address (RSS `<author>`).
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Author name, written as `<dc:creator>`.
    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    pub fn podcast(mut self, podcast: PodcastExtension) -> Self {
        self.podcast = Some(podcast);
        self
    }

    pub fn prefer_cdata(mut self, prefer_cdata: bool) -> Self {
        self.prefer_cdata = prefer_cdata;
        self
    }

    /// Moves this item to the end of `channel`'s item list.
    pub fn append_to(self, channel: &mut Channel) {
        channel.push_item(self);
    }

    /// Renders the `<item>` element.
    ///
    /// Children follow a fixed order: title, link, description,
    /// content:encoded, categories, guid, pubDate, enclosure, author,
    /// dc:creator, then the podcast elements.
    ///
    /// # Errors
    ///
    /// [`RenderError::InvalidCharacter`] if a field holds a character XML cannot represent.
    pub fn render(&self) -> Result<Element, RenderError> {
        let mut xml = Element::new("item");

        if let Some(title) = &self.title {
            xml.push(Element::text("title", title)?);
        }

        if let Some(url) = &self.url {
            xml.push(Element::text("link", url)?);
        }

        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            let policy = TextPolicy::from_prefer_cdata(self.prefer_cdata);
            xml.push(Element::with_policy("description", description, policy)?);
        }

        if let Some(content) = &self.content_encoded {
            xml.push(Element::with_policy(
                Namespace::Content.qualify("encoded"),
                content,
                TextPolicy::Cdata,
            )?);
        }

        for category in &self.categories {
            let mut element = Element::text("category", &category.name)?;
            if let Some(domain) = &category.domain {
                element = element.attr("domain", domain)?;
            }
            xml.push(element);
        }

        if let Some(guid) = &self.guid {
            let permalink = if guid.is_permalink { "true" } else { "false" };
            xml.push(Element::text("guid", &guid.value)?.attr("isPermaLink", permalink)?);
        }

        if let Some(date) = &self.pub_date {
            xml.push(Element::text("pubDate", &format_rss_date(date))?);
        }

        if let Some(enclosure) = &self.enclosure {
            xml.push(
                Element::new("enclosure")
                    .attr("url", &enclosure.url)?
                    .attr("length", &enclosure.length.to_string())?
                    .attr("type", &enclosure.mime_type)?,
            );
        }

        if let Some(author) = &self.author {
            xml.push(Element::text("author", author)?);
        }

        if let Some(creator) = &self.creator {
            xml.push(Element::text(Namespace::DublinCore.qualify("creator"), creator)?);
        }

        if let Some(podcast) = &self.podcast {
            xml.extend(podcast.render()?);
        }

        Ok(xml)
    }
}
