use chrono::{DateTime, Utc};

use super::date::format_rss_date;
use super::{Category, Feed, Item, PodcastExtension};
use crate::xml::{Element, Namespace, RenderError, TextPolicy};

const RSS_MIME_TYPE: &str = "application/rss+xml";

/// PubSubHubbub discovery links: the feed's own URL and its hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubSubHubbub {
    pub feed_url: String,
    pub hub_url: String,
}

/// One channel of a feed: metadata, optional extensions, and its items.
///
/// `title` and `url` are always written (empty when unset); every other
/// field is emitted only when set. Items are owned and rendered in the order
/// they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    title: Option<String>,
    url: Option<String>,
    feed_url: Option<String>,
    description: Option<String>,
    categories: Vec<Category>,
    language: Option<String>,
    copyright: Option<String>,
    pub_date: Option<DateTime<Utc>>,
    last_build_date: Option<DateTime<Utc>>,
    ttl: Option<u32>,
    pubsubhubbub: Option<PubSubHubbub>,
    podcast: Option<PodcastExtension>,
    items: Vec<Item>,
    prefer_cdata: bool,
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Site URL, written as `<link>`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// URL of this feed, written as an Atom `rel="self"` link.
    pub fn feed_url(mut self, url: impl Into<String>) -> Self {
        self.feed_url = Some(url.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends category data. Accepts a single value or a nested group;
    /// repeated calls accumulate.
    pub fn category(mut self, category: impl Into<Category>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// ISO 639 language code, e.g. `en-us`.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }

    pub fn pub_date(mut self, date: DateTime<Utc>) -> Self {
        self.pub_date = Some(date);
        self
    }

    pub fn last_build_date(mut self, date: DateTime<Utc>) -> Self {
        self.last_build_date = Some(date);
        self
    }

    /// Time to live in minutes.
    pub fn ttl(mut self, minutes: u32) -> Self {
        self.ttl = Some(minutes);
        self
    }

    pub fn pubsubhubbub(mut self, feed_url: impl Into<String>, hub_url: impl Into<String>) -> Self {
        self.pubsubhubbub = Some(PubSubHubbub {
            feed_url: feed_url.into(),
            hub_url: hub_url.into(),
        });
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

    /// Appends an item, preserving call order.
    pub fn add_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Appends an item through a mutable reference.
    pub fn push_item(&mut self, item: Item) -> &mut Self {
        self.items.push(item);
        self
    }

    /// Moves this channel to the end of `feed`'s channel list.
    pub fn append_to(self, feed: &mut Feed) {
        feed.add_channel(self);
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Renders the `<channel>` element with its items.
    ///
    /// # Errors
    ///
    /// Propagates the first [`RenderError`] from this channel, its podcast
    /// extension, or any item.
    pub fn render(&self) -> Result<Element, RenderError> {
        let mut xml = Element::new("channel");
        let policy = TextPolicy::from_prefer_cdata(self.prefer_cdata);

        if self.title.is_none() || self.url.is_none() {
            tracing::warn!(
                has_title = self.title.is_some(),
                has_url = self.url.is_some(),
                "Rendering channel without title or link"
            );
        }
        xml.push(Element::text("title", self.title.as_deref().unwrap_or_default())?);
        xml.push(Element::text("link", self.url.as_deref().unwrap_or_default())?);

        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            xml.push(Element::with_policy("description", description, policy)?);
        }

        for leaf in self.categories.iter().flat_map(Category::leaves) {
            xml.push(Element::with_policy("category", leaf, policy)?);
        }

        if let Some(feed_url) = &self.feed_url {
            xml.push(self_link(feed_url)?);
        }

        if let Some(language) = &self.language {
            xml.push(Element::text("language", language)?);
        }

        if let Some(copyright) = &self.copyright {
            xml.push(Element::text("copyright", copyright)?);
        }

        if let Some(date) = &self.pub_date {
            xml.push(Element::text("pubDate", &format_rss_date(date))?);
        }

        if let Some(date) = &self.last_build_date {
            xml.push(Element::text("lastBuildDate", &format_rss_date(date))?);
        }

        if let Some(ttl) = self.ttl {
            xml.push(Element::text("ttl", &ttl.to_string())?);
        }

        if let Some(hub) = &self.pubsubhubbub {
            xml.push(self_link(&hub.feed_url)?);
            xml.push(
                Element::new(Namespace::Atom.qualify("link"))
                    .attr("rel", "hub")?
                    .attr("href", &hub.hub_url)?,
            );
        }

        if let Some(podcast) = &self.podcast {
            xml.extend(podcast.render()?);
        }

        for item in &self.items {
            xml.push(item.render()?);
        }

        tracing::debug!(
            title = self.title.as_deref().unwrap_or_default(),
            items = self.items.len(),
            "Rendered channel"
        );
        Ok(xml)
    }
}

/// `<atom:link rel="self" href=".." type="application/rss+xml"/>`
fn self_link(href: &str) -> Result<Element, RenderError> {
    Element::new(Namespace::Atom.qualify("link"))
        .attr("href", href)?
        .attr("type", RSS_MIME_TYPE)?
        .attr("rel", "self")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Node;
    use chrono::TimeZone;

    fn child_names(element: &Element) -> Vec<&str> {
        element.elements().map(Element::name).collect()
    }

    fn child<'a>(element: &'a Element, name: &'a str) -> &'a Element {
        element
            .elements_named(name)
            .next()
            .unwrap_or_else(|| panic!("missing <{name}>"))
    }

    #[test]
    fn test_minimal_channel_has_title_and_link() {
        let xml = Channel::new().render().unwrap();
        assert_eq!(child_names(&xml), vec!["title", "link"]);
        assert_eq!(child(&xml, "title").text_content(), "");
        assert_eq!(child(&xml, "link").text_content(), "");
    }

    #[test]
    fn test_full_channel_order() {
        let date = Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap();
        let channel = Channel::new()
            .add_item(Item::new().title("i"))
            .podcast(PodcastExtension::new().author("A"))
            .pubsubhubbub("http://feed", "http://hub")
            .ttl(60)
            .last_build_date(date)
            .pub_date(date)
            .copyright("(c)")
            .language("en")
            .feed_url("http://example.com/feed.xml")
            .category("Cat")
            .description("Desc")
            .url("http://example.com")
            .title("Test");

        let xml = channel.render().unwrap();
        assert_eq!(
            child_names(&xml),
            vec![
                "title",
                "link",
                "description",
                "category",
                "atom:link",
                "language",
                "copyright",
                "pubDate",
                "lastBuildDate",
                "ttl",
                "atom:link",
                "atom:link",
                "itunes:author",
                "item",
            ]
        );
        assert_eq!(child(&xml, "pubDate").text_content(), "Tue, 03 Jun 2025 10:00:00 +0000");
        assert_eq!(
            child(&xml, "lastBuildDate").text_content(),
            "Tue, 03 Jun 2025 10:00:00 +0000"
        );
        assert_eq!(child(&xml, "ttl").text_content(), "60");
    }

    #[test]
    fn test_feed_url_self_link() {
        let xml = Channel::new()
            .feed_url("http://example.com/feed.xml")
            .render()
            .unwrap();
        let link = child(&xml, "atom:link");
        assert_eq!(link.attribute("href"), Some("http://example.com/feed.xml"));
        assert_eq!(link.attribute("type"), Some("application/rss+xml"));
        assert_eq!(link.attribute("rel"), Some("self"));
        assert!(link.children().is_empty());
    }

    #[test]
    fn test_pubsubhubbub_links() {
        let xml = Channel::new()
            .pubsubhubbub("http://feed", "http://hub")
            .render()
            .unwrap();
        let links: Vec<_> = xml.elements_named("atom:link").collect();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].attribute("rel"), Some("self"));
        assert_eq!(links[0].attribute("href"), Some("http://feed"));
        assert_eq!(links[0].attribute("type"), Some("application/rss+xml"));
        assert_eq!(links[1].attribute("rel"), Some("hub"));
        assert_eq!(links[1].attribute("href"), Some("http://hub"));
        assert_eq!(links[1].attribute("type"), None);
    }

    #[test]
    fn test_categories_accumulate_in_order() {
        let xml = Channel::new().category("A").category("B").render().unwrap();
        let values: Vec<_> = xml
            .elements_named("category")
            .map(Element::text_content)
            .collect();
        assert_eq!(values, vec!["A", "B"]);
    }

    #[test]
    fn test_nested_categories_flatten_depth_first() {
        let nested = Category::Nested(vec![
            Category::from("A"),
            Category::Nested(vec![Category::from("B"), Category::from("C")]),
        ]);
        let xml = Channel::new().category(nested).category("D").render().unwrap();
        let values: Vec<_> = xml
            .elements_named("category")
            .map(Element::text_content)
            .collect();
        assert_eq!(values, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_description_and_categories_follow_cdata_flag() {
        let xml = Channel::new()
            .description("a & b")
            .category("x<y")
            .prefer_cdata(true)
            .render()
            .unwrap();
        assert_eq!(
            child(&xml, "description").children(),
            &[Node::CData("a & b".into())]
        );
        assert_eq!(
            child(&xml, "category").children(),
            &[Node::CData("x<y".into())]
        );
    }

    #[test]
    fn test_items_rendered_in_order_as_standalone() {
        let items = vec![
            Item::new().title("1"),
            Item::new().title("2").prefer_cdata(true).description("<d>"),
            Item::new().title("3"),
        ];
        let mut channel = Channel::new().title("T").url("http://t");
        for item in items.clone() {
            channel = channel.add_item(item);
        }

        let xml = channel.render().unwrap();
        let rendered: Vec<_> = xml.elements_named("item").cloned().collect();
        assert_eq!(rendered.len(), 3);
        for (item, element) in items.iter().zip(&rendered) {
            assert_eq!(&item.render().unwrap(), element);
        }
    }

    #[test]
    fn test_podcast_children_merged_before_items() {
        let xml = Channel::new()
            .add_item(Item::new())
            .podcast(PodcastExtension::new().title("Show").image("http://img"))
            .render()
            .unwrap();
        assert_eq!(
            child_names(&xml),
            vec!["title", "link", "itunes:title", "itunes:image", "item"]
        );
    }

    #[test]
    fn test_append_to_feed() {
        let mut feed = Feed::new();
        Channel::new().title("a").append_to(&mut feed);
        Channel::new().title("b").append_to(&mut feed);
        assert_eq!(feed.channels().len(), 2);
    }

    #[test]
    fn test_push_item_through_reference() {
        let mut channel = Channel::new();
        channel.push_item(Item::new()).push_item(Item::new());
        assert_eq!(channel.items().len(), 2);
    }

    #[test]
    fn test_item_error_propagates() {
        let result = Channel::new()
            .add_item(Item::new().title("\x1b[31m"))
            .render();
        assert!(matches!(result, Err(RenderError::InvalidCharacter { .. })));
    }
}
