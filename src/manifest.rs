//! Declarative feed manifests (TOML or JSON) converted into a [`Feed`].
//!
//! A manifest mirrors the builder API one field per key. Timestamps are Unix
//! seconds. Podcast `episode`/`season` accept any value but only
//! non-negative integers are kept; anything else is dropped without error.
//!
//! ```toml
//! [[channel]]
//! title = "Test"
//! url = "http://example.com"
//! feed_url = "http://example.com/feed.xml"
//! category = ["News", ["Tech", "Rust"]]
//!
//! [[channel.item]]
//! title = "Hello"
//! pub_date = 1700000000
//! ```
use std::path::Path;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::feed::{timestamp_to_datetime, Category, Channel, Feed, Item, PodcastExtension};
use crate::xml::RenderError;

/// MIME type assumed for enclosures that do not name one.
const DEFAULT_ENCLOSURE_TYPE: &str = "audio/mpeg";

/// Errors raised while reading or converting a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML manifest: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid JSON manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported manifest format '{0}' (expected .toml or .json)")]
    UnsupportedFormat(String),

    #[error("Invalid manifest value: {0}")]
    Value(#[from] RenderError),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedManifest {
    #[serde(default, rename = "channel", alias = "channels")]
    pub channels: Vec<ChannelManifest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChannelManifest {
    pub title: Option<String>,
    pub url: Option<String>,
    pub feed_url: Option<String>,
    pub description: Option<String>,
    pub category: Vec<Category>,
    pub language: Option<String>,
    pub copyright: Option<String>,
    pub pub_date: Option<i64>,
    pub last_build_date: Option<i64>,
    pub ttl: Option<u32>,
    pub pubsubhubbub: Option<HubManifest>,
    pub podcast: Option<PodcastManifest>,
    pub prefer_cdata: bool,
    #[serde(alias = "items")]
    pub item: Vec<ItemManifest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HubManifest {
    pub feed_url: String,
    pub hub_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemManifest {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub content_encoded: Option<String>,
    pub category: Vec<ItemCategoryManifest>,
    pub guid: Option<String>,
    pub guid_is_permalink: bool,
    pub pub_date: Option<i64>,
    pub enclosure: Option<EnclosureManifest>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub podcast: Option<PodcastManifest>,
    pub prefer_cdata: bool,
}

/// Item category: a bare name or `{ name, domain }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ItemCategoryManifest {
    Name(String),
    WithDomain { name: String, domain: Option<String> },
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnclosureManifest {
    pub url: String,
    #[serde(default)]
    pub length: u64,
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PodcastManifest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub image: Option<String>,
    pub duration: Option<String>,
    pub explicit: Option<String>,
    #[serde(deserialize_with = "integer_or_nothing")]
    pub episode: Option<u32>,
    #[serde(deserialize_with = "integer_or_nothing")]
    pub season: Option<u32>,
    pub episode_type: Option<String>,
    pub block: Option<String>,
    pub prefer_cdata: bool,
}

/// Keeps integer values and silently discards anything else.
fn integer_or_nothing<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Integer(u32),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Integer(n)) => Some(n),
        Some(Lenient::Other(_)) => {
            tracing::debug!("Ignoring non-integer podcast episode/season value");
            None
        }
        None => None,
    })
}

impl FeedManifest {
    /// Reads a manifest, choosing the format from the file extension.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let content = std::fs::read_to_string(path)?;

        let manifest = match extension.as_str() {
            "toml" => Self::from_toml(&content)?,
            "json" => Self::from_json(&content)?,
            other => return Err(ManifestError::UnsupportedFormat(other.to_string())),
        };
        tracing::info!(
            path = %path.display(),
            channels = manifest.channels.len(),
            "Loaded feed manifest"
        );
        Ok(manifest)
    }

    pub fn from_toml(content: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Builds the feed through the builder API.
    ///
    /// # Errors
    ///
    /// [`ManifestError::Value`] when a timestamp is out of range.
    pub fn into_feed(self) -> Result<Feed, ManifestError> {
        let mut feed = Feed::new();
        for channel in self.channels {
            feed.add_channel(channel.into_channel()?);
        }
        Ok(feed)
    }
}

impl ChannelManifest {
    pub fn into_channel(self) -> Result<Channel, ManifestError> {
        let mut channel = Channel::new().prefer_cdata(self.prefer_cdata);

        if let Some(title) = self.title {
            channel = channel.title(title);
        }
        if let Some(url) = self.url {
            channel = channel.url(url);
        }
        if let Some(feed_url) = self.feed_url {
            channel = channel.feed_url(feed_url);
        }
        if let Some(description) = self.description {
            channel = channel.description(description);
        }
        for category in self.category {
            channel = channel.category(category);
        }
        if let Some(language) = self.language {
            channel = channel.language(language);
        }
        if let Some(copyright) = self.copyright {
            channel = channel.copyright(copyright);
        }
        if let Some(seconds) = self.pub_date {
            channel = channel.pub_date(timestamp_to_datetime(seconds)?);
        }
        if let Some(seconds) = self.last_build_date {
            channel = channel.last_build_date(timestamp_to_datetime(seconds)?);
        }
        if let Some(ttl) = self.ttl {
            channel = channel.ttl(ttl);
        }
        if let Some(hub) = self.pubsubhubbub {
            channel = channel.pubsubhubbub(hub.feed_url, hub.hub_url);
        }
        if let Some(podcast) = self.podcast {
            channel = channel.podcast(podcast.into_extension());
        }
        for item in self.item {
            channel = channel.add_item(item.into_item()?);
        }

        Ok(channel)
    }
}

impl ItemManifest {
    pub fn into_item(self) -> Result<Item, ManifestError> {
        let mut item = Item::new().prefer_cdata(self.prefer_cdata);

        if let Some(title) = self.title {
            item = item.title(title);
        }
        if let Some(url) = self.url {
            item = item.url(url);
        }
        if let Some(description) = self.description {
            item = item.description(description);
        }
        if let Some(content) = self.content_encoded {
            item = item.content_encoded(content);
        }
        for category in self.category {
            item = match category {
                ItemCategoryManifest::Name(name)
                | ItemCategoryManifest::WithDomain { name, domain: None } => item.category(name),
                ItemCategoryManifest::WithDomain {
                    name,
                    domain: Some(domain),
                } => item.category_with_domain(name, domain),
            };
        }
        if let Some(guid) = self.guid {
            item = item.guid(guid, self.guid_is_permalink);
        }
        if let Some(seconds) = self.pub_date {
            item = item.pub_date(timestamp_to_datetime(seconds)?);
        }
        if let Some(enclosure) = self.enclosure {
            let mime_type = enclosure
                .mime_type
                .unwrap_or_else(|| DEFAULT_ENCLOSURE_TYPE.to_string());
            item = item.enclosure(enclosure.url, enclosure.length, mime_type);
        }
        if let Some(author) = self.author {
            item = item.author(author);
        }
        if let Some(creator) = self.creator {
            item = item.creator(creator);
        }
        if let Some(podcast) = self.podcast {
            item = item.podcast(podcast.into_extension());
        }

        Ok(item)
    }
}

impl PodcastManifest {
    pub fn into_extension(self) -> PodcastExtension {
        let mut podcast = PodcastExtension::new().prefer_cdata(self.prefer_cdata);

        if let Some(title) = self.title {
            podcast = podcast.title(title);
        }
        if let Some(subtitle) = self.subtitle {
            podcast = podcast.subtitle(subtitle);
        }
        if let Some(author) = self.author {
            podcast = podcast.author(author);
        }
        if let Some(summary) = self.summary {
            podcast = podcast.summary(summary);
        }
        if let Some(image) = self.image {
            podcast = podcast.image(image);
        }
        if let Some(duration) = self.duration {
            podcast = podcast.duration(duration);
        }
        if let Some(explicit) = self.explicit {
            podcast = podcast.explicit(explicit);
        }
        if let Some(episode) = self.episode {
            podcast = podcast.episode(episode);
        }
        if let Some(season) = self.season {
            podcast = podcast.season(season);
        }
        if let Some(episode_type) = self.episode_type {
            podcast = podcast.episode_type(episode_type);
        }
        if let Some(block) = self.block {
            podcast = podcast.block(block);
        }

        podcast
    }
}
