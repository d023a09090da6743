//! Manifest files must describe exactly the feed the builder API would produce.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use rsswriter::feed::{Category, Channel, Feed, Item, PodcastExtension};
use rsswriter::manifest::FeedManifest;

const PODCAST_TOML: &str = r#"
[[channel]]
title = "Show"
url = "http://example.com"
feed_url = "http://example.com/feed.xml"
description = "<b>Weekly</b> show"
prefer_cdata = true
category = ["Tech", ["Rust", "XML"]]
language = "en-us"
copyright = "2025 Example"
pub_date = 1748944800
last_build_date = 1748944800
ttl = 60

[channel.pubsubhubbub]
feed_url = "http://example.com/feed.xml"
hub_url = "http://hub.example.com"

[channel.podcast]
author = "Host"
summary = "About the show"
image = "http://example.com/cover.jpg"
explicit = "false"

[[channel.item]]
title = "Episode 1"
url = "http://example.com/1"
guid = "ep-1"
guid_is_permalink = false
pub_date = 1748944800
category = ["News", { name = "Audio", domain = "http://example.com/tags" }]
author = "host@example.com"
creator = "Host"
enclosure = { url = "http://example.com/1.mp3", length = 1234, type = "audio/mpeg" }

[channel.item.podcast]
episode = 1
season = "first"
episode_type = "full"
duration = "00:30:00"
"#;

fn expected_feed() -> Feed {
    let date = Utc.with_ymd_and_hms(2025, 6, 3, 10, 0, 0).unwrap();
    Feed::new().with_channel(
        Channel::new()
            .prefer_cdata(true)
            .title("Show")
            .url("http://example.com")
            .feed_url("http://example.com/feed.xml")
            .description("<b>Weekly</b> show")
            .category("Tech")
            .category(Category::from(vec!["Rust", "XML"]))
            .language("en-us")
            .copyright("2025 Example")
            .pub_date(date)
            .last_build_date(date)
            .ttl(60)
            .pubsubhubbub("http://example.com/feed.xml", "http://hub.example.com")
            .podcast(
                PodcastExtension::new()
                    .author("Host")
                    .summary("About the show")
                    .image("http://example.com/cover.jpg")
                    .explicit("false"),
            )
            .add_item(
                Item::new()
                    .title("Episode 1")
                    .url("http://example.com/1")
                    .guid("ep-1", false)
                    .pub_date(date)
                    .category("News")
                    .category_with_domain("Audio", "http://example.com/tags")
                    .author("host@example.com")
                    .creator("Host")
                    .enclosure("http://example.com/1.mp3", 1234, "audio/mpeg")
                    .podcast(
                        PodcastExtension::new()
                            .episode(1)
                            .episode_type("full")
                            .duration("00:30:00"),
                    ),
            ),
    )
}

#[test]
fn test_toml_manifest_matches_builder() {
    let feed = FeedManifest::from_toml(PODCAST_TOML)
        .unwrap()
        .into_feed()
        .unwrap();
    assert_eq!(feed, expected_feed());
    assert_eq!(feed.to_xml().unwrap(), expected_feed().to_xml().unwrap());
}

#[test]
fn test_non_integer_season_is_omitted() {
    let xml = FeedManifest::from_toml(PODCAST_TOML)
        .unwrap()
        .into_feed()
        .unwrap()
        .to_xml()
        .unwrap();
    assert!(xml.contains("<itunes:episode>1</itunes:episode>"));
    assert!(!xml.contains("itunes:season"));
}

#[test]
fn test_json_manifest_from_file() {
    let dir = std::env::temp_dir().join("rsswriter_manifest_json_file");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("feed.json");
    std::fs::write(
        &path,
        r#"{
  "channel": [{
    "title": "Test",
    "url": "http://example.com",
    "feed_url": "http://example.com/feed.xml",
    "item": [{ "title": "Hello" }]
  }]
}"#,
    )
    .unwrap();

    let feed = FeedManifest::load(&path).unwrap().into_feed().unwrap();
    let expected = Feed::new().with_channel(
        Channel::new()
            .title("Test")
            .url("http://example.com")
            .feed_url("http://example.com/feed.xml")
            .add_item(Item::new().title("Hello")),
    );
    assert_eq!(feed, expected);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_manifest_file() {
    let result = FeedManifest::load(std::path::Path::new(
        "/tmp/rsswriter_definitely_missing_manifest.toml",
    ));
    assert!(result.is_err());
}
