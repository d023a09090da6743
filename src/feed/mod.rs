//! Feed entities and their rendering into the XML tree.
//!
//! Entities are plain values configured with consuming builder methods:
//!
//! - [`Feed`] - document root, owns its channels
//! - [`Channel`] - channel metadata, owns its items
//! - [`Item`] - one entry
//! - [`PodcastExtension`] - iTunes metadata merged into a channel or item
//!
//! Rendering never mutates an entity; each `render()` returns a fresh sub-tree
//! that the parent splices into its own element.
//!
//! # Example
//!
//! ```
//! use rsswriter::feed::{Channel, Feed, Item};
//!
//! let mut feed = Feed::new();
//! Channel::new()
//!     .title("Test")
//!     .url("http://example.com")
//!     .feed_url("http://example.com/feed.xml")
//!     .add_item(Item::new().title("Hello"))
//!     .append_to(&mut feed);
//!
//! let xml = feed.to_xml().unwrap();
//! assert!(xml.contains("<title>Hello</title>"));
//! ```

mod category;
mod channel;
mod date;
mod item;
mod podcast;
mod rss;

pub use category::Category;
pub use channel::{Channel, PubSubHubbub};
pub use date::{format_rss_date, timestamp_to_datetime};
pub use item::{Enclosure, Item};
pub use podcast::PodcastExtension;
pub use rss::Feed;
