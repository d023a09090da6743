use crate::xml::{Element, Fragment, Namespace, RenderError, TextPolicy};

/// iTunes podcast metadata attachable to a [`Channel`](super::Channel) or
/// an [`Item`](super::Item).
///
/// Renders to a [`Fragment`] whose elements are merged directly into the
/// parent element. Only `summary` honours [`prefer_cdata`](Self::prefer_cdata);
/// the short fields (title, author, subtitle) are always escaped text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodcastExtension {
    title: Option<String>,
    subtitle: Option<String>,
    author: Option<String>,
    summary: Option<String>,
    image: Option<String>,
    duration: Option<String>,
    explicit: Option<String>,
    episode: Option<u32>,
    season: Option<u32>,
    episode_type: Option<String>,
    block: Option<String>,
    prefer_cdata: bool,
}

impl PodcastExtension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Artwork URL, written as `<itunes:image href="..."/>`.
    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    /// Duration as iTunes expects it (`HH:MM:SS`, `MM:SS` or seconds).
    pub fn duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    /// `"true"`/`"false"` (older directories also accept `"yes"`, `"clean"`).
    pub fn explicit(mut self, explicit: impl Into<String>) -> Self {
        self.explicit = Some(explicit.into());
        self
    }

    pub fn episode(mut self, episode: u32) -> Self {
        self.episode = Some(episode);
        self
    }

    pub fn season(mut self, season: u32) -> Self {
        self.season = Some(season);
        self
    }

    /// `full`, `trailer` or `bonus`. Empty values are not emitted.
    pub fn episode_type(mut self, episode_type: impl Into<String>) -> Self {
        self.episode_type = Some(episode_type.into());
        self
    }

    /// `"Yes"` hides the show or episode from the directory. Empty values are not emitted.
    pub fn block(mut self, block: impl Into<String>) -> Self {
        self.block = Some(block.into());
        self
    }

    pub fn prefer_cdata(mut self, prefer_cdata: bool) -> Self {
        self.prefer_cdata = prefer_cdata;
        self
    }

    /// Renders the set fields as `itunes:*` elements in a fixed order.
    ///
    /// # Errors
    ///
    /// [`RenderError::InvalidCharacter`] if a field holds a character XML cannot represent.
    pub fn render(&self) -> Result<Fragment, RenderError> {
        let itunes = |local: &str| Namespace::Itunes.qualify(local);
        let mut fragment = Fragment::new();

        for (local, value) in [
            ("title", &self.title),
            ("author", &self.author),
            ("subtitle", &self.subtitle),
        ] {
            if let Some(value) = value {
                fragment.push(Element::text(itunes(local), value)?);
            }
        }

        if let Some(summary) = &self.summary {
            let policy = TextPolicy::from_prefer_cdata(self.prefer_cdata);
            fragment.push(Element::with_policy(itunes("summary"), summary, policy)?);
        }

        if let Some(image) = &self.image {
            fragment.push(Element::new(itunes("image")).attr("href", image)?);
        }

        for (local, value) in [("duration", &self.duration), ("explicit", &self.explicit)] {
            if let Some(value) = value {
                fragment.push(Element::text(itunes(local), value)?);
            }
        }

        for (local, value) in [("episode", self.episode), ("season", self.season)] {
            if let Some(number) = value {
                fragment.push(Element::text(itunes(local), &number.to_string())?);
            }
        }

        for (local, value) in [("episodeType", &self.episode_type), ("block", &self.block)] {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                fragment.push(Element::text(itunes(local), value)?);
            }
        }

        Ok(fragment)
    }
}
