use crate::config::PreviewConfig;
use serde::{Deserialize, Serialize};
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{video_id}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    pub video_id: String,
    pub title: String,
    pub thumbnail_url: String,
}

/// Something that can name a video. `Ok(None)` means the lookup answered but
/// had no title to give.
pub trait TitleLookup: Send + Sync {
    fn lookup(&self, video_id: &str) -> anyhow::Result<Option<String>>;
}

#[derive(Debug, Deserialize)]
struct OembedResponse {
    title: Option<String>,
}

/// Asks an oEmbed endpoint about the canonical watch url.
pub struct OembedLookup {
    endpoint: String,
    timeout: Duration,
}

impl OembedLookup {
    pub fn new(config: &PreviewConfig) -> Self {
        Self {
            endpoint: config.oembed_endpoint.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn request_url(&self, video_id: &str) -> anyhow::Result<url::Url> {
        let watch = watch_url(video_id);
        Ok(url::Url::parse_with_params(
            &self.endpoint,
            &[("url", watch.as_str()), ("format", "json")],
        )?)
    }
}

impl TitleLookup for OembedLookup {
    fn lookup(&self, video_id: &str) -> anyhow::Result<Option<String>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;

        let url = self.request_url(video_id)?;
        log::debug!("oembed request: {url}");

        let response = client.get(url).send()?.error_for_status()?;
        let body: OembedResponse = response.json()?;

        Ok(body.title.filter(|title| !title.trim().is_empty()))
    }
}

/// Builds previews. Never fails: the thumbnail is derived from the id and the
/// title falls back to a fixed label.
#[derive(Clone)]
pub struct PreviewFetcher {
    lookup: Arc<dyn TitleLookup>,
    thumbnail_base: String,
    thumbnail_file: String,
    fallback_title: String,
}

impl PreviewFetcher {
    pub fn new(config: &PreviewConfig, lookup: Arc<dyn TitleLookup>) -> Self {
        Self {
            lookup,
            thumbnail_base: config.thumbnail_base.clone(),
            thumbnail_file: config.thumbnail_file.clone(),
            fallback_title: config.fallback_title.clone(),
        }
    }

    pub fn oembed(config: &PreviewConfig) -> Self {
        Self::new(config, Arc::new(OembedLookup::new(config)))
    }

    pub fn thumbnail_url(&self, video_id: &str) -> String {
        format!("{}/{video_id}/{}", self.thumbnail_base, self.thumbnail_file)
    }

    pub fn fetch(&self, video_id: &str) -> Preview {
        let title = match self.lookup.lookup(video_id) {
            Ok(Some(title)) => title,
            Ok(None) => self.fallback_title.clone(),
            Err(err) => {
                log::warn!("title lookup for {video_id} failed: {err}");
                self.fallback_title.clone()
            }
        };

        Preview {
            video_id: video_id.to_string(),
            title,
            thumbnail_url: self.thumbnail_url(video_id),
        }
    }
}

/// Identifies one preview request. Only the most recently issued token is
/// allowed to write its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

#[derive(Debug, Default)]
pub struct PreviewTracker {
    latest: AtomicU64,
}

impl PreviewTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Makes every outstanding token stale.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }
}
