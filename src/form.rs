use crate::{
    preview::{Preview, PreviewFetcher, PreviewTracker, RequestToken},
    validation::{self, FormErrors},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    Idle,
    Loading(RequestToken),
    Ready(Preview),
}

/// Trimmed values of a form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidVideo {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub video_id: String,
}

/// State of the add-video form: the three inputs, the pending preview and the
/// inline errors from the last validation.
#[derive(Debug)]
pub struct VideoForm {
    name: String,
    description: String,
    url: String,
    preview: PreviewState,
    tracker: PreviewTracker,
    errors: FormErrors,
}

impl Default for VideoForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            url: String::new(),
            preview: PreviewState::Idle,
            tracker: PreviewTracker::new(),
            errors: FormErrors::default(),
        }
    }
}

impl VideoForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn preview(&self) -> Option<&Preview> {
        match &self.preview {
            PreviewState::Ready(preview) => Some(preview),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.preview, PreviewState::Loading(_))
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.errors.clear("name");
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.errors.clear("description");
    }

    /// Changes the url. Any preview in flight becomes stale. A valid url
    /// starts a new request: the returned token and video id are what the
    /// caller fetches and hands back to `apply_preview`.
    pub fn set_url(&mut self, url: impl Into<String>) -> Option<(RequestToken, String)> {
        self.url = url.into();
        self.errors.clear("url");
        self.tracker.invalidate();

        let url = self.url.trim();
        let video_id = validation::is_valid_video_url(url)
            .then(|| validation::extract_video_id(url))
            .flatten()
            .map(String::from);

        match video_id {
            Some(video_id) => {
                let token = self.tracker.issue();
                self.preview = PreviewState::Loading(token);
                Some((token, video_id))
            }
            None => {
                self.preview = PreviewState::Idle;
                None
            }
        }
    }

    /// Stores a fetched preview unless a newer request has been issued
    /// since. A blank name is filled with the preview title.
    pub fn apply_preview(&mut self, token: RequestToken, preview: Preview) -> bool {
        if !self.tracker.is_current(token) {
            log::debug!("dropping stale preview for {}", preview.video_id);
            return false;
        }

        if self.name.trim().is_empty() {
            self.name = preview.title.clone();
        }
        self.preview = PreviewState::Ready(preview);
        true
    }

    /// Sets the url and fetches its preview in one go.
    pub fn load_preview(&mut self, url: impl Into<String>, fetcher: &PreviewFetcher) -> Option<&Preview> {
        let (token, video_id) = self.set_url(url)?;
        let preview = fetcher.fetch(&video_id);
        self.apply_preview(token, preview);
        self.preview()
    }

    /// Like `load_preview`, but only asks for the title when the name is
    /// still blank. Otherwise the url is set without fetching anything.
    pub fn autofill_from(&mut self, url: impl Into<String>, fetcher: &PreviewFetcher) {
        if self.name.trim().is_empty() {
            self.load_preview(url, fetcher);
        } else {
            let _ = self.set_url(url);
        }
    }

    /// Checks every field and records the messages for the ones that fail.
    pub fn validate(&mut self) -> Result<ValidVideo, FormErrors> {
        let mut errors = FormErrors::default();

        if let Some(message) = validation::validate_required(&self.name, "Video name") {
            errors.insert("name", message);
        }
        if let Some(message) = validation::validate_video_url(&self.url) {
            errors.insert("url", message);
        }

        self.errors = errors.clone();
        if !errors.is_empty() {
            return Err(errors);
        }

        let url = self.url.trim().to_string();
        let video_id = match validation::extract_video_id(&url) {
            Some(video_id) => video_id.to_string(),
            None => {
                let mut errors = FormErrors::default();
                errors.insert("url", "Please enter a valid YouTube URL");
                self.errors = errors.clone();
                return Err(errors);
            }
        };

        let description = self.description.trim();

        Ok(ValidVideo {
            name: self.name.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            url,
            video_id,
        })
    }

    pub fn reset(&mut self) {
        self.tracker.invalidate();
        self.name.clear();
        self.description.clear();
        self.url.clear();
        self.preview = PreviewState::Idle;
        self.errors = FormErrors::default();
    }
}
