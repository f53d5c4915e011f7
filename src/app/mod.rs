pub mod errors;

use crate::{
    config::Config,
    form::VideoForm,
    preview::PreviewFetcher,
    search::{self, SortKey},
    storage::{StorageManager, NOW_PLAYING_KEY, THEME_KEY},
    theme::Theme,
    toast::{Toast, ToastQueue},
    videos::{self, VideoCreate, VideoRecord, VideoStore},
};
use std::{sync::Arc, time::Duration};

pub use errors::AppError;

/// Application context: owns the collection, the toasts, the player
/// selection and the theme. Everything persistent goes through `storage`.
pub struct App {
    store: VideoStore,
    toasts: ToastQueue,
    preview: PreviewFetcher,
    storage: Arc<dyn StorageManager>,
    now_playing: VideoRecord,
    theme: Theme,
}

fn default_selection() -> VideoRecord {
    videos::seed_videos().remove(0)
}

impl App {
    pub fn new(
        config: &Config,
        storage: Arc<dyn StorageManager>,
        preview: PreviewFetcher,
    ) -> Result<Self, AppError> {
        let store = VideoStore::load(storage.clone(), config.seed_on_first_visit)?;

        let theme = match storage.read_string(THEME_KEY) {
            Ok(Some(theme)) => theme.parse().unwrap_or_else(|err| {
                log::warn!("{err}, using default");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(err) => {
                log::warn!("couldnt read theme: {err}");
                Theme::default()
            }
        };

        let now_playing = match storage.read_string(NOW_PLAYING_KEY) {
            Ok(id) => id.and_then(|id| store.get(id.trim())),
            Err(err) => {
                log::warn!("couldnt read now playing: {err}");
                None
            }
        }
        .unwrap_or_else(default_selection);

        Ok(Self {
            store,
            toasts: ToastQueue::new(Duration::from_millis(config.toast_ttl_ms)),
            preview,
            storage,
            now_playing,
            theme,
        })
    }

    pub fn preview_fetcher(&self) -> &PreviewFetcher {
        &self.preview
    }

    pub fn store(&self) -> &VideoStore {
        &self.store
    }

    /// Validates the form and saves the video it describes. On success the
    /// form is reset; on failure its inline errors are left in place.
    pub fn add_video(&mut self, form: &mut VideoForm) -> Result<VideoRecord, AppError> {
        let valid = form.validate().map_err(AppError::Validation)?;

        let create = VideoCreate {
            title: valid.name.clone(),
            name: Some(valid.name),
            description: valid.description,
            thumbnail_url: self.preview.thumbnail_url(&valid.video_id),
            video_id: valid.video_id,
            source_url: Some(valid.url),
        };

        let video = match self.store.add(create) {
            Ok(video) => video,
            Err(err) => {
                log::error!("failed to save video: {err}");
                self.toasts.error("Failed to add video. Please try again.");
                return Err(err.into());
            }
        };

        log::info!("added video {} ({})", video.id, video.video_id);
        self.toasts.success(format!(
            "Video \"{}\" added successfully!",
            video.display_name()
        ));
        form.reset();

        Ok(video)
    }

    /// Deletes a video. Unknown ids are a no-op returning `None`. Deleting
    /// the video being played moves playback back to the first seed.
    pub fn delete_video(&mut self, id: &str) -> Result<Option<VideoRecord>, AppError> {
        let removed = match self.store.remove(id) {
            Ok(removed) => removed,
            Err(err) => {
                // the record is already out of the in-memory list
                if self.now_playing.id.as_str() == id {
                    self.now_playing = default_selection();
                }
                log::error!("failed to delete video {id}: {err}");
                self.toasts.error("Failed to delete video. Please try again.");
                return Err(err.into());
            }
        };

        if let Some(video) = &removed {
            log::info!("deleted video {}", video.id);

            if self.now_playing.id == video.id {
                self.select(default_selection())?;
            }

            self.toasts.success(format!(
                "Video \"{}\" deleted successfully!",
                video.display_name()
            ));
        }

        Ok(removed)
    }

    pub fn watch(&mut self, id: &str) -> Result<VideoRecord, AppError> {
        let video = self.store.get(id).ok_or(AppError::NotFound)?;
        self.select(video.clone())?;
        Ok(video)
    }

    fn select(&mut self, video: VideoRecord) -> Result<(), AppError> {
        self.storage.write(NOW_PLAYING_KEY, video.id.as_bytes())?;
        self.now_playing = video;
        Ok(())
    }

    pub fn now_playing(&self) -> &VideoRecord {
        &self.now_playing
    }

    pub fn view(&self, query: &str, sort: SortKey) -> Vec<VideoRecord> {
        search::view(&self.store.list(), query, sort)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<Theme, AppError> {
        self.storage.write(THEME_KEY, theme.to_string().as_bytes())?;
        self.theme = theme;
        Ok(theme)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, AppError> {
        self.set_theme(self.theme.toggled())
    }

    pub fn toasts(&mut self) -> &mut ToastQueue {
        &mut self.toasts
    }

    pub fn active_toasts(&mut self) -> Vec<Toast> {
        self.toasts.active()
    }
}
