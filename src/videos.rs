use crate::{
    eid::Eid,
    preview::{embed_url, watch_url},
    storage::{StorageManager, VIDEOS_KEY, VISITED_KEY},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    hash::Hash,
    sync::{Arc, RwLock},
    time::Instant,
};

#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: Eid,

    /// Insertion sequence, higher is newer.
    #[serde(default)]
    pub seq: u64,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,

    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub video_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub playable_url: String,
    pub thumbnail_url: String,
}

impl Hash for VideoRecord {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl PartialEq for VideoRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl VideoRecord {
    /// User label if there is one, otherwise the title.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.title)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VideoCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub video_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub thumbnail_url: String,
}

const SEEDS: [(&str, &str, &str); 4] = [
    (
        "W6NZfCO5SIk",
        "Intro to JavaScript",
        "Learn the basics of JavaScript for beginners.",
    ),
    (
        "dFgzHOX84xQ",
        "TailwindCSS Crash Course",
        "Build modern UIs with TailwindCSS.",
    ),
    (
        "YrxBCBibVo0",
        "Vue.js Fundamentals",
        "Understand the core concepts of Vue.js.",
    ),
    (
        "O6P86uwfdR0",
        "React Hooks Tutorial",
        "Master React Hooks with practical examples.",
    ),
];

/// Demo collection shown on the very first visit, newest first.
pub fn seed_videos() -> Vec<VideoRecord> {
    let added_at = DateTime::<Utc>::default();
    SEEDS
        .iter()
        .enumerate()
        .map(|(idx, (video_id, title, description))| VideoRecord {
            id: Eid::from(format!("seed-{}", idx + 1)),
            seq: (SEEDS.len() - idx) as u64,
            added_at,
            title: title.to_string(),
            name: Some(title.to_string()),
            description: Some(description.to_string()),
            video_id: video_id.to_string(),
            source_url: Some(watch_url(video_id)),
            playable_url: embed_url(video_id),
            thumbnail_url: format!("https://img.youtube.com/vi/{video_id}/maxresdefault.jpg"),
        })
        .collect()
}

/// Ordered video collection mirrored into storage after every change.
/// Newest records sit at the head.
#[derive(Clone)]
pub struct VideoStore {
    list: Arc<RwLock<Vec<VideoRecord>>>,
    storage: Arc<dyn StorageManager>,
}

impl VideoStore {
    /// Restores the saved collection. Falls back to the seed collection on
    /// the first ever visit and to an empty one otherwise. A snapshot that
    /// cannot be read or parsed is logged and dropped.
    pub fn load(storage: Arc<dyn StorageManager>, seed_first_visit: bool) -> std::io::Result<Self> {
        let now = Instant::now();

        let saved = match storage.read_string(VIDEOS_KEY) {
            Ok(saved) => saved,
            Err(err) => {
                log::error!("couldnt read saved videos: {err}");
                Some(String::new())
            }
        };

        let mut videos = match saved {
            Some(snapshot) => match serde_json::from_str::<Vec<VideoRecord>>(&snapshot) {
                Ok(videos) => videos,
                Err(err) => {
                    log::error!("error loading videos from storage: {err}");
                    vec![]
                }
            },
            None if !storage.exists(VISITED_KEY) => {
                storage.write(VISITED_KEY, b"true")?;
                if seed_first_visit {
                    log::info!("first visit, loading seed videos");
                    seed_videos()
                } else {
                    vec![]
                }
            }
            None => vec![],
        };

        // snapshots written before sequences existed keep their order
        if !videos.is_empty() && videos.iter().all(|v| v.seq == 0) {
            let len = videos.len();
            for (idx, video) in videos.iter_mut().enumerate() {
                video.seq = (len - idx) as u64;
            }
        }

        log::debug!(
            "took {}ms to load {} videos",
            now.elapsed().as_micros() as f64 / 1000.0,
            videos.len()
        );

        let store = Self {
            list: Arc::new(RwLock::new(videos)),
            storage,
        };

        if !store.is_empty() && !store.storage.exists(VIDEOS_KEY) {
            store.persist()?;
        }

        Ok(store)
    }

    /// Writes the full collection, including an empty one.
    pub fn persist(&self) -> std::io::Result<()> {
        let videos = self.list.read().unwrap();
        let snapshot = serde_json::to_vec(&*videos)?;
        self.storage.write(VIDEOS_KEY, &snapshot)
    }

    /// Inserts at the head. Input is expected to be validated already, and
    /// duplicate video ids are allowed.
    pub fn add(&self, create: VideoCreate) -> std::io::Result<VideoRecord> {
        let mut videos = self.list.write().unwrap();

        let seq = videos.iter().map(|v| v.seq).max().unwrap_or_default() + 1;

        let video = VideoRecord {
            id: Eid::generate(),
            seq,
            added_at: Utc::now(),
            title: create.title,
            name: create.name,
            description: create.description,
            playable_url: embed_url(&create.video_id),
            video_id: create.video_id,
            source_url: create.source_url,
            thumbnail_url: create.thumbnail_url,
        };

        videos.insert(0, video.clone());
        drop(videos);

        self.persist()?;

        Ok(video)
    }

    /// Removes the record with `id`. Missing ids are not an error.
    pub fn remove(&self, id: &str) -> std::io::Result<Option<VideoRecord>> {
        let mut videos = self.list.write().unwrap();
        let removed = videos
            .iter()
            .position(|v| v.id.as_str() == id)
            .map(|idx| videos.remove(idx));
        drop(videos);

        if removed.is_some() {
            self.persist()?;
        }

        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Option<VideoRecord> {
        self.list
            .read()
            .unwrap()
            .iter()
            .find(|v| v.id.as_str() == id)
            .cloned()
    }

    pub fn list(&self) -> Vec<VideoRecord> {
        self.list.read().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.list.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.read().unwrap().is_empty()
    }
}
