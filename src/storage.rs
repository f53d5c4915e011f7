use std::{
    collections::HashMap,
    io::ErrorKind,
    path::PathBuf,
    str::FromStr,
    sync::RwLock,
};

use crate::eid::Eid;

/// Snapshot of saved videos.
pub const VIDEOS_KEY: &str = "learntube-user-videos";
/// Set once the seed collection has been shown.
pub const VISITED_KEY: &str = "learntube-has-visited";
pub const THEME_KEY: &str = "learntube-theme";
pub const NOW_PLAYING_KEY: &str = "learntube-now-playing";

/// Key-value persistence port. Every value is an opaque byte blob stored
/// under a fixed key.
pub trait StorageManager: Send + Sync {
    fn write(&self, key: &str, data: &[u8]) -> std::io::Result<()>;
    fn read(&self, key: &str) -> std::io::Result<Vec<u8>>;
    fn exists(&self, key: &str) -> bool;
    fn delete(&self, key: &str) -> std::io::Result<()>;

    /// Reads a value as utf8, `None` when the key is absent.
    fn read_string(&self, key: &str) -> std::io::Result<Option<String>> {
        match self.read(key) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|err| std::io::Error::new(ErrorKind::InvalidData, err)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[derive(Clone)]
pub struct BackendLocal {
    pub base_dir: PathBuf,
}

impl BackendLocal {
    pub fn new(storage_dir: &str) -> std::io::Result<Self> {
        let path = PathBuf::from_str(storage_dir).expect("infallible PathBuf::from_str for &str");
        std::fs::create_dir_all(&path)?;
        Ok(BackendLocal { base_dir: path })
    }

    fn path_of(&self, key: &str) -> PathBuf {
        self.base_dir.join(key)
    }
}

impl StorageManager for BackendLocal {
    fn exists(&self, key: &str) -> bool {
        std::fs::metadata(self.path_of(key)).is_ok()
    }

    fn read(&self, key: &str) -> std::io::Result<Vec<u8>> {
        std::fs::read(self.path_of(key))
    }

    fn write(&self, key: &str, data: &[u8]) -> std::io::Result<()> {
        let temp_path = self.base_dir.join(format!("{}-{key}", Eid::generate()));

        std::fs::write(&temp_path, data)?;

        std::fs::rename(&temp_path, self.path_of(key))
    }

    fn delete(&self, key: &str) -> std::io::Result<()> {
        std::fs::remove_file(self.path_of(key))
    }
}

/// In-process storage, used where nothing should touch the disk.
#[derive(Default)]
pub struct BackendMemory {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl BackendMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageManager for BackendMemory {
    fn write(&self, key: &str, data: &[u8]) -> std::io::Result<()> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn read(&self, key: &str) -> std::io::Result<Vec<u8>> {
        self.entries
            .read()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| std::io::Error::new(ErrorKind::NotFound, format!("{key} not found")))
    }

    fn exists(&self, key: &str) -> bool {
        self.entries.read().unwrap().contains_key(key)
    }

    fn delete(&self, key: &str) -> std::io::Result<()> {
        self.entries.write().unwrap().remove(key);
        Ok(())
    }
}
