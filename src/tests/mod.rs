use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use anyhow::anyhow;

use crate::{
    app::App,
    config::{Config, PreviewConfig},
    preview::{PreviewFetcher, TitleLookup},
    storage::{BackendMemory, StorageManager},
};

mod web;

/// Title lookup answering from a fixed value and counting calls.
pub struct StubLookup {
    title: Option<String>,
    fail: bool,
    calls: AtomicUsize,
}

impl StubLookup {
    pub fn titled(title: &str) -> Arc<Self> {
        Arc::new(Self {
            title: Some(title.to_string()),
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            title: None,
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TitleLookup for StubLookup {
    fn lookup(&self, _video_id: &str) -> anyhow::Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.title.clone())
    }
}

pub fn fetcher_with(lookup: Arc<StubLookup>) -> PreviewFetcher {
    PreviewFetcher::new(&PreviewConfig::default(), lookup)
}

pub fn memory_storage() -> Arc<dyn StorageManager> {
    Arc::new(BackendMemory::new())
}

/// App over in-memory storage. The seed collection is loaded unless
/// `seed` is false.
pub fn create_app(seed: bool) -> (App, Arc<dyn StorageManager>) {
    let storage = memory_storage();
    let config = Config {
        seed_on_first_visit: seed,
        ..Default::default()
    };
    let app = App::new(&config, storage.clone(), fetcher_with(StubLookup::titled("Stub Title")))
        .expect("failed to create app");
    (app, storage)
}

/// In-memory storage whose writes can be switched to fail.
#[derive(Default)]
pub struct FlakyStorage {
    inner: BackendMemory,
    fail_writes: AtomicBool,
}

impl FlakyStorage {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl StorageManager for FlakyStorage {
    fn write(&self, key: &str, data: &[u8]) -> std::io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("disk full"));
        }
        self.inner.write(key, data)
    }

    fn read(&self, key: &str) -> std::io::Result<Vec<u8>> {
        self.inner.read(key)
    }

    fn exists(&self, key: &str) -> bool {
        self.inner.exists(key)
    }

    fn delete(&self, key: &str) -> std::io::Result<()> {
        self.inner.delete(key)
    }
}
