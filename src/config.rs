use crate::storage::{self, StorageManager};
use anyhow::{bail, Context};
use homedir::my_home;
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.yaml";

/// Toasts stay 3s on screen plus the exit animation.
const TOAST_TTL_MS: u64 = 3300;
const LISTEN_ADDR: &str = "0.0.0.0:8080";

const OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";
const THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";
const THUMBNAIL_FILE: &str = "maxresdefault.jpg";
const FALLBACK_TITLE: &str = "YouTube Video";
const PREVIEW_TIMEOUT_SECS: u64 = 5;

/// Where titles and thumbnails come from.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "oembed_endpoint")]
    pub oembed_endpoint: String,

    #[serde(default = "thumbnail_base")]
    pub thumbnail_base: String,

    /// Resolution suffix appended after the video id
    #[serde(default = "thumbnail_file")]
    pub thumbnail_file: String,

    /// Used whenever the title lookup fails
    #[serde(default = "fallback_title")]
    pub fallback_title: String,

    #[serde(default = "preview_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            oembed_endpoint: oembed_endpoint(),
            thumbnail_base: thumbnail_base(),
            thumbnail_file: thumbnail_file(),
            fallback_title: fallback_title(),
            timeout_secs: preview_timeout_secs(),
        }
    }
}

fn oembed_endpoint() -> String {
    OEMBED_ENDPOINT.to_string()
}

fn thumbnail_base() -> String {
    THUMBNAIL_BASE.to_string()
}

fn thumbnail_file() -> String {
    THUMBNAIL_FILE.to_string()
}

fn fallback_title() -> String {
    FALLBACK_TITLE.to_string()
}

fn preview_timeout_secs() -> u64 {
    PREVIEW_TIMEOUT_SECS
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "toast_ttl_ms")]
    pub toast_ttl_ms: u64,

    #[serde(default = "listen_addr")]
    pub listen_addr: String,

    #[serde(default = "seed_on_first_visit")]
    pub seed_on_first_visit: bool,

    #[serde(default)]
    pub preview: PreviewConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            toast_ttl_ms: toast_ttl_ms(),
            listen_addr: listen_addr(),
            seed_on_first_visit: seed_on_first_visit(),
            preview: PreviewConfig::default(),
        }
    }
}

fn toast_ttl_ms() -> u64 {
    TOAST_TTL_MS
}

fn listen_addr() -> String {
    LISTEN_ADDR.to_string()
}

fn seed_on_first_visit() -> bool {
    true
}

/// `$WATCHTUBE_BASE_PATH`, falling back to `~/.local/share/watchtube`.
pub fn base_path() -> anyhow::Result<String> {
    if let Ok(path) = std::env::var("WATCHTUBE_BASE_PATH") {
        return Ok(path);
    }

    let home = my_home()
        .context("could not determine home directory")?
        .context("home directory path is empty")?;

    Ok(format!("{}/.local/share/watchtube", home.to_string_lossy()))
}

impl Config {
    fn validate(&mut self) -> anyhow::Result<()> {
        if self.toast_ttl_ms == 0 {
            bail!("toast_ttl_ms must be greater than 0");
        }

        if self.preview.timeout_secs == 0 {
            bail!("preview.timeout_secs must be greater than 0");
        }

        if self.preview.fallback_title.trim().is_empty() {
            bail!("preview.fallback_title must not be empty");
        }

        url::Url::parse(&self.preview.oembed_endpoint).with_context(|| {
            format!(
                "preview.oembed_endpoint is not a valid url: {}",
                self.preview.oembed_endpoint
            )
        })?;

        self.preview.thumbnail_base = self.preview.thumbnail_base.trim_end_matches('/').to_string();

        Ok(())
    }

    pub fn load_with(base_path: &str) -> anyhow::Result<Self> {
        let store = storage::BackendLocal::new(base_path)?;

        // create new if does not exist
        if !store.exists(CONFIG_FILE) {
            log::info!("writing default config to {base_path}/{CONFIG_FILE}");
            store.write(CONFIG_FILE, serde_yml::to_string(&Self::default())?.as_bytes())?;
        }

        let config_str =
            String::from_utf8(store.read(CONFIG_FILE)?).context("config file is not valid utf8")?;
        let mut config: Self = serde_yml::from_str(&config_str).context("config is malformed")?;

        config.validate()?;

        // resave in case config version needs an upgrade
        let upgraded = serde_yml::to_string(&config)?;
        if config_str != upgraded {
            store.write(CONFIG_FILE, upgraded.as_bytes())?;
        }

        Ok(config)
    }
}
