//! Run configuration, read from a RON file with compiled-in defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use headline_core::{ClassifierConfig, FeedSource};
use headline_engine::FetchSettings;
use headline_logging::headline_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "headline.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("cannot serialize configuration: {0}")]
    Serialize(#[from] ron::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Processed in this order; the order of titles in the output follows it.
    pub sources: Vec<FeedSource>,
    pub classifier: ClassifierConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            classifier: ClassifierConfig::default(),
            fetch: FetchConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `path`, or `./headline.ron` if present, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        headline_info!(
            "Loaded configuration from {:?} ({} sources)",
            path,
            config.sources.len()
        );
        Ok(config)
    }

    pub fn from_ron(content: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(content)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new();
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: String,
    /// Empty accepts any content type.
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let settings = FetchSettings::default();
        Self {
            request_timeout_secs: settings.request_timeout.as_secs(),
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            redirect_limit: settings.redirect_limit,
            max_bytes: settings.max_bytes,
            user_agent: settings.user_agent,
            allowed_content_types: settings.allowed_content_types,
        }
    }
}

impl FetchConfig {
    pub fn to_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            redirect_limit: self.redirect_limit,
            max_bytes: self.max_bytes,
            user_agent: self.user_agent.clone(),
            allowed_content_types: self.allowed_content_types.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub prefix: String,
    pub prune_previous: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("scraped_output"),
            prefix: "titles".to_string(),
            prune_previous: true,
        }
    }
}

/// Czech and Slovak publisher feeds, in processing order.
pub fn default_sources() -> Vec<FeedSource> {
    [
        ("super_cz", "https://www.super.cz/rss"),
        ("blesk_cz", "https://www.blesk.cz/rss"),
        ("extra_cz", "https://www.extra.cz/rss.xml"),
        ("ahaonline_cz", "https://www.ahaonline.cz/rss"),
        ("novinky_cz", "https://www.novinky.cz/rss"),
        ("idnes_cz", "https://servis.idnes.cz/rss.aspx"),
        ("prozeny_cz", "https://www.prozeny.cz/rss"),
        ("zive_cz", "https://www.zive.cz/rss"),
        ("doupe_cz", "https://doupe.zive.cz/rss"),
        ("zive_sk_najnovsie", "https://zive.aktuality.sk/rss/najnovsie/"),
        ("zive_sk_mobilmania", "https://zive.aktuality.sk/rss/mobilmania/"),
        ("lupa_cz", "https://www.lupa.cz/rss/clanky-samostatne/"),
        ("root_cz", "https://www.root.cz/rss/clanky/"),
        ("reflex_cz", "https://www.reflex.cz/rss"),
        ("respekt_cz", "https://www.respekt.cz/api/rss"),
        ("ceskenoviny_cz", "https://www.ceskenoviny.cz/sluzby/rss/zpravy.php"),
        ("irozhlas_cz", "https://www.irozhlas.cz/rss/irozhlas"),
        ("ct24_cz", "https://ct24.ceskatelevize.cz/rss/tema/vyber-redakce-84313"),
    ]
    .into_iter()
    .map(|(id, url)| FeedSource::new(id, url))
    .collect()
}
