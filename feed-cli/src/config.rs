//! Configuration file for feed-cli.
//!
//! ```toml
//! [client]
//! base_url = "https://feed.example.org"
//! session_cookie = "session=..."
//! page_size = 10
//! request_timeout_secs = 10
//!
//! [viewer]
//! id = 7
//! role = "admin"
//! ```
//!
//! Every field is optional.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;

use feed_client::{ClientConfig, DEFAULT_BASE_URL};
use feed_types::{Role, UserId, Viewer};

/// Name of the config file inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Root of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Service connection.
    #[serde(default)]
    pub client: ClientSection,
    /// Who the CLI acts as.
    #[serde(default)]
    pub viewer: ViewerSection,
}

/// `[client]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSection {
    /// Service base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Cookie header sent with every request.
    #[serde(default)]
    pub session_cookie: Option<String>,
    /// Posts per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// `[viewer]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerSection {
    /// The signed-in user's id.
    #[serde(default = "default_viewer_id")]
    pub id: u64,
    /// The signed-in user's role.
    #[serde(default)]
    pub role: Role,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_viewer_id() -> u64 {
    1
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            session_cookie: None,
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for ViewerSection {
    fn default() -> Self {
        Self {
            id: default_viewer_id(),
            role: Role::default(),
        }
    }
}

impl CliConfig {
    /// Load the config file at `path`.
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Load `config.toml` from `data_dir`, or defaults when it does not exist.
    pub async fn load_or_default(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path).await
    }

    /// Client settings.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let page_size =
            NonZeroU32::new(self.client.page_size).context("page_size must be at least 1")?;
        let mut config = ClientConfig::new(&self.client.base_url)
            .with_page_size(page_size)
            .with_request_timeout(Duration::from_secs(self.client.request_timeout_secs));
        if let Some(cookie) = &self.client.session_cookie {
            config = config.with_session_cookie(cookie);
        }
        Ok(config)
    }

    /// The signed-in user.
    pub fn viewer(&self) -> Viewer {
        Viewer::new(UserId::new(self.viewer.id), self.viewer.role)
    }
}
