use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::DeleteMethod;
use crate::models::PostId;
use crate::permissions::Viewer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Forum base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Post whose replies are shown
    #[serde(default)]
    pub post_id: Option<i64>,

    /// Signed-in member; empty means anonymous
    #[serde(default)]
    pub viewer_email: String,

    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Send reply deletes as GET for servers without the POST route
    #[serde(default)]
    pub legacy_get_delete: bool,

    /// Token issued by the forum's `/auth/token`, sent as a bearer credential
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            post_id: None,
            viewer_email: String::new(),
            request_timeout_secs: default_timeout_secs(),
            legacy_get_delete: false,
            auth_token: None,
        }
    }
}

impl ClientConfig {
    /// Defaults, then the config file (if any), then `REPLY_BOARD_*` variables.
    pub fn load() -> Result<Self> {
        let mut config = match config_file_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("REPLY_BOARD_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(raw) = lookup("REPLY_BOARD_POST_ID") {
            self.post_id = Some(parse_post_id(&raw)?);
        }
        if let Some(email) = lookup("REPLY_BOARD_VIEWER_EMAIL") {
            self.viewer_email = email;
        }
        if let Some(raw) = lookup("REPLY_BOARD_TIMEOUT_SECS") {
            self.request_timeout_secs = raw
                .trim()
                .parse()
                .with_context(|| format!("REPLY_BOARD_TIMEOUT_SECS is not a number: {raw}"))?;
        }
        if let Some(raw) = lookup("REPLY_BOARD_LEGACY_GET_DELETE") {
            self.legacy_get_delete = raw == "1" || raw.eq_ignore_ascii_case("true");
        }
        if let Some(token) = lookup("REPLY_BOARD_AUTH_TOKEN") {
            self.auth_token = Some(token).filter(|t| !t.trim().is_empty());
        }
        Ok(())
    }

    pub fn set_post_id(&mut self, raw: &str) -> Result<()> {
        self.post_id = Some(parse_post_id(raw)?);
        Ok(())
    }

    pub fn post_id(&self) -> Result<PostId> {
        self.post_id
            .map(PostId)
            .ok_or_else(|| anyhow!("no post selected; set REPLY_BOARD_POST_ID or pass a post id"))
    }

    pub fn viewer(&self) -> Viewer {
        Viewer::from_email(self.viewer_email.clone())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn delete_method(&self) -> DeleteMethod {
        if self.legacy_get_delete {
            DeleteMethod::LegacyGet
        } else {
            DeleteMethod::Post
        }
    }
}

fn parse_post_id(raw: &str) -> Result<i64> {
    let id: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("invalid post id: {raw}"))?;
    if id <= 0 {
        return Err(anyhow!("post id must be positive, got {id}"));
    }
    Ok(id)
}

fn config_file_path() -> Option<PathBuf> {
    if let Ok(explicit) = env::var("REPLY_BOARD_CONFIG") {
        return Some(PathBuf::from(explicit));
    }
    dirs::config_dir().map(|dir| dir.join("reply_board").join("config.toml"))
}

fn default_api_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}
