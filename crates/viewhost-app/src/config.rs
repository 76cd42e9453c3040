//! Host configuration
//!
//! Settings come from a TOML file with serde defaults; CLI flags override
//! individual values in `main`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use viewhost_core::prelude::*;

/// Default request timeout for backend calls
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Host settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Origin the host is served from; placed into every frame URL's
    /// `server` parameter
    pub server_origin: String,

    /// Base URL of the external filter/link backend
    pub backend_url: String,

    /// URL of the plugin loaded into the main view
    pub plugin_url: String,

    /// Document set this session operates on
    pub document_set_id: u64,

    /// Timeout for backend HTTP requests
    pub request_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_origin: "http://localhost:9000".to_string(),
            backend_url: "http://localhost:3333".to_string(),
            plugin_url: "http://localhost:3334/show".to_string(),
            document_set_id: 1,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::config(format!("{}: {e}", path.display())))
    }

    /// Load settings from an optional path; `None` yields defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
