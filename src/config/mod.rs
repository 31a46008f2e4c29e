//! Runtime settings, resolved once at process start.
//!
//! `main` builds a [`Settings`] from command-line flags and environment
//! variables, then hands it to [`ActionRegistry::standard`](crate::actions::ActionRegistry::standard)
//! and the server. Nothing downstream reads the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::consts::{DEFAULT_DATA_ROOT, DEFAULT_DATAGEN_URL, DEFAULT_FORMATTER, DEFAULT_MODEL};

/// Everything the service needs to know about its environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: SocketAddr,
    pub data_root: PathBuf,
    /// Identity passed to the data-generation script.
    pub user_email: Option<String>,
    pub formatter: String,
    pub datagen_url: String,
    pub model: String,
    pub anthropic_api_key: Option<String>,
    /// When set, `/read` only serves files under this directory.
    pub read_root: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
            data_root: PathBuf::from(DEFAULT_DATA_ROOT),
            user_email: None,
            formatter: DEFAULT_FORMATTER.to_string(),
            datagen_url: DEFAULT_DATAGEN_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            anthropic_api_key: None,
            read_root: None,
        }
    }
}

impl Settings {
    /// Settings rooted at `data_root`, everything else default.
    pub fn with_data_root(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            ..Self::default()
        }
    }

    /// Treat empty strings from the environment as unset.
    pub fn normalize(mut self) -> Self {
        self.user_email = self.user_email.filter(|v| !v.trim().is_empty());
        self.anthropic_api_key = self.anthropic_api_key.filter(|v| !v.trim().is_empty());
        self
    }
}
