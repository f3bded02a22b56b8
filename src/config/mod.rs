//
//  bitbucket-build-status
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loads defaults for `bb-status` from a TOML file so CI jobs only have to
//! pass what changes per build (commit, state, secrets).
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/bb-status/config.toml`
//! - **macOS**: `~/Library/Application Support/bb-status/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\bb-status\config.toml`
//!
//! A different file can be chosen with `--config` or `BB_STATUS_CONFIG`.
//!
//! ## Example Configuration File
//!
//! ```toml
//! driver = "Bitbucket Server"
//! debug = false
//!
//! [server]
//! endpoint = "https://git.example.com"
//! username = "ci-bot"
//! verify_ssl = true
//!
//! [cloud]
//! client_id = "abc123"
//!
//! [status]
//! key = "ci-build"
//! name = "CI"
//! ```
//!
//! Passwords, client secrets and access tokens are never read from the
//! file; pass them through flags or environment variables.
//!
//! ## Precedence
//!
//! Command-line flag, then environment variable, then this file, then the
//! built-in default.

mod hosts;

pub use hosts::*;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::Endpoints;

/// Configuration container for `bb-status`.
///
/// All fields use `#[serde(default)]` so a partial file is valid.
///
/// # Examples
///
/// ```rust
/// use bitbucket_build_status::config::Config;
///
/// let config = Config::default();
/// assert!(config.server.verify_ssl);
/// assert!(config.driver.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default driver name, `"Bitbucket Server"` or `"Bitbucket Cloud"`.
    ///
    /// Validated only when a status is posted.
    #[serde(default)]
    pub driver: Option<String>,

    /// Write raw responses to stderr.
    #[serde(default)]
    pub debug: bool,

    /// Bitbucket Cloud settings.
    #[serde(default)]
    pub cloud: CloudConfig,

    /// Bitbucket Server/DC settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Defaults for the posted status.
    #[serde(default)]
    pub status: StatusDefaults,
}

/// Bitbucket Cloud settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CloudConfig {
    /// OAuth consumer key used for the client-credentials exchange.
    #[serde(default)]
    pub client_id: Option<String>,

    /// Override for [`BITBUCKET_CLOUD_API`].
    #[serde(default)]
    pub api_url: Option<String>,

    /// Override for [`BITBUCKET_TOKEN_URL`].
    #[serde(default)]
    pub token_url: Option<String>,
}

/// Bitbucket Server/DC settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the instance, e.g. `https://git.example.com`.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// User for HTTP Basic authentication.
    #[serde(default)]
    pub username: Option<String>,

    /// Validate TLS certificates; defaults to `true`.
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
}

fn default_verify_ssl() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            username: None,
            verify_ssl: default_verify_ssl(),
        }
    }
}

/// Defaults for the posted status.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StatusDefaults {
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// A missing file yields [`Config::default`].
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads the configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Loads from `path` when given, otherwise from the default location.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Path of the default configuration file.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Cloud endpoints with any overrides from the file applied.
    pub fn endpoints(&self) -> Endpoints {
        let defaults = Endpoints::default();
        Endpoints {
            cloud_api: self.cloud.api_url.clone().unwrap_or(defaults.cloud_api),
            token_url: self.cloud.token_url.clone().unwrap_or(defaults.token_url),
        }
    }
}
