//! Runtime configuration.
//!
//! Each setting resolves flag, then environment (including a `.env` file
//! loaded at startup), then the built-in default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_SENSOR_LATENCY_SECS: u64 = 10;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

const STORE_FILE_NAME: &str = "local-store.toml";

#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Base URL of the enrollment service
    #[arg(
        long,
        env = "ROLLCALL_API_BASE_URL",
        default_value = DEFAULT_API_BASE_URL,
        global = true
    )]
    pub api_base_url: String,

    /// Seconds to wait for fingerprint capture before binding
    #[arg(
        long,
        env = "ROLLCALL_SENSOR_LATENCY_SECS",
        default_value_t = DEFAULT_SENSOR_LATENCY_SECS,
        global = true
    )]
    pub sensor_latency_secs: u64,

    /// HTTP request timeout in seconds
    #[arg(
        long,
        env = "ROLLCALL_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_HTTP_TIMEOUT_SECS,
        global = true
    )]
    pub http_timeout_secs: u64,

    /// Path of the local store file
    #[arg(long, env = "ROLLCALL_STORE", global = true)]
    pub store: Option<PathBuf>,
}

impl Config {
    pub fn sensor_latency(&self) -> Duration {
        Duration::from_secs(self.sensor_latency_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Local store location: the override, or the per-user data directory.
    pub fn store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.store {
            return Ok(path.clone());
        }

        let dirs = directories::ProjectDirs::from("com", "rollcall", "rollcall")
            .context("Could not determine data directory")?;
        Ok(dirs.data_dir().join(STORE_FILE_NAME))
    }
}
