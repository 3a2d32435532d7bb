//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// How Blender jobs are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlenderExecMode {
    /// Script generation only; `run_blender` jobs are rejected.
    LocalOnly,
    /// Run Blender headless on this server.
    ServerHeadless,
}

impl BlenderExecMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LocalOnly => "local_only",
            Self::ServerHeadless => "server_headless",
        }
    }
}

impl std::str::FromStr for BlenderExecMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "local_only" => Ok(Self::LocalOnly),
            "server_headless" => Ok(Self::ServerHeadless),
            other => Err(anyhow::anyhow!(
                "Invalid BLENDER_EXEC_MODE '{other}' (expected local_only or server_headless)"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,

    /// Local file storage
    pub upload_dir: String,
    pub output_dir: String,

    /// Blender integration
    pub blender_exec_mode: BlenderExecMode,
    pub blender_path: String,
    pub blender_workdir: String,
    pub blender_timeout_secs: u64,

    /// Job worker pool size
    pub worker_count: usize,

    /// Runtime configuration
    pub cors_origins: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?,

            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            output_dir: env::var("OUTPUT_DIR").unwrap_or_else(|_| "./outputs".to_string()),

            blender_exec_mode: env::var("BLENDER_EXEC_MODE")
                .unwrap_or_else(|_| "local_only".to_string())
                .parse()?,
            blender_path: env::var("BLENDER_PATH")
                .unwrap_or_else(|_| "/usr/bin/blender".to_string()),
            blender_workdir: env::var("BLENDER_WORKDIR")
                .unwrap_or_else(|_| "./outputs".to_string()),
            blender_timeout_secs: env::var("BLENDER_TIMEOUT_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap_or(300),

            worker_count: env::var("WORKER_COUNT")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .unwrap_or(2),

            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
        };

        Ok(config)
    }

    /// Parse CORS origins from the comma-separated string
    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exec_mode_parsing() {
        assert_eq!(
            "local_only".parse::<BlenderExecMode>().unwrap(),
            BlenderExecMode::LocalOnly
        );
        assert_eq!(
            "server_headless".parse::<BlenderExecMode>().unwrap(),
            BlenderExecMode::ServerHeadless
        );
        assert!("gpu_cluster".parse::<BlenderExecMode>().is_err());
    }

    #[test]
    fn test_exec_mode_round_trip() {
        for mode in [BlenderExecMode::LocalOnly, BlenderExecMode::ServerHeadless] {
            assert_eq!(mode.as_str().parse::<BlenderExecMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_allowed_origins_parsing() {
        let config = Config {
            database_url: "postgres://localhost/meshforge".to_string(),
            upload_dir: "./uploads".to_string(),
            output_dir: "./outputs".to_string(),
            blender_exec_mode: BlenderExecMode::LocalOnly,
            blender_path: "/usr/bin/blender".to_string(),
            blender_workdir: "./outputs".to_string(),
            blender_timeout_secs: 300,
            worker_count: 2,
            cors_origins: "http://localhost:5173, https://app.example.com".to_string(),
            port: 8000,
        };

        assert_eq!(
            config.allowed_origins(),
            vec![
                "http://localhost:5173".to_string(),
                "https://app.example.com".to_string()
            ]
        );
    }
}
