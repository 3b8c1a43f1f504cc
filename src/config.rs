use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::service::http::DEFAULT_API_BASE;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Base address of the analysis service, without trailing slash
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
    pub dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = env::var("DATALENS_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        Ok(Self {
            service: ServiceConfig {
                base_url: normalize_base_url(&base_url)?,
            },
            logging: LoggingConfig {
                filter: env::var("DATALENS_LOG")
                    .or_else(|_| env::var("RUST_LOG"))
                    .unwrap_or_else(|_| "datalens=info".to_string()),
                dir: env::var("DATALENS_LOG_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| default_log_dir()),
            },
        })
    }

    /// Replace the service address (e.g. from a command-line flag)
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.service.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        anyhow::bail!("Service address must start with http:// or https://, got '{}'", raw);
    }
    Ok(trimmed.to_string())
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("datalens")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url(" http://127.0.0.1:8000/ ").unwrap(),
            "http://127.0.0.1:8000"
        );
        assert_eq!(
            normalize_base_url("https://analysis.example.com").unwrap(),
            "https://analysis.example.com"
        );
        assert!(normalize_base_url("127.0.0.1:8000").is_err());
    }

    #[test]
    fn test_with_base_url_overrides() {
        let config = Config {
            service: ServiceConfig {
                base_url: DEFAULT_API_BASE.to_string(),
            },
            logging: LoggingConfig {
                filter: "datalens=info".to_string(),
                dir: PathBuf::from("."),
            },
        };
        let config = config.with_base_url("http://10.0.0.5:9000/").unwrap();
        assert_eq!(config.service.base_url, "http://10.0.0.5:9000");
    }
}
