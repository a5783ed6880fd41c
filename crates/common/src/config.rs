use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::errors::Result;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from_path(".")
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/default")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/local")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "GithubConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "GithubConfig::default_user_agent")]
    pub user_agent: String,
}

impl GithubConfig {
    fn default_base_url() -> String {
        "https://api.github.com/".to_string()
    }

    fn default_user_agent() -> String {
        "github-profile-viewer".to_string()
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            user_agent: Self::default_user_agent(),
        }
    }
}

/// Bounds for the sequential repository listing.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "FetchConfig::default_page_size")]
    pub page_size: u32,
    #[serde(default = "FetchConfig::default_max_pages")]
    pub max_pages: u32,
}

impl FetchConfig {
    const fn default_page_size() -> u32 {
        100
    }

    const fn default_max_pages() -> u32 {
        20
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: Self::default_page_size(),
            max_pages: Self::default_max_pages(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "ViewConfig::default_page_size")]
    pub page_size: usize,
}

impl ViewConfig {
    const fn default_page_size() -> usize {
        10
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: Self::default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "ApiConfig::default_bind")]
    pub bind: String,
}

impl ApiConfig {
    fn default_bind() -> String {
        "0.0.0.0:3000".to_string()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: Self::default_bind(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "ObservabilityConfig::default_metrics_path")]
    pub metrics_path: String,
    #[serde(default = "ObservabilityConfig::default_log_level")]
    pub log_level: String,
}

impl ObservabilityConfig {
    fn default_metrics_path() -> String {
        "/metrics".to_string()
    }

    fn default_log_level() -> String {
        "info".to_string()
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_path: Self::default_metrics_path(),
            log_level: Self::default_log_level(),
        }
    }
}
