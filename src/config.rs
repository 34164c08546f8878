use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory containing the trained model artifacts and program catalog
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,

    /// Append-only feedback log (JSON Lines)
    #[serde(default = "default_feedback_log")]
    pub feedback_log: PathBuf,

    /// Static UI directory, served when it exists
    #[serde(default = "default_ui_dir")]
    pub ui_dir: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of recommendations returned when the client does not ask for k
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Hybrid fusion weight for the content-based score
    #[serde(default = "default_content_weight")]
    pub hybrid_content_weight: f32,

    /// Hybrid fusion weight for the collaborative score
    #[serde(default = "default_cf_weight")]
    pub hybrid_cf_weight: f32,
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_feedback_log() -> PathBuf {
    PathBuf::from("data/processed/feedback_log.jsonl")
}

fn default_ui_dir() -> PathBuf {
    PathBuf::from("ui")
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_k() -> usize {
    5
}

fn default_content_weight() -> f32 {
    0.6
}

fn default_cf_weight() -> f32 {
    0.4
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
