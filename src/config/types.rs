use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Hugging Face repository id for the distilbert backend; reported by
    /// `/health` for every backend.
    #[serde(default = "default_model_name")]
    pub name: String,
    // DistilBERT specific fields
    pub revision: Option<String>,
    /// Repository to take `tokenizer.json` from when the model repo has none.
    #[serde(default = "default_tokenizer_repo")]
    pub tokenizer_repo: String,
    /// Texts longer than this many characters fail inference.
    #[serde(default)]
    pub max_input_chars: Option<usize>,
    // Lexicon specific fields
    #[serde(default)]
    pub labels: LabelsConfig,
    /// Word weights merged over the built-in lexicon.
    #[serde(default)]
    pub lexicon: HashMap<String, f64>,
    // Remote specific fields
    pub url: Option<String>,
    pub api_key: Option<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Distilbert,
    Lexicon,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsConfig {
    #[serde(default = "default_positive_label")]
    pub positive: String,
    #[serde(default = "default_negative_label")]
    pub negative: String,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Distilbert => "distilbert",
            Self::Lexicon => "lexicon",
            Self::Remote => "remote",
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            name: default_model_name(),
            revision: None,
            tokenizer_repo: default_tokenizer_repo(),
            max_input_chars: None,
            labels: LabelsConfig::default(),
            lexicon: HashMap::new(),
            url: None,
            api_key: None,
            headers: HashMap::new(),
        }
    }
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            positive: default_positive_label(),
            negative: default_negative_label(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_model_name() -> String {
    "distilbert/distilbert-base-uncased-finetuned-sst-2-english".to_string()
}

fn default_tokenizer_repo() -> String {
    "distilbert/distilbert-base-uncased".to_string()
}

fn default_positive_label() -> String {
    "POSITIVE".to_string()
}

fn default_negative_label() -> String {
    "NEGATIVE".to_string()
}
