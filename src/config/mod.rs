mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads the configuration named by `CONFIG_PATH`.
///
/// Without `CONFIG_PATH`, a missing `config.yaml` falls back to the built-in
/// defaults. An explicitly named file must exist.
pub async fn load() -> Result<Config> {
    match env::var("CONFIG_PATH") {
        Ok(config_path) => load_from(&config_path).await,
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from(DEFAULT_CONFIG_PATH).await,
        Err(_) => {
            debug!("No {} found, using default configuration", DEFAULT_CONFIG_PATH);
            Ok(Config::default())
        }
    }
}

pub async fn load_from(config_path: &str) -> Result<Config> {
    debug!("Loading configuration from: {}", config_path);

    let config_str = tokio::fs::read_to_string(config_path).await?;
    parse(&config_str)
}

pub fn parse(config_str: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(config_str)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let model = &config.model;

    if model.backend == Backend::Remote && model.url.as_deref().is_none_or(str::is_empty) {
        return Err(Error::config("model.url is required for the remote backend"));
    }

    if model.max_input_chars == Some(0) {
        return Err(Error::config("model.max_input_chars must be greater than zero"));
    }

    if model.labels.positive.is_empty() || model.labels.negative.is_empty() {
        return Err(Error::config("model.labels must not be empty"));
    }

    if model.name.is_empty() {
        return Err(Error::config("model.name must not be empty"));
    }

    for (word, weight) in &model.lexicon {
        if !weight.is_finite() {
            return Err(Error::config(format!(
                "model.lexicon weight for '{}' must be a finite number, got {}",
                word, weight
            )));
        }
        if !is_single_token(word) {
            return Err(Error::config(format!(
                "model.lexicon key '{}' must be a single word of letters, digits and inner apostrophes",
                word
            )));
        }
    }

    Ok(())
}

/// Lexicon keys are matched against whole tokens, so they must look like one.
fn is_single_token(word: &str) -> bool {
    !word.is_empty()
        && !word.starts_with('\'')
        && !word.ends_with('\'')
        && word.chars().all(|c| c.is_alphanumeric() || c == '\'')
}
