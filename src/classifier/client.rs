use super::{
    distilbert::DistilBertClassifier, lexicon::LexiconClassifier, remote::RemoteClassifier,
};
use crate::{
    Error, Result,
    config::{Backend, ModelConfig},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

/// One predicted category and its confidence in `[0, 1]`.
///
/// Fields beyond `label` and `score` sent by a model server are kept in
/// `extra` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub score: f64,
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl Classification {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
            extra: Map::new(),
        }
    }
}

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classifies `text`, returning label/score pairs in model order.
    async fn classify(&self, text: &str) -> Result<Vec<Classification>>;
    fn model_name(&self) -> &str;
    fn backend(&self) -> Backend;
}

/// Builds the configured backend.
///
/// The distilbert backend downloads and loads its weights here, so call this
/// from a blocking context.
pub fn create_classifier(config: &ModelConfig) -> Result<Arc<dyn Classifier>> {
    info!(
        "Creating {} classifier for model: {}",
        config.backend.as_str(),
        config.name
    );

    let classifier: Arc<dyn Classifier> = match config.backend {
        Backend::Distilbert => Arc::new(DistilBertClassifier::load(config)?),
        Backend::Lexicon => Arc::new(LexiconClassifier::new(config)),
        Backend::Remote => Arc::new(RemoteClassifier::new(config)?),
    };

    Ok(classifier)
}

/// Rejects texts longer than `max` characters.
pub(crate) fn check_input_length(text: &str, max: Option<usize>) -> Result<()> {
    let Some(max) = max else {
        return Ok(());
    };

    let len = text.chars().count();
    if len > max {
        return Err(Error::InputTooLong { len, max });
    }

    Ok(())
}
