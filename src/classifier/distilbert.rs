//! In-process sequence classifier running a pretrained DistilBERT checkpoint.
//!
//! Weights, config and tokenizer come from the Hugging Face Hub (cached on
//! disk after the first download). The head is the standard
//! `pre_classifier -> ReLU -> classifier` stack on the `[CLS]` hidden state,
//! and labels come from the checkpoint's `id2label`.

use super::client::{Classification, Classifier, check_input_length};
use crate::{
    Error, Result,
    config::{Backend, ModelConfig},
};
use async_trait::async_trait;
use candle_core::{D, DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder, linear, ops::softmax};
use candle_transformers::models::distilbert::{Config, DistilBertModel};
use hf_hub::{
    Repo, RepoType,
    api::sync::{ApiBuilder, ApiRepo},
};
use serde::Deserialize;
use std::{collections::HashMap, path::PathBuf, sync::Arc};
use tokenizers::Tokenizer;
use tracing::{debug, info};

#[derive(Deserialize)]
struct ClassifierConfigJson {
    dim: usize,
    #[serde(default = "default_max_positions")]
    max_position_embeddings: usize,
    #[serde(default)]
    id2label: HashMap<String, String>,
}

fn default_max_positions() -> usize {
    512
}

struct SequenceClassifier {
    model: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
    tokenizer: Tokenizer,
    id2label: HashMap<String, String>,
    max_positions: usize,
    device: Device,
}

pub struct DistilBertClassifier {
    name: String,
    max_input_chars: Option<usize>,
    inner: Arc<SequenceClassifier>,
}

impl DistilBertClassifier {
    /// Downloads (or reads from cache) and loads the checkpoint named by
    /// `config.name`. Blocks for the whole download.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let device = Device::Cpu;

        let api = ApiBuilder::new()
            .with_progress(false)
            .build()
            .map_err(|e| Error::model(format!("Failed to create Hugging Face Hub client: {e}")))?;

        let repo = match &config.revision {
            Some(revision) => {
                Repo::with_revision(config.name.clone(), RepoType::Model, revision.clone())
            }
            None => Repo::new(config.name.clone(), RepoType::Model),
        };
        let repo = api.repo(repo);

        let config_path = fetch(&repo, &config.name, "config.json")?;
        let weights_path = fetch(&repo, &config.name, "model.safetensors")
            .or_else(|_| fetch(&repo, &config.name, "pytorch_model.bin"))?;

        let tokenizer_path = match fetch(&repo, &config.name, "tokenizer.json") {
            Ok(path) => path,
            Err(_) => {
                debug!(
                    "No tokenizer.json in {}, using {}",
                    config.name, config.tokenizer_repo
                );
                let tokenizer_repo =
                    api.repo(Repo::new(config.tokenizer_repo.clone(), RepoType::Model));
                fetch(&tokenizer_repo, &config.tokenizer_repo, "tokenizer.json")?
            }
        };

        let config_str = std::fs::read_to_string(&config_path)?;
        let model_config: Config = serde_json::from_str(&config_str)?;
        let head_config: ClassifierConfigJson = serde_json::from_str(&config_str)?;

        if head_config.id2label.is_empty() {
            return Err(Error::model(format!(
                "{} has no id2label mapping; not a classification checkpoint",
                config.name
            )));
        }

        let vb = if weights_path.extension().is_some_and(|e| e == "safetensors") {
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)? }
        } else {
            VarBuilder::from_pth(&weights_path, DType::F32, &device)?
        };

        let num_labels = head_config.id2label.len();
        let model = DistilBertModel::load(vb.pp("distilbert"), &model_config)?;
        let pre_classifier = linear(head_config.dim, head_config.dim, vb.pp("pre_classifier"))?;
        let classifier = linear(head_config.dim, num_labels, vb.pp("classifier"))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| Error::model(format!("Failed to load tokenizer: {e}")))?;

        info!(
            "Loaded {} with {} labels on {:?}",
            config.name, num_labels, device
        );

        Ok(Self {
            name: config.name.clone(),
            max_input_chars: config.max_input_chars,
            inner: Arc::new(SequenceClassifier {
                model,
                pre_classifier,
                classifier,
                tokenizer,
                id2label: head_config.id2label,
                max_positions: head_config.max_position_embeddings,
                device,
            }),
        })
    }
}

fn fetch(repo: &ApiRepo, repo_id: &str, filename: &str) -> Result<PathBuf> {
    repo.get(filename)
        .map_err(|e| Error::model(format!("Failed to fetch {filename} from {repo_id}: {e}")))
}

impl SequenceClassifier {
    fn predict(&self, text: &str) -> Result<Classification> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::inference(format!("Tokenization error: {e}")))?;

        let ids = encoding.get_ids();
        if ids.len() > self.max_positions {
            return Err(Error::inference(format!(
                "Input has {} tokens, model accepts at most {}",
                ids.len(),
                self.max_positions
            )));
        }

        let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        // Nonzero entries are hidden from attention; a single unpadded sequence hides nothing.
        let attention_mask = Tensor::zeros((1, 1, 1, ids.len()), DType::U8, &self.device)?;

        let hidden = self.model.forward(&input_ids, &attention_mask)?;
        let cls = hidden.i((.., 0))?;
        let logits = self
            .classifier
            .forward(&self.pre_classifier.forward(&cls)?.relu()?)?;

        let probs = softmax(&logits, D::Minus1)?.squeeze(0)?.to_vec1::<f32>()?;
        top_label(&probs, &self.id2label)
    }
}

/// Picks the most probable class and names it through `id2label`.
fn top_label(probs: &[f32], id2label: &HashMap<String, String>) -> Result<Classification> {
    let (pred_id, score) = probs
        .iter()
        .copied()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or_else(|| Error::inference("Model produced no logits"))?;

    let label = id2label
        .get(&pred_id.to_string())
        .ok_or_else(|| Error::inference(format!("Predicted ID '{pred_id}' not in id2label")))?;

    Ok(Classification::new(label, f64::from(score)))
}

#[async_trait]
impl Classifier for DistilBertClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<Classification>> {
        check_input_length(text, self.max_input_chars)?;

        let inner = Arc::clone(&self.inner);
        let text = text.to_owned();
        let classification = tokio::task::spawn_blocking(move || inner.predict(&text))
            .await
            .map_err(|e| Error::internal(format!("Inference task failed: {e}")))??;

        debug!(
            "Predicted {} with score {:.4}",
            classification.label, classification.score
        );

        Ok(vec![classification])
    }

    fn model_name(&self) -> &str {
        &self.name
    }

    fn backend(&self) -> Backend {
        Backend::Distilbert
    }
}
