use super::client::{Classification, Classifier, check_input_length};
use crate::{
    Error, Result,
    config::{Backend, ModelConfig},
};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Classifier that delegates to an external model server.
///
/// The server receives `{"inputs": text}` and answers with either a flat list
/// of label/score pairs or a list holding one such list per input. Entries
/// must carry a string `label` and a numeric `score`; any other keys are
/// passed through untouched.
pub struct RemoteClassifier {
    url: String,
    name: String,
    max_input_chars: Option<usize>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemoteResponse {
    Flat(Vec<Classification>),
    Nested(Vec<Vec<Classification>>),
}

impl RemoteClassifier {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let url = config
            .url
            .clone()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Error::config("Remote classifier requires model.url"))?;

        let mut headers = HeaderMap::new();
        for (key, value) in &config.headers {
            let header_name: HeaderName = key
                .parse()
                .map_err(|e| Error::config(format!("Invalid header name '{}': {}", key, e)))?;
            let header_value: HeaderValue = value.parse().map_err(|e| {
                Error::config(format!("Invalid header value for '{}': {}", key, e))
            })?;
            headers.insert(header_name, header_value);
        }

        if let Some(api_key) = &config.api_key {
            let mut value: HeaderValue = format!("Bearer {}", api_key)
                .parse()
                .map_err(|e| Error::config(format!("Invalid API key: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        debug!("Creating remote classifier for: {}", url);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            url,
            name: config.name.clone(),
            max_input_chars: config.max_input_chars,
            client,
        })
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<Classification>> {
        check_input_length(text, self.max_input_chars)?;

        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "inputs": text }))
            .send()
            .await
            .map_err(|e| Error::inference(format!("Failed to reach model server: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::inference(format!(
                "Model server returned {}: {}",
                status, body
            )));
        }

        let parsed: RemoteResponse = response
            .json()
            .await
            .map_err(|e| Error::inference(format!("Failed to parse model response: {}", e)))?;

        let classifications = match parsed {
            RemoteResponse::Flat(classifications) => classifications,
            RemoteResponse::Nested(mut batches) => {
                if batches.len() != 1 {
                    return Err(Error::inference(format!(
                        "Expected results for one input, got {}",
                        batches.len()
                    )));
                }
                batches.remove(0)
            }
        };

        debug!(
            "Model server returned {} classifications",
            classifications.len()
        );

        Ok(classifications)
    }

    fn model_name(&self) -> &str {
        &self.name
    }

    fn backend(&self) -> Backend {
        Backend::Remote
    }
}
