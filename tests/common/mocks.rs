use async_trait::async_trait;
use essay_scorer::{
    Error, Result,
    classifier::{Classification, Classifier},
    config::Backend,
};
use std::sync::{Arc, Mutex};

/// Stub classifier returning a fixed result and recording every input.
#[derive(Debug, Clone)]
pub struct MockClassifier {
    pub result: Vec<Classification>,
    pub inputs: Arc<Mutex<Vec<String>>>,
    pub error: Option<String>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self {
            result: vec![Classification::new("POSITIVE", 0.9998)],
            inputs: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    pub fn with_result(mut self, result: Vec<Classification>) -> Self {
        self.result = result;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn get_inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<Classification>> {
        self.inputs.lock().unwrap().push(text.to_string());

        if let Some(ref error) = self.error {
            return Err(Error::inference(error.clone()));
        }

        Ok(self.result.clone())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }

    fn backend(&self) -> Backend {
        Backend::Lexicon
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}
