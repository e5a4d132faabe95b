//! Offline sentiment classifier backed by a weighted word list.
//!
//! A heuristic for running without model weights (air-gapped hosts, tests);
//! it misreads sentences a trained model handles, such as contrastive
//! phrasing.
//!
//! Each known word contributes its weight to a polarity sum. A negator flips
//! the next sentiment word within [`NEGATION_WINDOW`] tokens, an intensifier
//! scales the next one within [`INTENSIFIER_WINDOW`] tokens. The sum is
//! squashed with a logistic function into the probability of the positive
//! label.

use super::client::{Classification, Classifier, check_input_length};
use crate::{
    Result,
    config::{Backend, LabelsConfig, ModelConfig},
};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, warn};

const NEGATION_WINDOW: usize = 3;
const INTENSIFIER_WINDOW: usize = 2;
const INTENSIFIER_FACTOR: f64 = 1.5;

const NEGATORS: &[&str] = &[
    "not", "no", "never", "nothing", "nobody", "none", "neither", "nor", "hardly", "barely",
    "cannot", "without", "dont", "didnt", "doesnt", "isnt", "wasnt", "cant", "wont",
];

const INTENSIFIERS: &[&str] = &[
    "very", "really", "extremely", "so", "truly", "incredibly", "highly", "totally", "absolutely",
    "super", "most", "too",
];

const DEFAULT_WORDS: &[(&str, f64)] = &[
    // positive
    ("good", 1.5),
    ("great", 2.5),
    ("excellent", 3.0),
    ("outstanding", 3.0),
    ("amazing", 3.0),
    ("awesome", 2.5),
    ("wonderful", 3.0),
    ("fantastic", 3.0),
    ("brilliant", 3.0),
    ("superb", 3.0),
    ("perfect", 3.0),
    ("best", 2.5),
    ("better", 1.0),
    ("nice", 1.5),
    ("fine", 0.5),
    ("love", 2.5),
    ("loved", 2.5),
    ("loves", 2.5),
    ("loving", 2.0),
    ("like", 1.0),
    ("liked", 1.5),
    ("enjoy", 2.0),
    ("enjoyed", 2.0),
    ("enjoyable", 2.0),
    ("happy", 2.0),
    ("glad", 1.5),
    ("pleased", 1.5),
    ("helpful", 2.0),
    ("useful", 1.5),
    ("valuable", 2.0),
    ("interesting", 1.5),
    ("engaging", 2.0),
    ("clear", 1.0),
    ("insightful", 2.0),
    ("inspiring", 2.5),
    ("recommend", 2.0),
    ("recommended", 2.0),
    ("thank", 1.5),
    ("thanks", 1.5),
    ("grateful", 2.0),
    ("learned", 1.0),
    ("beautiful", 2.5),
    ("favorite", 2.0),
    ("impressive", 2.5),
    ("positive", 1.5),
    ("success", 2.0),
    ("successful", 2.0),
    ("easy", 1.0),
    ("fun", 2.0),
    ("exciting", 2.0),
    ("worth", 1.0),
    // negative
    ("bad", -2.0),
    ("poor", -2.0),
    ("terrible", -3.0),
    ("horrible", -3.0),
    ("awful", -3.0),
    ("worst", -3.0),
    ("worse", -2.0),
    ("hate", -3.0),
    ("hated", -3.0),
    ("dislike", -2.0),
    ("disliked", -2.0),
    ("boring", -2.0),
    ("bored", -1.5),
    ("dull", -1.5),
    ("waste", -2.0),
    ("wasted", -2.0),
    ("useless", -2.5),
    ("pointless", -2.5),
    ("confusing", -1.5),
    ("confused", -1.5),
    ("difficult", -1.0),
    ("hard", -0.5),
    ("frustrating", -2.0),
    ("frustrated", -2.0),
    ("disappointing", -2.5),
    ("disappointed", -2.5),
    ("annoying", -2.0),
    ("sad", -2.0),
    ("angry", -2.5),
    ("unhappy", -2.0),
    ("wrong", -1.5),
    ("fail", -2.0),
    ("failed", -2.0),
    ("failure", -2.0),
    ("problem", -1.0),
    ("problems", -1.0),
    ("mess", -2.0),
    ("messy", -1.5),
    ("ugly", -2.0),
    ("negative", -1.5),
    ("mediocre", -1.5),
    ("lacking", -1.5),
    ("broken", -2.0),
    ("slow", -1.0),
    ("unclear", -1.5),
    ("regret", -2.0),
];

pub struct LexiconClassifier {
    name: String,
    labels: LabelsConfig,
    max_input_chars: Option<usize>,
    words: HashMap<String, f64>,
}

impl LexiconClassifier {
    pub fn new(config: &ModelConfig) -> Self {
        let mut words: HashMap<String, f64> = DEFAULT_WORDS
            .iter()
            .map(|(word, weight)| (word.to_string(), *weight))
            .collect();

        for (word, weight) in &config.lexicon {
            if !weight.is_finite() {
                warn!("Ignoring non-finite lexicon weight for '{}'", word);
                continue;
            }
            words.insert(word.to_lowercase(), *weight);
        }

        debug!("Lexicon classifier loaded with {} words", words.len());

        Self {
            name: config.name.clone(),
            labels: config.labels.clone(),
            max_input_chars: config.max_input_chars,
            words,
        }
    }

    /// Sums word weights over `text`, after negation and intensifiers.
    pub fn polarity(&self, text: &str) -> f64 {
        let mut sum = 0.0;
        let mut negation_left = 0;
        let mut intensifier_left = 0;

        for token in tokenize(text) {
            if let Some(weight) = self.words.get(&token) {
                let mut weight = *weight;
                if intensifier_left > 0 {
                    weight *= INTENSIFIER_FACTOR;
                    intensifier_left = 0;
                }
                if negation_left > 0 {
                    weight = -weight;
                    negation_left = 0;
                }
                sum += weight;
                continue;
            }

            if is_negator(&token) {
                negation_left = NEGATION_WINDOW;
                continue;
            }

            if INTENSIFIERS.contains(&token.as_str()) {
                intensifier_left = INTENSIFIER_WINDOW;
                continue;
            }

            negation_left = negation_left.saturating_sub(1);
            intensifier_left = intensifier_left.saturating_sub(1);
        }

        sum
    }

    fn label(&self, polarity: f64) -> Classification {
        let positive = sigmoid(polarity);
        if positive >= 0.5 {
            Classification::new(&self.labels.positive, positive)
        } else {
            Classification::new(&self.labels.negative, 1.0 - positive)
        }
    }
}

#[async_trait]
impl Classifier for LexiconClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<Classification>> {
        check_input_length(text, self.max_input_chars)?;

        let polarity = self.polarity(text);
        debug!("Lexicon polarity {:.3} for {} chars", polarity, text.len());

        Ok(vec![self.label(polarity)])
    }

    fn model_name(&self) -> &str {
        &self.name
    }

    fn backend(&self) -> Backend {
        Backend::Lexicon
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .map(|raw| {
            raw.replace('\u{2019}', "'")
                .trim_matches('\'')
                .to_lowercase()
        })
        .filter(|token| !token.is_empty())
}

fn is_negator(token: &str) -> bool {
    token.ends_with("n't") || NEGATORS.contains(&token)
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
