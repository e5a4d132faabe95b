mod client;
mod distilbert;
mod lexicon;
mod remote;

pub use client::{Classification, Classifier, create_classifier};
pub use distilbert::DistilBertClassifier;
pub use lexicon::LexiconClassifier;
pub use remote::RemoteClassifier;
