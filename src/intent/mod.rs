//! Intent classification for incoming user turns.

mod classifier;
mod domain;

pub use classifier::IntentClassifier;
pub use domain::{Intent, IntentClassification, ParseIntentError};
