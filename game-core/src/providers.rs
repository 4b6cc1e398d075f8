//! Seams to the outside world: where words come from, how unknown words are
//! checked online, and where definitions are looked up.

use async_trait::async_trait;
use game_types::DefinitionRecord;
use tracing::{debug, error, info};

use crate::WordCorpus;

/// Supplies the raw word list the corpus is built from.
#[async_trait]
pub trait WordSource: Send + Sync {
    async fn fetch_words(&self) -> anyhow::Result<Vec<String>>;
}

/// Fallback dictionary check for words missing from the corpus.
/// Any failure or timeout counts as "not a word".
#[async_trait]
pub trait WordValidator: Send + Sync {
    async fn validate(&self, word: &str) -> bool;
}

#[async_trait]
pub trait DefinitionProvider: Send + Sync {
    async fn lookup(&self, word: &str) -> Option<DefinitionRecord>;
}

/// Fetches the word list and builds a corpus. A failed fetch yields an empty
/// corpus so the rest of the game keeps running.
pub async fn load_corpus(source: &dyn WordSource) -> WordCorpus {
    match source.fetch_words().await {
        Ok(words) => {
            let corpus = WordCorpus::from_words(words);
            info!("Loaded word corpus with {} words", corpus.len());
            corpus
        }
        Err(e) => {
            error!("Failed to load word list: {:#}", e);
            WordCorpus::empty()
        }
    }
}

/// Accepts a word as soon as any validator in the chain does.
pub struct ValidatorChain {
    validators: Vec<Box<dyn WordValidator>>,
}

impl ValidatorChain {
    pub fn new(validators: Vec<Box<dyn WordValidator>>) -> Self {
        Self { validators }
    }
}

#[async_trait]
impl WordValidator for ValidatorChain {
    async fn validate(&self, word: &str) -> bool {
        for validator in &self.validators {
            if validator.validate(word).await {
                return true;
            }
        }
        debug!("No validator accepted '{}'", word);
        false
    }
}

/// Rejects every word. Used when online checks are disabled.
pub struct OfflineValidator;

#[async_trait]
impl WordValidator for OfflineValidator {
    async fn validate(&self, _word: &str) -> bool {
        false
    }
}

/// Tries providers in priority order and returns the first result.
pub struct DefinitionChain {
    providers: Vec<Box<dyn DefinitionProvider>>,
}

impl DefinitionChain {
    pub fn new(providers: Vec<Box<dyn DefinitionProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl DefinitionProvider for DefinitionChain {
    async fn lookup(&self, word: &str) -> Option<DefinitionRecord> {
        for provider in &self.providers {
            if let Some(record) = provider.lookup(word).await {
                if !record.defs.is_empty() {
                    return Some(record);
                }
            }
        }
        debug!("No definition found for '{}'", word);
        None
    }
}
