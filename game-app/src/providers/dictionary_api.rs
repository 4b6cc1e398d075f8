use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use game_core::{DefinitionProvider, WordValidator};
use game_types::{DefinitionRecord, DefinitionSource};

use super::{entry_url, fetch_body};

const BASE_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    definition: Option<String>,
}

/// Pulls definitions out of a dictionaryapi.dev response body.
pub fn parse_definitions(body: &str) -> Option<DefinitionRecord> {
    let entries: Vec<Entry> = serde_json::from_str(body).ok()?;
    let defs = entries
        .into_iter()
        .flat_map(|e| e.meanings)
        .flat_map(|m| m.definitions)
        .filter_map(|d| d.definition);
    DefinitionRecord::from_defs(defs, DefinitionSource::DictionaryApiDev)
}

pub struct DictionaryApi {
    client: Client,
    timeout: Duration,
}

impl DictionaryApi {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl WordValidator for DictionaryApi {
    /// Any successful status means the word exists.
    async fn validate(&self, word: &str) -> bool {
        let Ok(url) = entry_url(BASE_URL, word) else {
            return false;
        };
        match self.client.get(url).timeout(self.timeout).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("dictionaryapi.dev check for '{}' failed: {}", word, e);
                false
            }
        }
    }
}

#[async_trait]
impl DefinitionProvider for DictionaryApi {
    async fn lookup(&self, word: &str) -> Option<DefinitionRecord> {
        let url = entry_url(BASE_URL, word).ok()?;
        match fetch_body(&self.client, url, self.timeout).await {
            Ok(body) => parse_definitions(&body?),
            Err(e) => {
                debug!("dictionaryapi.dev lookup for '{}' failed: {}", word, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_definitions_flattens_meanings() {
        let body = r#"[
            {"word": "tiger", "meanings": [
                {"partOfSpeech": "noun", "definitions": [
                    {"definition": "A large predatory feline."},
                    {"definition": "  "},
                    {"definition": "A fierce person."}
                ]},
                {"partOfSpeech": "verb", "definitions": [
                    {"definition": "To act like a tiger."},
                    {"definition": "One too many."}
                ]}
            ]},
            {"word": "tiger"}
        ]"#;

        let record = parse_definitions(body).unwrap();
        assert_eq!(record.source, DefinitionSource::DictionaryApiDev);
        assert_eq!(
            record.defs,
            vec![
                "A large predatory feline.",
                "A fierce person.",
                "To act like a tiger."
            ]
        );
    }

    #[test]
    fn test_parse_definitions_no_result() {
        let not_found = r#"{"title": "No Definitions Found", "message": "Sorry pal"}"#;
        assert!(parse_definitions(not_found).is_none());
        assert!(parse_definitions("[]").is_none());
        assert!(parse_definitions("<html>").is_none());
    }
}
