use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use game_core::{DefinitionProvider, WordValidator};
use game_types::{DefinitionRecord, DefinitionSource};

use super::{entry_url, fetch_body};

const BASE_URL: &str = "https://freedictionaryapi.com/api/v1/entries/en/";

/// The API answers with either a single object or an array of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    senses: Vec<Sense>,
}

#[derive(Debug, Deserialize)]
struct Sense {
    definition: Option<String>,
}

fn sense_definitions(body: &str) -> Vec<String> {
    let Ok(parsed) = serde_json::from_str::<OneOrMany<Response>>(body) else {
        return Vec::new();
    };
    parsed
        .into_vec()
        .into_iter()
        .flat_map(|r| r.entries)
        .flat_map(|e| e.senses)
        .filter_map(|s| s.definition)
        .collect()
}

/// A word counts as real when at least one sense carries a non-blank definition.
pub fn has_definition(body: &str) -> bool {
    sense_definitions(body).iter().any(|d| !d.trim().is_empty())
}

pub fn parse_definitions(body: &str) -> Option<DefinitionRecord> {
    DefinitionRecord::from_defs(sense_definitions(body), DefinitionSource::FreeDictionaryApi)
}

pub struct FreeDictionary {
    client: Client,
    timeout: Duration,
}

impl FreeDictionary {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    async fn fetch(&self, word: &str) -> Option<String> {
        let url = entry_url(BASE_URL, word).ok()?;
        match fetch_body(&self.client, url, self.timeout).await {
            Ok(body) => body,
            Err(e) => {
                debug!("freedictionaryapi.com request for '{}' failed: {}", word, e);
                None
            }
        }
    }
}

#[async_trait]
impl WordValidator for FreeDictionary {
    async fn validate(&self, word: &str) -> bool {
        self.fetch(word).await.is_some_and(|body| has_definition(&body))
    }
}

#[async_trait]
impl DefinitionProvider for FreeDictionary {
    async fn lookup(&self, word: &str) -> Option<DefinitionRecord> {
        parse_definitions(&self.fetch(word).await?)
    }
}
