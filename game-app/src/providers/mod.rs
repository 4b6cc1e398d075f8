//! reqwest-backed implementations of the game-core provider seams.

pub mod dictionary_api;
pub mod free_dictionary;
pub mod wiktionary;
pub mod word_list;

use std::time::Duration;

use anyhow::anyhow;
use reqwest::{Client, Url};
use tracing::debug;

use game_core::{DefinitionChain, ValidatorChain};

pub use dictionary_api::DictionaryApi;
pub use free_dictionary::FreeDictionary;
pub use wiktionary::Wiktionary;
pub use word_list::{FileWordSource, HttpWordSource, word_source_for};

pub fn http_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("word-train/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Online fallback for words missing from the corpus:
/// dictionaryapi.dev first, then freedictionaryapi.com.
pub fn default_validator(client: &Client, timeout: Duration) -> ValidatorChain {
    ValidatorChain::new(vec![
        Box::new(DictionaryApi::new(client.clone(), timeout)),
        Box::new(FreeDictionary::new(client.clone(), timeout)),
    ])
}

pub fn default_definitions(client: &Client, timeout: Duration) -> DefinitionChain {
    DefinitionChain::new(vec![
        Box::new(DictionaryApi::new(client.clone(), timeout)),
        Box::new(FreeDictionary::new(client.clone(), timeout)),
        Box::new(Wiktionary::new(client.clone(), timeout)),
    ])
}

/// `base` with `word` appended as an escaped path segment.
pub(crate) fn entry_url(base: &str, word: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("{base} cannot take path segments"))?
        .pop_if_empty()
        .push(word);
    Ok(url)
}

/// GETs `url` and returns the body of a successful response. Non-success
/// statuses come back as `None`.
pub(crate) async fn fetch_body(
    client: &Client,
    url: Url,
    timeout: Duration,
) -> reqwest::Result<Option<String>> {
    let response = client.get(url.clone()).timeout(timeout).send().await?;
    if !response.status().is_success() {
        debug!("{} answered {}", url, response.status());
        return Ok(None);
    }
    Ok(Some(response.text().await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_url_escapes_word() {
        let url = entry_url("https://api.dictionaryapi.dev/api/v2/entries/en/", "café").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.dictionaryapi.dev/api/v2/entries/en/caf%C3%A9"
        );

        let url = entry_url("https://freedictionaryapi.com/api/v1/entries/en", "tiger").unwrap();
        assert_eq!(
            url.as_str(),
            "https://freedictionaryapi.com/api/v1/entries/en/tiger"
        );
    }
}
