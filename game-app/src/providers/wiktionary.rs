use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use game_core::DefinitionProvider;
use game_types::{DefinitionRecord, DefinitionSource};

use super::fetch_body;

const API_URL: &str = "https://en.wiktionary.org/w/api.php";

#[derive(Debug, Deserialize)]
struct Response {
    query: Option<Query>,
}

#[derive(Debug, Deserialize)]
struct Query {
    #[serde(default, deserialize_with = "pages_in_document_order")]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    extract: Option<String>,
}

/// `pages` is an object keyed by page id; keeps the pages in the order the
/// server sent them.
fn pages_in_document_order<'de, D>(deserializer: D) -> Result<Vec<Page>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PagesVisitor;

    impl<'de> Visitor<'de> for PagesVisitor {
        type Value = Vec<Page>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of pages")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut pages = Vec::new();
            while let Some((_, page)) = map.next_entry::<IgnoredAny, Page>()? {
                pages.push(page);
            }
            Ok(pages)
        }
    }

    deserializer.deserialize_map(PagesVisitor)
}

/// The plain-text extract of the first page, as a single definition.
pub fn parse_extract(body: &str) -> Option<DefinitionRecord> {
    let response: Response = serde_json::from_str(body).ok()?;
    let extract = response.query?.pages.into_iter().next()?.extract?;
    DefinitionRecord::from_defs([extract], DefinitionSource::Wiktionary)
}

pub fn extract_url(word: &str) -> anyhow::Result<Url> {
    Ok(Url::parse_with_params(
        API_URL,
        &[
            ("action", "query"),
            ("format", "json"),
            ("prop", "extracts"),
            ("explaintext", "1"),
            ("exsentences", "3"),
            ("redirects", "1"),
            ("titles", word),
        ],
    )?)
}

pub struct Wiktionary {
    client: Client,
    timeout: Duration,
}

impl Wiktionary {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl DefinitionProvider for Wiktionary {
    async fn lookup(&self, word: &str) -> Option<DefinitionRecord> {
        let url = extract_url(word).ok()?;
        match fetch_body(&self.client, url, self.timeout).await {
            Ok(body) => parse_extract(&body?),
            Err(e) => {
                debug!("Wiktionary lookup for '{}' failed: {}", word, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extract() {
        let body = r#"{"batchcomplete": "", "query": {"pages": {"12345": {
            "pageid": 12345, "title": "topaz",
            "extract": "\n\nA silicate mineral. Often yellow.  \n"
        }}}}"#;
        let record = parse_extract(body).unwrap();
        assert_eq!(record.source, DefinitionSource::Wiktionary);
        assert_eq!(record.defs, vec!["A silicate mineral. Often yellow."]);
    }

    #[test]
    fn test_first_page_is_the_first_one_sent() {
        let body = r#"{"query": {"pages": {
            "2": {"title": "tiger", "extract": "A large cat."},
            "10": {"title": "Tiger", "extract": "A surname."}
        }}}"#;
        let record = parse_extract(body).unwrap();
        assert_eq!(record.defs, vec!["A large cat."]);
    }

    #[test]
    fn test_missing_page_has_no_extract() {
        let body = r#"{"query": {"pages": {"-1": {"title": "xyzzy", "missing": ""}}}}"#;
        assert!(parse_extract(body).is_none());
        assert!(parse_extract(r#"{"query": {"pages": {"1": {"extract": " "}}}}"#).is_none());
        assert!(parse_extract("{}").is_none());
    }

    #[test]
    fn test_extract_url() {
        let url = extract_url("tiger").unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("titles".to_string(), "tiger".to_string())));
        assert!(pairs.contains(&("exsentences".to_string(), "3".to_string())));
        assert_eq!(url.host_str(), Some("en.wiktionary.org"));
    }
}
