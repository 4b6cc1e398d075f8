use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use game_core::WordSource;

/// Downloads a JSON array of words.
pub struct HttpWordSource {
    client: Client,
    url: String,
}

impl HttpWordSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl WordSource for HttpWordSource {
    async fn fetch_words(&self) -> Result<Vec<String>> {
        info!("Downloading word list from {}", self.url);
        let words = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<String>>()
            .await
            .context("Word list is not a JSON array of strings")?;
        Ok(words)
    }
}

/// Reads a local word list: one word per line, blank lines and `#` comments skipped.
pub struct FileWordSource {
    path: PathBuf,
}

impl FileWordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl WordSource for FileWordSource {
    async fn fetch_words(&self) -> Result<Vec<String>> {
        info!("Reading word list from {}", self.path.display());
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect())
    }
}

/// HTTP(S) locations are downloaded, anything else is read from disk.
pub fn word_source_for(location: &str, client: &Client) -> Arc<dyn WordSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpWordSource::new(client.clone(), location))
    } else {
        Arc::new(FileWordSource::new(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_word_source() {
        let path = std::env::temp_dir().join(format!("word-train-{}.txt", game_types::new_id()));
        tokio::fs::write(&path, "# animals\ncat\n\n  tiger \nToad\n")
            .await
            .unwrap();

        let words = FileWordSource::new(path.clone()).fetch_words().await.unwrap();
        assert_eq!(words, vec!["cat", "tiger", "Toad"]);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let source = FileWordSource::new("/definitely/not/here.txt");
        assert!(source.fetch_words().await.is_err());
    }
}
