use std::collections::{BTreeMap, HashSet};

use game_types::normalize_word;
use rand::Rng;
use rand::seq::IteratorRandom;
use rand::seq::SliceRandom;

/// The bulk word list used for local legality checks and candidate generation.
///
/// Words are normalized on the way in (lowercase, letters only) and bucketed by
/// first letter, keeping the order they arrived in.
#[derive(Debug, Clone, Default)]
pub struct WordCorpus {
    loading: bool,
    all_words: HashSet<String>,
    by_first_letter: BTreeMap<char, Vec<String>>,
}

impl WordCorpus {
    /// A placeholder corpus for while the word source is still being fetched.
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// A loaded corpus with no words, used when fetching failed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut corpus = Self::empty();
        for raw in words {
            let word = normalize_word(raw.as_ref());
            let Some(first) = word.chars().next() else {
                continue;
            };
            if corpus.all_words.insert(word.clone()) {
                corpus.by_first_letter.entry(first).or_default().push(word);
            }
        }
        corpus
    }

    /// Builds a corpus from newline separated text, skipping `#` comments.
    pub fn from_word_list(word_list: &str) -> Self {
        Self::from_words(
            word_list
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn len(&self) -> usize {
        self.all_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_words.is_empty()
    }

    /// Checks membership after normalizing the input.
    pub fn contains(&self, word: &str) -> bool {
        self.all_words.contains(&normalize_word(word))
    }

    pub fn words_starting_with(&self, letter: char) -> &[String] {
        let key = letter.to_lowercase().next().unwrap_or(letter);
        self.by_first_letter
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Picks a random letter bucket, then a random word inside it.
    pub fn sample_word<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        let bucket = self.by_first_letter.values().choose(rng)?;
        bucket.choose(rng).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_words_are_normalized_and_indexed() {
        let corpus = WordCorpus::from_words(["Apple", "ant", "a-n-t", "Banana!", "123", ""]);

        assert_eq!(corpus.len(), 3);
        assert!(corpus.contains("apple"));
        assert!(corpus.contains("APPLE"));
        assert!(corpus.contains("banana"));
        assert!(!corpus.contains("123"));
        assert_eq!(corpus.words_starting_with('a'), ["apple", "ant"]);
        assert_eq!(corpus.words_starting_with('B'), ["banana"]);
        assert!(corpus.words_starting_with('z').is_empty());
    }

    #[test]
    fn test_word_list_skips_comments_and_blanks() {
        let corpus = WordCorpus::from_word_list("# header\ncat\n\n   \n  tiger  \n");
        assert_eq!(corpus.len(), 2);
        assert!(corpus.contains("tiger"));
    }

    #[test]
    fn test_loading_and_empty_corpus() {
        let loading = WordCorpus::loading();
        assert!(loading.is_loading());
        assert!(loading.is_empty());

        let empty = WordCorpus::empty();
        assert!(!empty.is_loading());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(empty.sample_word(&mut rng).is_none());
    }

    #[test]
    fn test_sample_word_comes_from_corpus() {
        let corpus = WordCorpus::from_words(["cat", "tiger", "rabbit", "toad"]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            let word = corpus.sample_word(&mut rng).unwrap();
            assert!(corpus.contains(word));
        }
    }
}
