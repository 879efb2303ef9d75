//! Word segmentation behind a pluggable capability

use crate::error::{ContextError, Result};
use jieba_rs::Jieba;
use lazy_static::lazy_static;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

lazy_static! {
    // Building the dictionary trie is expensive, share it across tokenizers.
    static ref DEFAULT_JIEBA: Arc<Jieba> = Arc::new(Jieba::new());
}

/// Splits raw text into word-like tokens.
///
/// Implementations return slices of the input; filtering (stopwords, length,
/// script) happens in the keyword extractor, not here.
pub trait Tokenizer: Send + Sync {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Dictionary-based segmenter for contiguous scripts such as Han, falling back
/// to HMM segmentation for out-of-vocabulary runs. Whitespace-delimited words
/// pass through as their own tokens.
#[derive(Clone)]
pub struct JiebaTokenizer {
    jieba: Arc<Jieba>,
    hmm: bool,
}

impl Default for JiebaTokenizer {
    fn default() -> Self {
        Self {
            jieba: DEFAULT_JIEBA.clone(),
            hmm: true,
        }
    }
}

impl JiebaTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default dictionary extended with a user dictionary file
    /// (one `word [freq] [tag]` entry per line).
    pub fn with_user_dict(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut jieba = Jieba::new();
        jieba.load_dict(&mut reader).map_err(|e| {
            ContextError::Config(format!(
                "failed to load user dictionary {}: {}",
                path.display(),
                e
            ))
        })?;

        info!("Loaded segmentation user dictionary from {}", path.display());
        Ok(Self {
            jieba: Arc::new(jieba),
            hmm: true,
        })
    }

    /// Toggle HMM discovery of words missing from the dictionary.
    pub fn hmm(mut self, enabled: bool) -> Self {
        self.hmm = enabled;
        self
    }
}

impl Tokenizer for JiebaTokenizer {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.jieba.cut(text, self.hmm)
    }
}

/// Tokenizer for scripts that mark word boundaries with whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split_whitespace().collect()
    }
}
