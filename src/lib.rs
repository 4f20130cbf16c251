pub mod cache;
pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod parser;

pub use cache::{CacheEntry, FileCache, Fingerprint, TokenCache};
pub use checker::{DocumentProcessor, DocumentSource, NoReparse, WordsConsumer};
pub use config::{Config, CoreSettings, FilterSettings, WordOption};
pub use error::{Error, Result};
pub use filter::WordFilterPipeline;
pub use parser::{ParsedDocument, Token, TokenKind};

use serde::Serialize;

/// 1-based source position, column counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// A candidate for spell-checking, positioned in the original source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Word {
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl Word {
    pub fn new(text: impl Into<String>, line: usize, column: usize) -> Self {
        let text = text.into();
        let length = text.chars().count();
        Self {
            text,
            line,
            column,
            length,
        }
    }
}

pub type WordList = Vec<Word>;
