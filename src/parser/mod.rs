pub mod source_code;

use crate::Position;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Comment,
    DocComment,
    StringLiteral,
}

/// A comment or string literal as produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, line: usize, column: usize, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            line,
            column,
            kind,
        }
    }

    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }
}

/// Lexer output for one file: its comment/string tokens in source order and
/// every identifier seen in code.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    pub file_name: PathBuf,
    pub tokens: Vec<Token>,
    pub identifiers: HashSet<String>,
}

/// True for C and C++ sources and headers, and for doxygen `.dox` pages.
pub fn is_cpp_file(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    matches!(
        ext.as_str(),
        "c" | "h"
            | "cpp"
            | "cc"
            | "cxx"
            | "c++"
            | "cp"
            | "hpp"
            | "hh"
            | "hxx"
            | "h++"
            | "inl"
            | "ipp"
            | "tpp"
            | "moc"
            | "dox"
    )
}

/// Lex a C++ file's content into a document.
pub fn parse_file(path: &Path, content: &str) -> ParsedDocument {
    source_code::lex(path, content)
}
