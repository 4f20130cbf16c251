use crate::parser::{ParsedDocument, Token, TokenKind};
use std::collections::HashSet;
use std::path::Path;

/// Character cursor that tracks 1-based line and column.
struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Scanner {
    fn new(content: &str) -> Self {
        Self {
            chars: content.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek(0)?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn starts_with(&self, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(i, expected)| self.peek(i) == Some(expected))
    }
}

/// Extract comments, string literals and code identifiers from C++ source.
pub fn lex(path: &Path, content: &str) -> ParsedDocument {
    let mut scanner = Scanner::new(content);
    let mut tokens = Vec::new();
    let mut identifiers = HashSet::new();

    while let Some(ch) = scanner.peek(0) {
        match ch {
            '/' if scanner.peek(1) == Some('/') => {
                push_token(&mut tokens, line_comment(&mut scanner));
            }
            '/' if scanner.peek(1) == Some('*') => {
                push_token(&mut tokens, block_comment(&mut scanner));
            }
            '"' => {
                push_token(&mut tokens, string_literal(&mut scanner));
            }
            '\'' => char_literal(&mut scanner),
            c if c.is_ascii_digit() => number(&mut scanner),
            c if c.is_alphabetic() || c == '_' => {
                let ident = identifier(&mut scanner);
                if scanner.peek(0) == Some('"') && is_string_prefix(&ident) {
                    let token = if ident.ends_with('R') {
                        raw_string_literal(&mut scanner)
                    } else {
                        string_literal(&mut scanner)
                    };
                    push_token(&mut tokens, token);
                } else {
                    identifiers.insert(ident);
                }
            }
            _ => {
                scanner.bump();
            }
        }
    }

    ParsedDocument {
        file_name: path.to_path_buf(),
        tokens,
        identifiers,
    }
}

fn push_token(tokens: &mut Vec<Token>, token: Token) {
    if !token.text.trim().is_empty() {
        tokens.push(token);
    }
}

fn line_comment(scanner: &mut Scanner) -> Token {
    scanner.bump();
    scanner.bump();
    let kind = match (scanner.peek(0), scanner.peek(1)) {
        (Some('/'), next) if next != Some('/') => {
            scanner.bump();
            TokenKind::DocComment
        }
        (Some('!'), _) => {
            scanner.bump();
            TokenKind::DocComment
        }
        _ => TokenKind::Comment,
    };

    let (line, column) = (scanner.line, scanner.column);
    let mut text = String::new();
    while let Some(ch) = scanner.peek(0) {
        if ch == '\n' {
            break;
        }
        text.push(ch);
        scanner.bump();
    }

    Token::new(text, line, column, kind)
}

fn block_comment(scanner: &mut Scanner) -> Token {
    scanner.bump();
    scanner.bump();
    let kind = match (scanner.peek(0), scanner.peek(1)) {
        (Some('*'), next) if next != Some('/') => {
            scanner.bump();
            TokenKind::DocComment
        }
        (Some('!'), _) => {
            scanner.bump();
            TokenKind::DocComment
        }
        _ => TokenKind::Comment,
    };

    let (line, column) = (scanner.line, scanner.column);
    let mut text = String::new();
    while scanner.peek(0).is_some() {
        if scanner.starts_with("*/") {
            scanner.bump();
            scanner.bump();
            break;
        }
        if let Some(ch) = scanner.bump() {
            text.push(ch);
        }
    }

    Token::new(text, line, column, kind)
}

/// Escape sequences are blanked out so the word positions stay aligned with the source.
fn string_literal(scanner: &mut Scanner) -> Token {
    scanner.bump();
    let (line, column) = (scanner.line, scanner.column);
    let mut text = String::new();

    while let Some(ch) = scanner.peek(0) {
        match ch {
            '"' => {
                scanner.bump();
                break;
            }
            // Unterminated literal
            '\n' => break,
            '\\' => {
                scanner.bump();
                text.push(' ');
                match scanner.bump() {
                    Some('\n') => text.push('\n'),
                    Some(_) => text.push(' '),
                    None => break,
                }
            }
            _ => {
                text.push(ch);
                scanner.bump();
            }
        }
    }

    Token::new(text, line, column, TokenKind::StringLiteral)
}

/// `R"delim( ... )delim"`
fn raw_string_literal(scanner: &mut Scanner) -> Token {
    scanner.bump();
    let mut delimiter = String::new();
    while let Some(ch) = scanner.peek(0) {
        if ch == '(' || ch == '\n' || delimiter.len() > 16 {
            break;
        }
        delimiter.push(ch);
        scanner.bump();
    }
    scanner.bump();

    let terminator = format!("){}\"", delimiter);
    let (line, column) = (scanner.line, scanner.column);
    let mut text = String::new();
    while scanner.peek(0).is_some() {
        if scanner.starts_with(&terminator) {
            for _ in terminator.chars() {
                scanner.bump();
            }
            break;
        }
        if let Some(ch) = scanner.bump() {
            text.push(ch);
        }
    }

    Token::new(text, line, column, TokenKind::StringLiteral)
}

fn char_literal(scanner: &mut Scanner) {
    scanner.bump();
    while let Some(ch) = scanner.bump() {
        match ch {
            '\\' => {
                scanner.bump();
            }
            '\'' | '\n' => break,
            _ => {}
        }
    }
}

/// Numbers, including hex literals, exponents and `'` digit separators.
fn number(scanner: &mut Scanner) {
    while let Some(ch) = scanner.peek(0) {
        let separator = ch == '\'' && scanner.peek(1).map_or(false, |c| c.is_ascii_alphanumeric());
        if ch.is_ascii_alphanumeric() || ch == '.' || ch == '_' || separator {
            scanner.bump();
        } else {
            break;
        }
    }
}

fn identifier(scanner: &mut Scanner) -> String {
    let mut ident = String::new();
    while let Some(ch) = scanner.peek(0) {
        if ch.is_alphanumeric() || ch == '_' {
            ident.push(ch);
            scanner.bump();
        } else {
            break;
        }
    }
    ident
}

fn is_string_prefix(ident: &str) -> bool {
    matches!(
        ident,
        "L" | "u" | "U" | "u8" | "R" | "LR" | "uR" | "UR" | "u8R"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn lex_str(content: &str) -> ParsedDocument {
        lex(&PathBuf::from("test.cpp"), content)
    }

    #[test]
    fn test_line_and_doc_comments() {
        let doc = lex_str("int x; // plain words\n/// documented thing\n//! inner doc\n");

        assert_eq!(doc.tokens.len(), 3);
        assert_eq!(doc.tokens[0].kind, TokenKind::Comment);
        assert_eq!(doc.tokens[0].text, " plain words");
        assert_eq!((doc.tokens[0].line, doc.tokens[0].column), (1, 10));
        assert_eq!(doc.tokens[1].kind, TokenKind::DocComment);
        assert_eq!(doc.tokens[2].kind, TokenKind::DocComment);
        assert!(doc.identifiers.contains("x"));
        assert!(doc.identifiers.contains("int"));
    }

    #[test]
    fn test_multi_line_block_comment() {
        let doc = lex_str("/* first line\n * second line */\nvoid run();\n");

        assert_eq!(doc.tokens.len(), 1);
        let token = &doc.tokens[0];
        assert_eq!(token.kind, TokenKind::Comment);
        assert_eq!((token.line, token.column), (1, 3));
        assert!(token.text.contains('\n'));
        assert!(doc.identifiers.contains("run"));
    }

    #[test]
    fn test_doxygen_block_comment() {
        let doc = lex_str("/** Brief text */\n/**/\n");
        assert_eq!(doc.tokens.len(), 1);
        assert_eq!(doc.tokens[0].kind, TokenKind::DocComment);
        assert_eq!(doc.tokens[0].text, " Brief text ");
    }

    #[test]
    fn test_string_literal_escapes_keep_positions() {
        let doc = lex_str(r#"auto s = "Hello\nWorld";"#);

        assert_eq!(doc.tokens.len(), 1);
        let token = &doc.tokens[0];
        assert_eq!(token.kind, TokenKind::StringLiteral);
        assert_eq!(token.text, "Hello  World");
        assert_eq!(token.column, 11);
    }

    #[test]
    fn test_raw_string_and_prefixes() {
        let doc = lex_str("auto a = R\"x(raw \"text\")x\"; auto b = L\"wide\";");

        let texts: Vec<_> = doc.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["raw \"text\"", "wide"]);
        assert!(!doc.identifiers.contains("R"));
        assert!(!doc.identifiers.contains("L"));
    }

    #[test]
    fn test_comment_markers_inside_strings_are_ignored() {
        let doc = lex_str("const char* url = \"http://example.com\"; char c = '\"';");

        assert_eq!(doc.tokens.len(), 1);
        assert_eq!(doc.tokens[0].text, "http://example.com");
    }

    #[test]
    fn test_digit_separators_and_hex() {
        let doc = lex_str("int n = 1'000'000; int m = 0x1F; // after");

        assert_eq!(doc.tokens.len(), 1);
        assert_eq!(doc.tokens[0].text, " after");
        assert!(!doc.identifiers.contains("x1F"));
    }
}
