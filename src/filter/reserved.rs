use lazy_static::lazy_static;
use std::collections::HashSet;

/// Words removed from every comment regardless of settings.
const RESERVED_WORDS: [&str; 9] = [
    "cpp",
    "std",
    "enum",
    "struct",
    "plugin",
    "doxygen",
    "nullptr",
    "typedef",
    "namespace",
];

lazy_static! {
    static ref QT_KEYWORDS: HashSet<&'static str> = [
        "emit",
        "foreach",
        "forever",
        "signals",
        "slots",
        "SIGNAL",
        "SLOT",
        "Q_EMIT",
        "Q_FOREACH",
        "Q_FOREVER",
        "Q_SIGNAL",
        "Q_SIGNALS",
        "Q_SLOT",
        "Q_SLOTS",
        "Q_INVOKABLE",
        "Q_OBJECT",
        "Q_PROPERTY",
        "Q_GADGET",
    ]
    .into_iter()
    .collect();
}

/// Whole-word, case-insensitive match against the reserved table.
pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(word))
}

pub fn is_qt_keyword(word: &str) -> bool {
    QT_KEYWORDS.contains(word)
}
