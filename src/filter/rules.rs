//! The individual filter rules, in the order the pipeline applies them.
//!
//! Every rule looks at a single word and decides whether it stays, goes, or
//! is replaced by fragments. Fragments are fed back through the whole chain
//! by the pipeline, so a rule never has to re-check its own output.

use crate::config::{FilterSettings, WordOption};
use crate::filter::matchers::Matchers;
use crate::filter::reserved::{is_qt_keyword, is_reserved_word};
use crate::filter::split::{split_camel_case, split_on};
use crate::{Word, WordList};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Keep,
    Drop,
    SplitInto(WordList),
}

/// Everything a rule may consult. Borrowed for one pipeline run.
pub struct RuleContext<'a> {
    pub settings: &'a FilterSettings,
    pub matchers: &'a Matchers,
    pub words_in_source: &'a HashSet<String>,
}

pub type Rule = fn(&Word, &RuleContext<'_>) -> Outcome;

pub const RULES: [Rule; 11] = [
    words_in_source,
    reserved_words,
    numbers,
    qt_keywords,
    email_addresses,
    website_addresses,
    all_caps,
    words_with_numbers,
    words_with_underscores,
    camel_case,
    words_with_dots,
];

fn drop_if(condition: bool) -> Outcome {
    if condition {
        Outcome::Drop
    } else {
        Outcome::Keep
    }
}

/// Shared leave/remove/split handling for the configurable categories.
fn apply_option(option: WordOption, matches: bool, split: impl FnOnce() -> WordList) -> Outcome {
    match option {
        WordOption::Leave => Outcome::Keep,
        _ if !matches => Outcome::Keep,
        WordOption::Remove => Outcome::Drop,
        WordOption::Split => Outcome::SplitInto(split()),
    }
}

pub fn words_in_source(word: &Word, ctx: &RuleContext<'_>) -> Outcome {
    drop_if(ctx.settings.remove_words_in_source && ctx.words_in_source.contains(&word.text))
}

pub fn reserved_words(word: &Word, _ctx: &RuleContext<'_>) -> Outcome {
    drop_if(is_reserved_word(&word.text))
}

pub fn numbers(word: &Word, ctx: &RuleContext<'_>) -> Outcome {
    drop_if(ctx.matchers.number.is_match(&word.text) || ctx.matchers.hex_number.is_match(&word.text))
}

pub fn qt_keywords(word: &Word, ctx: &RuleContext<'_>) -> Outcome {
    if ctx.settings.check_qt_keywords {
        return Outcome::Keep;
    }
    let text = word.text.as_str();
    let mut chars = text.chars();
    let prefixed_type = match (chars.next(), chars.next()) {
        (Some(first), Some(second)) => {
            text.chars().count() > 2 && first.is_uppercase() && second.is_uppercase()
        }
        _ => false,
    };

    drop_if(
        is_qt_keyword(text)
            || is_qt_keyword(&text.to_uppercase())
            || prefixed_type
            || text.starts_with("Q_")
            || text == "qDebug",
    )
}

pub fn email_addresses(word: &Word, ctx: &RuleContext<'_>) -> Outcome {
    drop_if(ctx.settings.remove_email_addresses && ctx.matchers.email.is_match(&word.text))
}

/// Whole addresses go; anything else carrying address punctuation is cut
/// into its pieces.
pub fn website_addresses(word: &Word, ctx: &RuleContext<'_>) -> Outcome {
    if !ctx.settings.remove_websites {
        return Outcome::Keep;
    }
    if ctx.matchers.website.is_match(&word.text) {
        return Outcome::Drop;
    }
    if ctx.matchers.website_chars.is_match(&word.text) {
        let parts = split_on(word, &ctx.matchers.website_chars);
        if !parts.is_empty() {
            return Outcome::SplitInto(parts);
        }
    }
    Outcome::Keep
}

pub fn all_caps(word: &Word, ctx: &RuleContext<'_>) -> Outcome {
    drop_if(!ctx.settings.check_all_caps && word.text == word.text.to_uppercase())
}

pub fn words_with_numbers(word: &Word, ctx: &RuleContext<'_>) -> Outcome {
    apply_option(
        ctx.settings.words_with_numbers,
        word.text.chars().any(|c| c.is_ascii_digit()),
        || split_on(word, &ctx.matchers.digit_runs),
    )
}

pub fn words_with_underscores(word: &Word, ctx: &RuleContext<'_>) -> Outcome {
    apply_option(ctx.settings.words_with_underscores, word.text.contains('_'), || {
        split_on(word, &ctx.matchers.underscores)
    })
}

pub fn camel_case(word: &Word, ctx: &RuleContext<'_>) -> Outcome {
    apply_option(
        ctx.settings.camel_case,
        ctx.matchers.camel_case.is_match(&word.text),
        || split_camel_case(word, &ctx.matchers.camel_boundary),
    )
}

pub fn words_with_dots(word: &Word, ctx: &RuleContext<'_>) -> Outcome {
    apply_option(ctx.settings.words_with_dots, word.text.contains('.'), || {
        split_on(word, &ctx.matchers.dots)
    })
}
