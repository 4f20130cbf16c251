pub mod matchers;
pub mod reserved;
pub mod rules;
pub mod split;
pub mod tokenizer;

use crate::config::FilterSettings;
use crate::error::Result;
use crate::{Position, Word, WordList};
use matchers::Matchers;
use rules::{Outcome, RuleContext, RULES};
use std::collections::HashSet;

/// Turns the raw text of a comment or string literal into the words that
/// should be spell checked.
#[derive(Debug, Clone)]
pub struct WordFilterPipeline {
    matchers: Matchers,
}

impl WordFilterPipeline {
    pub fn new() -> Result<Self> {
        Ok(Self {
            matchers: Matchers::new()?,
        })
    }

    /// Tokenize `text` starting at `start` and run every candidate through
    /// the rule chain.
    pub fn filter(
        &self,
        text: &str,
        start: Position,
        settings: &FilterSettings,
        words_in_source: &HashSet<String>,
    ) -> WordList {
        let words = tokenizer::words_in_text(text, start);
        self.filter_words(words, settings, words_in_source)
    }

    /// Run already positioned words through the rule chain.
    pub fn filter_words(
        &self,
        words: WordList,
        settings: &FilterSettings,
        words_in_source: &HashSet<String>,
    ) -> WordList {
        let ctx = RuleContext {
            settings,
            matchers: &self.matchers,
            words_in_source,
        };

        let mut kept = Vec::with_capacity(words.len());
        for word in words {
            fold_word(word, &ctx, &mut kept);
        }
        kept
    }
}

/// First rule that does not keep the word decides. Fragments restart the
/// chain from the top; every split strictly shortens the text, so this ends.
fn fold_word(word: Word, ctx: &RuleContext<'_>, kept: &mut WordList) {
    for rule in RULES {
        match rule(&word, ctx) {
            Outcome::Keep => continue,
            Outcome::Drop => return,
            Outcome::SplitInto(fragments) => {
                for fragment in fragments {
                    fold_word(fragment, ctx, kept);
                }
                return;
            }
        }
    }
    kept.push(word);
}
