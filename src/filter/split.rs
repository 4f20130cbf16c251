use crate::{Word, WordList};
use regex::Regex;
use std::ops::Range;

/// Fragments of `word` between matches of `separator`, empty fragments dropped.
pub fn split_on(word: &Word, separator: &Regex) -> WordList {
    let mut ranges = Vec::new();
    let mut last = 0;
    for m in separator.find_iter(&word.text) {
        ranges.push(last..m.start());
        last = m.end();
    }
    ranges.push(last..word.text.len());
    fragments(word, ranges)
}

/// Fragments of `word` cut at every lowercase-to-uppercase transition.
pub fn split_camel_case(word: &Word, boundary: &Regex) -> WordList {
    let mut cuts = vec![0];
    cuts.extend(boundary.find_iter(&word.text).map(|m| m.start() + 1));
    cuts.push(word.text.len());
    fragments(word, cuts.windows(2).map(|pair| pair[0]..pair[1]).collect())
}

/// Byte ranges of the parent text become positioned words on the parent's line.
fn fragments(word: &Word, ranges: Vec<Range<usize>>) -> WordList {
    ranges
        .into_iter()
        .filter(|range| !range.is_empty())
        .map(|range| {
            let offset = word.text[..range.start].chars().count();
            Word::new(&word.text[range], word.line, word.column + offset)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_underscores() {
        let re = Regex::new("_+").unwrap();
        let word = Word::new("__item__count_", 4, 10);
        let parts = split_on(&word, &re);

        assert_eq!(parts, vec![Word::new("item", 4, 12), Word::new("count", 4, 18)]);
    }

    #[test]
    fn test_split_camel_case() {
        let re = Regex::new("[a-z][A-Z]").unwrap();
        let word = Word::new("maxCountValue", 1, 5);
        let parts = split_camel_case(&word, &re);

        assert_eq!(
            parts,
            vec![
                Word::new("max", 1, 5),
                Word::new("Count", 1, 8),
                Word::new("Value", 1, 13),
            ]
        );
    }

    #[test]
    fn test_columns_count_characters() {
        let re = Regex::new(r"\.+").unwrap();
        let word = Word::new("café.menu", 1, 1);
        let parts = split_on(&word, &re);

        assert_eq!(parts[1], Word::new("menu", 1, 6));
    }
}
