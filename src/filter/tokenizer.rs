use crate::{Position, Word, WordList};

/// Break a comment or string literal into whitespace separated candidate
/// words, positioned in the source. `start` is where `text` begins.
pub fn words_in_text(text: &str, start: Position) -> WordList {
    let mut words = Vec::new();

    for (index, line) in text.split('\n').enumerate() {
        let line_number = start.line + index;
        let base_column = if index == 0 { start.column } else { 1 };

        let mut chunk = String::new();
        let mut chunk_start = 0;
        for (offset, ch) in line.chars().enumerate() {
            if ch.is_whitespace() {
                if !chunk.is_empty() {
                    push_chunk(&mut words, &chunk, line_number, base_column + chunk_start);
                    chunk.clear();
                }
            } else {
                if chunk.is_empty() {
                    chunk_start = offset;
                }
                chunk.push(ch);
            }
        }
        if !chunk.is_empty() {
            push_chunk(&mut words, &chunk, line_number, base_column + chunk_start);
        }
    }

    words
}

fn push_chunk(words: &mut WordList, chunk: &str, line: usize, column: usize) {
    if is_doxygen_command(chunk) {
        return;
    }

    let keep = |c: char| c.is_alphanumeric() || c == '_';
    let leading = chunk.chars().take_while(|c| !keep(*c)).count();
    let trimmed = chunk.trim_start_matches(|c: char| !keep(c));
    let trimmed = trimmed.trim_end_matches(|c: char| !keep(c));

    if !trimmed.is_empty() {
        words.push(Word::new(trimmed, line, column + leading));
    }
}

/// `\brief`, `@param`, `\c`
fn is_doxygen_command(chunk: &str) -> bool {
    let mut chars = chunk.chars();
    matches!(chars.next(), Some('\\') | Some('@'))
        && chars.next().map_or(false, |c| c.is_ascii_alphabetic())
}
