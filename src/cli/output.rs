use crate::Word;
use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonFile<'a> {
    file: String,
    words: &'a [Word],
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    files_checked: usize,
    total_words: usize,
    files: Vec<JsonFile<'a>>,
}

/// Print the words of every file, in path order.
pub fn print_report(
    results: &BTreeMap<PathBuf, Vec<Word>>,
    colored_output: bool,
    format: OutputFormat,
) -> serde_json::Result<()> {
    match format {
        OutputFormat::Text => {
            for (file, words) in results {
                print_text_words(file, words, colored_output);
            }
            let total = results.values().map(Vec::len).sum();
            print_summary(total, results.len(), colored_output);
            Ok(())
        }
        OutputFormat::Json => print_json(results),
    }
}

fn print_text_words(file_path: &Path, words: &[Word], colored_output: bool) {
    if words.is_empty() {
        return;
    }

    let file_name = file_path.display().to_string();
    if colored_output {
        println!("\n{}", file_name.bold().underline());
    } else {
        println!("\n{}", file_name);
    }

    for word in words {
        let position = format!("{}:{}", word.line, word.column);
        if colored_output {
            println!("  {} {}", position.blue().bold(), word.text);
        } else {
            println!("  {} {}", position, word.text);
        }
    }
}

fn print_json(results: &BTreeMap<PathBuf, Vec<Word>>) -> serde_json::Result<()> {
    let output = JsonOutput {
        files_checked: results.len(),
        total_words: results.values().map(Vec::len).sum(),
        files: results
            .iter()
            .map(|(file, words)| JsonFile {
                file: file.display().to_string(),
                words,
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_summary(total_words: usize, files: usize, colored: bool) {
    let word_label = if total_words == 1 { "word" } else { "words" };
    let file_label = if files == 1 { "file" } else { "files" };
    println!();
    if colored {
        println!(
            "{} {} {} extracted from {} {}",
            "✓".green().bold(),
            total_words.to_string().bold(),
            word_label,
            files,
            file_label
        );
    } else {
        println!(
            "✓ {} {} extracted from {} {}",
            total_words, word_label, files, file_label
        );
    }
}
