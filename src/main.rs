use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use cppspell::cli::output::{print_report, OutputFormat};
use cppspell::{cli, parser, Config, DocumentProcessor, NoReparse, WordList};
use dashmap::DashMap;
use log::{error, info};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "cppspell")]
#[command(version, about = "Extract spell-checkable words from C++ comments and strings", long_about = None)]
struct Cli {
    /// Files or directories to process
    #[arg(value_name = "PATHS")]
    paths: Vec<PathBuf>,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Settings file layered over the global and local config
    #[arg(short, long, env = "CPPSPELL_CONFIG")]
    config: Option<PathBuf>,

    /// Only process this file (the one open in the editor)
    #[arg(long, value_name = "FILE")]
    only: Option<PathBuf>,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "cppspell", &mut io::stdout());
        return Ok(());
    }

    if cli.paths.is_empty() {
        anyhow::bail!("No files specified. Use --help for usage information.");
    }

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if cli.only.is_some() {
        config.core.only_parse_current_file = true;
    }

    let results: Arc<DashMap<PathBuf, WordList>> = Arc::new(DashMap::new());
    let sink = Arc::clone(&results);
    let consumer = move |file: &Path, words: WordList| {
        sink.insert(file.to_path_buf(), words);
    };

    let processor = DocumentProcessor::new(
        config.filter,
        config.core,
        Arc::new(consumer),
        Arc::new(NoReparse),
    )
    .context("Failed to start the word filter")?;

    let files = cli::collect_files(&cli.paths);
    info!("Processing {} files", files.len());
    processor.set_active_project(Some(files.iter().cloned()));
    processor.set_current_editor(cli.only.clone());

    for file in &files {
        let content = match fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                error!("Failed to read {}: {}", file.display(), e);
                continue;
            }
        };
        processor.document_updated(parser::parse_file(file, &content));
    }
    processor.wait_idle();

    let report: BTreeMap<PathBuf, WordList> = results
        .iter()
        .map(|entry| (entry.key().clone(), entry.value().clone()))
        .collect();

    print_report(&report, !cli.no_color, cli.format).context("Failed to write report")?;
    Ok(())
}
