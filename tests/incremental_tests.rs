//! Integration tests for the per-file token cache across repeated parses

use cppspell::parser::{parse_file, ParsedDocument};
use cppspell::{
    CoreSettings, DocumentProcessor, DocumentSource, FilterSettings, Fingerprint, NoReparse,
    WordFilterPipeline, WordList,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const SOURCE: &str = r#"// Widget helpers for the drawing code
#include <vector>

/** Computes the maxCountValue of the items.
 *  See https://example.com/docs for details. */
int maxCountValue(const std::vector<int>& items);

// Widget helpers for the drawing code
const char* greeting = "Hello wonderful world";
"#;

type Emitted = Arc<Mutex<Vec<(PathBuf, WordList)>>>;

fn processor_with_source(source: Arc<dyn DocumentSource>) -> (DocumentProcessor, Emitted) {
    let emitted: Emitted = Arc::default();
    let sink = Arc::clone(&emitted);
    let consumer = move |file: &Path, words: WordList| {
        sink.lock().unwrap().push((file.to_path_buf(), words));
    };
    let processor = DocumentProcessor::new(
        FilterSettings::default(),
        CoreSettings::default(),
        Arc::new(consumer),
        source,
    )
    .unwrap();
    (processor, emitted)
}

/// Records every re-lex request.
#[derive(Default)]
struct RecordingSource {
    requested: Mutex<Vec<BTreeSet<PathBuf>>>,
}

impl DocumentSource for RecordingSource {
    fn update_source_files(&self, files: &BTreeSet<PathBuf>) {
        self.requested.lock().unwrap().push(files.clone());
    }
}

fn processor() -> (DocumentProcessor, Emitted) {
    processor_with_source(Arc::new(NoReparse))
}

fn lex(file: &str, content: &str) -> ParsedDocument {
    parse_file(&PathBuf::from(file), content)
}

/// What the pipeline produces for the document with no cache at all.
fn fresh_words(document: &ParsedDocument, settings: &FilterSettings) -> WordList {
    let pipeline = WordFilterPipeline::new().unwrap();
    document
        .tokens
        .iter()
        .flat_map(|token| {
            pipeline.filter(&token.text, token.position(), settings, &document.identifiers)
        })
        .collect()
}

/// Run a parse through its phases and report (words, hits, misses).
fn parse_counting(processor: &DocumentProcessor, document: ParsedDocument) -> (WordList, usize, usize) {
    let job = processor.begin_job(document).unwrap();
    let id = job.id;
    let outcome = job.run().unwrap();
    let (hits, misses) = (outcome.hits, outcome.misses);
    let words = processor.finish_job(id, Some(outcome)).unwrap();
    (words, hits, misses)
}

mod caching {
    use super::*;

    #[test]
    fn test_first_parse_matches_fresh_pipeline() {
        let (processor, emitted) = processor();
        let document = lex("widget.cpp", SOURCE);
        let expected = fresh_words(&document, &FilterSettings::default());

        let (words, hits, misses) = parse_counting(&processor, document);
        assert_eq!(words, expected);
        // The repeated comment is served from the generation being built.
        assert_eq!((hits, misses), (1, 3));

        let texts: Vec<_> = words.iter().map(|w| w.text.as_str()).collect();
        assert!(texts.contains(&"wonderful"));
        assert!(!texts.contains(&"maxCountValue"));
        assert!(!texts.contains(&"https"));
        assert_eq!(emitted.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_edit_elsewhere_reuses_every_entry() {
        let (processor, _) = processor();
        parse_counting(&processor, lex("widget.cpp", SOURCE));

        let shifted = format!("\n\n   {}", SOURCE.replace("#include <vector>", "#include  <vector>"));
        let document = lex("widget.cpp", &shifted);
        let expected = fresh_words(&document, &FilterSettings::default());

        let (words, hits, misses) = parse_counting(&processor, document);
        assert_eq!((hits, misses), (4, 0));
        assert_eq!(words, expected);
        assert_eq!(words[0].line, 3);
        assert_eq!(words[0].column, 7);
    }

    #[test]
    fn test_edited_comment_is_refiltered() {
        let (processor, _) = processor();
        parse_counting(&processor, lex("widget.cpp", SOURCE));

        let edited = SOURCE.replace("Hello wonderful world", "Goodbye cruel world");
        let (words, hits, misses) = parse_counting(&processor, lex("widget.cpp", &edited));

        assert_eq!((hits, misses), (3, 1));
        let texts: Vec<_> = words.iter().map(|w| w.text.as_str()).collect();
        assert!(texts.contains(&"cruel"));
        assert!(!texts.contains(&"wonderful"));
    }

    #[test]
    fn test_deleted_comment_is_pruned() {
        let (processor, _) = processor();
        parse_counting(&processor, lex("widget.cpp", SOURCE));

        let gone = " Widget helpers for the drawing code";
        let file = Path::new("widget.cpp");
        assert!(processor.cache().generation(file).contains(Fingerprint::of(gone)));

        let edited = SOURCE.replace("// Widget helpers for the drawing code\n", "");
        parse_counting(&processor, lex("widget.cpp", &edited));

        let generation = processor.cache().generation(file);
        assert!(!generation.contains(Fingerprint::of(gone)));
        assert_eq!(generation.len(), 2);
    }

    #[test]
    fn test_files_have_independent_caches() {
        let (processor, _) = processor();
        parse_counting(&processor, lex("a.cpp", SOURCE));

        let (_, hits, misses) = parse_counting(&processor, lex("b.cpp", SOURCE));
        assert_eq!((hits, misses), (1, 3));
        assert_eq!(processor.cache().tracked_files(), 2);
    }
}

mod settings {
    use super::*;
    use cppspell::WordOption;

    #[test]
    fn test_settings_change_recomputes_every_token() {
        let (processor, _) = processor();
        parse_counting(&processor, lex("widget.cpp", SOURCE));

        let settings = FilterSettings {
            camel_case: WordOption::Leave,
            remove_words_in_source: false,
            ..FilterSettings::default()
        };
        processor.settings_changed(settings.clone());

        let document = lex("widget.cpp", SOURCE);
        let expected = fresh_words(&document, &settings);
        let (words, hits, misses) = parse_counting(&processor, document);

        assert_eq!((hits, misses), (1, 3));
        assert_eq!(words, expected);
        assert!(words.iter().any(|w| w.text == "maxCountValue"));
    }

    #[test]
    fn test_settings_change_requests_project_reparse() {
        let source = Arc::new(RecordingSource::default());
        let (processor, _) = processor_with_source(source.clone());

        processor.set_active_project(Some(vec![
            PathBuf::from("a.cpp"),
            PathBuf::from("b.h"),
            PathBuf::from("CMakeLists.txt"),
        ]));
        processor.settings_changed(FilterSettings::default());
        processor.update_project_files(vec![PathBuf::from("c.cpp")], vec![PathBuf::from("a.cpp")]);

        let requested = source.requested.lock().unwrap();
        assert_eq!(requested.len(), 3);
        assert_eq!(requested[0].len(), 2);
        assert_eq!(requested[1], requested[0]);
        assert_eq!(requested[2].iter().collect::<Vec<_>>(), vec![Path::new("c.cpp")]);
    }
}

mod background {
    use super::*;

    #[test]
    fn test_concurrent_files_all_reported() {
        let (processor, emitted) = processor();
        let files: Vec<PathBuf> = (0..16).map(|i| PathBuf::from(format!("file{}.cpp", i))).collect();
        processor.set_active_project(Some(files.clone()));

        for file in &files {
            let content = SOURCE.replace("wonderful", &format!("wonderful{}", file.display()));
            assert!(processor.document_updated(parse_file(file, &content)).is_some());
        }
        processor.wait_idle();

        let emitted = emitted.lock().unwrap();
        assert_eq!(emitted.len(), files.len());
        assert_eq!(processor.cache().tracked_files(), files.len());
        assert!(processor.files_in_process().is_empty());
    }

    #[test]
    fn test_files_outside_project_are_skipped() {
        let (processor, emitted) = processor();
        processor.set_active_project(Some(vec![PathBuf::from("inside.cpp")]));

        assert!(processor.document_updated(lex("outside.cpp", SOURCE)).is_none());
        processor.core_settings_changed(CoreSettings {
            only_parse_current_file: false,
            check_external_files: true,
        });
        assert!(processor.document_updated(lex("outside.cpp", SOURCE)).is_some());
        processor.wait_idle();

        assert_eq!(emitted.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_shutdown_discards_results() {
        let (processor, emitted) = processor();
        processor.set_active_project(Some(vec![PathBuf::from("a.cpp")]));
        processor.shutdown();

        assert!(processor.document_updated(lex("a.cpp", SOURCE)).is_none());
        processor.wait_idle();
        assert!(emitted.lock().unwrap().is_empty());
    }
}

mod project {
    use super::*;

    #[test]
    fn test_removed_files_lose_their_cache() {
        let source = Arc::new(RecordingSource::default());
        let (processor, _) = processor_with_source(source.clone());
        processor.set_active_project(Some(vec![PathBuf::from("a.cpp"), PathBuf::from("b.cpp")]));
        parse_counting(&processor, lex("a.cpp", SOURCE));
        parse_counting(&processor, lex("b.cpp", SOURCE));

        processor.update_project_files(
            vec![
                PathBuf::from("c.cpp"),
                PathBuf::from("d.hpp"),
                PathBuf::from("notes.txt"),
            ],
            vec![PathBuf::from("a.cpp")],
        );

        assert!(processor.cache().generation(Path::new("a.cpp")).is_empty());
        assert!(!processor.cache().generation(Path::new("b.cpp")).is_empty());
        assert_eq!(processor.cache().tracked_files(), 1);

        let requested = source.requested.lock().unwrap();
        let relexed: Vec<_> = requested.last().unwrap().iter().cloned().collect();
        assert_eq!(relexed, vec![PathBuf::from("c.cpp"), PathBuf::from("d.hpp")]);
    }

    #[test]
    fn test_removed_files_are_no_longer_parsed() {
        let (processor, _) = processor();
        processor.set_active_project(Some(vec![PathBuf::from("a.cpp")]));
        assert!(processor.should_parse(Path::new("a.cpp")));

        processor.update_project_files(vec![PathBuf::from("notes.txt")], vec![PathBuf::from("a.cpp")]);

        assert!(!processor.should_parse(Path::new("a.cpp")));
        assert!(!processor.should_parse(Path::new("notes.txt")));
        assert!(processor.document_updated(lex("a.cpp", SOURCE)).is_none());
    }
}
