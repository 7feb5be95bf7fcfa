//! Open / close lifecycle, stage sequencing, locate and match iteration on
//! disk-resident corpora.

mod common;

use std::path::Path;

use common::{ScriptedEngine, corpus, full_config};
use unitex_core::enums::{MatchMode, OutputMode, Stage, Stages};
use unitex_core::record::Offset;
use unitex_core::UnitexError;
use unitex_io::FileGateway;
use unitex_processor::config::ResourcesConfig;
use unitex_processor::engine::CommandEngine;
use unitex_processor::{ProcessorConfig, UnitexProcessor};

fn processor(engine: impl FnOnce(&FileGateway) -> ScriptedEngine) -> UnitexProcessor<ScriptedEngine> {
    processor_with(full_config(false, false), engine)
}

fn processor_with(
    config: ProcessorConfig,
    engine: impl FnOnce(&FileGateway) -> ScriptedEngine,
) -> UnitexProcessor<ScriptedEngine> {
    let gateway = FileGateway::new();
    let engine = engine(&gateway);
    UnitexProcessor::new(config, engine, gateway).unwrap()
}

// ---------------------------------------------------------------------------
// open
// ---------------------------------------------------------------------------

#[test]
fn open_derives_session_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut p = processor(ScriptedEngine::new);

    p.open(&path, Stages::NONE, false).unwrap();

    let session = p.session().unwrap();
    let base = dir.path().display().to_string();
    assert_eq!(session.txt, path);
    assert_eq!(session.snt, format!("{base}/foo.snt"));
    assert_eq!(session.dir, format!("{base}/foo_snt"));
    assert!(Path::new(&session.dir).is_dir());
    assert!(Path::new(&session.snt).is_file());
    p.close(true, false);
}

#[test]
fn open_runs_stages_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut p = processor(ScriptedEngine::new);

    p.open(&path, Stages::ALL, false).unwrap();

    assert_eq!(
        p.engine().calls(),
        ["normalize", "fst2txt:merge", "fst2txt:replace", "tokenize", "dico"]
    );
    p.close(true, false);
}

#[test]
fn tagged_input_skips_segment_and_replace() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut p = processor(ScriptedEngine::new);

    p.open(&path, Stages::ALL, true).unwrap();

    assert_eq!(p.engine().calls(), ["normalize", "tokenize", "dico"]);
    p.close(true, false);
}

#[test]
fn stage_letters_select_stages() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut p = processor(ScriptedEngine::new);

    p.open(&path, "rt".parse().unwrap(), false).unwrap();

    assert_eq!(p.engine().calls(), ["normalize", "fst2txt:replace", "tokenize"]);
    p.close(true, false);
}

#[test]
fn open_twice_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut p = processor(ScriptedEngine::new);

    p.open(&path, Stages::NONE, false).unwrap();
    let err = p.open(&path, Stages::NONE, false).unwrap_err();
    assert!(matches!(err, UnitexError::Usage(_)));
    assert_eq!(p.engine().calls(), ["normalize"]);

    p.close(true, false);
    p.open(&path, Stages::NONE, false).unwrap();
    p.close(true, false);
}

#[test]
fn missing_alphabet_fails_before_engine_call() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let config = ProcessorConfig {
        resources: ResourcesConfig {
            dictionaries: vec![common::DICTIONARY.into()],
            ..ResourcesConfig::default()
        },
        ..ProcessorConfig::default()
    };
    let mut p = processor_with(config, ScriptedEngine::new);

    let tokenize = Stages {
        tokenize: true,
        ..Stages::NONE
    };
    let err = p.open(&path, tokenize, false).unwrap_err();
    assert!(matches!(err, UnitexError::Config(_)));
    assert_eq!(p.engine().calls(), ["normalize"]);
    p.close(true, false);
}

#[test]
fn missing_grammar_fails_before_engine_call() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut config = full_config(false, false);
    config.resources.sentence = None;
    let mut p = processor_with(config, ScriptedEngine::new);

    let err = p.open(&path, Stages::ALL, false).unwrap_err();
    assert!(matches!(err, UnitexError::Config(_)));
    assert_eq!(p.engine().calls(), ["normalize"]);
    p.close(true, false);
}

#[test]
fn lexicalize_requires_dictionaries() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut config = full_config(false, false);
    config.resources.dictionaries.clear();
    let mut p = processor_with(config, ScriptedEngine::new);

    let err = p.open(&path, "tl".parse().unwrap(), false).unwrap_err();
    assert!(matches!(err, UnitexError::Config(_)));
    assert_eq!(p.engine().calls(), ["normalize", "tokenize"]);
    p.close(true, false);
}

#[test]
fn stage_failure_names_the_stage_and_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut p = processor(|gw| ScriptedEngine::new(gw).failing("tokenize"));

    let err = p.open(&path, Stages::ALL, false).unwrap_err();
    assert_eq!(err.failed_stage(), Some(Stage::Tokenize));
    assert!(!p.engine().calls().contains(&"dico".to_string()));

    // The session stays open so the caller can clean up.
    assert!(p.is_open());
    p.close(true, false);
    assert!(!p.is_open());
}

#[test]
fn normalize_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut p = processor(|gw| ScriptedEngine::new(gw).failing("normalize"));

    let err = p.open(&path, Stages::ALL, false).unwrap_err();
    assert_eq!(err.failed_stage(), Some(Stage::Normalize));
    p.close(true, false);
}

// ---------------------------------------------------------------------------
// close
// ---------------------------------------------------------------------------

#[test]
fn clean_close_removes_snt_and_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut p = processor(ScriptedEngine::new);

    p.open(&path, Stages::ALL, false).unwrap();
    let session = p.session().unwrap().clone();
    p.close(true, false);

    assert!(!p.is_open());
    assert!(Path::new(&path).is_file());
    assert!(!Path::new(&session.snt).exists());
    assert!(!Path::new(&session.dir).exists());
}

#[test]
fn close_without_clean_keeps_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut p = processor(ScriptedEngine::new);

    p.open(&path, Stages::ALL, false).unwrap();
    let session = p.session().unwrap().clone();
    p.close(false, false);

    assert!(!p.is_open());
    assert!(Path::new(&session.snt).is_file());
    assert!(Path::new(&session.dir).join("tokens.txt").is_file());
}

#[test]
fn close_when_closed_is_harmless() {
    let mut p = processor(ScriptedEngine::new);
    p.close(true, false);
    assert!(!p.is_open());
}

// ---------------------------------------------------------------------------
// locate / iter_matches
// ---------------------------------------------------------------------------

#[test]
fn iter_matches_yields_index_records_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut p = processor(|gw| ScriptedEngine::new(gw).with_index("abc\n0 5 Hello\n6 11 World\n"));
    p.open(&path, Stages::ALL, false).unwrap();

    let matches: Vec<_> = p
        .iter_matches("dates.fst2", MatchMode::Longest, OutputMode::Merge)
        .unwrap()
        .collect();

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].offsets, (Offset::token(0), Offset::token(5)));
    assert_eq!(matches[0].text, "Hello");
    assert_eq!(matches[1].offsets, (Offset::token(6), Offset::token(11)));
    assert_eq!(matches[1].text, "World");
    p.close(true, false);
}

#[test]
fn ignore_mode_yields_empty_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut p = processor(|gw| ScriptedEngine::new(gw).with_index("abc\n0 5 Hello\n6 11 World\n"));
    p.open(&path, Stages::ALL, false).unwrap();

    let texts: Vec<String> = p
        .iter_matches("dates.fst2", MatchMode::Shortest, OutputMode::Ignore)
        .unwrap()
        .map(|m| m.text)
        .collect();

    assert_eq!(texts, ["", ""]);
    p.close(true, false);
}

#[test]
fn unreadable_offset_fails_iter_matches() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut p = processor(|gw| ScriptedEngine::new(gw).with_index("#M\n0 5 Hello\n6 x World\n"));
    p.open(&path, Stages::ALL, false).unwrap();

    let err = p
        .iter_matches("dates.fst2", MatchMode::Longest, OutputMode::Merge)
        .unwrap_err();
    assert!(matches!(err, UnitexError::Format { .. }));
    p.close(true, false);
}

#[test]
fn locate_without_index_is_stage_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut p = processor(|gw| ScriptedEngine::new(gw).silent("locate"));
    p.open(&path, Stages::ALL, false).unwrap();

    let err = p
        .iter_matches("dates.fst2", MatchMode::Longest, OutputMode::Merge)
        .unwrap_err();
    assert_eq!(err.failed_stage(), Some(Stage::Locate));
    p.close(true, false);
}

#[test]
fn locate_failure_is_stage_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut p = processor(|gw| ScriptedEngine::new(gw).failing("locate"));
    p.open(&path, Stages::ALL, false).unwrap();

    let err = p
        .iter_matches("dates.fst2", MatchMode::Longest, OutputMode::Merge)
        .unwrap_err();
    assert_eq!(err.failed_stage(), Some(Stage::Locate));
    p.close(true, false);
}

#[test]
fn text_concordance_lands_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut p = processor(|gw| ScriptedEngine::new(gw).with_merged("Hello\tWorld\n"));
    p.open(&path, Stages::ALL, false).unwrap();

    let result = p
        .concordance("dates.fst2", MatchMode::Longest, OutputMode::Merge)
        .unwrap();

    assert_eq!(result, p.session().unwrap().concord_text_path());
    assert_eq!(std::fs::read_to_string(&result).unwrap(), "Hello\tWorld\n");
    assert_eq!(
        &p.engine().calls()[5..],
        ["locate", "concord:text"]
    );
    p.close(true, false);
}

#[test]
fn unknown_modes_fail_before_locate() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello World");
    let mut p = processor(ScriptedEngine::new);
    p.open(&path, Stages::ALL, false).unwrap();
    let before = p.engine().calls();

    let result = "fastest"
        .parse::<MatchMode>()
        .and_then(|mm| Ok((mm, "everything".parse::<OutputMode>()?)))
        .and_then(|(mm, om)| p.iter_matches("dates.fst2", mm, om));
    assert!(matches!(result, Err(UnitexError::Config(_))));

    let result = "merge"
        .parse::<OutputMode>()
        .and_then(|om| Ok((om, "longer".parse::<MatchMode>()?)))
        .and_then(|(om, mm)| p.iter_matches("dates.fst2", mm, om));
    assert!(matches!(result, Err(UnitexError::Config(_))));

    assert_eq!(p.engine().calls(), before);
    p.close(true, false);
}

// ---------------------------------------------------------------------------
// Closed-state misuse, unimplemented operations, construction
// ---------------------------------------------------------------------------

#[test]
fn operations_on_closed_processor_are_usage_errors() {
    let p = processor(ScriptedEngine::new);

    let err = p
        .iter_matches("dates.fst2", MatchMode::Longest, OutputMode::Merge)
        .unwrap_err();
    assert!(matches!(err, UnitexError::Usage(_)));
    assert!(matches!(
        p.tag("dates.fst2", "out.txt", &Default::default()),
        Err(UnitexError::Usage(_))
    ));
    assert!(matches!(p.to_automaton(), Err(UnitexError::Usage(_))));
    assert!(p.engine().calls().is_empty());
}

#[test]
fn search_and_extract_are_not_implemented() {
    let p = processor(ScriptedEngine::new);
    assert!(matches!(
        p.search("g.fst2", "out"),
        Err(UnitexError::NotImplemented("search"))
    ));
    assert!(matches!(
        p.extract("g.fst2", "out"),
        Err(UnitexError::NotImplemented("extract"))
    ));
}

#[test]
fn virtualization_requires_an_engine_that_sees_it() {
    let err = UnitexProcessor::new(
        full_config(true, false),
        CommandEngine::default(),
        FileGateway::new(),
    )
    .unwrap_err();
    assert!(matches!(err, UnitexError::Config(_)));

    let gateway = FileGateway::new();
    let engine = ScriptedEngine::new(&gateway).without_virtual_paths();
    assert!(UnitexProcessor::new(full_config(true, false), engine, gateway).is_err());
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let mut config = full_config(false, false);
    config.resources.alphabet = Some("  ".into());
    let gateway = FileGateway::new();
    let engine = ScriptedEngine::new(&gateway);
    let err = UnitexProcessor::new(config, engine, gateway).unwrap_err();
    assert!(matches!(err, UnitexError::Config(_)));
}

// ---------------------------------------------------------------------------
// Text automaton
// ---------------------------------------------------------------------------

#[test]
fn to_automaton_reads_built_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello world. Bye");
    let mut p = processor(ScriptedEngine::new);
    p.open(&path, Stages::ALL, false).unwrap();

    let fst = p.to_automaton().unwrap();
    assert_eq!(fst.len(), 2);
    let first = fst.sentence(0).unwrap();
    assert_eq!(first.text, "Hello world");
    assert_eq!(first.tokens.len(), 3);

    // Backing files live in the working directory until a cleaning close.
    let session = p.session().unwrap().clone();
    assert!(Path::new(&session.tfst_path()).is_file());
    p.close(true, false);
    assert!(!Path::new(&session.tfst_path()).exists());
    assert_eq!(fst.sentence(1).unwrap().text, "Bye");
}

#[test]
fn to_automaton_requires_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let path = corpus(&dir, "foo.txt", "Hello");
    let mut p = processor(|gw| ScriptedEngine::new(gw).silent("txt2tfst"));
    p.open(&path, Stages::NONE, false).unwrap();

    let err = p.to_automaton().unwrap_err();
    assert_eq!(err.failed_stage(), Some(Stage::TextAutomaton));
    p.close(true, false);
}
