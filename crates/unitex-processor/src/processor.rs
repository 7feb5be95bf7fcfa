// UnitexProcessor: drives the native toolkit over one corpus at a time.
//
// State machine: Closed -> open() -> Open -> close() -> Closed. Every
// operation that needs a corpus fails with a usage error while Closed.
//
// open() always normalizes, then runs the optional stages in a fixed order:
// segment, replace, tokenize, lexicalize. Each stage checks its resources
// before calling the engine, and a `false` from the engine aborts the
// pipeline with a stage error. Cleanup after a failure is left to close().

use tracing::{debug, error, info};
use unitex_core::enums::{MatchMode, OutputMode, Stage, Stages};
use unitex_core::{Result, UnitexError};
use unitex_io::{FileGateway, FileMode, UnitexFile, read_text};

use crate::automaton::TextAutomaton;
use crate::config::ProcessorConfig;
use crate::engine::{ConcordFormat, ConcordRequest, Engine, Fst2TxtMode, LocateRequest};
use crate::index::{Matches, parse_index};
use crate::logging::init_logging;
use crate::resources::{PersistedResource, ResourceSet};
use crate::session::CorpusSession;
use crate::xml::tagged_document;

/// Options of [`UnitexProcessor::tag`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagOptions {
    /// Wrap the merged text in a `<TAGFILE>` XML document.
    pub xml: bool,
    pub match_mode: MatchMode,
    pub output_mode: OutputMode,
}

/// Pipeline orchestrator.
#[derive(Debug)]
pub struct UnitexProcessor<E: Engine> {
    config: ProcessorConfig,
    engine: E,
    gateway: FileGateway,
    resources: ResourceSet,
    session: Option<CorpusSession>,
}

impl<E: Engine> UnitexProcessor<E> {
    /// Validate `config`, install logging and, with persistence on, load
    /// every configured resource into `engine`.
    pub fn new(config: ProcessorConfig, engine: E, gateway: FileGateway) -> Result<Self> {
        config.validate()?;
        if config.virtualization && !engine.supports_virtual_paths() {
            return Err(UnitexError::config(
                "virtualization requested but the engine cannot access the virtual filesystem",
            ));
        }
        init_logging(config.verbose, config.debug, config.log.as_deref());

        let resources = if config.persistence {
            ResourceSet::load(&config.resources, &engine)?
        } else {
            ResourceSet::from_paths(&config.resources)
        };
        debug!(
            persisted = resources.outstanding().len(),
            virtualization = config.virtualization,
            "processor ready"
        );

        Ok(Self {
            config,
            engine,
            gateway,
            resources,
            session: None,
        })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn gateway(&self) -> &FileGateway {
        &self.gateway
    }

    /// The open corpus, if any.
    pub fn session(&self) -> Option<&CorpusSession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Persisted handles not yet freed.
    pub fn outstanding_resources(&self) -> &[PersistedResource] {
        self.resources.outstanding()
    }

    fn current(&self, action: &str) -> Result<&CorpusSession> {
        self.session
            .as_ref()
            .ok_or_else(|| UnitexError::usage(format!("unable to {action}: no corpus is open")))
    }

    // =========================================================================
    // Open / close
    // =========================================================================

    /// Open the corpus at `path` and run the preprocessing pipeline.
    ///
    /// Normalization always runs; `stages` selects the optional ones.
    /// With `tagged`, segmentation and replace are skipped since the input
    /// is already segmented.
    pub fn open(&mut self, path: &str, stages: Stages, tagged: bool) -> Result<()> {
        if let Some(open) = &self.session {
            return Err(UnitexError::usage(format!(
                "you must close the current corpus ({}) before opening another one",
                open.source
            )));
        }
        let session = CorpusSession::derive(path, self.config.virtualization);
        info!("Opening corpus '{path}'...");

        if session.virtualized && !self.gateway.cp(&session.source, &session.txt) {
            // Keep the session so close() can drop whatever was staged.
            self.session = Some(session);
            return Err(UnitexError::stage(
                Stage::Normalize,
                format!("unable to stage '{path}' in the virtual filesystem"),
            ));
        }
        if !std::path::Path::new(&session.dir).exists() {
            self.gateway.mkdir(&session.dir);
        }
        self.session = Some(session);

        let stages = if tagged {
            stages.for_tagged_input()
        } else {
            stages
        };
        self.normalize()?;
        if stages.segment {
            self.segment()?;
        }
        if stages.replace {
            self.replace()?;
        }
        if stages.tokenize {
            self.tokenize()?;
        }
        if stages.lexicalize {
            self.lexicalize()?;
        }
        Ok(())
    }

    /// Close the corpus.
    ///
    /// With `clean`, every artifact is removed along with the working
    /// directory; with `free`, persisted resources are released as well.
    /// The processor is closed afterwards in every case.
    pub fn close(&mut self, clean: bool, free: bool) {
        if clean {
            self.clean();
        }
        if free {
            self.free();
        }
        self.session = None;
    }

    fn clean(&self) {
        let Some(session) = &self.session else {
            error!("Unable to clean processor: no corpus is open");
            return;
        };
        if session.virtualized {
            for entry in self.gateway.ls(&session.work_dir()) {
                self.gateway.rm(&entry);
            }
            self.gateway.rm(&session.snt);
            self.gateway.rm(&session.txt);
        } else {
            self.gateway.rm(&session.snt);
        }
        self.gateway.rmdir(&session.dir);
    }

    /// Release every persisted resource. Returns how many were freed.
    pub fn free(&mut self) -> usize {
        self.resources.release(&self.engine)
    }

    // =========================================================================
    // Preprocessing stages
    // =========================================================================

    fn normalize(&self) -> Result<()> {
        let session = self.current("normalize text")?;
        info!("Normalizing '{}'...", session.txt);
        if !self.engine.normalize(&session.txt, &self.config.tools.normalize) {
            return Err(UnitexError::stage(Stage::Normalize, session.txt.clone()));
        }
        Ok(())
    }

    fn segment(&self) -> Result<()> {
        self.apply_grammar(Stage::Segment, Fst2TxtMode::Merge)
    }

    fn replace(&self) -> Result<()> {
        self.apply_grammar(Stage::Replace, Fst2TxtMode::Replace)
    }

    fn apply_grammar(&self, stage: Stage, mode: Fst2TxtMode) -> Result<()> {
        let session = self.current(stage.as_str())?;
        let (grammar, key) = match mode {
            Fst2TxtMode::Merge => (self.resources.sentence.as_deref(), "sentence"),
            Fst2TxtMode::Replace => (self.resources.replace.as_deref(), "replace"),
        };
        let grammar = grammar.ok_or_else(|| {
            UnitexError::config(format!(
                "unable to run {stage}: no '{key}' grammar provided"
            ))
        })?;
        let alphabet = self.resources.require_alphabet(stage.as_str())?;

        info!("Applying '{grammar}' to '{}'...", session.snt);
        if !self.engine.fst2txt(
            grammar,
            &session.snt,
            alphabet,
            mode,
            &self.config.tools.fst2txt,
        ) {
            return Err(UnitexError::stage(stage, grammar.to_string()));
        }
        Ok(())
    }

    fn tokenize(&self) -> Result<()> {
        let session = self.current("tokenize text")?;
        let alphabet = self.resources.require_alphabet("tokenize text")?;
        info!("Tokenizing '{}'...", session.snt);
        if !self
            .engine
            .tokenize(&session.snt, alphabet, &self.config.tools.tokenize)
        {
            return Err(UnitexError::stage(Stage::Tokenize, session.snt.clone()));
        }
        Ok(())
    }

    fn lexicalize(&self) -> Result<()> {
        let session = self.current("lexicalize text")?;
        if self.resources.dictionaries.is_empty() {
            return Err(UnitexError::config(
                "unable to lexicalize text: no dictionaries provided",
            ));
        }
        let alphabet = self.resources.require_alphabet("lexicalize text")?;
        info!(
            "Applying {} dictionaries to '{}'...",
            self.resources.dictionaries.len(),
            session.snt
        );
        if !self.engine.dico(
            &self.resources.dictionaries,
            &session.snt,
            alphabet,
            &self.config.tools.dico,
        ) {
            return Err(UnitexError::stage(Stage::Lexicalize, session.snt.clone()));
        }
        Ok(())
    }

    // =========================================================================
    // Automaton
    // =========================================================================

    /// Build the text automaton of the open corpus.
    ///
    /// The view is read fully into memory, but `text.tfst` and `text.tind`
    /// stay in the working directory and are removed by a cleaning close.
    pub fn to_automaton(&self) -> Result<TextAutomaton> {
        let session = self.current("build the text automaton")?;
        let alphabet = self.resources.require_alphabet("build the text automaton")?;
        info!("Building text automaton of '{}'...", session.snt);
        if !self
            .engine
            .txt2tfst(&session.snt, alphabet, &self.config.tools.txt2tfst)
        {
            return Err(UnitexError::stage(Stage::TextAutomaton, session.snt.clone()));
        }

        let (tfst, tind) = (session.tfst_path(), session.tind_path());
        for artifact in [&tfst, &tind] {
            if !self.gateway.exists(artifact) {
                return Err(UnitexError::stage(
                    Stage::TextAutomaton,
                    format!("'{artifact}' was not produced"),
                ));
            }
        }
        TextAutomaton::load(&self.gateway, &tfst, &tind)
    }

    // =========================================================================
    // Locate / concordance
    // =========================================================================

    /// Run `grammar` over the open corpus. Returns the index path.
    pub(crate) fn locate(
        &self,
        grammar: &str,
        match_mode: MatchMode,
        output_mode: OutputMode,
    ) -> Result<String> {
        let session = self.current("locate pattern")?;
        let alphabet = self.resources.require_alphabet("locate pattern")?;

        info!("Locating '{grammar}' ({match_mode}, {output_mode})...");
        let request = LocateRequest {
            grammar,
            text: &session.snt,
            alphabet,
            match_mode,
            output_mode,
            options: &self.config.tools.locate,
        };
        if !self.engine.locate(&request) {
            return Err(UnitexError::stage(Stage::Locate, grammar.to_string()));
        }

        let index = session.index_path();
        if !self.gateway.exists(&index) {
            return Err(UnitexError::stage(
                Stage::Locate,
                format!("no index produced at '{index}'"),
            ));
        }
        Ok(index)
    }

    /// Build a concordance from `index`. Returns the path of the result:
    /// the requested output when merging, `concord.txt` otherwise.
    pub(crate) fn concord(&self, index: &str, format: ConcordFormat<'_>) -> Result<String> {
        let session = self.current("build concordance")?;
        let alphabet = self.resources.require_alphabet("build concordance")?;

        let result = match format {
            ConcordFormat::Merge { output } => output.to_string(),
            ConcordFormat::Text => session.concord_text_path(),
        };
        info!("Building concordance '{result}'...");
        let request = ConcordRequest {
            index,
            alphabet,
            format,
            thai: self.config.tools.concord.thai,
        };
        if !self.engine.concord(&request) {
            return Err(UnitexError::stage(Stage::Concord, index.to_string()));
        }
        if !self.gateway.exists(&result) {
            return Err(UnitexError::stage(
                Stage::Concord,
                format!("no concordance produced at '{result}'"),
            ));
        }
        Ok(result)
    }

    /// Matches of `grammar` in the open corpus, in index order.
    ///
    /// The index is read in full before iteration starts. Both offsets of
    /// every line must be a token number (`12`) or a `token.char.letter`
    /// triple (`12.0.3`); any other offset token fails the whole call with
    /// a format error rather than skipping the line.
    pub fn iter_matches(
        &self,
        grammar: &str,
        match_mode: MatchMode,
        output_mode: OutputMode,
    ) -> Result<Matches> {
        let index = self.locate(grammar, match_mode, output_mode)?;

        let content = read_text(&self.gateway, &index)?;
        let records = parse_index(&content, output_mode)?;
        debug!(count = records.len(), "read {index}");
        Ok(Matches::new(records))
    }

    /// Plain-text concordance of `grammar`. Returns the path of
    /// `concord.txt` in the working directory.
    pub fn concordance(
        &self,
        grammar: &str,
        match_mode: MatchMode,
        output_mode: OutputMode,
    ) -> Result<String> {
        let index = self.locate(grammar, match_mode, output_mode)?;
        self.concord(&index, ConcordFormat::Text)
    }

    /// Tag the open corpus with `grammar`, writing the result to `output`.
    pub fn tag(&self, grammar: &str, output: &str, options: &TagOptions) -> Result<()> {
        let index = self.locate(grammar, options.match_mode, options.output_mode)?;

        if !options.xml {
            self.concord(&index, ConcordFormat::Merge { output })?;
            return Ok(());
        }

        let temp = self.current("tag corpus")?.merge_temp_path();
        self.concord(&index, ConcordFormat::Merge { output: &temp })?;

        let result = self.write_tagged(grammar, &temp, output);
        self.gateway.rm(&temp);
        result
    }

    fn write_tagged(&self, grammar: &str, merged: &str, output: &str) -> Result<()> {
        let body = read_text(&self.gateway, merged)?;
        let document = tagged_document(grammar, &body);

        let mut tagged = UnitexFile::new(&self.gateway);
        tagged.open(output, FileMode::Write, false)?;
        let written = tagged.write(&document);
        tagged.close()?;
        written.map_err(|e| UnitexError::stage(Stage::Tag, format!("writing '{output}': {e}")))
    }

    /// Not implemented.
    pub fn search(&self, _grammar: &str, _output: &str) -> Result<()> {
        Err(UnitexError::NotImplemented("search"))
    }

    /// Not implemented.
    pub fn extract(&self, _grammar: &str, _output: &str) -> Result<()> {
        Err(UnitexError::NotImplemented("extract"))
    }
}
