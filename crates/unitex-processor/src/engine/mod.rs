// The native toolkit as seen by the orchestrator.
//
// Each method is one opaque tool invocation that reports success as a
// boolean. The orchestrator treats `false` as fatal for the current stage;
// it never inspects why a tool failed.

pub mod command;

pub use command::CommandEngine;

use unitex_core::enums::{MatchMode, OutputMode, ResourceKind};

use crate::config::{
    DicoOptions, Fst2TxtOptions, LocateOptions, NormalizeOptions, TokenizeOptions,
    Txt2TfstOptions,
};

/// How `Fst2Txt` applies its grammar to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fst2TxtMode {
    /// Insert grammar outputs around matches (sentence segmentation).
    Merge,
    /// Replace matches by grammar outputs (replace grammar).
    Replace,
}

/// Arguments of a locate invocation.
#[derive(Debug, Clone, Copy)]
pub struct LocateRequest<'a> {
    pub grammar: &'a str,
    pub text: &'a str,
    pub alphabet: &'a str,
    pub match_mode: MatchMode,
    pub output_mode: OutputMode,
    pub options: &'a LocateOptions,
}

/// Output format of a concordance build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcordFormat<'a> {
    /// Merge matches back into the text, written to `output`.
    Merge { output: &'a str },
    /// Plain-text concordance written next to the index.
    Text,
}

/// Arguments of a concordance invocation.
#[derive(Debug, Clone, Copy)]
pub struct ConcordRequest<'a> {
    pub index: &'a str,
    pub alphabet: &'a str,
    pub format: ConcordFormat<'a>,
    pub thai: bool,
}

/// External collaborator performing the actual linguistic processing.
///
/// Implementations act on process-wide engine state, so a single
/// orchestrator is expected to drive an engine at a time.
pub trait Engine {
    /// Whether paths carrying the virtual prefix are visible to the tools.
    fn supports_virtual_paths(&self) -> bool {
        false
    }

    /// Normalize separators of `text`, producing the `.snt` file next to it.
    fn normalize(&self, text: &str, options: &NormalizeOptions) -> bool;

    /// Apply `grammar` to `text` in place.
    fn fst2txt(
        &self,
        grammar: &str,
        text: &str,
        alphabet: &str,
        mode: Fst2TxtMode,
        options: &Fst2TxtOptions,
    ) -> bool;

    fn tokenize(&self, text: &str, alphabet: &str, options: &TokenizeOptions) -> bool;

    /// Apply `dictionaries` to the tokenized text.
    fn dico(
        &self,
        dictionaries: &[String],
        text: &str,
        alphabet: &str,
        options: &DicoOptions,
    ) -> bool;

    /// Find grammar matches, producing `concord.ind` in the working directory.
    fn locate(&self, request: &LocateRequest<'_>) -> bool;

    fn concord(&self, request: &ConcordRequest<'_>) -> bool;

    /// Build the text automaton (`text.tfst` / `text.tind`).
    fn txt2tfst(&self, text: &str, alphabet: &str, options: &Txt2TfstOptions) -> bool;

    /// Load a resource into engine memory. Returns the handle to pass to
    /// later calls in place of the path, or `None` on failure.
    fn load_persistent(&self, kind: ResourceKind, path: &str) -> Option<String>;

    /// Release a handle returned by [`Engine::load_persistent`].
    fn free_persistent(&self, kind: ResourceKind, handle: &str);
}
