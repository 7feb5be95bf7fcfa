// CommandEngine: runs the toolkit's `UnitexToolLogger` binary, one process
// per tool invocation.
//
// Separate processes cannot see the in-memory virtual filesystem, and
// nothing survives between invocations, so persistence degrades to passing
// the resource path through unchanged.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, error, warn};
use unitex_core::enums::{MatchMode, OutputMode, ResourceKind};

use super::{ConcordFormat, ConcordRequest, Engine, Fst2TxtMode, LocateRequest};
use crate::config::{
    DicoOptions, Fst2TxtOptions, NormalizeOptions, TokenizeOptions, Txt2TfstOptions,
};

/// Default program name, looked up on `PATH`.
pub const DEFAULT_PROGRAM: &str = "UnitexToolLogger";

/// Environment variable overriding the program location.
pub const PROGRAM_ENV: &str = "UNITEX_TOOL";

/// All files are exchanged as UTF-8 without byte-order mark.
const ENCODING: &str = "-qutf8-no-bom";

/// Engine backed by the `UnitexToolLogger` command-line program.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: PathBuf,
}

impl Default for CommandEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl CommandEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Program from `UNITEX_TOOL`, or [`DEFAULT_PROGRAM`].
    pub fn from_env() -> Self {
        match std::env::var_os(PROGRAM_ENV) {
            Some(path) => Self::new(path),
            None => Self::default(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn run(&self, tool: &str, args: Vec<String>) -> bool {
        debug!(tool, ?args, "running {}", self.program.display());
        match Command::new(&self.program).arg(tool).args(&args).output() {
            Ok(output) if output.status.success() => true,
            Ok(output) => {
                warn!(
                    tool,
                    status = %output.status,
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "tool reported failure"
                );
                false
            }
            Err(e) => {
                error!(tool, "failed to launch {}: {e}", self.program.display());
                false
            }
        }
    }
}

fn flag(args: &mut Vec<String>, on: bool, name: &str) {
    if on {
        args.push(name.to_string());
    }
}

fn value(args: &mut Vec<String>, name: &str, v: Option<&str>) {
    if let Some(v) = v {
        args.push(format!("{name}={v}"));
    }
}

// ---------------------------------------------------------------------------
// Argument vectors, one builder per tool
// ---------------------------------------------------------------------------

pub(crate) fn normalize_args(text: &str, options: &NormalizeOptions) -> Vec<String> {
    let mut args = vec![text.to_string()];
    flag(&mut args, options.no_carriage_return, "--no_carriage_return");
    value(&mut args, "--replacement_rules", options.replacement_rules.as_deref());
    value(&mut args, "--input_offsets", options.input_offsets.as_deref());
    value(&mut args, "--output_offsets", options.output_offsets.as_deref());
    flag(
        &mut args,
        options.no_separator_normalization,
        "--no_separator_normalization",
    );
    args.push(ENCODING.to_string());
    args
}

pub(crate) fn fst2txt_args(
    grammar: &str,
    text: &str,
    alphabet: &str,
    mode: Fst2TxtMode,
    options: &Fst2TxtOptions,
) -> Vec<String> {
    let mut args = vec![
        format!("--text={text}"),
        grammar.to_string(),
        format!("--alphabet={alphabet}"),
    ];
    flag(&mut args, options.start_on_space, "--start_on_space");
    flag(&mut args, options.char_by_char, "--char_by_char");
    args.push(
        match mode {
            Fst2TxtMode::Merge => "--merge",
            Fst2TxtMode::Replace => "--replace",
        }
        .to_string(),
    );
    args.push(ENCODING.to_string());
    args
}

pub(crate) fn tokenize_args(text: &str, alphabet: &str, options: &TokenizeOptions) -> Vec<String> {
    let mut args = vec![text.to_string(), format!("--alphabet={alphabet}")];
    flag(&mut args, options.char_by_char, "--char_by_char");
    value(&mut args, "--tokens", options.tokens.as_deref());
    value(&mut args, "--input_offsets", options.input_offsets.as_deref());
    value(&mut args, "--output_offsets", options.output_offsets.as_deref());
    args.push(ENCODING.to_string());
    args
}

pub(crate) fn dico_args(
    dictionaries: &[String],
    text: &str,
    alphabet: &str,
    options: &DicoOptions,
) -> Vec<String> {
    let mut args = vec![format!("--text={text}"), format!("--alphabet={alphabet}")];
    if !options.morpho.is_empty() {
        args.push(format!("--morpho={}", options.morpho.join(";")));
    }
    flag(&mut args, options.korean, "--korean");
    flag(&mut args, options.semitic, "--semitic");
    value(&mut args, "--arabic_rules", options.arabic_rules.as_deref());
    value(&mut args, "--raw", options.raw.as_deref());
    args.push(ENCODING.to_string());
    args.extend(dictionaries.iter().cloned());
    args
}

pub(crate) fn locate_args(request: &LocateRequest<'_>) -> Vec<String> {
    let options = request.options;
    let mut args = vec![
        format!("--text={}", request.text),
        request.grammar.to_string(),
        format!("--alphabet={}", request.alphabet),
    ];
    args.push(
        match request.match_mode {
            MatchMode::Longest => "--longest_matches",
            MatchMode::Shortest => "--shortest_matches",
        }
        .to_string(),
    );
    args.push(
        match request.output_mode {
            OutputMode::Ignore => "--ignore",
            OutputMode::Merge => "--merge",
            OutputMode::Replace => "--replace",
        }
        .to_string(),
    );
    if !options.morpho.is_empty() {
        args.push(format!("--morpho={}", options.morpho.join(";")));
    }
    flag(&mut args, options.start_on_space, "--start_on_space");
    flag(&mut args, options.char_by_char, "--char_by_char");
    flag(&mut args, options.korean, "--korean");
    value(&mut args, "--arabic_rules", options.arabic_rules.as_deref());
    args.push(format!(
        "--negation_operator={}",
        options.negation_operator.as_str()
    ));
    if let Some(count) = options.stop_token_count {
        args.push(format!("--stop_token_count={count}"));
    }
    flag(&mut args, options.protect_dic_chars, "--protect_dic_chars");
    for (name, v) in &options.variable {
        args.push(format!("--variable={name}={v}"));
    }
    args.push(format!(
        "--variable_error={}",
        options.variable_error.as_str()
    ));
    args.push("--all".to_string());
    args.push("--no_ambiguous_outputs".to_string());
    args.push(ENCODING.to_string());
    args
}

pub(crate) fn concord_args(request: &ConcordRequest<'_>) -> Vec<String> {
    let mut args = vec![
        request.index.to_string(),
        format!("--alphabet={}", request.alphabet),
        "--left=0".to_string(),
        "--right=0".to_string(),
        "--TO".to_string(),
    ];
    match request.format {
        ConcordFormat::Merge { output } => args.push(format!("--merge={output}")),
        ConcordFormat::Text => args.push("--text".to_string()),
    }
    flag(&mut args, request.thai, "--thai");
    args.push(ENCODING.to_string());
    args
}

pub(crate) fn txt2tfst_args(text: &str, alphabet: &str, options: &Txt2TfstOptions) -> Vec<String> {
    let mut args = vec![text.to_string(), format!("--alphabet={alphabet}")];
    flag(&mut args, options.clean, "--clean");
    value(
        &mut args,
        "--normalization_grammar",
        options.normalization_grammar.as_deref(),
    );
    value(&mut args, "--tagset", options.tagset.as_deref());
    flag(&mut args, options.korean, "--korean");
    args.push(ENCODING.to_string());
    args
}

impl Engine for CommandEngine {
    fn normalize(&self, text: &str, options: &NormalizeOptions) -> bool {
        self.run("Normalize", normalize_args(text, options))
    }

    fn fst2txt(
        &self,
        grammar: &str,
        text: &str,
        alphabet: &str,
        mode: Fst2TxtMode,
        options: &Fst2TxtOptions,
    ) -> bool {
        self.run(
            "Fst2Txt",
            fst2txt_args(grammar, text, alphabet, mode, options),
        )
    }

    fn tokenize(&self, text: &str, alphabet: &str, options: &TokenizeOptions) -> bool {
        self.run("Tokenize", tokenize_args(text, alphabet, options))
    }

    fn dico(
        &self,
        dictionaries: &[String],
        text: &str,
        alphabet: &str,
        options: &DicoOptions,
    ) -> bool {
        self.run("Dico", dico_args(dictionaries, text, alphabet, options))
    }

    fn locate(&self, request: &LocateRequest<'_>) -> bool {
        self.run("Locate", locate_args(request))
    }

    fn concord(&self, request: &ConcordRequest<'_>) -> bool {
        self.run("Concord", concord_args(request))
    }

    fn txt2tfst(&self, text: &str, alphabet: &str, options: &Txt2TfstOptions) -> bool {
        self.run("Txt2Tfst", txt2tfst_args(text, alphabet, options))
    }

    fn load_persistent(&self, kind: ResourceKind, path: &str) -> Option<String> {
        debug!("{kind} '{path}' is read by each tool invocation");
        Some(path.to_string())
    }

    fn free_persistent(&self, _kind: ResourceKind, _handle: &str) {}
}
