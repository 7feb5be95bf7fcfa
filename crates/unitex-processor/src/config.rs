// Processor configuration.
//
// Mirrors the YAML layout used to drive the toolkit: top-level logging and
// mode switches, a `resources` section, and a `tools` section with one option
// bundle per external tool. Every section is optional and falls back to its
// defaults; unknown keys are rejected.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use unitex_core::{Result, UnitexError};

/// Top-level processor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorConfig {
    /// Log informational messages.
    pub verbose: bool,
    /// Log debug messages (implies `verbose`).
    pub debug: bool,
    /// Write logs to this file instead of stderr.
    pub log: Option<PathBuf>,
    /// Load resources once into engine memory and reuse them.
    pub persistence: bool,
    /// Stage the corpus and its artifacts in the virtual filesystem.
    ///
    /// The virtual filesystem lives in this process, so the engine must be
    /// able to resolve `$:` paths itself. `CommandEngine` runs the toolkit
    /// as a separate process and cannot; pairing it with this option is
    /// rejected when the processor is created.
    pub virtualization: bool,
    pub resources: ResourcesConfig,
    pub tools: ToolsConfig,
}

/// Linguistic resources used by the preprocessing and locate stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourcesConfig {
    pub alphabet: Option<String>,
    #[serde(rename = "alphabet-sorted")]
    pub alphabet_sorted: Option<String>,
    /// Sentence segmentation grammar (`.fst2`).
    pub sentence: Option<String>,
    /// Replace grammar (`.fst2`).
    pub replace: Option<String>,
    /// Compiled dictionaries (`.bin`), applied in order.
    #[serde(deserialize_with = "null_as_empty")]
    pub dictionaries: Vec<String>,
}

/// Per-tool option bundles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub normalize: NormalizeOptions,
    pub fst2txt: Fst2TxtOptions,
    pub tokenize: TokenizeOptions,
    pub dico: DicoOptions,
    pub txt2tfst: Txt2TfstOptions,
    pub locate: LocateOptions,
    pub concord: ConcordOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeOptions {
    pub no_carriage_return: bool,
    pub input_offsets: Option<String>,
    pub output_offsets: Option<String>,
    /// Replacement rules file applied during normalization.
    pub replacement_rules: Option<String>,
    pub no_separator_normalization: bool,
}

/// Options shared by sentence segmentation and replace grammar application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Fst2TxtOptions {
    pub start_on_space: bool,
    pub char_by_char: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokenizeOptions {
    pub char_by_char: bool,
    /// Existing token list to extend.
    pub tokens: Option<String>,
    pub input_offsets: Option<String>,
    pub output_offsets: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DicoOptions {
    /// Morphological-mode dictionaries.
    #[serde(deserialize_with = "null_as_empty")]
    pub morpho: Vec<String>,
    pub korean: bool,
    pub semitic: bool,
    pub arabic_rules: Option<String>,
    /// Raw output file instead of the usual dictionary files.
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Txt2TfstOptions {
    pub clean: bool,
    pub normalization_grammar: Option<String>,
    pub tagset: Option<String>,
    pub korean: bool,
}

/// Operator used for negation in locate grammars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NegationOperator {
    #[default]
    Tilde,
    Minus,
}

impl NegationOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tilde => "tilde",
            Self::Minus => "minus",
        }
    }
}

/// What locate does when a grammar references an undefined variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableError {
    Exit,
    #[default]
    Ignore,
    Backtrack,
}

impl VariableError {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::Ignore => "ignore",
            Self::Backtrack => "backtrack",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocateOptions {
    /// Dictionaries used in morphological mode.
    #[serde(deserialize_with = "null_as_empty")]
    pub morpho: Vec<String>,
    pub start_on_space: bool,
    pub char_by_char: bool,
    pub korean: bool,
    pub arabic_rules: Option<String>,
    pub negation_operator: NegationOperator,
    /// Stop after this many tokens have been explored.
    pub stop_token_count: Option<u64>,
    pub protect_dic_chars: bool,
    /// Grammar variables, `name -> value`.
    #[serde(deserialize_with = "null_as_empty")]
    pub variable: BTreeMap<String, String>,
    pub variable_error: VariableError,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConcordOptions {
    pub thai: bool,
}

/// YAML `null` (or a missing key) becomes the empty collection.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ProcessorConfig {
    /// Parse a YAML document and validate it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| UnitexError::config(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            UnitexError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| UnitexError::config(e.to_string()))
    }

    /// Reject values no stage could work with.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("resources.alphabet", &self.resources.alphabet),
            ("resources.alphabet-sorted", &self.resources.alphabet_sorted),
            ("resources.sentence", &self.resources.sentence),
            ("resources.replace", &self.resources.replace),
        ];
        for (key, value) in named {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(UnitexError::config(format!("'{key}' is empty")));
            }
        }
        if let Some(i) = self
            .resources
            .dictionaries
            .iter()
            .position(|d| d.trim().is_empty())
        {
            return Err(UnitexError::config(format!(
                "'resources.dictionaries' entry {i} is empty"
            )));
        }
        if self.tools.locate.stop_token_count == Some(0) {
            return Err(UnitexError::config(
                "'tools.locate.stop_token_count' must be positive",
            ));
        }
        if self.tools.locate.variable.keys().any(|k| k.trim().is_empty()) {
            return Err(UnitexError::config(
                "'tools.locate.variable' contains an empty variable name",
            ));
        }
        Ok(())
    }
}
