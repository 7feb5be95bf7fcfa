// Shared enums: match/output modes, resource kinds, pipeline stages.

use std::fmt;
use std::str::FromStr;

use crate::error::UnitexError;

/// How `Locate` resolves overlapping matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchMode {
    /// Keep the longest match starting at each position.
    #[default]
    Longest,
    /// Keep the shortest match starting at each position.
    Shortest,
}

impl MatchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Longest => "longest",
            Self::Shortest => "shortest",
        }
    }
}

impl FromStr for MatchMode {
    type Err = UnitexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "longest" => Ok(Self::Longest),
            "shortest" => Ok(Self::Shortest),
            other => Err(UnitexError::config(format!(
                "invalid match mode '{other}' (expected 'longest' or 'shortest')"
            ))),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What `Locate` does with grammar outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputMode {
    /// Outputs are dropped; matches carry no text.
    Ignore,
    /// Outputs are inserted around the matched text.
    #[default]
    Merge,
    /// Outputs replace the matched text.
    Replace,
}

impl OutputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Merge => "merge",
            Self::Replace => "replace",
        }
    }
}

impl FromStr for OutputMode {
    type Err = UnitexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(Self::Ignore),
            "merge" => Ok(Self::Merge),
            "replace" => Ok(Self::Replace),
            other => Err(UnitexError::config(format!(
                "invalid output mode '{other}' (expected 'ignore', 'merge' or 'replace')"
            ))),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a resource that can be loaded once and kept in engine memory.
///
/// The kind selects the matching free operation at teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Alphabet,
    Grammar,
    Dictionary,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Alphabet => "alphabet",
            Self::Grammar => "grammar",
            Self::Dictionary => "dictionary",
        })
    }
}

/// A step of the processing pipeline, used to label stage failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Persistence,
    Normalize,
    Segment,
    Replace,
    Tokenize,
    Lexicalize,
    Locate,
    Concord,
    TextAutomaton,
    Tag,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Persistence => "resource loading",
            Self::Normalize => "normalization",
            Self::Segment => "sentence segmentation",
            Self::Replace => "replace grammar application",
            Self::Tokenize => "tokenize",
            Self::Lexicalize => "lexicalization",
            Self::Locate => "locate",
            Self::Concord => "concordance",
            Self::TextAutomaton => "text automaton construction",
            Self::Tag => "tagging",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Optional preprocessing stages run when a corpus is opened.
///
/// Normalization always runs and therefore has no flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Stages {
    /// Sentence segmentation with the sentence grammar.
    pub segment: bool,
    /// Application of the replace grammar.
    pub replace: bool,
    /// Tokenization.
    pub tokenize: bool,
    /// Dictionary application.
    pub lexicalize: bool,
}

impl Stages {
    /// Every optional stage enabled.
    pub const ALL: Stages = Stages {
        segment: true,
        replace: true,
        tokenize: true,
        lexicalize: true,
    };

    /// Only normalization.
    pub const NONE: Stages = Stages {
        segment: false,
        replace: false,
        tokenize: false,
        lexicalize: false,
    };

    /// Stages left after dropping those that do not apply to pre-tagged
    /// input (segmentation and replace).
    pub fn for_tagged_input(self) -> Self {
        Self {
            segment: false,
            replace: false,
            ..self
        }
    }
}

/// Parses the compact letter form used on the command line: `s` segment,
/// `r` replace, `t` tokenize, `l` lexicalize (e.g. `"stl"`).
impl FromStr for Stages {
    type Err = UnitexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut stages = Stages::NONE;
        for c in s.chars() {
            match c {
                's' => stages.segment = true,
                'r' => stages.replace = true,
                't' => stages.tokenize = true,
                'l' => stages.lexicalize = true,
                other => {
                    return Err(UnitexError::config(format!(
                        "unknown stage letter '{other}' (expected any of 's', 'r', 't', 'l')"
                    )));
                }
            }
        }
        Ok(stages)
    }
}

impl fmt::Display for Stages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (on, letter) in [
            (self.segment, 's'),
            (self.replace, 'r'),
            (self.tokenize, 't'),
            (self.lexicalize, 'l'),
        ] {
            if on {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}
