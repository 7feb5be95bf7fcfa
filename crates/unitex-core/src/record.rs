// Match records read back from a locate index.

use std::fmt;
use std::str::FromStr;

use crate::error::UnitexError;

/// A position in the tokenized text as written in a concordance index.
///
/// Indexes use either a bare token number (`12`) or the detailed
/// `token.char.letter` form (`12.0.3`) when the grammar matched inside a
/// token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Offset {
    /// Token index.
    pub token: u64,
    /// Character and logical letter inside the token, when present.
    pub within: Option<(u32, u32)>,
}

impl Offset {
    /// An offset at a token boundary.
    pub const fn token(token: u64) -> Self {
        Self {
            token,
            within: None,
        }
    }
}

impl FromStr for Offset {
    type Err = UnitexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || UnitexError::format("index offset", format!("'{s}'"));
        let mut parts = s.split('.');
        let token = parts
            .next()
            .and_then(|p| p.parse::<u64>().ok())
            .ok_or_else(bad)?;
        match (parts.next(), parts.next(), parts.next()) {
            (None, _, _) => Ok(Self::token(token)),
            (Some(c), Some(l), None) => {
                let c = c.parse::<u32>().map_err(|_| bad())?;
                let l = l.parse::<u32>().map_err(|_| bad())?;
                Ok(Self {
                    token,
                    within: Some((c, l)),
                })
            }
            _ => Err(bad()),
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.within {
            None => write!(f, "{}", self.token),
            Some((c, l)) => write!(f, "{}.{}.{}", self.token, c, l),
        }
    }
}

/// One grammar match: its offsets and, unless outputs were ignored, the
/// matched text with grammar outputs applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// `(start, end)` offsets of the match.
    pub offsets: (Offset, Offset),
    /// Matched text; empty when outputs are ignored or the index line
    /// carries none.
    pub text: String,
}

impl MatchRecord {
    pub fn new(start: Offset, end: Offset, text: impl Into<String>) -> Self {
        Self {
            offsets: (start, end),
            text: text.into(),
        }
    }

    pub fn start(&self) -> Offset {
        self.offsets.0
    }

    pub fn end(&self) -> Offset {
        self.offsets.1
    }
}
