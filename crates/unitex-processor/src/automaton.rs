// Text automaton view over `text.tfst` / `text.tind`.
//
// The `.tfst` file starts with a 10-digit sentence count followed by one
// block per sentence:
//
//   $<n>
//   <sentence text>
//   <token>/<length> <token>/<length> ...
//   <first token>_<first char>
//   : <tag> <dest> ...         one line per state, `t` instead of `:` if final
//   f
//   @<E>                       tag entries, each terminated by `.`
//   .
//   @STD
//   @{form,lemma.CODE}
//   @0.0.0-0.4.0
//   .
//   f
//
// The `.tind` file holds the byte offset of each `$<n>` line, so sentences
// are parsed only when asked for.

use unitex_core::{Result, UnitexError};
use unitex_io::{FileGateway, read_binary};

const ARTIFACT: &str = "text automaton";

fn malformed(reason: impl Into<String>) -> UnitexError {
    UnitexError::format(ARTIFACT, reason)
}

/// A token of the sentence: its id in the token list and its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan {
    pub id: u32,
    pub len: u32,
}

/// One automaton state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TfstState {
    pub is_final: bool,
    /// `(tag index, destination state)` pairs.
    pub transitions: Vec<(u32, u32)>,
}

/// A transition label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TfstTag {
    Epsilon,
    /// A lexical tag with the text span it covers (`a.b.c-d.e.f`).
    Token {
        content: String,
        bounds: Option<String>,
    },
    /// Any other entry, lines joined with `\n`.
    Other(String),
}

/// A parsed sentence automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TfstSentence {
    pub number: u32,
    pub text: String,
    pub tokens: Vec<TokenSpan>,
    /// Position of the sentence's first token: `(token, char)`.
    pub start: (u64, u64),
    pub states: Vec<TfstState>,
    pub tags: Vec<TfstTag>,
}

/// The text automaton of an opened corpus.
///
/// Holds the raw `.tfst` content; its files are no longer needed once
/// loaded.
#[derive(Debug, Clone)]
pub struct TextAutomaton {
    data: Vec<u8>,
    offsets: Vec<u64>,
}

impl TextAutomaton {
    /// Load both files through the gateway (disk or virtual).
    pub fn load(gateway: &FileGateway, tfst: &str, tind: &str) -> Result<Self> {
        let data = read_binary(gateway, tfst)?;
        let index = read_binary(gateway, tind)?;
        Self::from_parts(data, &index)
    }

    /// Build from raw `.tfst` and `.tind` contents.
    pub fn from_parts(data: Vec<u8>, index: &[u8]) -> Result<Self> {
        let count = header_count(&data)?;
        let offsets = decode_index(index, count)?;
        for (i, &off) in offsets.iter().enumerate() {
            let at = usize::try_from(off).ok().and_then(|o| data.get(o));
            if at != Some(&b'$') {
                return Err(malformed(format!(
                    "index entry {i} (offset {off}) does not point at a sentence"
                )));
            }
        }
        if let Some(i) = offsets.windows(2).position(|w| w[0] >= w[1]) {
            return Err(malformed(format!(
                "index entries {i} and {} are not in increasing order",
                i + 1
            )));
        }
        Ok(Self { data, offsets })
    }

    /// Number of sentences.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Parse sentence `i` (0-based).
    pub fn sentence(&self, i: usize) -> Result<TfstSentence> {
        let start = *self
            .offsets
            .get(i)
            .ok_or_else(|| malformed(format!("no sentence {i}; automaton has {}", self.len())))?
            as usize;
        let end = self
            .offsets
            .get(i + 1)
            .map_or(self.data.len(), |&o| o as usize);
        let bytes = self
            .data
            .get(start..end)
            .ok_or_else(|| malformed(format!("sentence {i} has an invalid byte range")))?;
        let block = std::str::from_utf8(bytes)
            .map_err(|e| malformed(format!("sentence {i} is not valid UTF-8: {e}")))?;
        parse_sentence(block)
    }

    /// All sentences in order.
    pub fn sentences(&self) -> impl Iterator<Item = Result<TfstSentence>> + '_ {
        (0..self.len()).map(|i| self.sentence(i))
    }
}

fn header_count(data: &[u8]) -> Result<usize> {
    let data = data.strip_prefix("\u{FEFF}".as_bytes()).unwrap_or(data);
    let line_end = data
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| malformed("missing header line"))?;
    std::str::from_utf8(&data[..line_end])
        .ok()
        .and_then(|s| s.trim().parse::<usize>().ok())
        .ok_or_else(|| malformed("header is not a sentence count"))
}

/// Offsets are little-endian, 8 or 4 bytes wide depending on the platform
/// that produced the file; the width is inferred from the file length.
fn decode_index(index: &[u8], count: usize) -> Result<Vec<u64>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    if index.len() == count * 8 {
        return Ok(index
            .chunks_exact(8)
            .map(|c| u64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
            .collect());
    }
    if index.len() == count * 4 {
        return Ok(index
            .chunks_exact(4)
            .map(|c| u64::from(u32::from_le_bytes([c[0], c[1], c[2], c[3]])))
            .collect());
    }
    Err(malformed(format!(
        "index has {} bytes for {count} sentences",
        index.len()
    )))
}

fn parse_u32(s: &str, what: &str) -> Result<u32> {
    s.parse()
        .map_err(|_| malformed(format!("invalid {what} '{s}'")))
}

fn parse_sentence(block: &str) -> Result<TfstSentence> {
    let mut lines = block.lines();
    let mut next = |what: &str| {
        lines
            .next()
            .ok_or_else(|| malformed(format!("sentence ends before {what}")))
    };

    let number = next("number")?;
    let number = number
        .strip_prefix('$')
        .ok_or_else(|| malformed(format!("expected '$<n>', found '{number}'")))
        .and_then(|n| parse_u32(n.trim(), "sentence number"))?;
    let text = next("text")?.to_string();

    let tokens = next("token list")?
        .split_whitespace()
        .map(|pair| {
            let (id, len) = pair
                .split_once('/')
                .ok_or_else(|| malformed(format!("invalid token '{pair}'")))?;
            Ok(TokenSpan {
                id: parse_u32(id, "token id")?,
                len: parse_u32(len, "token length")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let start_line = next("start offsets")?;
    let start = start_line
        .trim()
        .split_once('_')
        .and_then(|(t, c)| Some((t.parse().ok()?, c.parse().ok()?)))
        .ok_or_else(|| malformed(format!("invalid start offsets '{start_line}'")))?;

    let mut states = Vec::new();
    loop {
        let line = next("end of states")?;
        let mut fields = line.split_whitespace();
        let is_final = match fields.next() {
            Some("f") => break,
            Some(":") => false,
            Some("t") => true,
            _ => return Err(malformed(format!("invalid state line '{line}'"))),
        };
        let numbers = fields
            .map(|f| parse_u32(f, "transition"))
            .collect::<Result<Vec<_>>>()?;
        if numbers.len() % 2 != 0 {
            return Err(malformed(format!("odd transition list '{line}'")));
        }
        let transitions = numbers.chunks_exact(2).map(|p| (p[0], p[1])).collect();
        states.push(TfstState {
            is_final,
            transitions,
        });
    }

    let mut tags = Vec::new();
    let mut entry: Vec<&str> = Vec::new();
    loop {
        let line = next("end of tags")?;
        if line.trim_end() == "f" && entry.is_empty() {
            break;
        }
        if line == "." {
            tags.push(build_tag(&entry)?);
            entry.clear();
            continue;
        }
        let content = line
            .strip_prefix('@')
            .ok_or_else(|| malformed(format!("invalid tag line '{line}'")))?;
        entry.push(content);
    }

    Ok(TfstSentence {
        number,
        text,
        tokens,
        start,
        states,
        tags,
    })
}

fn build_tag(lines: &[&str]) -> Result<TfstTag> {
    match lines {
        ["<E>"] => Ok(TfstTag::Epsilon),
        ["STD", content, rest @ ..] => Ok(TfstTag::Token {
            content: content.to_string(),
            bounds: rest.first().map(|b| b.to_string()),
        }),
        [] => Err(malformed("empty tag entry")),
        other => Ok(TfstTag::Other(other.join("\n"))),
    }
}
