// Concordance index parsing.
//
// The first line of a `concord.ind` file is a header and is skipped. Every
// other non-blank line reads `<start> <end>[ <text>]`, the text running to
// the end of the line.

use unitex_core::enums::OutputMode;
use unitex_core::record::{MatchRecord, Offset};
use unitex_core::{Result, UnitexError};

/// Parse one index body line.
///
/// With [`OutputMode::Ignore`] the text is always empty, whatever the line
/// carries.
pub fn parse_index_line(line: &str, output_mode: OutputMode) -> Result<MatchRecord> {
    let malformed = || UnitexError::format("index line", format!("'{line}'"));

    let (start, rest) = line.split_once(' ').ok_or_else(malformed)?;
    let (end, text) = match rest.split_once(' ') {
        Some((end, text)) => (end, text),
        None => (rest, ""),
    };
    if start.is_empty() || end.is_empty() {
        return Err(malformed());
    }

    let start: Offset = start.parse()?;
    let end: Offset = end.parse()?;
    let text = match output_mode {
        OutputMode::Ignore => "",
        OutputMode::Merge | OutputMode::Replace => text,
    };
    Ok(MatchRecord::new(start, end, text))
}

/// Parse a whole index file content.
pub fn parse_index(content: &str, output_mode: OutputMode) -> Result<Vec<MatchRecord>> {
    content
        .split('\n')
        .skip(1)
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(|line| parse_index_line(line, output_mode))
        .collect()
}

/// Single-pass sequence of matches, in index order.
///
/// The whole index is read before the first item is produced; iterating
/// again requires locating again.
#[derive(Debug)]
pub struct Matches {
    inner: std::vec::IntoIter<MatchRecord>,
}

impl Matches {
    pub(crate) fn new(records: Vec<MatchRecord>) -> Self {
        Self {
            inner: records.into_iter(),
        }
    }
}

impl Iterator for Matches {
    type Item = MatchRecord;

    fn next(&mut self) -> Option<MatchRecord> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Matches {}
