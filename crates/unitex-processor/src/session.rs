// Corpus session: the paths derived from one opened input text.
//
// Given `dir/name.ext`:
//   normalized text    dir/name.snt
//   working directory  dir/name_snt
// and every artifact the tools produce lives in the working directory. With
// virtualization the text, the normalized text and the artifacts carry the
// virtual prefix; the working directory itself stays a disk path.

use std::path::Path;

use unitex_core::virtualize;

pub const INDEX_FILE: &str = "concord.ind";
pub const CONCORD_TEXT_FILE: &str = "concord.txt";
pub const TFST_FILE: &str = "text.tfst";
pub const TIND_FILE: &str = "text.tind";
pub const MERGE_TEMP_FILE: &str = "concord-merge-temp.txt";

/// State of one opened corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusSession {
    /// Path the caller opened.
    pub source: String,
    /// Text being processed (virtual copy of `source` when virtualized).
    pub txt: String,
    /// Normalized text.
    pub snt: String,
    /// Working directory, always a disk path.
    pub dir: String,
    pub virtualized: bool,
}

impl CorpusSession {
    /// Derive all session paths from the input path.
    pub fn derive(path: &str, virtualized: bool) -> Self {
        let input = Path::new(path);
        let parent = input.parent().unwrap_or_else(|| Path::new(""));
        let name = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let snt = parent.join(format!("{name}.snt")).display().to_string();
        let dir = parent.join(format!("{name}_snt")).display().to_string();

        if virtualized {
            Self {
                source: path.to_string(),
                txt: virtualize(path),
                snt: virtualize(&snt),
                dir,
                virtualized,
            }
        } else {
            Self {
                source: path.to_string(),
                txt: path.to_string(),
                snt,
                dir,
                virtualized,
            }
        }
    }

    /// Working directory as seen by the tools (prefixed when virtualized).
    pub fn work_dir(&self) -> String {
        if self.virtualized {
            virtualize(&self.dir)
        } else {
            self.dir.clone()
        }
    }

    /// Path of `name` inside the working directory.
    pub fn artifact(&self, name: &str) -> String {
        let path = Path::new(&self.dir).join(name).display().to_string();
        if self.virtualized {
            virtualize(&path)
        } else {
            path
        }
    }

    pub fn index_path(&self) -> String {
        self.artifact(INDEX_FILE)
    }

    pub fn concord_text_path(&self) -> String {
        self.artifact(CONCORD_TEXT_FILE)
    }

    pub fn tfst_path(&self) -> String {
        self.artifact(TFST_FILE)
    }

    pub fn tind_path(&self) -> String {
        self.artifact(TIND_FILE)
    }

    pub fn merge_temp_path(&self) -> String {
        self.artifact(MERGE_TEMP_FILE)
    }
}
