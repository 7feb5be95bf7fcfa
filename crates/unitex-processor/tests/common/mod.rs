// Scripted in-process engine for driving the processor without the native
// toolkit. Each operation is logged, and the artifacts a real tool would
// produce are written through the shared gateway (disk or virtual).

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use unitex_core::enums::ResourceKind;
use unitex_io::FileGateway;
use unitex_processor::ProcessorConfig;
use unitex_processor::config::{
    DicoOptions, Fst2TxtOptions, NormalizeOptions, ResourcesConfig, TokenizeOptions,
    Txt2TfstOptions,
};
use unitex_processor::engine::{
    ConcordFormat, ConcordRequest, Engine, Fst2TxtMode, LocateRequest,
};

pub const ALPHABET: &str = "Alphabet.txt";
pub const SENTENCE: &str = "Sentence.fst2";
pub const REPLACE: &str = "Replace.fst2";
pub const DICTIONARY: &str = "dela.bin";

/// Index produced by `locate` unless overridden.
pub const DEFAULT_INDEX: &str = "#M\n0 5 Hello\n6 11 World\n";

/// Body produced by a merging `concord` unless overridden.
pub const DEFAULT_MERGED: &str = "A & B\n";

#[derive(Debug)]
pub struct ScriptedEngine {
    gateway: FileGateway,
    virtual_paths: bool,
    calls: Mutex<Vec<String>>,
    alphabets: Mutex<Vec<String>>,
    failing: HashSet<String>,
    silent: HashSet<String>,
    index: String,
    merged: String,
    automaton: (Vec<u8>, Vec<u8>),
}

impl ScriptedEngine {
    pub fn new(gateway: &FileGateway) -> Self {
        Self {
            gateway: gateway.clone(),
            virtual_paths: true,
            calls: Mutex::new(Vec::new()),
            alphabets: Mutex::new(Vec::new()),
            failing: HashSet::new(),
            silent: HashSet::new(),
            index: DEFAULT_INDEX.to_string(),
            merged: DEFAULT_MERGED.to_string(),
            automaton: sample_automaton(),
        }
    }

    /// Make `op` report failure.
    pub fn failing(mut self, op: &str) -> Self {
        self.failing.insert(op.to_string());
        self
    }

    /// Make `op` report success without producing its artifact.
    pub fn silent(mut self, op: &str) -> Self {
        self.silent.insert(op.to_string());
        self
    }

    pub fn with_index(mut self, index: &str) -> Self {
        self.index = index.to_string();
        self
    }

    pub fn with_merged(mut self, merged: &str) -> Self {
        self.merged = merged.to_string();
        self
    }

    pub fn without_virtual_paths(mut self) -> Self {
        self.virtual_paths = false;
        self
    }

    /// Operations performed so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Alphabet argument of every call that took one.
    pub fn alphabets(&self) -> Vec<String> {
        self.alphabets.lock().unwrap().clone()
    }

    fn record(&self, op: &str) -> bool {
        self.calls.lock().unwrap().push(op.to_string());
        !self.failing.contains(op)
    }

    fn produces(&self, op: &str) -> bool {
        !self.silent.contains(op)
    }

    fn saw_alphabet(&self, alphabet: &str) {
        self.alphabets.lock().unwrap().push(alphabet.to_string());
    }

    fn write(&self, path: &str, data: &[u8]) {
        self.gateway.write_bytes(path, data, false).unwrap();
    }
}

/// Working directory of a normalized text: `dir/name.snt` -> `dir/name_snt`.
pub fn work_dir_of(snt: &str) -> String {
    let without_ext = Path::new(snt).with_extension("");
    format!("{}_snt", without_ext.display())
}

impl Engine for ScriptedEngine {
    fn supports_virtual_paths(&self) -> bool {
        self.virtual_paths
    }

    fn normalize(&self, text: &str, _options: &NormalizeOptions) -> bool {
        if !self.record("normalize") {
            return false;
        }
        let snt = Path::new(text).with_extension("snt").display().to_string();
        let content = self.gateway.read_bytes(text).unwrap_or_default();
        self.write(&snt, &content);
        true
    }

    fn fst2txt(
        &self,
        _grammar: &str,
        _text: &str,
        alphabet: &str,
        mode: Fst2TxtMode,
        _options: &Fst2TxtOptions,
    ) -> bool {
        self.saw_alphabet(alphabet);
        match mode {
            Fst2TxtMode::Merge => self.record("fst2txt:merge"),
            Fst2TxtMode::Replace => self.record("fst2txt:replace"),
        }
    }

    fn tokenize(&self, text: &str, alphabet: &str, _options: &TokenizeOptions) -> bool {
        self.saw_alphabet(alphabet);
        if !self.record("tokenize") {
            return false;
        }
        let dir = work_dir_of(text);
        self.write(&format!("{dir}/tokens.txt"), b"Hello\nWorld\n");
        self.write(&format!("{dir}/text.cod"), &[0, 0, 0, 0]);
        true
    }

    fn dico(
        &self,
        _dictionaries: &[String],
        _text: &str,
        alphabet: &str,
        _options: &DicoOptions,
    ) -> bool {
        self.saw_alphabet(alphabet);
        self.record("dico")
    }

    fn locate(&self, request: &LocateRequest<'_>) -> bool {
        self.saw_alphabet(request.alphabet);
        if !self.record("locate") {
            return false;
        }
        if self.produces("locate") {
            let index = format!("{}/concord.ind", work_dir_of(request.text));
            self.write(&index, self.index.as_bytes());
        }
        true
    }

    fn concord(&self, request: &ConcordRequest<'_>) -> bool {
        self.saw_alphabet(request.alphabet);
        let (op, target) = match request.format {
            ConcordFormat::Merge { output } => ("concord:merge", output.to_string()),
            ConcordFormat::Text => {
                let dir = Path::new(request.index)
                    .parent()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                ("concord:text", format!("{dir}/concord.txt"))
            }
        };
        if !self.record(op) {
            return false;
        }
        if self.produces(op) {
            self.write(&target, self.merged.as_bytes());
        }
        true
    }

    fn txt2tfst(&self, text: &str, alphabet: &str, _options: &Txt2TfstOptions) -> bool {
        self.saw_alphabet(alphabet);
        if !self.record("txt2tfst") {
            return false;
        }
        if self.produces("txt2tfst") {
            let dir = work_dir_of(text);
            self.write(&format!("{dir}/text.tfst"), &self.automaton.0);
            self.write(&format!("{dir}/text.tind"), &self.automaton.1);
        }
        true
    }

    fn load_persistent(&self, kind: ResourceKind, path: &str) -> Option<String> {
        let op = format!("load:{path}");
        self.record(&op).then(|| format!("persisted/{kind}/{path}"))
    }

    fn free_persistent(&self, _kind: ResourceKind, handle: &str) {
        self.record(&format!("free:{handle}"));
    }
}

/// Configuration with every resource set.
pub fn full_config(virtualization: bool, persistence: bool) -> ProcessorConfig {
    ProcessorConfig {
        persistence,
        virtualization,
        resources: ResourcesConfig {
            alphabet: Some(ALPHABET.into()),
            alphabet_sorted: Some("Alphabet_sort.txt".into()),
            sentence: Some(SENTENCE.into()),
            replace: Some(REPLACE.into()),
            dictionaries: vec![DICTIONARY.into()],
        },
        ..ProcessorConfig::default()
    }
}

/// Write `name` with `content` under `dir`, returning its path.
pub fn corpus(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path.display().to_string()
}

/// Two-sentence automaton and its 4-byte index.
pub fn sample_automaton() -> (Vec<u8>, Vec<u8>) {
    let sentences = [
        "$1\nHello world\n0/5 1/1 2/5\n0_0\n: 1 1 \n: 2 2 \nt \nf \n@<E>\n.\n@STD\n@{Hello,hello.N}\n@0.0.0-0.4.0\n.\n@STD\n@{world,.N}\n@2.0.0-2.4.0\n.\nf\n",
        "$2\nBye\n3/3\n3_12\n: 1 1 \nt \nf \n@<E>\n.\n@STD\n@{Bye,bye.INTJ}\n@3.0.0-3.2.0\n.\nf\n",
    ];
    let mut data = format!("{:010}\n", sentences.len()).into_bytes();
    let mut index = Vec::new();
    for s in sentences {
        index.extend_from_slice(&(data.len() as u32).to_le_bytes());
        data.extend_from_slice(s.as_bytes());
    }
    (data, index)
}
