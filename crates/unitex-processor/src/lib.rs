//! Pipeline orchestrator for the Unitex linguistic toolkit.
//!
//! [`UnitexProcessor`] opens one corpus at a time, runs the preprocessing
//! stages (normalize, segment, replace, tokenize, lexicalize) through an
//! [`Engine`], and exposes match iteration, tagging and the text automaton.
//!
//! - [`config`] -- YAML configuration and per-tool option bundles
//! - [`engine`] -- the native toolkit interface and its command-line backend
//! - [`resources`] -- persisted resource handles
//! - [`session`] -- derived artifact paths of an opened corpus
//! - [`index`] -- `concord.ind` parsing
//! - [`automaton`] -- `text.tfst` / `text.tind` view
//! - [`xml`] -- tagged XML output
//! - [`logging`] -- tracing subscriber setup

pub mod automaton;
pub mod config;
pub mod engine;
pub mod index;
pub mod logging;
pub mod processor;
pub mod resources;
pub mod session;
pub mod xml;

pub use automaton::TextAutomaton;
pub use config::ProcessorConfig;
pub use engine::{CommandEngine, Engine};
pub use index::Matches;
pub use processor::{TagOptions, UnitexProcessor};
