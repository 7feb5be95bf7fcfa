// unitex-cli: shared utilities for CLI tools.

use std::path::PathBuf;
use std::process;

use unitex_core::enums::{MatchMode, OutputMode, Stages};
use unitex_io::FileGateway;
use unitex_processor::{CommandEngine, ProcessorConfig, UnitexProcessor};

/// Configuration file looked up in the current directory.
const DEFAULT_CONFIG: &str = "unitex.yaml";

/// Environment variable naming the configuration file.
const CONFIG_ENV: &str = "UNITEX_CONFIG";

/// Stages run when `--mode` is absent.
const DEFAULT_MODE: &str = "srtl";

/// Find and load the processor configuration.
///
/// Search order:
/// 1. `config_path` argument (if provided)
/// 2. `UNITEX_CONFIG` environment variable
/// 3. `unitex.yaml` in the current directory
pub fn load_config(config_path: Option<&str>) -> Result<ProcessorConfig, String> {
    let candidates = build_search_paths(config_path);

    for path in &candidates {
        if path.is_file() {
            return ProcessorConfig::from_path(path)
                .map_err(|e| format!("failed to load {}: {e}", path.display()));
        }
    }

    Err(format!(
        "could not find a configuration file in any of:\n{}",
        candidates
            .iter()
            .map(|p| format!("  - {}", p.display()))
            .collect::<Vec<_>>()
            .join("\n")
    ))
}

/// Build the list of configuration files to try, in priority order.
fn build_search_paths(config_path: Option<&str>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(p) = config_path {
        paths.push(PathBuf::from(p));
    }
    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        paths.push(PathBuf::from(env_path));
    }
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(DEFAULT_CONFIG));
    }

    paths
}

/// Create a processor backed by `UnitexToolLogger` (see `UNITEX_TOOL`).
pub fn load_processor(config_path: Option<&str>) -> Result<UnitexProcessor<CommandEngine>, String> {
    let config = load_config(config_path)?;
    UnitexProcessor::new(config, CommandEngine::from_env(), FileGateway::new())
        .map_err(|e| format!("failed to create processor: {e}"))
}

/// Remove `--name=VALUE` / `--name VALUE` (or the short form) from `args`.
///
/// Returns `(value, remaining_args)`; the last occurrence wins.
pub fn take_value(
    args: &[String],
    long: &str,
    short: Option<&str>,
) -> Result<(Option<String>, Vec<String>), String> {
    let prefix = format!("{long}=");
    let mut value = None;
    let mut remaining = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if let Some(val) = arg.strip_prefix(&prefix) {
            value = Some(val.to_string());
        } else if arg == long || Some(arg.as_str()) == short {
            let val = iter
                .next()
                .ok_or_else(|| format!("{arg} requires a value"))?;
            value = Some(val.clone());
        } else {
            remaining.push(arg.clone());
        }
    }

    Ok((value, remaining))
}

/// Parse a `--config=PATH` or `-c PATH` argument from command line args.
///
/// Returns `(config_path, remaining_args)`.
pub fn parse_config_path(args: &[String]) -> (Option<String>, Vec<String>) {
    take_value(args, "--config", Some("-c")).unwrap_or_else(|e| fatal(&e))
}

/// How a tool opens and closes its corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusArgs {
    pub stages: Stages,
    pub tagged: bool,
    /// Keep the working files after closing.
    pub keep: bool,
}

/// Parse `--mode LETTERS`, `--tagged` and `--keep`.
///
/// Returns the parsed options and the remaining args.
pub fn parse_corpus_args(args: &[String]) -> Result<(CorpusArgs, Vec<String>), String> {
    let (mode, args) = take_value(args, "--mode", Some("-m"))?;
    let stages: Stages = mode
        .as_deref()
        .unwrap_or(DEFAULT_MODE)
        .parse()
        .map_err(|e| format!("{e}"))?;
    let tagged = has_flag(&args, "--tagged");
    let keep = has_flag(&args, "--keep");
    let rest = without_flags(&args, &["--tagged", "--keep"]);
    Ok((
        CorpusArgs {
            stages,
            tagged,
            keep,
        },
        rest,
    ))
}

/// Parse `--shortest` and `--output-mode MODE`.
pub fn parse_locate_args(args: &[String]) -> Result<(MatchMode, OutputMode, Vec<String>), String> {
    let (output_mode, args) = take_value(args, "--output-mode", None)?;
    let output_mode = match output_mode {
        Some(mode) => mode.parse().map_err(|e| format!("{e}"))?,
        None => OutputMode::default(),
    };
    let match_mode = if has_flag(&args, "--shortest") {
        MatchMode::Shortest
    } else {
        MatchMode::default()
    };
    Ok((match_mode, output_mode, without_flags(&args, &["--shortest"])))
}

pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// `args` without any of `flags`.
pub fn without_flags(args: &[String], flags: &[&str]) -> Vec<String> {
    args.iter()
        .filter(|a| !flags.contains(&a.as_str()))
        .cloned()
        .collect()
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}
