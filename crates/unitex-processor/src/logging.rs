// Tracing subscriber setup driven by the `verbose`, `debug` and `log`
// configuration keys.
//
// Priority (highest to lowest):
// 1. `UNITEX_LOG` env var (per-target directives, e.g. `unitex_processor=debug`)
// 2. `RUST_LOG` env var
// 3. configuration flags (`debug` -> DEBUG, `verbose` -> INFO)
// 4. default level: WARN

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Level implied by the configuration flags alone.
pub fn default_level(verbose: bool, debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else if verbose {
        Level::INFO
    } else {
        Level::WARN
    }
}

fn build_env_filter(level: Level) -> EnvFilter {
    if let Ok(directives) = std::env::var("UNITEX_LOG")
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return filter;
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(level.as_str())
}

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed, in which case the
/// existing one is kept. Processors are routinely created more than once per
/// process, so a second call must not fail.
pub fn init_logging(verbose: bool, debug: bool, log: Option<&Path>) -> bool {
    let filter = build_env_filter(default_level(verbose, debug));

    if let Some(path) = log {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                return tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true)
                    .try_init()
                    .is_ok();
            }
            Err(e) => {
                let installed = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .try_init()
                    .is_ok();
                tracing::warn!("cannot open log file {}: {e}; logging to stderr", path.display());
                return installed;
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init()
        .is_ok()
}
