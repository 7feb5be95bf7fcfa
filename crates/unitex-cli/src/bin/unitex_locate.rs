// unitex-locate: List the matches of a grammar in one or more corpora.
//
// Output format (one line per match, tab separated):
//   INPUT    START    END    TEXT
//
// With --json, one JSON object per line:
//   {"input": "...", "start": "...", "end": "...", "match": "..."}
//
// Usage:
//   unitex-locate [-c CONFIG] [OPTIONS] GRAMMAR INPUT...
//
// Options:
//   -c, --config PATH      Processor configuration (YAML)
//   -m, --mode LETTERS     Preprocessing stages: s, r, t, l (default: srtl)
//   --tagged               Input is already segmented (skips s and r)
//   --shortest             Shortest matches instead of longest
//   --output-mode MODE     ignore, merge or replace (default: merge)
//   --json                 JSON lines output
//   --keep                 Keep the working files
//   -h, --help             Print help

use std::io::{self, Write};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, args) = unitex_cli::parse_config_path(&args);

    if unitex_cli::wants_help(&args) {
        println!("unitex-locate: List the matches of a grammar in one or more corpora.");
        println!();
        println!("Usage: unitex-locate [-c CONFIG] [OPTIONS] GRAMMAR INPUT...");
        println!();
        println!("Prints one line per match:");
        println!("  INPUT<TAB>START<TAB>END<TAB>TEXT");
        println!();
        println!("Options:");
        println!("  -c, --config PATH      Processor configuration (YAML)");
        println!("  -m, --mode LETTERS     Preprocessing stages: s, r, t, l (default: srtl)");
        println!("  --tagged               Input is already segmented (skips s and r)");
        println!("  --shortest             Shortest matches instead of longest");
        println!("  --output-mode MODE     ignore, merge or replace (default: merge)");
        println!("  --json                 Print one JSON object per match");
        println!("  --keep                 Keep the working files");
        println!("  -h, --help             Print this help");
        return;
    }

    let (corpus, args) =
        unitex_cli::parse_corpus_args(&args).unwrap_or_else(|e| unitex_cli::fatal(&e));
    let (match_mode, output_mode, args) =
        unitex_cli::parse_locate_args(&args).unwrap_or_else(|e| unitex_cli::fatal(&e));
    let json = unitex_cli::has_flag(&args, "--json");
    let args = unitex_cli::without_flags(&args, &["--json"]);

    let Some((grammar, inputs)) = args.split_first().filter(|(_, rest)| !rest.is_empty()) else {
        unitex_cli::fatal("expected GRAMMAR INPUT... (see --help)");
    };

    let mut processor =
        unitex_cli::load_processor(config_path.as_deref()).unwrap_or_else(|e| unitex_cli::fatal(&e));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut failed = false;

    // The corpora share the processor (and its persisted resources), one at a time.
    for input in inputs {
        let result = processor
            .open(input, corpus.stages, corpus.tagged)
            .and_then(|()| processor.iter_matches(grammar, match_mode, output_mode));
        match result {
            Ok(matches) => {
                for m in matches {
                    let (start, end) = m.offsets;
                    if json {
                        let line = serde_json::json!({
                            "input": input,
                            "start": start.to_string(),
                            "end": end.to_string(),
                            "match": m.text,
                        });
                        let _ = writeln!(out, "{line}");
                    } else {
                        let _ = writeln!(out, "{input}\t{start}\t{end}\t{}", m.text);
                    }
                }
            }
            Err(e) => {
                eprintln!("error: {input}: {e}");
                failed = true;
            }
        }
        processor.close(!corpus.keep, false);
    }

    let _ = out.flush();
    processor.free();
    if failed {
        std::process::exit(1);
    }
}
