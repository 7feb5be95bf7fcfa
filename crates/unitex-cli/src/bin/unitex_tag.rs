// unitex-tag: Tag a corpus with a grammar.
//
// Opens the corpus, runs the preprocessing stages, locates the grammar and
// merges its outputs back into the text, optionally wrapped in a TAGFILE
// XML envelope.
//
// Usage:
//   unitex-tag [-c CONFIG] [OPTIONS] GRAMMAR INPUT OUTPUT
//
// Options:
//   -c, --config PATH      Processor configuration (YAML)
//   -m, --mode LETTERS     Preprocessing stages: s, r, t, l (default: srtl)
//   --tagged               Input is already segmented (skips s and r)
//   --xml                  Write an XML document
//   --shortest             Shortest matches instead of longest
//   --output-mode MODE     ignore, merge or replace (default: merge)
//   --keep                 Keep the working files
//   -h, --help             Print help

use unitex_processor::TagOptions;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, args) = unitex_cli::parse_config_path(&args);

    if unitex_cli::wants_help(&args) {
        println!("unitex-tag: Tag a corpus with a grammar.");
        println!();
        println!("Usage: unitex-tag [-c CONFIG] [OPTIONS] GRAMMAR INPUT OUTPUT");
        println!();
        println!("Options:");
        println!("  -c, --config PATH      Processor configuration (YAML)");
        println!("  -m, --mode LETTERS     Preprocessing stages: s, r, t, l (default: srtl)");
        println!("  --tagged               Input is already segmented (skips s and r)");
        println!("  --xml                  Write an XML document");
        println!("  --shortest             Shortest matches instead of longest");
        println!("  --output-mode MODE     ignore, merge or replace (default: merge)");
        println!("  --keep                 Keep the working files");
        println!("  -h, --help             Print this help");
        return;
    }

    let (corpus, args) =
        unitex_cli::parse_corpus_args(&args).unwrap_or_else(|e| unitex_cli::fatal(&e));
    let (match_mode, output_mode, args) =
        unitex_cli::parse_locate_args(&args).unwrap_or_else(|e| unitex_cli::fatal(&e));
    let xml = unitex_cli::has_flag(&args, "--xml");
    let args = unitex_cli::without_flags(&args, &["--xml"]);

    let [grammar, input, output] = args.as_slice() else {
        unitex_cli::fatal("expected GRAMMAR INPUT OUTPUT (see --help)");
    };

    let mut processor =
        unitex_cli::load_processor(config_path.as_deref()).unwrap_or_else(|e| unitex_cli::fatal(&e));

    let options = TagOptions {
        xml,
        match_mode,
        output_mode,
    };
    let result = processor
        .open(input, corpus.stages, corpus.tagged)
        .and_then(|()| processor.tag(grammar, output, &options));
    processor.close(!corpus.keep, true);

    if let Err(e) = result {
        unitex_cli::fatal(&e.to_string());
    }
}
