// unitex-tfst: Build the text automaton of a corpus and print it.
//
// Default output, one line per sentence:
//   N: TEXT (S states, T tags)
//
// With --sentence N, the states and tags of sentence N (1-based):
//   state 0: 1->1 2->3
//   state 3 (final):
//   tag 1: {Hello,hello.N} @ 0.0.0-0.4.0
//
// Usage:
//   unitex-tfst [-c CONFIG] [OPTIONS] INPUT
//
// Options:
//   -c, --config PATH      Processor configuration (YAML)
//   -m, --mode LETTERS     Preprocessing stages: s, r, t, l (default: srtl)
//   --tagged               Input is already segmented (skips s and r)
//   --sentence N           Print the automaton of sentence N
//   --keep                 Keep the working files
//   -h, --help             Print help

use std::io::{self, Write};

use unitex_processor::TextAutomaton;
use unitex_processor::automaton::{TfstSentence, TfstTag};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, args) = unitex_cli::parse_config_path(&args);

    if unitex_cli::wants_help(&args) {
        println!("unitex-tfst: Build the text automaton of a corpus and print it.");
        println!();
        println!("Usage: unitex-tfst [-c CONFIG] [OPTIONS] INPUT");
        println!();
        println!("Options:");
        println!("  -c, --config PATH      Processor configuration (YAML)");
        println!("  -m, --mode LETTERS     Preprocessing stages: s, r, t, l (default: srtl)");
        println!("  --tagged               Input is already segmented (skips s and r)");
        println!("  --sentence N           Print the automaton of sentence N (1-based)");
        println!("  --keep                 Keep the working files");
        println!("  -h, --help             Print this help");
        return;
    }

    let (corpus, args) =
        unitex_cli::parse_corpus_args(&args).unwrap_or_else(|e| unitex_cli::fatal(&e));
    let (sentence, args) = unitex_cli::take_value(&args, "--sentence", None)
        .unwrap_or_else(|e| unitex_cli::fatal(&e));
    let sentence = sentence.map(|n| match n.parse::<usize>() {
        Ok(n) if n > 0 => n - 1,
        _ => unitex_cli::fatal(&format!("invalid sentence number '{n}'")),
    });

    let [input] = args.as_slice() else {
        unitex_cli::fatal("expected INPUT (see --help)");
    };

    let mut processor =
        unitex_cli::load_processor(config_path.as_deref()).unwrap_or_else(|e| unitex_cli::fatal(&e));

    // The automaton must be read before close removes text.tfst.
    let result = processor
        .open(input, corpus.stages, corpus.tagged)
        .and_then(|()| processor.to_automaton());
    processor.close(!corpus.keep, true);
    let fst = result.unwrap_or_else(|e| unitex_cli::fatal(&e.to_string()));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let printed = match sentence {
        Some(i) => print_sentence(&mut out, &fst, i),
        None => print_summary(&mut out, &fst),
    };
    if let Err(e) = printed {
        unitex_cli::fatal(&e);
    }
}

fn print_summary(out: &mut impl Write, fst: &TextAutomaton) -> Result<(), String> {
    for sentence in fst.sentences() {
        let s = sentence.map_err(|e| e.to_string())?;
        let _ = writeln!(
            out,
            "{}: {} ({} states, {} tags)",
            s.number,
            s.text,
            s.states.len(),
            s.tags.len()
        );
    }
    Ok(())
}

fn print_sentence(out: &mut impl Write, fst: &TextAutomaton, i: usize) -> Result<(), String> {
    let s: TfstSentence = fst.sentence(i).map_err(|e| e.to_string())?;
    let _ = writeln!(out, "{}: {}", s.number, s.text);
    for (n, state) in s.states.iter().enumerate() {
        let transitions: Vec<String> = state
            .transitions
            .iter()
            .map(|(tag, dest)| format!("{tag}->{dest}"))
            .collect();
        let fin = if state.is_final { " (final)" } else { "" };
        let _ = writeln!(out, "state {n}{fin}: {}", transitions.join(" "));
    }
    for (n, tag) in s.tags.iter().enumerate() {
        let _ = match tag {
            TfstTag::Epsilon => writeln!(out, "tag {n}: <E>"),
            TfstTag::Token {
                content,
                bounds: Some(bounds),
            } => writeln!(out, "tag {n}: {content} @ {bounds}"),
            TfstTag::Token {
                content,
                bounds: None,
            } => writeln!(out, "tag {n}: {content}"),
            TfstTag::Other(raw) => writeln!(out, "tag {n}: {}", raw.replace('\n', " | ")),
        };
    }
    Ok(())
}
