//! Command-line interface for pegc
//!
//! Usage:
//!   pegc `<input>` [`<output>`]  - Compile the grammar blocks in `<input>`
//!
//! `-` as the input reads standard input; a missing or `-` output writes
//! standard output. Set `PEGC_LOG=debug` for debug logging on stderr.

use clap::{Arg, Command};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

fn main() {
    let matches = Command::new("pegc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile PEG grammar blocks embedded in Rust source into packrat parsers")
        .arg(
            Arg::new("input")
                .help("Source file containing grammar blocks, or - for stdin")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .help("Where to write the generated source, or - for stdout")
                .index(2),
        )
        .get_matches();

    init_logging();

    let Some(input) = matches.get_one::<String>("input") else {
        eprintln!("Error: missing input path");
        std::process::exit(2);
    };
    let output = matches.get_one::<String>("output").map(String::as_str);

    match pegc::compile_file(input, output) {
        Ok(_warnings) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    let level = match std::env::var("PEGC_LOG").as_deref() {
        Ok("debug") => LevelFilter::Debug,
        Ok("trace") => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    };
    let _ = TermLogger::init(
        level,
        ConfigBuilder::new().set_time_format_custom(&[]).build(),
        TerminalMode::Stderr,
        ColorChoice::Never,
    );
}
