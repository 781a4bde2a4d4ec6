//! worknight main entrypoint.

use clap::Parser;
use std::error::Error;
use worknight::cli::parser::Cli;
use worknight::run;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        if cli.dev.show_traceback {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
        }
        std::process::exit(1);
    }
}
