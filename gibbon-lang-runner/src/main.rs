mod repl;
mod runner;
mod session;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Script to run; starts the interactive prompt when absent.
    path: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    match cli.path {
        None => repl::start().unwrap(),
        Some(path) => {
            let source = std::fs::read_to_string(path).unwrap();
            runner::execute(&source);
        }
    }
}
