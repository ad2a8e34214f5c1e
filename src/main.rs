use clap::Parser;
use pondera::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
