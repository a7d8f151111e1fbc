use clap::Parser;
use crosstrader::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    crosstrader::logging::init();
    run(Cli::parse())
}
