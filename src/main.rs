mod calendar;
mod cli;
mod config;
mod deliver;
mod digest;
mod logging;
mod model;
mod recipient;
mod reconcile;
mod storage;

use std::process;

use clap::Parser;

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = cli::run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
