mod args;
mod sim;

use clap::Parser;
use log::{debug, warn};

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    debug!("args: {:?}", args);

    if let Err(e) = sim::run(&args) {
        warn!("Error occured {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
