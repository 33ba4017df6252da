//! Terminal wavegrid search.
//!
//! Run: cargo run --bin wavegrid -- --size 60 --seed 7
//!
//! Set `RUST_LOG` to change the log level (default: `info` without the
//! renderer, `warn` with it).

use clap::Parser;
use wavegrid_demos::{Args, results_table, run};

fn main() {
    let args = Args::parse();
    let level = if args.renders() { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(reports) => print!("{}", results_table(&reports)),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
