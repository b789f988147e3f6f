#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

extern crate tpch_q5;
use tpch_q5::utils::cli::Opt;
use tpch_q5::utils::query::run_query;

use std::process;
use structopt::StructOpt;

fn main() {
    env_logger::Builder::from_default_env()
        .format_timestamp_micros()
        .init();

    // Missing or malformed flags exit here with clap's usage error.
    let opt = Opt::from_args();
    let config = match opt.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };

    match run_query(&config) {
        Ok(stats) => {
            println!(
                "TPC-H Q5 matched {} of {} line items with {} workers",
                stats.execution.rows.matched, stats.execution.rows.rows, stats.execution.workers
            );
        }
        Err(e) => {
            eprintln!("{}", e);
            process::exit(e.stage.exit_code());
        }
    }
}
