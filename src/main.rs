//! `influence`: stage a CSV-derived model and answer one hypothesis.
//!
//! ```text
//! influence --csv <path> --granularity <f64> \
//!     <influencing> <x0> <x1> <quality> <y0> <y1> <influenced>
//! ```

use std::path::PathBuf;
use std::process;

use failure::Error;
use influence::{Quality, Solver};
use log::info;
use structopt::StructOpt;

/// Stage a CSV-derived influence model and answer one hypothesis.
#[derive(StructOpt)]
#[structopt(name = "influence")]
struct Opt {
    /// Path to the two-column-per-influence CSV model.
    #[structopt(long = "csv", parse(from_os_str))]
    csv: PathBuf,

    /// Window width used by the sliding-window CSV-to-statement fit.
    #[structopt(long = "granularity", default_value = "1.0")]
    granularity: f64,

    /// Raise logging verbosity (repeatable: -v, -vv, -vvv).
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: u64,

    /// The influencing variable's name.
    influencing: String,
    /// Lower bound of the hypothesis x-range.
    x0: f64,
    /// Upper bound of the hypothesis x-range.
    x1: f64,
    /// One of "mono", "anti", "constant", "arbitrary".
    quality: String,
    /// Lower bound of the hypothesis y-range.
    y0: f64,
    /// Upper bound of the hypothesis y-range.
    y1: f64,
    /// The influenced variable's name.
    influenced: String,
}

fn main() {
    let opt = Opt::from_args();
    init_logging(opt.verbose);

    match run(&opt) {
        Ok(provable) => {
            println!("{}", if provable { "provable" } else { "not provable" });
        }
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: u64) {
    if std::env::var("RUST_LOG").is_err() {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        std::env::set_var("RUST_LOG", level);
    }
    env_logger::init();
}

fn run(opt: &Opt) -> Result<bool, Error> {
    let mut solver = Solver::new();

    for ((influencing, influenced), samples) in influence_csv::read_samples(&opt.csv)? {
        for (influencing, x, quality, y, influenced) in
            influence_csv::build_statements(&samples, &influencing, &influenced, opt.granularity)
        {
            let quality = Quality::parse(&quality)?;
            solver.add(&influencing, x, quality, y, &influenced)?;
        }
    }

    let quality = Quality::parse(&opt.quality)?;
    info!(
        "evaluating hypothesis {} [{}, {}] -{:?}-> {} [{}, {}]",
        opt.influencing, opt.x0, opt.x1, quality, opt.influenced, opt.y0, opt.y1
    );
    let provable = solver.solve(
        &opt.influencing,
        (opt.x0, opt.x1),
        quality,
        (opt.y0, opt.y1),
        &opt.influenced,
    )?;
    Ok(provable)
}
