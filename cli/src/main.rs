// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

/// This is the main entry point for the Oligo Timeline CLI application.
///
/// The application shuffles the oligos of an encoded file, feeds them one by one to a decoder
/// and writes, for every chunk, the packet at which it first became decodable.
/// It uses the `clap` crate for command-line argument parsing and `stderrlog` for logging.
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use stderrlog::Timestamp;

use oligo_timeline::pipeline::{self, Request};
use oligo_timeline::report::{self, RunSummary};
use oligo_timeline::{Error, SimulatorConfig};
use oligo_timeline_decoder::PeelingFactory;

const LISTING_WIDTH: usize = 100;

#[derive(Parser)]
#[command(author, version, about = "Randomly sample oligos and record chunk recovery times", long_about = None)]
pub struct Cli {
    /// Input FASTA with oligos
    #[arg(long, env = "OLIGO_TIMELINE_FASTA")]
    fasta: PathBuf,

    /// .ini produced by the encoder
    #[arg(long, env = "OLIGO_TIMELINE_CONFIG")]
    config: PathBuf,

    /// CSV output path
    #[arg(long, default_value = "timeline.csv")]
    out: PathBuf,

    /// RNG seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Seconds to wait between oligos
    #[arg(long, default_value_t = 0.0)]
    sleep: f64,

    /// Also write a JSON summary of the run
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all logging
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, thiserror::Error)]
enum ArgError {
    #[error("Invalid --sleep value {0}: expected a finite, non-negative number of seconds")]
    InvalidSleep(f64),
}

impl Cli {
    fn pacing(&self) -> Result<Duration, ArgError> {
        Duration::try_from_secs_f64(self.sleep).map_err(|_| ArgError::InvalidSleep(self.sleep))
    }

    fn request(&self) -> Result<Request, ArgError> {
        Ok(Request {
            fasta: self.fasta.clone(),
            config: self.config.clone(),
            out: self.out.clone(),
            summary: self.summary.clone(),
            simulator: SimulatorConfig::new(self.seed, self.pacing()?),
        })
    }
}

/// Text printed once the pipeline finished.
///
/// A decoder lacking a mandatory capability is reported together with the callables it does
/// expose and still counts as a successful invocation; no output has been written in that case.
fn outcome(result: Result<RunSummary, Error>, out: &Path) -> Result<String, Error> {
    match result {
        Ok(summary) => Ok(report::summary_line(&summary.first_seen, out)),
        Err(ref err @ Error::CapabilityNotFound { ref candidates, .. }) => Ok(format!(
            "\n[!] {}\n\nDecoder exposes the following callables:\n{}\n\n\
             Add the matching name prefix to the decoder adapter's prefix lists.",
            err,
            report::callable_listing(candidates, LISTING_WIDTH)
        )),
        Err(err) => Err(err),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    stderrlog::new()
        .module(module_path!())
        .module("oligo_timeline")
        .module("oligo_timeline_decoder")
        .quiet(cli.quiet)
        .verbosity(usize::from(cli.verbose) + 1)
        .timestamp(Timestamp::Millisecond)
        .init()?;

    let request = cli.request()?;
    log::debug!("running with {:?}", request);

    let text = outcome(pipeline::execute(&request, &PeelingFactory), &request.out)?;
    println!("{}", text);
    Ok(())
}
