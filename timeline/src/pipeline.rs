// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use oligo_timeline_decoder::DecoderFactory;
use std::path::PathBuf;

use crate::adapter::DecoderAdapter;
use crate::config::SimulatorConfig;
use crate::error::Error;
use crate::report::{self, RunSummary};
use crate::simulator::Simulator;
use crate::symbols;

/// Everything needed for one simulation from files to files.
#[derive(Debug, Clone)]
pub struct Request {
    pub fasta: PathBuf,
    pub config: PathBuf,
    pub out: PathBuf,
    pub summary: Option<PathBuf>,
    pub simulator: SimulatorConfig,
}

/// Loads the symbols, builds a decoder with `factory`, runs the simulation and writes the
/// outputs.
///
/// Inputs are checked before any decoder is constructed. Outputs are only written after the
/// run finished, so a failed run leaves no file behind.
pub fn execute<F: DecoderFactory + ?Sized>(
    request: &Request,
    factory: &F,
) -> Result<RunSummary, Error> {
    let symbols = symbols::load_fasta(&request.fasta)?;
    symbols::ensure_readable(&request.config)?;

    let mut adapter = DecoderAdapter::build(factory.create(&request.config)?)?;
    let run = Simulator::new(request.simulator.clone()).run(symbols, &mut adapter)?;

    report::write_csv_file(&run.timeline, &request.out)?;
    let summary = RunSummary::new(&run, request.simulator.seed, &request.out);
    if let Some(path) = &request.summary {
        summary.write_json(path)?;
    }
    Ok(summary)
}
