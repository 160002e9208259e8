// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;

use crate::adapter::StreamDecoder;
use crate::config::SimulatorConfig;
use crate::error::Error;
use crate::symbols::Symbol;
use crate::timeline::Timeline;

/// Result of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Chunk index to first packet.
    pub timeline: Timeline,
    /// Identifiers of the ingested symbols, in arrival order.
    pub order: Vec<String>,
    /// Size of the symbol set the run drew from.
    pub total: usize,
    /// Whether the decoder reported completion before the symbols ran out.
    pub completed: bool,
}

impl Run {
    /// Number of symbols fed to the decoder.
    pub fn ingested(&self) -> usize {
        self.order.len()
    }
}

/// Returns `symbols` in a uniformly random order.
///
/// With a seed, the order is a Fisher-Yates shuffle driven by `ChaCha8Rng::seed_from_u64`, so
/// the same seed always yields the same order.
pub fn shuffled(mut symbols: Vec<Symbol>, seed: Option<u64>) -> Vec<Symbol> {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    symbols.shuffle(&mut rng);
    symbols
}

/// Drives a decoder over a shuffled symbol set and records when each chunk first decodes.
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Runs the simulation.
    ///
    /// The symbols are shuffled once, then fed one at a time. After each symbol the decoded set
    /// is queried and every index absent from the previous snapshot is recorded with the
    /// current 1-based packet number. The run stops early when the decoder reports completion.
    ///
    /// # Arguments
    ///
    /// * `symbols` - The full symbol set, in file order.
    /// * `decoder` - A fresh decoder; its state after the run is not reusable.
    ///
    /// # Returns
    ///
    /// The run, or the first error raised by the decoder. Nothing recorded before an error is
    /// returned.
    pub fn run<D>(&self, symbols: Vec<Symbol>, decoder: &mut D) -> Result<Run, Error>
    where
        D: StreamDecoder + ?Sized,
    {
        let total = symbols.len();
        let symbols = shuffled(symbols, self.config.seed);

        let mut timeline = Timeline::new();
        let mut order = Vec::with_capacity(total);
        let mut previous = BTreeSet::new();
        let mut completed = false;

        for (packet, symbol) in (1..).zip(symbols) {
            decoder.ingest(&symbol.payload)?;
            order.push(symbol.id);

            let current = decoder.query_decoded()?;
            for &chunk in current.difference(&previous) {
                if timeline.record(chunk, packet) {
                    debug!("chunk {} first decoded at packet {}", chunk, packet);
                }
            }
            previous = current;

            if !self.config.pacing.is_zero() {
                std::thread::sleep(self.config.pacing);
            }

            if decoder.is_done()? {
                completed = true;
                break;
            }
        }

        info!(
            "ingested {} of {} symbols, {} chunks recovered, horizon {}",
            order.len(),
            total,
            timeline.recovered(),
            timeline.horizon()
        );
        Ok(Run {
            timeline,
            order,
            total,
            completed,
        })
    }
}
