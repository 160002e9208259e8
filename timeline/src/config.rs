use std::time::Duration;

/// Configuration for the simulator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimulatorConfig {
    /// Seed of the shuffle. `None` shuffles with entropy from the operating system.
    pub seed: Option<u64>,
    /// Pause between two ingested symbols. Has no effect on the result; it only spaces out
    /// arrivals to mimic real-time reception.
    /// Default is no pause.
    pub pacing: Duration,
}

impl SimulatorConfig {
    /// Creates a new `SimulatorConfig`.
    ///
    /// # Arguments
    ///
    /// * `seed` - Seed of the shuffle, if the order must be reproducible.
    /// * `pacing` - Pause between two ingested symbols.
    pub fn new(seed: Option<u64>, pacing: Duration) -> Self {
        Self { seed, pacing }
    }

    /// Creates a seeded config without pacing.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed), Duration::ZERO)
    }
}
