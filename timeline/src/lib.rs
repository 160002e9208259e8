// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod adapter;
pub use adapter::{DecoderAdapter, StreamDecoder};
pub mod config;
pub use config::SimulatorConfig;
pub mod error;
pub use error::Error;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod simulator;
pub use simulator::{Run, Simulator};
pub mod symbols;
pub use symbols::Symbol;
pub mod timeline;
pub use timeline::Timeline;
