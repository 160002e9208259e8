// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::PathBuf;

/// Error type for decoder surface operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The surface has no callable with the given name.
    #[error("Decoder exposes no callable named {0}")]
    NoSuchMethod(String),

    /// A callable was invoked with more positional arguments than it declares.
    #[error("Callable {name} takes at most {declared} positional arguments, got {given}")]
    ArityMismatch {
        name: String,
        declared: usize,
        given: usize,
    },

    /// The encoded symbol could not be interpreted by the engine.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// The configuration was readable but unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The configuration file could not be read.
    #[error("Configuration file {} could not be read: {source}", path.display())]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A failure raised inside the decoding engine.
    #[error("Decoder engine error: {0}")]
    Engine(#[from] anyhow::Error),
}
