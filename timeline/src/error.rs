// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No callable on the decoder satisfies a mandatory role.
    #[error(
        "No callable matching {prefixes:?} with at least {min_positional} positional argument(s)"
    )]
    CapabilityNotFound {
        prefixes: Vec<String>,
        min_positional: usize,
        /// Every callable the decoder exposes, for diagnostics.
        candidates: Vec<String>,
    },

    #[error("Input {} not found or unreadable: {source}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed symbol input: {0}")]
    MalformedInput(String),

    /// A bound callable returned a value of the wrong shape.
    #[error("Decoder returned {found} from {callable}, expected {expected}")]
    UnexpectedValue {
        callable: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Decoder error: {0}")]
    Decoder(#[from] oligo_timeline_decoder::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Summary serialization error: {0}")]
    Summary(#[from] serde_json::Error),
}
