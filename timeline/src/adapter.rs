// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use bytes::Bytes;
use log::{debug, warn};
use oligo_timeline_decoder::{Surface, Value};
use std::collections::BTreeSet;

use crate::error::Error;
use crate::resolver::{self, Binding};

/// Name prefixes of callables that accept one new coded symbol.
pub const INGEST_PREFIXES: &[&str] = &[
    "add_packet",
    "add_oligo",
    "add_read",
    "input_new_packet",
    "input_",
    "push_",
    "ingest_",
    "feed_",
    "receive_",
    "process_",
];

/// Name prefixes of callables that return the currently decoded chunk indices.
pub const DECODED_PREFIXES: &[&str] = &[
    "get_decoded_chunk_indices",
    "get_currently_decoded_chunk_indices",
    "get_decoded_chunks",
    "decoded_chunks",
];

/// Attribute read when no decoded-set callable exists.
pub const DECODED_ATTRIBUTE: &str = "decoded_chunks";

/// Name prefixes of callables that report full completion.
pub const COMPLETION_PREFIXES: &[&str] = &["is_decoding_complete", "isComplete", "is_decoded"];

/// The three operations the simulator drives a decoder with.
pub trait StreamDecoder {
    /// Feeds one encoded symbol.
    fn ingest(&mut self, payload: &Bytes) -> Result<(), Error>;

    /// Returns the chunk indices decoded so far.
    fn query_decoded(&mut self) -> Result<BTreeSet<usize>, Error>;

    /// Reports whether decoding is finished.
    fn is_done(&mut self) -> Result<bool, Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DecodedQuery {
    Callable(Binding),
    Attribute(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Completion {
    Callable(Binding),
    Never,
}

/// A decoder surface with its ingest, query and completion roles resolved.
///
/// Each role is resolved once in [`DecoderAdapter::build`]; the adapter owns the decoder for
/// the rest of its life and is not meant to be reused across runs.
pub struct DecoderAdapter {
    surface: Box<dyn Surface>,
    ingest: Binding,
    decoded: DecodedQuery,
    completion: Completion,
}

impl DecoderAdapter {
    /// Resolves the roles on `surface`.
    ///
    /// Fails with `Error::CapabilityNotFound` when no ingest callable exists, or when neither a
    /// decoded-set callable nor the `decoded_chunks` attribute exists. A missing completion
    /// callable is not an error: the adapter then never reports completion.
    pub fn build(surface: Box<dyn Surface>) -> Result<Self, Error> {
        let ingest = resolver::resolve(surface.as_ref(), INGEST_PREFIXES, 1)?;
        debug!("ingest bound to {}", ingest.name());

        let decoded = match resolver::resolve(surface.as_ref(), DECODED_PREFIXES, 0) {
            Ok(binding) => {
                debug!("decoded-set query bound to {}", binding.name());
                DecodedQuery::Callable(binding)
            }
            Err(_) if surface.attribute(DECODED_ATTRIBUTE).is_some() => {
                debug!("decoded-set query falls back to attribute {}", DECODED_ATTRIBUTE);
                DecodedQuery::Attribute(DECODED_ATTRIBUTE)
            }
            Err(err) => return Err(err),
        };

        let completion = match resolver::resolve(surface.as_ref(), COMPLETION_PREFIXES, 0) {
            Ok(binding) => {
                debug!("completion check bound to {}", binding.name());
                Completion::Callable(binding)
            }
            Err(_) => {
                warn!("decoder has no completion check, all symbols will be ingested");
                Completion::Never
            }
        };

        Ok(Self {
            surface,
            ingest,
            decoded,
            completion,
        })
    }

    pub fn ingest_name(&self) -> &str {
        self.ingest.name()
    }

    /// Name of the decoded-set callable or attribute.
    pub fn decoded_name(&self) -> &str {
        match &self.decoded {
            DecodedQuery::Callable(binding) => binding.name(),
            DecodedQuery::Attribute(name) => name,
        }
    }

    /// Name of the completion callable, if one was found.
    pub fn completion_name(&self) -> Option<&str> {
        match &self.completion {
            Completion::Callable(binding) => Some(binding.name()),
            Completion::Never => None,
        }
    }
}

impl StreamDecoder for DecoderAdapter {
    fn ingest(&mut self, payload: &Bytes) -> Result<(), Error> {
        self.ingest
            .invoke(self.surface.as_mut(), std::slice::from_ref(payload))?;
        Ok(())
    }

    fn query_decoded(&mut self) -> Result<BTreeSet<usize>, Error> {
        let (source, value) = match &self.decoded {
            DecodedQuery::Callable(binding) => {
                (binding.name(), binding.invoke(self.surface.as_mut(), &[])?)
            }
            DecodedQuery::Attribute(name) => {
                (*name, self.surface.attribute(name).unwrap_or(Value::Unit))
            }
        };
        match value {
            Value::Indices(indices) => Ok(indices),
            other => Err(Error::UnexpectedValue {
                callable: source.to_string(),
                expected: "indices",
                found: other.kind(),
            }),
        }
    }

    fn is_done(&mut self) -> Result<bool, Error> {
        let Completion::Callable(binding) = &self.completion else {
            return Ok(false);
        };
        match binding.invoke(self.surface.as_mut(), &[])? {
            Value::Bool(done) => Ok(done),
            other => Err(Error::UnexpectedValue {
                callable: binding.name().to_string(),
                expected: "bool",
                found: other.kind(),
            }),
        }
    }
}
