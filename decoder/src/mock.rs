// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use anyhow::anyhow;
use bytes::Bytes;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use crate::droplet::{self, Droplet};
use crate::error::Error;
use crate::surface::{MethodTable, Registered, Value};

/// Callables that a cluttered surface exposes next to the real ones, with their arity.
/// None of them matches an ingest, query or completion role.
pub const NOISE_CALLABLES: &[(&str, usize)] = &[
    ("add_header", 1),
    ("add_oligo_count", 0),
    ("apply_error_correction", 1),
    ("calculate_checksum", 1),
    ("clear_cache", 0),
    ("compute_degree", 1),
    ("count_pending", 0),
    ("decode_header", 1),
    ("decoder_version", 0),
    ("drop_packet", 1),
    ("dump_state", 0),
    ("export_chunks", 1),
    ("feed_rate", 0),
    ("get_chunk", 1),
    ("get_config", 0),
    ("get_decoded", 0),
    ("get_number_of_chunks", 0),
    ("get_pending_packets", 0),
    ("get_stats", 0),
    ("input", 1),
    ("is_valid", 1),
    ("load_config", 1),
    ("mask_id", 1),
    ("parse_header", 1),
    ("print_state", 0),
    ("read_config", 1),
    ("remove_packet", 1),
    ("reset", 0),
    ("save_decoded", 1),
    ("set_chunk_size", 1),
    ("solve", 0),
    ("update_distribution", 1),
    ("validate_packet", 1),
    ("verify_crc", 1),
    ("write_output", 1),
];

/// Scripted decoder: chunk `i` counts as decoded once at least `thresholds[i]` symbols were
/// ingested, whatever their content. Ingested payloads are logged in a shared buffer.
#[derive(Clone)]
pub struct ThresholdDecoder {
    thresholds: Vec<usize>,
    ingested: Arc<Mutex<Vec<Bytes>>>,
}

impl ThresholdDecoder {
    pub fn new(thresholds: Vec<usize>) -> Self {
        Self {
            thresholds,
            ingested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle on the payloads ingested so far, in ingestion order.
    pub fn ingested(&self) -> Arc<Mutex<Vec<Bytes>>> {
        self.ingested.clone()
    }

    pub fn ingest(&self, payload: Bytes) {
        self.ingested.lock().unwrap().push(payload);
    }

    pub fn decoded(&self) -> BTreeSet<usize> {
        let count = self.ingested.lock().unwrap().len();
        self.thresholds
            .iter()
            .enumerate()
            .filter(|&(_, &threshold)| count >= threshold)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.decoded().len() == self.thresholds.len()
    }

    fn table() -> MethodTable<Self> {
        MethodTable::new()
            .method("add_packet", 1, |decoder: &mut Self, args| {
                decoder.ingest(args.first().cloned().unwrap_or_default());
                Ok(Value::Unit)
            })
            .method("get_decoded_chunk_indices", 0, |decoder: &mut Self, _| {
                Ok(Value::Indices(decoder.decoded()))
            })
    }

    /// Ingest and query callables only.
    pub fn surface(self) -> Registered<Self> {
        Self::table().bind(self)
    }

    /// Ingest, query and completion callables.
    pub fn surface_with_completion(self) -> Registered<Self> {
        Self::table()
            .method("is_decoding_complete", 0, |decoder: &mut Self, _| {
                Ok(Value::Bool(decoder.is_complete()))
            })
            .bind(self)
    }

    /// An ingest callable under a different name and the decoded set as an attribute only.
    pub fn attribute_surface(self) -> Registered<Self> {
        MethodTable::new()
            .method("ingest_read", 1, |decoder: &mut Self, args| {
                decoder.ingest(args.first().cloned().unwrap_or_default());
                Ok(Value::Unit)
            })
            .attribute("decoded_chunks", |decoder: &Self| {
                Value::Indices(decoder.decoded())
            })
            .bind(self)
    }

    /// The ingest and query callables hidden amongst [`NOISE_CALLABLES`]. Calling any noise
    /// callable fails.
    pub fn cluttered(self) -> Registered<Self> {
        with_noise(Self::table()).bind(self)
    }
}

fn with_noise<D: 'static>(mut table: MethodTable<D>) -> MethodTable<D> {
    for &(name, positional) in NOISE_CALLABLES {
        table = table.method(name, positional, move |_: &mut D, _| {
            Err(Error::Engine(anyhow!("{} must not be called", name)))
        });
    }
    table
}

/// A surface exposing only [`NOISE_CALLABLES`].
pub fn bare() -> Registered<()> {
    with_noise(MethodTable::new()).bind(())
}

/// Encodes `count` droplets with consecutive seeds starting at `first_seed`.
///
/// `data` is zero-padded to `chunk_size * number_of_chunks` bytes.
pub fn encode_droplets(
    data: &[u8],
    chunk_size: usize,
    number_of_chunks: usize,
    first_seed: u32,
    count: usize,
) -> Vec<String> {
    let mut padded = data.to_vec();
    padded.resize(chunk_size * number_of_chunks, 0);
    let chunks: Vec<&[u8]> = padded.chunks(chunk_size).collect();

    (0..count as u32)
        .map(|offset| {
            let seed = first_seed + offset;
            let mut payload = vec![0u8; chunk_size];
            for index in droplet::neighbours(seed, number_of_chunks) {
                droplet::xor_into(&mut payload, chunks[index]);
            }
            Droplet {
                seed,
                data: Bytes::from(payload),
            }
            .to_payload()
        })
        .collect()
}
