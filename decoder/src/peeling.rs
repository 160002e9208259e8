// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use bytes::Bytes;
use log::{debug, trace};
use std::collections::BTreeSet;

use crate::config::EncodingConfig;
use crate::droplet::{self, Droplet};
use crate::error::Error;
use crate::surface::{MethodTable, Registered, Value};

/// A droplet that still combines more than one unknown chunk.
struct Pending {
    unknown: BTreeSet<usize>,
    data: Vec<u8>,
}

/// Reference decoder for droplets produced with the [`droplet`] wire format.
///
/// Every received droplet is reduced by the chunks already known. A droplet left with a single
/// unknown chunk releases it, and the released chunk is then XORed out of every pending
/// droplet, which may release further chunks. Decoded chunks are never forgotten.
pub struct PeelingDecoder {
    chunk_size: usize,
    chunks: Vec<Option<Bytes>>,
    pending: Vec<Pending>,
    received: usize,
}

impl PeelingDecoder {
    pub fn new(number_of_chunks: usize, chunk_size: usize) -> Result<Self, Error> {
        if number_of_chunks == 0 || chunk_size == 0 {
            return Err(Error::Config(
                "chunk_size and number_of_chunks must be positive".to_string(),
            ));
        }
        Ok(Self {
            chunk_size,
            chunks: vec![None; number_of_chunks],
            pending: Vec::new(),
            received: 0,
        })
    }

    pub fn from_config(config: &EncodingConfig) -> Result<Self, Error> {
        Self::new(config.number_of_chunks, config.chunk_size)
    }

    /// Ingests one DNA-coded droplet.
    pub fn add_packet(&mut self, payload: &[u8]) -> Result<(), Error> {
        let droplet = Droplet::from_payload(payload, self.chunk_size)?;
        self.received += 1;

        let mut data = droplet.data.to_vec();
        let mut unknown = BTreeSet::new();
        for index in droplet::neighbours(droplet.seed, self.chunks.len()) {
            match &self.chunks[index] {
                Some(chunk) => droplet::xor_into(&mut data, chunk),
                None => {
                    unknown.insert(index);
                }
            }
        }
        if unknown.is_empty() {
            trace!("droplet {} carries no new information", droplet.seed);
            return Ok(());
        }
        self.pending.push(Pending { unknown, data });
        self.peel();
        Ok(())
    }

    fn peel(&mut self) {
        while let Some(position) = self.pending.iter().position(|p| p.unknown.len() == 1) {
            let released = self.pending.swap_remove(position);
            let Some(&index) = released.unknown.iter().next() else {
                continue;
            };
            let chunk = Bytes::from(released.data);
            for other in &mut self.pending {
                if other.unknown.remove(&index) {
                    droplet::xor_into(&mut other.data, &chunk);
                }
            }
            debug!("chunk {} decoded after {} droplets", index, self.received);
            self.chunks[index] = Some(chunk);
        }
        self.pending.retain(|p| !p.unknown.is_empty());
    }

    pub fn decoded_chunk_indices(&self) -> BTreeSet<usize> {
        self.chunks
            .iter()
            .enumerate()
            .filter_map(|(index, chunk)| chunk.as_ref().map(|_| index))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.chunks.iter().all(Option::is_some)
    }

    pub fn chunk(&self, index: usize) -> Option<&Bytes> {
        self.chunks.get(index).and_then(Option::as_ref)
    }

    pub fn number_of_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn received(&self) -> usize {
        self.received
    }

    /// Exposes the decoder through its registration table.
    ///
    /// Besides the ingest, query and completion callables, the table lists the auxiliary
    /// operations a caller may want to inspect; none of them mutates decoding state.
    pub fn into_surface(self) -> Registered<Self> {
        MethodTable::new()
            .method("add_packet", 1, |decoder: &mut Self, args| {
                let payload = args.first().ok_or_else(|| {
                    Error::InvalidPayload("add_packet expects one payload".to_string())
                })?;
                decoder.add_packet(payload)?;
                Ok(Value::Unit)
            })
            .method("get_decoded_chunk_indices", 0, |decoder: &mut Self, _| {
                Ok(Value::Indices(decoder.decoded_chunk_indices()))
            })
            .method("is_decoding_complete", 0, |decoder: &mut Self, _| {
                Ok(Value::Bool(decoder.is_complete()))
            })
            .method("get_chunk", 1, |decoder: &mut Self, args| {
                let index = args
                    .first()
                    .and_then(|raw| std::str::from_utf8(raw).ok())
                    .and_then(|raw| raw.trim().parse::<usize>().ok())
                    .ok_or_else(|| {
                        Error::InvalidPayload("get_chunk expects a decimal index".to_string())
                    })?;
                Ok(decoder
                    .chunk(index)
                    .cloned()
                    .map(Value::Bytes)
                    .unwrap_or(Value::Unit))
            })
            .method("get_number_of_chunks", 0, |decoder: &mut Self, _| {
                Ok(Value::Count(decoder.number_of_chunks()))
            })
            .method("get_received_packets", 0, |decoder: &mut Self, _| {
                Ok(Value::Count(decoder.received()))
            })
            .attribute("decoded_chunks", |decoder: &Self| {
                Value::Indices(decoder.decoded_chunk_indices())
            })
            .attribute("number_of_chunks", |decoder: &Self| {
                Value::Count(decoder.number_of_chunks())
            })
            .bind(self)
    }
}
