// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use bytes::{BufMut, Bytes, BytesMut};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::Error;

/// Number of leading bytes of a droplet that carry its seed.
pub const SEED_LEN: usize = 4;

const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Converts a nucleotide sequence into bytes, two bits per base (`A=00`, `C=01`, `G=10`,
/// `T=11`), most significant pair first. Lowercase bases are accepted.
pub fn dna_to_bytes(sequence: &[u8]) -> Result<Bytes, Error> {
    if sequence.len() % 4 != 0 {
        return Err(Error::InvalidPayload(format!(
            "sequence length {} is not a multiple of 4",
            sequence.len()
        )));
    }
    let mut bytes = BytesMut::with_capacity(sequence.len() / 4);
    for quad in sequence.chunks(4) {
        let mut byte = 0u8;
        for &base in quad {
            let bits = match base.to_ascii_uppercase() {
                b'A' => 0b00,
                b'C' => 0b01,
                b'G' => 0b10,
                b'T' => 0b11,
                other => {
                    return Err(Error::InvalidPayload(format!(
                        "unexpected base {:?}",
                        other as char
                    )))
                }
            };
            byte = (byte << 2) | bits;
        }
        bytes.put_u8(byte);
    }
    Ok(bytes.freeze())
}

/// Inverse of [`dna_to_bytes`].
pub fn bytes_to_dna(bytes: &[u8]) -> String {
    let mut sequence = String::with_capacity(bytes.len() * 4);
    for byte in bytes {
        for shift in [6, 4, 2, 0] {
            sequence.push(BASES[((byte >> shift) & 0b11) as usize] as char);
        }
    }
    sequence
}

/// XORs `other` into `target` in place. Both must have the same length.
pub fn xor_into(target: &mut [u8], other: &[u8]) {
    for (t, o) in target.iter_mut().zip(other) {
        *t ^= o;
    }
}

/// One encoded symbol of the reference engine: a seed and the XOR of the chunks it selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Droplet {
    pub seed: u32,
    pub data: Bytes,
}

impl Droplet {
    /// Parses a droplet from its DNA payload.
    ///
    /// # Arguments
    ///
    /// * `payload` - The nucleotide sequence as read from the symbol file.
    /// * `chunk_size` - The expected number of data bytes after the seed.
    pub fn from_payload(payload: &[u8], chunk_size: usize) -> Result<Self, Error> {
        let bytes = dna_to_bytes(payload)?;
        if bytes.len() != SEED_LEN + chunk_size {
            return Err(Error::InvalidPayload(format!(
                "droplet carries {} bytes, expected {}",
                bytes.len(),
                SEED_LEN + chunk_size
            )));
        }
        let mut seed = [0u8; SEED_LEN];
        seed.copy_from_slice(&bytes[..SEED_LEN]);
        Ok(Self {
            seed: u32::from_be_bytes(seed),
            data: bytes.slice(SEED_LEN..),
        })
    }

    /// Serializes the droplet back into a DNA payload.
    pub fn to_payload(&self) -> String {
        let mut bytes = BytesMut::with_capacity(SEED_LEN + self.data.len());
        bytes.put_u32(self.seed);
        bytes.extend_from_slice(&self.data);
        bytes_to_dna(&bytes)
    }
}

/// Returns the sorted chunk indices combined into the droplet with the given seed.
///
/// The degree is drawn from the ideal soliton distribution over `number_of_chunks`, then that
/// many distinct indices are drawn uniformly, all from one `ChaCha8Rng` seeded with `seed`.
pub fn neighbours(seed: u32, number_of_chunks: usize) -> Vec<usize> {
    if number_of_chunks == 0 {
        return Vec::new();
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
    let degree = sample_degree(&mut rng, number_of_chunks);
    let mut indices = rand::seq::index::sample(&mut rng, number_of_chunks, degree).into_vec();
    indices.sort_unstable();
    indices
}

// rho(1) = 1/k, rho(d) = 1/(d(d-1)) for 2 <= d <= k
fn sample_degree(rng: &mut ChaCha8Rng, k: usize) -> usize {
    let sample = rng.gen::<f64>();
    let mut cumulative = 1.0 / k as f64;
    if sample <= cumulative {
        return 1;
    }
    for d in 2..=k {
        let d_float = d as f64;
        cumulative += 1.0 / (d_float * (d_float - 1.0));
        if sample <= cumulative {
            return d;
        }
    }
    k
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dna_to_bytes() {
        assert_eq!(dna_to_bytes(b"ACGT").unwrap(), Bytes::from(vec![0b00011011]));
        assert_eq!(dna_to_bytes(b"acgtTTTT").unwrap(), Bytes::from(vec![0x1b, 0xff]));
        assert_eq!(bytes_to_dna(&[0x1b, 0x00]), "ACGTAAAA");
    }

    #[test]
    fn test_dna_rejects_bad_input() {
        assert!(matches!(dna_to_bytes(b"ACG"), Err(Error::InvalidPayload(_))));
        assert!(matches!(dna_to_bytes(b"ACGN"), Err(Error::InvalidPayload(_))));
    }

    #[test]
    fn test_xor_into() {
        let mut target = vec![0b00000000, 0b11110000];
        xor_into(&mut target, &[0b10101010, 0b00001111]);
        assert_eq!(target, vec![0b10101010, 0b11111111]);
    }

    #[test]
    fn test_droplet_payload() {
        let droplet = Droplet {
            seed: 0x0102_0304,
            data: Bytes::from_static(b"hi"),
        };
        let payload = droplet.to_payload();
        assert_eq!(payload.len(), (SEED_LEN + 2) * 4);
        assert!(payload.starts_with("AAACAAAGAAATAACA"));
        assert_eq!(Droplet::from_payload(payload.as_bytes(), 2).unwrap(), droplet);
    }

    #[test]
    fn test_droplet_with_wrong_size() {
        let payload = Droplet {
            seed: 7,
            data: Bytes::from_static(b"abc"),
        }
        .to_payload();
        assert!(matches!(
            Droplet::from_payload(payload.as_bytes(), 4),
            Err(Error::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_neighbours_are_deterministic_and_distinct() {
        for seed in 0..200 {
            let first = neighbours(seed, 16);
            assert_eq!(first, neighbours(seed, 16));
            assert!(!first.is_empty() && first.len() <= 16);
            assert!(first.windows(2).all(|w| w[0] < w[1]));
            assert!(first.iter().all(|&i| i < 16));
        }
    }

    #[test]
    fn test_single_chunk_always_degree_one() {
        for seed in 0..20 {
            assert_eq!(neighbours(seed, 1), vec![0]);
        }
        assert!(neighbours(3, 0).is_empty());
    }
}
