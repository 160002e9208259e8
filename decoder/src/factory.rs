// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::Path;

use crate::config::EncodingConfig;
use crate::error::Error;
use crate::peeling::PeelingDecoder;
use crate::surface::Surface;

/// Creates fresh decoder instances from a configuration artifact.
///
/// Decoder state is cumulative and cannot be reset, so every simulation run asks the factory
/// for a new instance.
pub trait DecoderFactory {
    /// Creates a decoder from the configuration at `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Path to the configuration written by the encoder. Its schema is owned by the
    ///   decoding engine.
    ///
    /// # Returns
    ///
    /// The decoder as an introspectable surface, or an `Error` if the configuration cannot be
    /// read or is unusable.
    fn create(&self, config: &Path) -> Result<Box<dyn Surface>, Error>;
}

/// Factory for the bundled [`PeelingDecoder`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PeelingFactory;

impl DecoderFactory for PeelingFactory {
    fn create(&self, config: &Path) -> Result<Box<dyn Surface>, Error> {
        let config = EncodingConfig::from_path(config)?;
        let decoder = PeelingDecoder::from_config(&config)?;
        log::debug!(
            "created peeling decoder for {} chunks of {} bytes",
            config.number_of_chunks,
            config.chunk_size
        );
        Ok(Box::new(decoder.into_surface()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_create_from_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[EncodingSettings]\nchunk_size = 4\nnumber_of_chunks = 3").unwrap();

        let surface = PeelingFactory.create(file.path()).unwrap();
        assert!(surface
            .callables()
            .iter()
            .any(|signature| signature.name == "add_packet"));
    }

    #[test]
    fn test_create_with_unusable_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[EncodingSettings]\nchunk_size = 4").unwrap();

        assert!(matches!(
            PeelingFactory.create(file.path()),
            Err(Error::Config(_))
        ));
    }
}
