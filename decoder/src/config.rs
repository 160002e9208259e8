// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Error;

/// Section of the encoder's INI file holding the encoding parameters.
pub const SETTINGS_SECTION: &str = "EncodingSettings";
/// Section of the encoder's INI file listing the produced files.
pub const FILES_SECTION: &str = "Files";

/// A parsed INI document. Keys are lowercased, values are trimmed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Ini {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl Ini {
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut ini = Ini::default();
        let mut current: Option<String> = None;
        for (number, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim().to_string();
                ini.sections.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .or_else(|| line.split_once(':'))
                .ok_or_else(|| Error::Config(format!("line {}: expected key = value", number + 1)))?;
            let section = current.as_ref().ok_or_else(|| {
                Error::Config(format!("line {}: key outside of any section", number + 1))
            })?;
            ini.sections
                .entry(section.clone())
                .or_default()
                .insert(key.trim().to_lowercase(), value.trim().to_string());
        }
        Ok(ini)
    }

    pub fn section(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.sections.get(name)
    }

    /// Returns a value, treating an empty value as absent.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)
            .and_then(|s| s.get(&key.to_lowercase()))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Encoding parameters a decoder needs, read from the encoder's configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingConfig {
    /// Number of data bytes carried by each droplet.
    pub chunk_size: usize,
    /// Number of chunks the original data was split into.
    pub number_of_chunks: usize,
    /// Every key of the settings section, including the ones above.
    pub settings: BTreeMap<String, String>,
    /// The files section, if present.
    pub files: BTreeMap<String, String>,
}

impl EncodingConfig {
    /// Reads and parses the configuration file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini(&Ini::parse(&text)?)
    }

    pub fn from_ini(ini: &Ini) -> Result<Self, Error> {
        let chunk_size = required_usize(ini, "chunk_size")?;
        let number_of_chunks = required_usize(ini, "number_of_chunks")?;
        if chunk_size == 0 || number_of_chunks == 0 {
            return Err(Error::Config(
                "chunk_size and number_of_chunks must be positive".to_string(),
            ));
        }
        Ok(Self {
            chunk_size,
            number_of_chunks,
            settings: ini.section(SETTINGS_SECTION).cloned().unwrap_or_default(),
            files: ini.section(FILES_SECTION).cloned().unwrap_or_default(),
        })
    }

    /// Returns a raw setting, treating an empty value as absent.
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

fn required_usize(ini: &Ini, key: &str) -> Result<usize, Error> {
    let raw = ini
        .get(SETTINGS_SECTION, key)
        .ok_or_else(|| Error::Config(format!("missing {}.{}", SETTINGS_SECTION, key)))?;
    raw.parse()
        .map_err(|_| Error::Config(format!("{}.{} is not a count: {}", SETTINGS_SECTION, key, raw)))
}
