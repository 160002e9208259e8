// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use bytes::Bytes;
use std::path::Path;

use crate::error::Error;

/// One encoded unit read from the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub id: String,
    pub payload: Bytes,
}

impl Symbol {
    pub fn new(id: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
        }
    }
}

/// Parses FASTA-style records: a `>identifier` line followed by payload lines, which are
/// trimmed and concatenated. Blank lines are ignored.
pub fn parse_fasta(text: &str) -> Result<Vec<Symbol>, Error> {
    let mut symbols = Vec::new();
    let mut current: Option<(String, String)> = None;

    for (number, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            if let Some((id, payload)) = current.take() {
                symbols.push(Symbol::new(id, payload));
            }
            let id = header.split_whitespace().next().unwrap_or_default();
            current = Some((id.to_string(), String::new()));
        } else {
            match current.as_mut() {
                Some((_, payload)) => payload.push_str(line),
                None => {
                    return Err(Error::MalformedInput(format!(
                        "line {}: sequence data before the first record header",
                        number + 1
                    )))
                }
            }
        }
    }
    if let Some((id, payload)) = current {
        symbols.push(Symbol::new(id, payload));
    }
    Ok(symbols)
}

/// Reads and parses the symbol file at `path`.
pub fn load_fasta(path: impl AsRef<Path>) -> Result<Vec<Symbol>, Error> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| Error::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let symbols = parse_fasta(&text)?;
    log::info!("loaded {} symbols from {}", symbols.len(), path.display());
    Ok(symbols)
}

/// Checks that `path` exists and can be opened for reading.
pub fn ensure_readable(path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    std::fs::File::open(path)
        .map(|_| ())
        .map_err(|source| Error::InputNotFound {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records_in_order() {
        let text = ">seed_7 len=8\nACGT\nacgt\n\n>seed_2\nTTTT\n>empty\n";
        let symbols = parse_fasta(text).unwrap();
        assert_eq!(
            symbols,
            vec![
                Symbol::new("seed_7", "ACGTacgt"),
                Symbol::new("seed_2", "TTTT"),
                Symbol::new("empty", ""),
            ]
        );
    }

    #[test]
    fn test_data_before_header() {
        assert!(matches!(
            parse_fasta("ACGT\n>a\nAC\n"),
            Err(Error::MalformedInput(msg)) if msg.starts_with("line 1")
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_fasta("").unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.fasta");
        assert!(matches!(load_fasta(&path), Err(Error::InputNotFound { .. })));
        assert!(matches!(ensure_readable(&path), Err(Error::InputNotFound { .. })));
    }
}
