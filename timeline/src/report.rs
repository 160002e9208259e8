// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::simulator::Run;
use crate::timeline::Timeline;

/// Header line of the output table.
pub const CSV_HEADER: &str = "chunk_idx,first_packet";

/// One row of the output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub chunk_idx: usize,
    pub first_packet: usize,
}

/// Rows of `timeline` in ascending chunk order.
pub fn render(timeline: &Timeline) -> Vec<Row> {
    timeline
        .iter()
        .map(|(chunk_idx, first_packet)| Row {
            chunk_idx,
            first_packet,
        })
        .collect()
}

pub fn write_csv<W: Write>(timeline: &Timeline, mut out: W) -> io::Result<()> {
    writeln!(out, "{}", CSV_HEADER)?;
    for row in render(timeline) {
        writeln!(out, "{},{}", row.chunk_idx, row.first_packet)?;
    }
    out.flush()
}

pub fn write_csv_file(timeline: &Timeline, path: impl AsRef<Path>) -> Result<(), Error> {
    let file = std::fs::File::create(path)?;
    write_csv(timeline, io::BufWriter::new(file))?;
    Ok(())
}

/// The one-line summary printed after a successful run.
pub fn summary_line(timeline: &Timeline, out: &Path) -> String {
    format!(
        "Recovered {} chunks after {} packets -> {}",
        timeline.recovered(),
        timeline.horizon(),
        out.display()
    )
}

/// Machine-readable description of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: Option<u64>,
    pub total_symbols: usize,
    pub ingested: usize,
    pub completed: bool,
    pub recovered: usize,
    pub horizon: usize,
    pub output: PathBuf,
    pub first_seen: Timeline,
}

impl RunSummary {
    pub fn new(run: &Run, seed: Option<u64>, output: impl Into<PathBuf>) -> Self {
        Self {
            seed,
            total_symbols: run.total,
            ingested: run.ingested(),
            completed: run.completed,
            recovered: run.timeline.recovered(),
            horizon: run.timeline.horizon(),
            output: output.into(),
            first_seen: run.timeline.clone(),
        }
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let file = std::fs::File::create(path)?;
        let mut writer = io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

/// Lists callable names separated by commas, wrapped at `width` columns with continuation
/// lines indented by four spaces.
pub fn callable_listing(names: &[String], width: usize) -> String {
    const INDENT: &str = "    ";
    let mut out = String::new();
    let mut line_len = 0;
    for (i, name) in names.iter().enumerate() {
        let word = if i + 1 < names.len() {
            format!("{},", name)
        } else {
            name.clone()
        };
        let word_len = word.chars().count();
        if line_len == 0 {
            out.push_str(&word);
            line_len = word_len;
        } else if line_len + 1 + word_len <= width {
            out.push(' ');
            out.push_str(&word);
            line_len += 1 + word_len;
        } else {
            out.push('\n');
            out.push_str(INDENT);
            out.push_str(&word);
            line_len = INDENT.len() + word_len;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_sorted_rows() {
        let timeline: Timeline = [(4, 9), (0, 2), (1, 3)].into_iter().collect();
        let rows = render(&timeline);
        assert_eq!(
            rows,
            vec![
                Row { chunk_idx: 0, first_packet: 2 },
                Row { chunk_idx: 1, first_packet: 3 },
                Row { chunk_idx: 4, first_packet: 9 },
            ]
        );
    }

    #[test]
    fn test_write_csv() {
        let timeline: Timeline = [(1, 3), (0, 2)].into_iter().collect();
        let mut out = Vec::new();
        write_csv(&timeline, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "chunk_idx,first_packet\n0,2\n1,3\n");
    }

    #[test]
    fn test_write_csv_empty() {
        let mut out = Vec::new();
        write_csv(&Timeline::new(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "chunk_idx,first_packet\n");
    }

    #[test]
    fn test_summary_line() {
        let timeline: Timeline = [(0, 4), (1, 11)].into_iter().collect();
        assert_eq!(
            summary_line(&timeline, Path::new("timeline.csv")),
            "Recovered 2 chunks after 11 packets -> timeline.csv"
        );
        assert_eq!(
            summary_line(&Timeline::new(), Path::new("t.csv")),
            "Recovered 0 chunks after 0 packets -> t.csv"
        );
    }

    #[test]
    fn test_summary_json() {
        let run = Run {
            timeline: [(0, 2)].into_iter().collect(),
            order: vec!["a".to_string(), "b".to_string()],
            total: 3,
            completed: true,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        RunSummary::new(&run, Some(9), "timeline.csv")
            .write_json(&path)
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(value["seed"], 9);
        assert_eq!(value["ingested"], 2);
        assert_eq!(value["horizon"], 2);
        assert_eq!(value["completed"], true);
        assert_eq!(value["first_seen"]["0"], 2);
    }

    #[test]
    fn test_callable_listing_wraps() {
        let names: Vec<String> = ["alpha", "beta", "gamma", "delta"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(callable_listing(&names, 100), "alpha, beta, gamma, delta");
        assert_eq!(callable_listing(&names, 12), "alpha, beta,\n    gamma,\n    delta");
        assert_eq!(callable_listing(&[], 100), "");
    }

    #[test]
    fn test_callable_listing_counts_characters() {
        // "dékodé," is 7 characters but 9 bytes
        let names = vec!["dékodé".to_string(), "abc".to_string()];
        assert_eq!(callable_listing(&names, 11), "dékodé, abc");
        assert_eq!(callable_listing(&names, 10), "dékodé,\n    abc");
    }
}
