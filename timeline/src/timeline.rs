// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// First-seen mapping: for each chunk index, the 1-based position of the symbol after which
/// the chunk was first reported decoded.
///
/// Entries are write-once. Recording a chunk that is already present keeps the earlier packet.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline {
    first_seen: BTreeMap<usize, usize>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `packet` for `chunk` unless the chunk is already recorded.
    /// Returns `true` if the entry was added.
    pub fn record(&mut self, chunk: usize, packet: usize) -> bool {
        match self.first_seen.entry(chunk) {
            std::collections::btree_map::Entry::Vacant(entry) => {
                entry.insert(packet);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn first_packet(&self, chunk: usize) -> Option<usize> {
        self.first_seen.get(&chunk).copied()
    }

    /// Number of chunks recorded.
    pub fn recovered(&self) -> usize {
        self.first_seen.len()
    }

    /// Largest packet index referenced, or 0 when nothing was recorded.
    pub fn horizon(&self) -> usize {
        self.first_seen.values().copied().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }

    /// Entries in ascending chunk order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.first_seen.iter().map(|(&chunk, &packet)| (chunk, packet))
    }
}

impl FromIterator<(usize, usize)> for Timeline {
    /// Builds a timeline keeping the first packet seen for every chunk.
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        let mut timeline = Timeline::new();
        for (chunk, packet) in iter {
            timeline.record(chunk, packet);
        }
        timeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_is_write_once() {
        let mut timeline = Timeline::new();
        assert!(timeline.record(3, 5));
        assert!(!timeline.record(3, 9));
        assert!(!timeline.record(3, 1));
        assert_eq!(timeline.first_packet(3), Some(5));
        assert_eq!(timeline.first_packet(4), None);
    }

    #[test]
    fn test_horizon_and_recovered() {
        let empty = Timeline::new();
        assert_eq!(empty.horizon(), 0);
        assert_eq!(empty.recovered(), 0);
        assert!(empty.is_empty());

        let timeline: Timeline = [(2, 7), (0, 3), (1, 7)].into_iter().collect();
        assert_eq!(timeline.horizon(), 7);
        assert_eq!(timeline.recovered(), 3);
        assert_eq!(timeline.iter().collect::<Vec<_>>(), vec![(0, 3), (1, 7), (2, 7)]);
    }

    #[test]
    fn test_serializes_as_map() {
        let timeline: Timeline = [(1, 3), (0, 2)].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&timeline).unwrap(),
            r#"{"0":2,"1":3}"#
        );
    }
}
