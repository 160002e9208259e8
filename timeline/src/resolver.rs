// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

//! Discovery of decoder operations by name prefix and arity.

use bytes::Bytes;
use oligo_timeline_decoder::{Surface, Value};

use crate::error::Error;

/// A callable selected on a surface, ready to be invoked through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    name: String,
    positional: usize,
}

impl Binding {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared positional parameters of the bound callable.
    pub fn positional(&self) -> usize {
        self.positional
    }

    pub fn invoke(
        &self,
        target: &mut dyn Surface,
        args: &[Bytes],
    ) -> Result<Value, oligo_timeline_decoder::Error> {
        target.call(&self.name, args)
    }
}

/// Finds the first callable of `target`, in name order, whose name starts with one of
/// `prefixes` and which declares at least `min_positional` positional parameters.
///
/// # Arguments
///
/// * `target` - The surface to inspect. It is only read.
/// * `prefixes` - Accepted name prefixes. Must not be empty.
/// * `min_positional` - Minimum number of positional parameters, receiver excluded.
///
/// # Returns
///
/// The binding, or `Error::CapabilityNotFound` listing every callable of `target`.
pub fn resolve(
    target: &dyn Surface,
    prefixes: &[&str],
    min_positional: usize,
) -> Result<Binding, Error> {
    let mut callables = target.callables();
    callables.sort();

    callables
        .iter()
        .find(|signature| {
            prefixes.iter().any(|p| signature.name.starts_with(p))
                && signature.positional >= min_positional
        })
        .map(|signature| Binding {
            name: signature.name.clone(),
            positional: signature.positional,
        })
        .ok_or_else(|| Error::CapabilityNotFound {
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
            min_positional,
            candidates: callable_names(target),
        })
}

/// Names of every callable of `target`, in name order.
pub fn callable_names(target: &dyn Surface) -> Vec<String> {
    let mut names: Vec<String> = target.callables().into_iter().map(|s| s.name).collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use oligo_timeline_decoder::mock::{self, ThresholdDecoder, NOISE_CALLABLES};
    use oligo_timeline_decoder::MethodTable;

    fn nop(positional: usize) -> impl Fn(&mut (), &[Bytes]) -> Result<Value, oligo_timeline_decoder::Error> {
        move |_, args| Ok(Value::Count(positional + args.len()))
    }

    #[test]
    fn test_first_match_in_name_order() {
        let surface = MethodTable::new()
            .method("push_b", 1, nop(1))
            .method("feed_a", 1, nop(1))
            .method("push_a", 1, nop(1))
            .bind(());

        let binding = resolve(&surface, &["push_", "feed_"], 1).unwrap();
        assert_eq!(binding.name(), "feed_a");
    }

    #[test]
    fn test_arity_filter() {
        let surface = MethodTable::new()
            .method("add_oligo_count", 0, nop(0))
            .method("add_oligo", 2, nop(2))
            .bind(());

        let binding = resolve(&surface, &["add_oligo"], 1).unwrap();
        assert_eq!(binding.name(), "add_oligo");
        assert_eq!(binding.positional(), 2);

        // with no minimum the shorter name still wins by order
        assert_eq!(resolve(&surface, &["add_oligo"], 0).unwrap().name(), "add_oligo");
    }

    #[test]
    fn test_binds_exact_callables_amongst_noise() {
        let surface = ThresholdDecoder::new(vec![1]).cluttered();
        assert_eq!(surface_len(&surface), NOISE_CALLABLES.len() + 2);

        let ingest = resolve(
            &surface,
            &["add_packet", "add_oligo", "add_read", "input_", "feed_"],
            1,
        )
        .unwrap();
        let query = resolve(&surface, &["get_decoded_chunk_indices", "decoded_chunks"], 0).unwrap();

        assert_eq!(ingest.name(), "add_packet");
        assert_eq!(query.name(), "get_decoded_chunk_indices");
    }

    fn surface_len(surface: &dyn Surface) -> usize {
        surface.callables().len()
    }

    #[test]
    fn test_not_found_lists_candidates() {
        let surface = mock::bare();
        let err = resolve(&surface, &["add_packet"], 1).unwrap_err();
        match err {
            Error::CapabilityNotFound {
                prefixes,
                min_positional,
                candidates,
            } => {
                assert_eq!(prefixes, vec!["add_packet"]);
                assert_eq!(min_positional, 1);
                assert_eq!(candidates.len(), NOISE_CALLABLES.len());
                let mut expected: Vec<String> =
                    NOISE_CALLABLES.iter().map(|(name, _)| name.to_string()).collect();
                expected.sort();
                assert_eq!(candidates, expected);
                assert_eq!(callable_names(&surface), expected);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invoke_goes_through_surface() {
        let mut surface = MethodTable::new().method("process_x", 1, nop(1)).bind(());
        let binding = resolve(&surface, &["process_"], 1).unwrap();
        let value = binding.invoke(&mut surface, &[Bytes::from("p")]).unwrap();
        assert_eq!(value, Value::Count(2));
    }
}
