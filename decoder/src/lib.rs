// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

//! # Oligo Timeline Decoder Library
//!
//! Decoding engines do not share a stable interface: the same operation may be called
//! `add_packet` in one build and `input_new_packet` in another. This library models a
//! decoder as an introspectable [`Surface`](surface::Surface): a set of named callables,
//! each with a declared number of positional parameters, plus named read-only attributes.
//! Callers discover what they need at run time instead of compiling against a fixed trait.
//!
//! ## Modules
//!
//! - [`surface`](surface): The [`Surface`](surface::Surface) trait, call [`Value`](surface::Value)s
//!   and the [`MethodTable`](surface::MethodTable) used to register callables on a concrete decoder.
//! - [`droplet`](droplet): Wire format of the reference engine's encoded symbols.
//! - [`peeling`](peeling): The reference peeling decoder.
//! - [`config`](config): Reader for the encoder's INI configuration.
//! - [`factory`](factory): The [`DecoderFactory`](factory::DecoderFactory) seam.
//! - [`mock`](mock): Scripted decoders for tests (feature `mock`).
//!
//! ## Example
//!
//! ```rust
//! use oligo_timeline_decoder::surface::{MethodTable, Surface, Value};
//!
//! let mut surface = MethodTable::new()
//!     .method("ping", 0, |count: &mut u32, _| {
//!         *count += 1;
//!         Ok(Value::Count(*count as usize))
//!     })
//!     .bind(0u32);
//!
//! assert_eq!(surface.callables()[0].name, "ping");
//! assert_eq!(surface.call("ping", &[]).unwrap(), Value::Count(1));
//! ```

pub mod config;
pub mod droplet;
pub mod error;
pub mod factory;
pub mod peeling;
pub mod surface;

pub use config::EncodingConfig;
pub use error::Error;
pub use factory::{DecoderFactory, PeelingFactory};
pub use peeling::PeelingDecoder;
pub use surface::{MethodTable, Registered, Signature, Surface, Value};

#[cfg(any(test, feature = "mock"))]
pub mod mock;
