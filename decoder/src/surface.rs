// Copyright 2024 Oligo Timeline Contributors
// SPDX-License-Identifier: Apache-2.0, MIT

use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::Error;

/// A value returned by a callable or read from an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// The callable returned nothing of interest.
    Unit,
    Bool(bool),
    Count(usize),
    /// A set of chunk indices.
    Indices(BTreeSet<usize>),
    Bytes(Bytes),
}

impl Value {
    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::Count(_) => "count",
            Value::Indices(_) => "indices",
            Value::Bytes(_) => "bytes",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Count(n) => write!(f, "{}", n),
            Value::Indices(set) => write!(f, "{:?}", set),
            Value::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

/// Declared shape of a callable: its name and the number of positional parameters it takes,
/// not counting the receiver.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Signature {
    pub name: String,
    pub positional: usize,
}

/// An object whose operations are discovered at run time.
///
/// Implementors must list their callables in a stable order. Resolution picks the first match
/// in that order, so the order is part of the observable behaviour.
pub trait Surface: Send {
    /// Lists every public callable, ordered by name.
    fn callables(&self) -> Vec<Signature>;

    /// Invokes the callable `name` with the given positional arguments.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the callable, as listed by [`Surface::callables`].
    /// * `args` - Positional arguments. Trailing declared parameters may be omitted.
    ///
    /// # Returns
    ///
    /// The value produced by the callable, or an `Error` if there is no such callable, too many
    /// arguments were given, or the callable itself failed.
    fn call(&mut self, name: &str, args: &[Bytes]) -> Result<Value, Error>;

    /// Reads a named attribute, if present.
    fn attribute(&self, name: &str) -> Option<Value>;
}

type Handler<D> = Box<dyn Fn(&mut D, &[Bytes]) -> Result<Value, Error> + Send + Sync>;
type Getter<D> = Box<dyn Fn(&D) -> Value + Send + Sync>;

struct Method<D> {
    positional: usize,
    handler: Handler<D>,
}

/// Registration table mapping callable names to handlers on a concrete decoder type `D`.
///
/// This is how integration code exposes a decoder as a [`Surface`]: every callable is
/// registered once with its declared arity, then the table is bound to an instance.
pub struct MethodTable<D> {
    methods: BTreeMap<String, Method<D>>,
    attributes: BTreeMap<String, Getter<D>>,
}

impl<D> Default for MethodTable<D> {
    fn default() -> Self {
        Self {
            methods: BTreeMap::new(),
            attributes: BTreeMap::new(),
        }
    }
}

impl<D> MethodTable<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callable. A later registration with the same name replaces the earlier one.
    pub fn method<F>(mut self, name: impl Into<String>, positional: usize, handler: F) -> Self
    where
        F: Fn(&mut D, &[Bytes]) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.methods.insert(
            name.into(),
            Method {
                positional,
                handler: Box::new(handler),
            },
        );
        self
    }

    /// Registers a read-only attribute.
    pub fn attribute<F>(mut self, name: impl Into<String>, getter: F) -> Self
    where
        F: Fn(&D) -> Value + Send + Sync + 'static,
    {
        self.attributes.insert(name.into(), Box::new(getter));
        self
    }

    /// Binds the table to a decoder instance.
    pub fn bind(self, decoder: D) -> Registered<D> {
        Registered {
            decoder,
            table: self,
        }
    }
}

/// A decoder bound to its [`MethodTable`].
pub struct Registered<D> {
    decoder: D,
    table: MethodTable<D>,
}

impl<D> Registered<D> {
    pub fn inner(&self) -> &D {
        &self.decoder
    }
}

impl<D: Send> Surface for Registered<D> {
    fn callables(&self) -> Vec<Signature> {
        self.table
            .methods
            .iter()
            .map(|(name, method)| Signature {
                name: name.clone(),
                positional: method.positional,
            })
            .collect()
    }

    fn call(&mut self, name: &str, args: &[Bytes]) -> Result<Value, Error> {
        let method = self
            .table
            .methods
            .get(name)
            .ok_or_else(|| Error::NoSuchMethod(name.to_string()))?;
        if args.len() > method.positional {
            return Err(Error::ArityMismatch {
                name: name.to_string(),
                declared: method.positional,
                given: args.len(),
            });
        }
        (method.handler)(&mut self.decoder, args)
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.table
            .attributes
            .get(name)
            .map(|getter| getter(&self.decoder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> Registered<Vec<Bytes>> {
        MethodTable::new()
            .method("push_item", 1, |items: &mut Vec<Bytes>, args| {
                items.extend(args.iter().cloned());
                Ok(Value::Unit)
            })
            .method("len", 0, |items: &mut Vec<Bytes>, _| {
                Ok(Value::Count(items.len()))
            })
            .method("clear", 0, |items: &mut Vec<Bytes>, _| {
                items.clear();
                Ok(Value::Unit)
            })
            .attribute("size", |items: &Vec<Bytes>| Value::Count(items.len()))
            .bind(Vec::new())
    }

    #[test]
    fn callables_are_listed_by_name() {
        let surface = counter();
        let names: Vec<String> = surface.callables().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["clear", "len", "push_item"]);
        assert_eq!(surface.callables()[2].positional, 1);
    }

    #[test]
    fn call_dispatches_to_handler() {
        let mut surface = counter();
        surface.call("push_item", &[Bytes::from("a")]).unwrap();
        surface.call("push_item", &[Bytes::from("b")]).unwrap();
        assert_eq!(surface.call("len", &[]).unwrap(), Value::Count(2));
        assert_eq!(surface.attribute("size"), Some(Value::Count(2)));
        assert_eq!(surface.inner().len(), 2);
    }

    #[test]
    fn unknown_callable_is_an_error() {
        let mut surface = counter();
        let err = surface.call("pop_item", &[]).unwrap_err();
        assert!(matches!(err, Error::NoSuchMethod(name) if name == "pop_item"));
    }

    #[test]
    fn too_many_arguments_are_rejected() {
        let mut surface = counter();
        let err = surface
            .call("len", &[Bytes::from("unexpected")])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ArityMismatch {
                declared: 0,
                given: 1,
                ..
            }
        ));
    }

    #[test]
    fn missing_attribute_is_none() {
        let surface = counter();
        assert_eq!(surface.attribute("capacity"), None);
    }
}
