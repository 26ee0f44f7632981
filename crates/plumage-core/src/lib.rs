//! Runtime engine for plumage: scalar values, the primitive codec, the
//! arena-backed entity property graph, per-entry value caches, and the two
//! symmetric traversal engines (extraction for writing, injection for
//! reading).
#![warn(unreachable_pub)]

pub mod cache;
pub mod codec;
pub mod duplicate;
pub mod error;
pub mod extract;
pub mod graph;
pub mod inject;
pub mod obs;
pub mod settings;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or codec internals are re-exported here.
///

pub mod prelude {
    pub use crate::{
        cache::{EntryValueCache, ItemValueCache},
        extract::Extracted,
        graph::{
            CollectionItem, CollectionValue, ComplexId, ComplexRecord, EntityGraph, Entry,
            Property, PropertyValue,
        },
        inject::{CollectionTarget, InjectedValue},
        settings::{ReaderSettings, WriterSettings},
        value::Value,
    };
}
