//! ## Crate layout
//! - `schema`: primitive kinds, type references, structural types, mapping
//!   declarations, mapping compilation, and the source path tree.
//! - `core`: runtime values, the primitive codec, the entity property
//!   graph, value caches, the extraction and injection engines, settings,
//!   and the observability sink boundary.
//!
//! The `prelude` module mirrors the surface a document pipeline uses when
//! driving the engines.

pub use plumage_core as core;
pub use plumage_schema as schema;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use plumage_core::error::MappingError;
pub use plumage_schema::Error as SchemaError;

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        cache::{EntryValueCache, ItemValueCache},
        duplicate::DuplicateChecker,
        extract::{Extracted, extract_complex_value, extract_entry_value, extract_item_value},
        graph::{
            CollectionItem, CollectionValue, ComplexId, ComplexRecord, EntityGraph, Entry,
            Property, PropertyValue,
        },
        inject::{
            CollectionTarget, InjectedValue, inject_complex_value, inject_entry_value,
            inject_item_value, new_collection_target,
        },
        settings::{NullPolicy, ReaderSettings, WriterSettings},
        value::Value,
    };
    pub use crate::schema::{
        kind::PrimitiveKind,
        mapping::{
            MappingDeclaration, MultivalueStatus, PropertyMapping, SyndicationTarget,
            TargetContentKind, TargetDescriptor, TargetKind,
        },
        model::Model,
        tree::{SourceSegment, SourceTree},
        types::{PropertyDef, StructuralKind, StructuralType, TypeRef},
    };
}
