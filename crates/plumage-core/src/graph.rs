use crate::value::Value;
use serde::Serialize;

///
/// ComplexId
///
/// Handle into an [`EntityGraph`] arena. Handles are only meaningful for
/// the graph that allocated them; they stand in for reference identity
/// wherever a complex value must key a cache.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct ComplexId(u32);

impl ComplexId {
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

///
/// Entry
///
/// A view over the graph identifying the entity instance being processed;
/// the entry's own property list is its root record's list.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Entry {
    root: ComplexId,
}

impl Entry {
    #[must_use]
    pub const fn root(self) -> ComplexId {
        self.root
    }
}

///
/// EntityGraph
///
/// Arena owning every complex value reachable from one entry. Created by
/// the surrounding reader as elements are parsed, or provided wholesale by
/// the caller for writing; discarded with the instance.
///
/// Records allocated but never linked into a property list are simply
/// unreachable; a failed injection therefore leaves no half-built value
/// visible from the entry.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct EntityGraph {
    records: Vec<ComplexRecord>,
}

impl EntityGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an empty complex record, returning its handle.
    pub fn alloc(&mut self, type_name: Option<String>) -> ComplexId {
        let id = ComplexId(u32::try_from(self.records.len()).expect("graph arena overflow"));
        self.records.push(ComplexRecord {
            type_name,
            properties: Vec::new(),
        });
        id
    }

    /// Allocate the root record for a new entry.
    pub fn new_entry(&mut self, type_name: Option<String>) -> Entry {
        Entry {
            root: self.alloc(type_name),
        }
    }

    /// Record lookup. Handles come only from `alloc` on this graph, so an
    /// out-of-range index is a caller defect, not a data error.
    #[must_use]
    pub fn record(&self, id: ComplexId) -> &ComplexRecord {
        &self.records[id.index()]
    }

    #[must_use]
    pub fn record_mut(&mut self, id: ComplexId) -> &mut ComplexRecord {
        &mut self.records[id.index()]
    }
}

///
/// ComplexRecord
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct ComplexRecord {
    /// Full type name the value was tagged with, when known. Complex
    /// values seeded by document content or a prior mapping segment are
    /// never re-tagged.
    pub type_name: Option<String>,
    pub properties: Vec<Property>,
}

impl ComplexRecord {
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

///
/// Property
///

#[derive(Clone, Debug, Serialize)]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
}

impl Property {
    #[must_use]
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

///
/// PropertyValue
///
/// Instance value shape: scalar, nested complex value, collection, stream
/// reference, or explicit null. The engines dispatch exhaustively on this
/// union.
///

#[derive(Clone, Debug, Serialize)]
pub enum PropertyValue {
    Primitive(Value),
    Complex(ComplexId),
    Collection(CollectionValue),
    Stream(StreamRef),
    Null,
}

impl PropertyValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_complex(&self) -> Option<ComplexId> {
        if let Self::Complex(id) = self {
            Some(*id)
        } else {
            None
        }
    }
}

///
/// CollectionValue
///

#[derive(Clone, Debug, Serialize)]
pub struct CollectionValue {
    /// Item type full name for complex-item collections; primitive-item
    /// and open collections carry no name.
    pub type_name: Option<String>,
    pub items: Vec<CollectionItem>,
}

///
/// CollectionItem
///

#[derive(Clone, Debug, Serialize)]
pub enum CollectionItem {
    Primitive(Value),
    Complex(ComplexId),
}

///
/// StreamRef
///
/// Opaque stream reference carried through the graph for completeness.
/// Stream-typed properties are filtered out of mapping paths upstream and
/// must never reach the engines.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct StreamRef {
    pub read_link: Option<String>,
    pub edit_link: Option<String>,
    pub content_type: Option<String>,
}

///
/// TESTS
///
