//! Per-entry value caches.
//!
//! One cache lives for one entry (or one collection item) traversal and
//! decouples a single physical read of the instance graph from the many
//! logical mappings that may share a path prefix. Caching is purely
//! additive; an entry is processed to completion before its cache is
//! discarded, so nothing is ever invalidated mid-traversal.

use crate::graph::{CollectionItem, ComplexId, EntityGraph, Entry, Property};
use std::{cell::RefCell, collections::HashMap};

///
/// EntryValueCache
///
/// Write-direction cache over one entry's property graph. Property lists
/// are materialized on first access and memoized by arena handle (the
/// graph's stand-in for value identity).
///

#[derive(Debug)]
pub struct EntryValueCache<'g> {
    graph: &'g EntityGraph,
    root: ComplexId,
    complex_properties: RefCell<HashMap<ComplexId, &'g [Property]>>,
}

impl<'g> EntryValueCache<'g> {
    #[must_use]
    pub fn new(graph: &'g EntityGraph, entry: Entry) -> Self {
        Self::rooted(graph, entry.root())
    }

    /// Cache rooted at an arbitrary complex value, for nested-complex and
    /// multivalue-item traversals.
    #[must_use]
    pub fn rooted(graph: &'g EntityGraph, root: ComplexId) -> Self {
        Self {
            graph,
            root,
            complex_properties: RefCell::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn graph(&self) -> &'g EntityGraph {
        self.graph
    }

    #[must_use]
    pub const fn root(&self) -> ComplexId {
        self.root
    }

    /// The entry's own declared property list.
    #[must_use]
    pub fn entry_properties(&self) -> &'g [Property] {
        self.complex_properties(self.root)
    }

    /// A nested complex value's property list, materialized on first
    /// access only.
    #[must_use]
    pub fn complex_properties(&self, id: ComplexId) -> &'g [Property] {
        *self
            .complex_properties
            .borrow_mut()
            .entry(id)
            .or_insert_with(|| self.graph.record(id).properties.as_slice())
    }
}

///
/// ItemValueCache
///
/// Wraps a single multivalue item for the duration of its traversal.
/// Only complex items are wrapped with their own property-list cache;
/// primitive items are used directly, unwrapped.
///

#[derive(Debug)]
pub struct ItemValueCache<'g> {
    item: &'g CollectionItem,
    complex: Option<EntryValueCache<'g>>,
}

impl<'g> ItemValueCache<'g> {
    #[must_use]
    pub fn new(graph: &'g EntityGraph, item: &'g CollectionItem) -> Self {
        let complex = match item {
            CollectionItem::Complex(id) => Some(EntryValueCache::rooted(graph, *id)),
            CollectionItem::Primitive(_) => None,
        };

        Self { item, complex }
    }

    #[must_use]
    pub const fn item(&self) -> &'g CollectionItem {
        self.item
    }

    /// The wrapped item's own cache, when the item is complex.
    #[must_use]
    pub const fn complex(&self) -> Option<&EntryValueCache<'g>> {
        self.complex.as_ref()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PropertyValue;

    #[test]
    fn complex_properties_are_memoized_by_handle() {
        let mut graph = EntityGraph::new();
        let entry = graph.new_entry(None);
        let inner = graph.alloc(None);
        graph
            .record_mut(inner)
            .properties
            .push(Property::new("City", PropertyValue::Primitive("Graz".into())));
        graph
            .record_mut(entry.root())
            .properties
            .push(Property::new("Address", PropertyValue::Complex(inner)));

        let cache = EntryValueCache::new(&graph, entry);
        let first = cache.complex_properties(inner);
        let second = cache.complex_properties(inner);

        assert_eq!(first.len(), 1);
        assert!(std::ptr::eq(first, second));
        assert_eq!(cache.entry_properties().len(), 1);
    }

    #[test]
    fn primitive_items_are_not_wrapped() {
        let graph = EntityGraph::new();
        let item = CollectionItem::Primitive("a".into());
        let cache = ItemValueCache::new(&graph, &item);

        assert!(cache.complex().is_none());
        assert!(matches!(cache.item(), CollectionItem::Primitive(_)));
    }

    #[test]
    fn complex_items_expose_their_own_cache() {
        let mut graph = EntityGraph::new();
        let id = graph.alloc(Some("Test.Address".to_string()));
        graph
            .record_mut(id)
            .properties
            .push(Property::new("City", PropertyValue::Null));
        let item = CollectionItem::Complex(id);

        let cache = ItemValueCache::new(&graph, &item);
        let inner = cache.complex().unwrap();
        assert_eq!(inner.entry_properties().len(), 1);
    }
}
