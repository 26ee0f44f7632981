//! End-to-end behavior of the mapping engines over one model: injection
//! and extraction driven the way a document pipeline drives them.

use plumage::{MappingError, core::codec, prelude::*};
use std::sync::Arc;

fn model() -> Model {
    Model::new()
        .with_type(
            StructuralType::entity("NW.Customer")
                .with_property("Name", TypeRef::nullable(PrimitiveKind::Text))
                .with_property("Age", TypeRef::primitive(PrimitiveKind::Int32))
                .with_property("Address", TypeRef::complex("NW.Address"))
                .with_property(
                    "Emails",
                    TypeRef::collection(TypeRef::primitive(PrimitiveKind::Text)),
                )
                .with_property(
                    "Addresses",
                    TypeRef::collection(TypeRef::complex("NW.Address")),
                ),
        )
        .with_type(
            StructuralType::complex("NW.Address")
                .with_property("City", TypeRef::primitive(PrimitiveKind::Text)),
        )
        .with_type(StructuralType::entity("NW.OpenThing").open())
}

fn compile(model: &Model, root: &str, paths: &[(&str, SyndicationTarget)]) -> Arc<SourceTree> {
    let declarations: Vec<_> = paths
        .iter()
        .map(|(path, target)| {
            MappingDeclaration::from_path_str(path, TargetDescriptor::syndication(*target))
        })
        .collect();

    Arc::new(SourceTree::compile(model, root, &declarations).unwrap())
}

#[test]
fn injection_then_extraction_round_trips_a_scalar() {
    let model = model();
    let tree = compile(&model, "NW.Customer", &[("Age", SyndicationTarget::Title)]);
    let mapping = &tree.mappings()[0];
    let entry_type = model.entity_type("NW.Customer").unwrap();

    let mut graph = EntityGraph::new();
    let entry = graph.new_entry(Some("NW.Customer".to_string()));
    let mut checker = DuplicateChecker::new();

    inject_entry_value(
        &model,
        entry_type,
        mapping,
        &mut graph,
        entry,
        InjectedValue::text("42"),
        &ReaderSettings::default(),
        &mut checker,
    )
    .unwrap();

    let cache = EntryValueCache::new(&graph, entry);
    let extracted = extract_entry_value(
        &model,
        entry_type,
        mapping,
        &cache,
        &WriterSettings::default(),
    )
    .unwrap();

    match extracted {
        Extracted::Value { value, .. } => {
            assert_eq!(codec::value_to_text(value).unwrap().text, "42");
        }
        other => panic!("expected value, got {other:?}"),
    }
}

#[test]
fn in_document_null_takes_priority_over_injection() {
    let model = model();
    let tree = compile(&model, "NW.Customer", &[("Name", SyndicationTarget::Title)]);
    let entry_type = model.entity_type("NW.Customer").unwrap();

    let mut graph = EntityGraph::new();
    let entry = graph.new_entry(None);
    graph
        .record_mut(entry.root())
        .properties
        .push(Property::new("Name", PropertyValue::Null));

    let mut checker = DuplicateChecker::new();
    inject_entry_value(
        &model,
        entry_type,
        &tree.mappings()[0],
        &mut graph,
        entry,
        InjectedValue::text("ignored"),
        &ReaderSettings::default(),
        &mut checker,
    )
    .unwrap();

    let name = graph.record(entry.root()).property("Name").unwrap();
    assert!(name.value.is_null());
}

#[test]
fn competing_mapping_sets_surface_entry_level_duplicates() {
    let model = model();
    // Two independently compiled mapping sets, both terminating at "Name".
    let first = compile(&model, "NW.Customer", &[("Name", SyndicationTarget::Title)]);
    let second = compile(&model, "NW.Customer", &[("Name", SyndicationTarget::Summary)]);
    let entry_type = model.entity_type("NW.Customer").unwrap();

    let mut graph = EntityGraph::new();
    let entry = graph.new_entry(None);
    let mut checker = DuplicateChecker::new();

    inject_entry_value(
        &model,
        entry_type,
        &first.mappings()[0],
        &mut graph,
        entry,
        InjectedValue::text("one"),
        &ReaderSettings::default(),
        &mut checker,
    )
    .unwrap();

    let err = inject_entry_value(
        &model,
        entry_type,
        &second.mappings()[0],
        &mut graph,
        entry,
        InjectedValue::text("two"),
        &ReaderSettings::default(),
        &mut checker,
    )
    .unwrap_err();

    assert_eq!(
        err,
        MappingError::DuplicateProperty {
            property: "Name".to_string()
        }
    );
}

#[test]
fn multivalue_items_round_trip_in_insertion_order() {
    let model = model();
    let tree = compile(&model, "NW.Customer", &[("Emails", SyndicationTarget::Title)]);
    let mapping = &tree.mappings()[0];
    let entry_type = model.entity_type("NW.Customer").unwrap();

    let mut graph = EntityGraph::new();
    let entry = graph.new_entry(None);
    let mut checker = DuplicateChecker::new();

    let mut target = new_collection_target(mapping).unwrap();
    let settings = ReaderSettings::default();
    target.append_text(Some("a"), &settings).unwrap();
    target.append_text(Some("b"), &settings).unwrap();
    inject_entry_value(
        &model,
        entry_type,
        mapping,
        &mut graph,
        entry,
        InjectedValue::Collection(target),
        &settings,
        &mut checker,
    )
    .unwrap();

    let cache = EntryValueCache::new(&graph, entry);
    let extracted = extract_entry_value(
        &model,
        entry_type,
        mapping,
        &cache,
        &WriterSettings::default(),
    )
    .unwrap();

    let Extracted::Collection { value, .. } = extracted else {
        panic!("expected collection");
    };

    let mut texts = Vec::new();
    for item in &value.items {
        let item_cache = ItemValueCache::new(&graph, item);
        match extract_item_value(&model, None, mapping, &item_cache, &WriterSettings::default())
            .unwrap()
        {
            Extracted::Value { value, .. } => {
                texts.push(codec::value_to_text(value).unwrap().text);
            }
            other => panic!("expected value, got {other:?}"),
        }
    }

    assert_eq!(texts, vec!["a", "b"]);
}

#[test]
fn complex_multivalue_items_round_trip_through_item_mappings() {
    let model = model();
    let collection_tree = compile(
        &model,
        "NW.Customer",
        &[("Addresses", SyndicationTarget::Title)],
    );
    let item_tree = compile(&model, "NW.Address", &[("City", SyndicationTarget::Summary)]);
    let collection_mapping = &collection_tree.mappings()[0];
    let item_mapping = &item_tree.mappings()[0];
    let entry_type = model.entity_type("NW.Customer").unwrap();
    let address_type = model.complex_type("NW.Address").unwrap();

    let mut graph = EntityGraph::new();
    let entry = graph.new_entry(None);
    let mut checker = DuplicateChecker::new();
    let settings = ReaderSettings::default();

    let mut target = new_collection_target(collection_mapping).unwrap();
    for city in ["Graz", "Linz"] {
        let item = target.append_complex_item(&mut graph).unwrap();
        inject_item_value(
            &model,
            Some(address_type),
            item_mapping,
            &mut graph,
            item,
            InjectedValue::text(city),
            &settings,
        )
        .unwrap();
    }
    inject_entry_value(
        &model,
        entry_type,
        collection_mapping,
        &mut graph,
        entry,
        InjectedValue::Collection(target),
        &settings,
        &mut checker,
    )
    .unwrap();

    let cache = EntryValueCache::new(&graph, entry);
    let extracted = extract_entry_value(
        &model,
        entry_type,
        collection_mapping,
        &cache,
        &WriterSettings::default(),
    )
    .unwrap();

    let Extracted::Collection { value, item_type } = extracted else {
        panic!("expected collection");
    };
    assert_eq!(value.type_name.as_deref(), Some("NW.Address"));
    assert_eq!(item_type, Some(TypeRef::complex("NW.Address")));

    let mut cities = Vec::new();
    for item in &value.items {
        let item_cache = ItemValueCache::new(&graph, item);
        match extract_item_value(
            &model,
            Some(address_type),
            item_mapping,
            &item_cache,
            &WriterSettings::default(),
        )
        .unwrap()
        {
            Extracted::Value { value, .. } => cities.push(value.as_text().unwrap().to_string()),
            other => panic!("expected value, got {other:?}"),
        }
    }

    assert_eq!(cities, vec!["Graz", "Linz"]);
}

#[test]
fn absent_parent_yields_ancestor_null_not_an_error() {
    let model = model();
    let tree = compile(
        &model,
        "NW.Customer",
        &[("Address/City", SyndicationTarget::Summary)],
    );
    let entry_type = model.entity_type("NW.Customer").unwrap();

    let mut graph = EntityGraph::new();
    let entry = graph.new_entry(None);
    let cache = EntryValueCache::new(&graph, entry);

    let extracted = extract_entry_value(
        &model,
        entry_type,
        &tree.mappings()[0],
        &cache,
        &WriterSettings::default(),
    )
    .unwrap();

    assert!(extracted.is_ancestor_null());
}

#[test]
fn stale_mappings_fail_with_open_type_violation_in_both_directions() {
    let model = model();
    let tree = compile(
        &model,
        "NW.OpenThing",
        &[("Undeclared/Inner", SyndicationTarget::Title)],
    );
    let mapping = &tree.mappings()[0];
    // Applied against a closed type the mapping was not compiled for.
    let entry_type = model.entity_type("NW.Customer").unwrap();

    let mut graph = EntityGraph::new();
    let entry = graph.new_entry(None);

    let cache = EntryValueCache::new(&graph, entry);
    let extract_err = extract_entry_value(
        &model,
        entry_type,
        mapping,
        &cache,
        &WriterSettings::default(),
    )
    .unwrap_err();
    drop(cache);

    let mut checker = DuplicateChecker::new();
    let inject_err = inject_entry_value(
        &model,
        entry_type,
        mapping,
        &mut graph,
        entry,
        InjectedValue::text("x"),
        &ReaderSettings::default(),
        &mut checker,
    )
    .unwrap_err();

    for err in [extract_err, inject_err] {
        assert_eq!(
            err,
            MappingError::OpenTypeViolation {
                property: "Undeclared".to_string(),
                type_name: "NW.Customer".to_string(),
            }
        );
    }
}
