//! Read-direction engine: apply a parsed custom-location value back into
//! the entity graph at the path a mapping describes, creating intermediate
//! complex values and multivalue containers as needed.
//!
//! Values already in the document always win: injection never overwrites
//! a property the parse produced, and a failed injection links nothing
//! into the entry.

use crate::{
    codec,
    duplicate::DuplicateChecker,
    error::{InternalError, MappingError},
    graph::{CollectionItem, CollectionValue, ComplexId, EntityGraph, Entry, Property, PropertyValue},
    obs::{self, MappingEvent},
    settings::ReaderSettings,
    value::Value,
};
use plumage_schema::{
    kind::PrimitiveKind,
    mapping::PropertyMapping,
    model::Model,
    types::{PropertyDef, StructuralType, TypeRef},
};

///
/// InjectedValue
///
/// A parsed custom-location payload: collected text (or null) for scalar
/// mappings, a fully-built backing item list for multivalue mappings.
///

#[derive(Debug)]
pub enum InjectedValue {
    Text(Option<String>),
    Collection(CollectionTarget),
}

impl InjectedValue {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(Some(text.into()))
    }

    #[must_use]
    pub const fn null() -> Self {
        Self::Text(None)
    }
}

///
/// CollectionTarget
///
/// The backing item list for one multivalue mapping. For primitive-item
/// collections the target *is* the list: items are appended directly with
/// no per-item property object. For complex-item collections each new item
/// is a fresh complex record whose property list becomes the next
/// injection target.
///

#[derive(Debug)]
pub struct CollectionTarget {
    path_label: String,
    item_type: TypeRef,
    type_name: Option<String>,
    items: Vec<CollectionItem>,
}

impl CollectionTarget {
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append one primitive item parsed from the document.
    pub fn append_text(
        &mut self,
        text: Option<&str>,
        settings: &ReaderSettings,
    ) -> Result<(), MappingError> {
        let TypeRef::Primitive { kind, .. } = &self.item_type else {
            return Err(InternalError::inject_invariant(format!(
                "text item appended to the complex-item collection '{}'",
                self.path_label
            ))
            .into());
        };

        let Some(text) = text else {
            return Err(MappingError::NullNotAllowed {
                property: self.path_label.clone(),
            });
        };

        let value = if settings.disable_primitive_type_conversion {
            Value::Text(text.to_string())
        } else {
            codec::text_to_value(text, *kind)?
        };
        self.items.push(CollectionItem::Primitive(value));

        Ok(())
    }

    /// Append one fresh complex item, returning its handle so the caller
    /// can inject the item's own mapped values next.
    pub fn append_complex_item(
        &mut self,
        graph: &mut EntityGraph,
    ) -> Result<ComplexId, MappingError> {
        if !self.item_type.is_complex() {
            return Err(InternalError::inject_invariant(format!(
                "complex item appended to the primitive-item collection '{}'",
                self.path_label
            ))
            .into());
        }

        let id = graph.alloc(self.type_name.clone());
        self.items.push(CollectionItem::Complex(id));

        Ok(id)
    }
}

/// Build the backing target for a multivalue mapping.
pub fn new_collection_target(mapping: &PropertyMapping) -> Result<CollectionTarget, MappingError> {
    let Some(item_type) = &mapping.item_type else {
        return Err(InternalError::inject_invariant(format!(
            "collection target requested for the non-multivalue mapping '{}'",
            mapping.path_label()
        ))
        .into());
    };

    Ok(CollectionTarget {
        path_label: mapping.path_label(),
        item_type: item_type.clone(),
        type_name: item_type.complex_name().map(ToString::to_string),
        items: Vec::new(),
    })
}

/// Inject a value for a whole-entry mapping. The duplicate checker is the
/// one owned by the entry being processed.
#[expect(clippy::too_many_arguments)]
pub fn inject_entry_value(
    model: &Model,
    entry_type: &StructuralType,
    mapping: &PropertyMapping,
    graph: &mut EntityGraph,
    entry: Entry,
    value: InjectedValue,
    settings: &ReaderSettings,
    checker: &mut DuplicateChecker,
) -> Result<(), MappingError> {
    let result = inject_at(
        model,
        mapping,
        graph,
        entry.root(),
        0,
        Some(entry_type),
        value,
        settings,
        Some(checker),
    );
    report(mapping, result.as_ref().err());

    result
}

/// Inject a value for a mapping rooted at a nested complex value.
///
/// Inner complex values skip the duplicate check: injection never adds a
/// name the in-document parse already produced at that level.
pub fn inject_complex_value(
    model: &Model,
    complex_type: Option<&StructuralType>,
    mapping: &PropertyMapping,
    graph: &mut EntityGraph,
    target: ComplexId,
    value: InjectedValue,
    settings: &ReaderSettings,
) -> Result<(), MappingError> {
    let result = inject_at(
        model, mapping, graph, target, 0, complex_type, value, settings, None,
    );
    report(mapping, result.as_ref().err());

    result
}

/// Inject a value for a mapping applied to one complex multivalue item.
///
/// Primitive-item collections have no per-item target: the raw item list
/// itself is the target, via [`CollectionTarget::append_text`].
pub fn inject_item_value(
    model: &Model,
    item_type: Option<&StructuralType>,
    mapping: &PropertyMapping,
    graph: &mut EntityGraph,
    item: ComplexId,
    value: InjectedValue,
    settings: &ReaderSettings,
) -> Result<(), MappingError> {
    inject_complex_value(model, item_type, mapping, graph, item, value, settings)
}

enum Existing {
    Complex(ComplexId),
    Other,
}

/// The recursive primitive all injection entry points funnel into.
#[expect(clippy::too_many_arguments)]
fn inject_at(
    model: &Model,
    mapping: &PropertyMapping,
    graph: &mut EntityGraph,
    target: ComplexId,
    index: usize,
    owner: Option<&StructuralType>,
    value: InjectedValue,
    settings: &ReaderSettings,
    mut checker: Option<&mut DuplicateChecker>,
) -> Result<(), MappingError> {
    let segment = &mapping.source_path[index];
    let last = index + 1 == mapping.source_path.len();
    let declared = resolve_declared(owner, segment)?;

    let existing = graph.record(target).property(segment).map(|p| match &p.value {
        PropertyValue::Complex(id) => Existing::Complex(*id),
        _ => Existing::Other,
    });

    if last {
        match existing {
            Some(_) => {
                // The in-document value wins; only a value a *prior
                // injection* placed at the entry level is a duplicate.
                if checker.is_some_and(|c| c.was_injected(segment)) {
                    return Err(MappingError::DuplicateProperty {
                        property: segment.clone(),
                    });
                }
                Ok(())
            }
            None => {
                let built = build_terminal(segment, declared, value, settings)?;
                if let Some(checker) = checker.as_deref_mut() {
                    checker.record(segment)?;
                }
                graph
                    .record_mut(target)
                    .properties
                    .push(Property::new(segment.clone(), built));
                Ok(())
            }
        }
    } else {
        if let Some(def) = declared
            && !def.ty.is_complex()
        {
            return Err(MappingError::TraversalNotComplex {
                property: segment.clone(),
            });
        }

        let next_owner = match declared.and_then(|d| d.ty.complex_name()) {
            Some(name) => Some(model.complex_type(name)?),
            None => None,
        };

        match existing {
            // Merge into the existing complex value; never re-tag it.
            Some(Existing::Complex(id)) => inject_at(
                model,
                mapping,
                graph,
                id,
                index + 1,
                next_owner,
                value,
                settings,
                None,
            ),
            // The in-document value wins, whatever its shape.
            Some(Existing::Other) => Ok(()),
            None => {
                let type_name = declared
                    .and_then(|d| d.ty.complex_name())
                    .map(ToString::to_string);
                let id = graph.alloc(type_name);

                // Resolve the rest of the path into the fresh record
                // before linking it, so a failure deeper down leaves the
                // entry untouched.
                inject_at(
                    model,
                    mapping,
                    graph,
                    id,
                    index + 1,
                    next_owner,
                    value,
                    settings,
                    None,
                )?;

                if let Some(checker) = checker.as_deref_mut() {
                    checker.record(segment)?;
                }
                graph
                    .record_mut(target)
                    .properties
                    .push(Property::new(segment.clone(), PropertyValue::Complex(id)));
                Ok(())
            }
        }
    }
}

fn build_terminal(
    segment: &str,
    declared: Option<&PropertyDef>,
    value: InjectedValue,
    settings: &ReaderSettings,
) -> Result<PropertyValue, MappingError> {
    match declared.map(|d| &d.ty) {
        // Undeclared properties are nullable text; no inference.
        None => build_primitive(segment, PrimitiveKind::Text, true, value, settings),
        Some(TypeRef::Primitive { kind, nullable }) => {
            if settings.disable_primitive_type_conversion {
                build_primitive(segment, PrimitiveKind::Text, true, value, settings)
            } else {
                build_primitive(segment, *kind, *nullable, value, settings)
            }
        }
        Some(TypeRef::Collection { .. }) => {
            let InjectedValue::Collection(target) = value else {
                return Err(InternalError::inject_invariant(format!(
                    "scalar payload injected for the multivalue property '{segment}'"
                ))
                .into());
            };
            Ok(PropertyValue::Collection(CollectionValue {
                type_name: target.type_name,
                items: target.items,
            }))
        }
        Some(TypeRef::Complex { .. }) => Err(InternalError::inject_invariant(format!(
            "complex-typed terminal segment '{segment}' reached injection"
        ))
        .into()),
        Some(TypeRef::Stream) => Err(InternalError::inject_invariant(format!(
            "stream-typed segment '{segment}' reached injection"
        ))
        .into()),
    }
}

fn build_primitive(
    segment: &str,
    kind: PrimitiveKind,
    nullable: bool,
    value: InjectedValue,
    settings: &ReaderSettings,
) -> Result<PropertyValue, MappingError> {
    let InjectedValue::Text(text) = value else {
        return Err(InternalError::inject_invariant(format!(
            "collection payload injected for the scalar property '{segment}'"
        ))
        .into());
    };

    match text {
        None => {
            if nullable {
                Ok(PropertyValue::Null)
            } else {
                Err(MappingError::NullNotAllowed {
                    property: segment.to_string(),
                })
            }
        }
        Some(text) => {
            let value = if settings.disable_primitive_type_conversion {
                Value::Text(text)
            } else {
                codec::text_to_value(&text, kind)?
            };
            Ok(PropertyValue::Primitive(value))
        }
    }
}

fn resolve_declared<'m>(
    owner: Option<&'m StructuralType>,
    segment: &str,
) -> Result<Option<&'m PropertyDef>, MappingError> {
    match owner {
        None => Ok(None),
        Some(ty) => match ty.declared_property(segment) {
            Some(def) => Ok(Some(def)),
            None if ty.is_open => Ok(None),
            None => Err(MappingError::OpenTypeViolation {
                property: segment.to_string(),
                type_name: ty.name.clone(),
            }),
        },
    }
}

fn report(mapping: &PropertyMapping, err: Option<&MappingError>) {
    let target = mapping.target.to_string();
    let path = mapping.path_label();
    let event = match err {
        None => MappingEvent::ValueInjected {
            target: &target,
            path: &path,
        },
        Some(err) => MappingEvent::MappingFailed {
            target: &target,
            path: &path,
            internal: err.is_internal(),
        },
    };
    obs::emit(&event);
}

///
/// TESTS
///
