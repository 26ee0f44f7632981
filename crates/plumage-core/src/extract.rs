//! Write-direction engine: read a property value out of the entity graph
//! so the surrounding writer can place it at a mapping's custom location.
//!
//! Entry points descend in context: whole entry, multivalue item, nested
//! complex value. All funnel into one recursive primitive over a property
//! list, a path index, and the owning structural type.

use crate::{
    cache::{EntryValueCache, ItemValueCache},
    error::{InternalError, MappingError},
    graph::{CollectionItem, CollectionValue, Property, PropertyValue},
    obs::{self, MappingEvent},
    settings::WriterSettings,
    value::Value,
};
use plumage_schema::{
    mapping::PropertyMapping,
    model::Model,
    types::{PropertyDef, StructuralType, TypeRef},
};

///
/// Extracted
///
/// Three-way traversal outcome. "Absent because an ancestor was null" is
/// distinct from "explicitly null": the caller reserves a custom location
/// for the latter but not the former.
///

#[derive(Clone, Debug)]
pub enum Extracted<'g> {
    /// A scalar present at the terminal segment.
    Value {
        value: &'g Value,
        declared: Option<TypeRef>,
    },
    /// A collection's backing value, returned as-is for the caller to fan
    /// out item by item.
    Collection {
        value: &'g CollectionValue,
        item_type: Option<TypeRef>,
    },
    /// Explicit, validated null at the terminal segment.
    Null,
    /// No value because a non-terminal segment was null or missing.
    AncestorNull,
}

impl Extracted<'_> {
    #[must_use]
    pub const fn is_ancestor_null(&self) -> bool {
        matches!(self, Self::AncestorNull)
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Extract the value for a whole-entry mapping.
pub fn extract_entry_value<'g>(
    model: &Model,
    entry_type: &StructuralType,
    mapping: &PropertyMapping,
    cache: &EntryValueCache<'g>,
    settings: &WriterSettings,
) -> Result<Extracted<'g>, MappingError> {
    let result = extract_at(
        model,
        mapping,
        cache,
        cache.entry_properties(),
        0,
        Some(entry_type),
        settings,
    );
    report(mapping, result.as_ref().err());

    result
}

/// Extract the value for a mapping rooted at a nested complex value.
///
/// `complex_type` is `None` when the value sits under an undeclared (open)
/// property and is therefore typeless.
pub fn extract_complex_value<'g>(
    model: &Model,
    complex_type: Option<&StructuralType>,
    mapping: &PropertyMapping,
    cache: &EntryValueCache<'g>,
    settings: &WriterSettings,
) -> Result<Extracted<'g>, MappingError> {
    let result = extract_at(
        model,
        mapping,
        cache,
        cache.entry_properties(),
        0,
        complex_type,
        settings,
    );
    report(mapping, result.as_ref().err());

    result
}

/// Extract the value for a mapping applied to one multivalue item.
///
/// Primitive items are the mapped value themselves; complex items are
/// traversed like a miniature entry via the item's own cache, against a
/// mapping compiled for the item type.
pub fn extract_item_value<'g>(
    model: &Model,
    item_type: Option<&StructuralType>,
    mapping: &PropertyMapping,
    item_cache: &ItemValueCache<'g>,
    settings: &WriterSettings,
) -> Result<Extracted<'g>, MappingError> {
    let result = match item_cache.item() {
        CollectionItem::Primitive(value) => Ok(Extracted::Value {
            value,
            declared: mapping.item_type.clone(),
        }),
        CollectionItem::Complex(_) => match item_cache.complex() {
            Some(cache) => extract_at(
                model,
                mapping,
                cache,
                cache.entry_properties(),
                0,
                item_type,
                settings,
            ),
            None => Err(InternalError::extract_invariant(
                "complex multivalue item without an item cache",
            )
            .into()),
        },
    };
    report(mapping, result.as_ref().err());

    result
}

/// The recursive primitive both directions of descent share.
fn extract_at<'g>(
    model: &Model,
    mapping: &PropertyMapping,
    cache: &EntryValueCache<'g>,
    properties: &'g [Property],
    index: usize,
    owner: Option<&StructuralType>,
    settings: &WriterSettings,
) -> Result<Extracted<'g>, MappingError> {
    let segment = &mapping.source_path[index];
    let last = index + 1 == mapping.source_path.len();
    let declared = resolve_declared(owner, segment)?;

    if last {
        extract_terminal(model, properties, segment, declared, settings)
    } else {
        // Path shape first: a declared non-complex segment is wrong even
        // when the instance happens to be missing the property.
        if let Some(def) = declared
            && !def.ty.is_complex()
        {
            return Err(MappingError::TraversalNotComplex {
                property: segment.clone(),
            });
        }

        let Some(property) = find(properties, segment) else {
            return Ok(Extracted::AncestorNull);
        };

        match &property.value {
            PropertyValue::Null => Ok(Extracted::AncestorNull),
            PropertyValue::Complex(id) => {
                let next_owner = match declared.and_then(|d| d.ty.complex_name()) {
                    Some(name) => Some(model.complex_type(name)?),
                    None => None,
                };
                extract_at(
                    model,
                    mapping,
                    cache,
                    cache.complex_properties(*id),
                    index + 1,
                    next_owner,
                    settings,
                )
            }
            PropertyValue::Primitive(_)
            | PropertyValue::Collection(_)
            | PropertyValue::Stream(_) => Err(MappingError::TraversalNotComplex {
                property: segment.clone(),
            }),
        }
    }
}

fn extract_terminal<'g>(
    model: &Model,
    properties: &'g [Property],
    segment: &str,
    declared: Option<&PropertyDef>,
    settings: &WriterSettings,
) -> Result<Extracted<'g>, MappingError> {
    if let Some(def) = declared
        && !matches!(def.ty, TypeRef::Primitive { .. } | TypeRef::Collection { .. })
    {
        return Err(MappingError::TerminalNotPrimitive {
            property: segment.to_string(),
        });
    }

    // A declared mapped property the writer did not populate is a hard
    // failure, unlike the implicit-null rule for non-terminal segments.
    let Some(property) = find(properties, segment) else {
        return Err(MappingError::MissingProperty {
            property: segment.to_string(),
        });
    };

    match &property.value {
        PropertyValue::Null => {
            settings.validate_null(segment, declared)?;
            Ok(Extracted::Null)
        }
        PropertyValue::Complex(_) => Err(MappingError::TerminalNotPrimitive {
            property: segment.to_string(),
        }),
        PropertyValue::Collection(value) => {
            let item_type = match declared.map(|d| &d.ty) {
                Some(TypeRef::Collection { item }) => {
                    if let Some(name) = item.complex_name() {
                        model.complex_type(name)?;
                    }
                    Some((**item).clone())
                }
                Some(other) => {
                    return Err(MappingError::ValueKindMismatch {
                        property: segment.to_string(),
                        found: "Collection",
                        declared: other.to_string(),
                    });
                }
                None => None,
            };

            Ok(Extracted::Collection { value, item_type })
        }
        PropertyValue::Primitive(value) => {
            if let Some(def) = declared {
                match &def.ty {
                    TypeRef::Primitive { kind, .. } if value.kind() == *kind => {}
                    other => {
                        return Err(MappingError::ValueKindMismatch {
                            property: segment.to_string(),
                            found: value.kind_label(),
                            declared: other.to_string(),
                        });
                    }
                }
            }

            Ok(Extracted::Value {
                value,
                declared: declared.map(|d| d.ty.clone()),
            })
        }
        PropertyValue::Stream(_) => Err(MappingError::Internal(
            InternalError::extract_invariant(format!(
                "stream-typed property '{segment}' reached extraction"
            )),
        )),
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

fn find<'g>(properties: &'g [Property], name: &str) -> Option<&'g Property> {
    properties.iter().find(|p| p.name == name)
}

fn report(mapping: &PropertyMapping, err: Option<&MappingError>) {
    let target = mapping.target.to_string();
    let path = mapping.path_label();
    let event = match err {
        None => MappingEvent::ValueExtracted {
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
