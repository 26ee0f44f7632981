use crate::{
    MAX_PATH_DEPTH, MAX_SEGMENT_NAME_LEN,
    mapping::{MappingDeclaration, MultivalueStatus, PropertyMapping},
    model::{Model, ModelError},
    types::{StructuralType, TypeRef},
};
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// CompileError
///
/// Mapping compilation failures. All are terminal for the model being
/// built; a mapping set either compiles completely or not at all.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum CompileError {
    #[error("mapping target '{target}' has an empty source path")]
    EmptyPath { target: String },

    #[error("mapping target '{target}' has an empty segment at index {index}")]
    EmptySegment { target: String, index: usize },

    #[error("mapping source path '{path}' exceeds the maximum depth of {MAX_PATH_DEPTH}")]
    PathTooDeep { path: String },

    #[error("mapping segment '{segment}' exceeds the maximum name length")]
    SegmentTooLong { segment: String },

    #[error("duplicate mapping for source path '{path}'")]
    DuplicatePath { path: String },

    #[error(
        "property '{property}' on type '{type_name}' is not complex; \
         mapping paths may only traverse complex properties"
    )]
    TraversalNotComplex {
        property: String,
        type_name: String,
    },

    #[error(
        "mapping path ends at complex property '{property}'; \
         terminal segments must be primitive or collection typed"
    )]
    TerminalNotPrimitive { property: String },

    #[error("stream property '{property}' cannot appear on a mapping path")]
    StreamSegment { property: String },

    #[error("collection property '{property}' has an unsupported item type '{item}'")]
    InvalidCollectionItem { property: String, item: String },

    #[error("property '{property}' is not declared on type '{type_name}' and the type is not open")]
    UndeclaredProperty {
        property: String,
        type_name: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

///
/// SourceSegment
///
/// One node of the compiled source path tree, keyed by property name.
/// Terminal nodes hold the compiled mapping. The root carries an empty
/// name and no mapping.
///

#[derive(Clone, Debug)]
pub struct SourceSegment {
    property_name: String,
    sub_segments: Vec<SourceSegment>,
    mapping: Option<Arc<PropertyMapping>>,
}

impl SourceSegment {
    fn root() -> Self {
        Self {
            property_name: String::new(),
            sub_segments: Vec::new(),
            mapping: None,
        }
    }

    #[must_use]
    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// Child lookup by property name.
    ///
    /// An absent child means no mapping applies to that sub-path; callers
    /// skip mapping work for the subtree rather than erroring.
    #[must_use]
    pub fn sub_segment(&self, property_name: &str) -> Option<&Self> {
        self.sub_segments
            .iter()
            .find(|s| s.property_name == property_name)
    }

    #[must_use]
    pub fn sub_segments(&self) -> &[Self] {
        &self.sub_segments
    }

    /// The compiled mapping when this node is a mapping's terminal segment.
    #[must_use]
    pub const fn mapping(&self) -> Option<&Arc<PropertyMapping>> {
        self.mapping.as_ref()
    }

    fn get_or_insert(&mut self, property_name: &str) -> &mut Self {
        if let Some(pos) = self
            .sub_segments
            .iter()
            .position(|s| s.property_name == property_name)
        {
            &mut self.sub_segments[pos]
        } else {
            self.sub_segments.push(Self {
                property_name: property_name.to_string(),
                sub_segments: Vec::new(),
                mapping: None,
            });
            self.sub_segments
                .last_mut()
                .expect("segment was just pushed")
        }
    }
}

///
/// SourceTree
///
/// The compiled, model-owned source path tree. Built once per model and
/// immutable afterward; share it across document traversals behind an
/// `Arc` rather than cloning per entity.
///

#[derive(Clone, Debug)]
pub struct SourceTree {
    root_type: String,
    root: SourceSegment,
    mappings: Vec<Arc<PropertyMapping>>,
}

impl SourceTree {
    /// Compile a mapping declaration set against `model`, validating every
    /// path against the root type's declared shape. The root is the entity
    /// type, or the item's complex type for multivalue-item mapping sets.
    pub fn compile(
        model: &Model,
        root_type: &str,
        declarations: &[MappingDeclaration],
    ) -> Result<Self, CompileError> {
        let root_ty =
            model
                .structural_type(root_type)
                .ok_or_else(|| ModelError::TypeNotFound {
                    name: root_type.to_string(),
                })?;

        let mut root = SourceSegment::root();
        let mut mappings = Vec::with_capacity(declarations.len());

        for decl in declarations {
            let mapping = Arc::new(Self::compile_declaration(model, root_ty, decl)?);
            Self::insert(&mut root, &mapping)?;
            mappings.push(mapping);
        }

        Ok(Self {
            root_type: root_type.to_string(),
            root,
            mappings,
        })
    }

    #[must_use]
    pub fn root_type(&self) -> &str {
        &self.root_type
    }

    #[must_use]
    pub const fn root(&self) -> &SourceSegment {
        &self.root
    }

    /// Compiled mappings in declaration order.
    #[must_use]
    pub fn mappings(&self) -> &[Arc<PropertyMapping>] {
        &self.mappings
    }

    /// Validate one declaration and resolve its multivalue status and item
    /// type against the model.
    fn compile_declaration(
        model: &Model,
        root_ty: &StructuralType,
        decl: &MappingDeclaration,
    ) -> Result<PropertyMapping, CompileError> {
        let target_label = decl.target.to_string();

        if decl.source_path.is_empty() {
            return Err(CompileError::EmptyPath {
                target: target_label,
            });
        }
        if decl.source_path.len() > MAX_PATH_DEPTH {
            return Err(CompileError::PathTooDeep {
                path: decl.source_path.join("/"),
            });
        }

        let mut owner = Some(root_ty);
        let mut multivalue_status = MultivalueStatus::None;
        let mut item_type = None;

        for (index, segment) in decl.source_path.iter().enumerate() {
            if segment.is_empty() {
                return Err(CompileError::EmptySegment {
                    target: target_label.clone(),
                    index,
                });
            }
            if segment.len() > MAX_SEGMENT_NAME_LEN {
                return Err(CompileError::SegmentTooLong {
                    segment: segment.clone(),
                });
            }

            let last = index + 1 == decl.source_path.len();
            let declared = owner.and_then(|t: &StructuralType| t.declared_property(segment));

            match declared {
                None => {
                    if let Some(ty) = owner
                        && !ty.is_open
                    {
                        return Err(CompileError::UndeclaredProperty {
                            property: segment.clone(),
                            type_name: ty.name.clone(),
                        });
                    }
                    // Undeclared on an open type: typeless from here down.
                    owner = None;
                }
                Some(def) => match &def.ty {
                    TypeRef::Stream => {
                        return Err(CompileError::StreamSegment {
                            property: segment.clone(),
                        });
                    }
                    TypeRef::Primitive { kind, .. } => {
                        if !last {
                            return Err(CompileError::TraversalNotComplex {
                                property: segment.clone(),
                                type_name: owner.map_or_else(String::new, |t| t.name.clone()),
                            });
                        }
                        if !kind.supports_text_codec() {
                            return Err(CompileError::StreamSegment {
                                property: segment.clone(),
                            });
                        }
                    }
                    TypeRef::Complex { name } => {
                        if last {
                            return Err(CompileError::TerminalNotPrimitive {
                                property: segment.clone(),
                            });
                        }
                        owner = Some(model.complex_type(name)?);
                    }
                    TypeRef::Collection { item } => {
                        if !last {
                            return Err(CompileError::TraversalNotComplex {
                                property: segment.clone(),
                                type_name: owner.map_or_else(String::new, |t| t.name.clone()),
                            });
                        }
                        Self::check_item_type(model, segment, item)?;
                        multivalue_status = MultivalueStatus::MultivalueProperty;
                        item_type = Some((**item).clone());
                    }
                },
            }
        }

        Ok(PropertyMapping {
            source_path: decl.source_path.clone(),
            target: decl.target.clone(),
            multivalue_status,
            item_type,
        })
    }

    fn check_item_type(
        model: &Model,
        property: &str,
        item: &TypeRef,
    ) -> Result<(), CompileError> {
        match item {
            TypeRef::Primitive { kind, .. } if kind.supports_text_codec() => Ok(()),
            TypeRef::Complex { name } => {
                model.complex_type(name)?;
                Ok(())
            }
            _ => Err(CompileError::InvalidCollectionItem {
                property: property.to_string(),
                item: item.to_string(),
            }),
        }
    }

    fn insert(
        root: &mut SourceSegment,
        mapping: &Arc<PropertyMapping>,
    ) -> Result<(), CompileError> {
        let mut node = root;
        for segment in &mapping.source_path {
            node = node.get_or_insert(segment);
        }

        if node.mapping.is_some() {
            return Err(CompileError::DuplicatePath {
                path: mapping.path_label(),
            });
        }
        node.mapping = Some(Arc::clone(mapping));

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        kind::PrimitiveKind,
        mapping::{SyndicationTarget, TargetDescriptor},
        types::StructuralType,
    };

    fn model() -> Model {
        Model::new()
            .with_type(
                StructuralType::entity("Test.Customer")
                    .with_property("Name", TypeRef::nullable(PrimitiveKind::Text))
                    .with_property("Address", TypeRef::complex("Test.Address"))
                    .with_property(
                        "Emails",
                        TypeRef::collection(TypeRef::primitive(PrimitiveKind::Text)),
                    )
                    .with_property("Photo", TypeRef::primitive(PrimitiveKind::Stream)),
            )
            .with_type(
                StructuralType::complex("Test.Address")
                    .with_property("City", TypeRef::primitive(PrimitiveKind::Text)),
            )
            .with_type(StructuralType::entity("Test.OpenThing").open())
    }

    fn title(path: &str) -> MappingDeclaration {
        MappingDeclaration::from_path_str(
            path,
            TargetDescriptor::syndication(SyndicationTarget::Title),
        )
    }

    #[test]
    fn compile_builds_shared_prefix_tree() {
        let decls = [
            MappingDeclaration::from_path_str(
                "Address/City",
                TargetDescriptor::syndication(SyndicationTarget::Summary),
            ),
            title("Name"),
        ];
        let tree = SourceTree::compile(&model(), "Test.Customer", &decls).unwrap();

        let address = tree.root().sub_segment("Address").unwrap();
        assert!(address.mapping().is_none());
        assert!(address.sub_segment("City").unwrap().mapping().is_some());
        assert!(tree.root().sub_segment("Name").unwrap().mapping().is_some());
        assert!(tree.root().sub_segment("Missing").is_none());
        assert_eq!(tree.mappings().len(), 2);
    }

    #[test]
    fn multivalue_terminal_resolves_item_type() {
        let tree = SourceTree::compile(&model(), "Test.Customer", &[title("Emails")]).unwrap();
        let mapping = &tree.mappings()[0];

        assert!(mapping.is_multivalue());
        assert_eq!(
            mapping.item_type,
            Some(TypeRef::primitive(PrimitiveKind::Text))
        );
    }

    #[test]
    fn duplicate_path_is_rejected() {
        let err = SourceTree::compile(
            &model(),
            "Test.Customer",
            &[title("Name"), title("Name")],
        )
        .unwrap_err();

        assert_eq!(
            err,
            CompileError::DuplicatePath {
                path: "Name".to_string()
            }
        );
    }

    #[test]
    fn terminal_complex_is_rejected() {
        let err =
            SourceTree::compile(&model(), "Test.Customer", &[title("Address")]).unwrap_err();
        assert!(matches!(err, CompileError::TerminalNotPrimitive { .. }));
    }

    #[test]
    fn traversal_through_primitive_is_rejected() {
        let err =
            SourceTree::compile(&model(), "Test.Customer", &[title("Name/Inner")]).unwrap_err();
        assert!(matches!(err, CompileError::TraversalNotComplex { .. }));
    }

    #[test]
    fn stream_segment_is_rejected() {
        let err = SourceTree::compile(&model(), "Test.Customer", &[title("Photo")]).unwrap_err();
        assert_eq!(
            err,
            CompileError::StreamSegment {
                property: "Photo".to_string()
            }
        );
    }

    #[test]
    fn undeclared_on_closed_type_is_rejected_at_compile() {
        let err = SourceTree::compile(&model(), "Test.Customer", &[title("Nope")]).unwrap_err();
        assert!(matches!(err, CompileError::UndeclaredProperty { .. }));
    }

    #[test]
    fn undeclared_on_open_type_compiles_typeless() {
        let tree =
            SourceTree::compile(&model(), "Test.OpenThing", &[title("Anything/Deeper")]).unwrap();
        let mapping = &tree.mappings()[0];

        assert_eq!(mapping.multivalue_status, MultivalueStatus::None);
        assert!(mapping.item_type.is_none());
    }
}
