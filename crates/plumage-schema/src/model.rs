use crate::types::{StructuralKind, StructuralType};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// ModelError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ModelError {
    #[error("type not found in model: '{name}'")]
    TypeNotFound { name: String },

    #[error("type '{name}' is not a {expected:?} type")]
    KindMismatch {
        name: String,
        expected: StructuralKind,
    },
}

///
/// Model
///
/// The schema a mapping set is compiled against: structural types keyed by
/// full name. Read-only after construction; the engines consult it for
/// declared-property lookup and type-name round-tripping.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct Model {
    types: BTreeMap<String, StructuralType>,
}

impl Model {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_type(mut self, ty: StructuralType) -> Self {
        self.types.insert(ty.name.clone(), ty);
        self
    }

    #[must_use]
    pub fn structural_type(&self, name: &str) -> Option<&StructuralType> {
        self.types.get(name)
    }

    /// Resolve a type name with an entity-kind expectation.
    pub fn entity_type(&self, name: &str) -> Result<&StructuralType, ModelError> {
        self.type_of_kind(name, StructuralKind::Entity)
    }

    /// Resolve a type name with a complex-kind expectation.
    ///
    /// Used wherever a declared complex reference or a collection item type
    /// name must round-trip through the model.
    pub fn complex_type(&self, name: &str) -> Result<&StructuralType, ModelError> {
        self.type_of_kind(name, StructuralKind::Complex)
    }

    fn type_of_kind(
        &self,
        name: &str,
        expected: StructuralKind,
    ) -> Result<&StructuralType, ModelError> {
        let ty = self.types.get(name).ok_or_else(|| ModelError::TypeNotFound {
            name: name.to_string(),
        })?;

        if ty.kind == expected {
            Ok(ty)
        } else {
            Err(ModelError::KindMismatch {
                name: name.to_string(),
                expected,
            })
        }
    }
}

///
/// TESTS
///
