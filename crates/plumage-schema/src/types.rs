use crate::kind::PrimitiveKind;
use serde::Serialize;
use std::fmt;

///
/// TypeRef
///
/// Declared type shape of a property. Both engines dispatch exhaustively on
/// this union; there is no runtime type inspection anywhere downstream.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum TypeRef {
    Primitive { kind: PrimitiveKind, nullable: bool },
    Complex { name: String },
    Collection { item: Box<TypeRef> },
    Stream,
}

impl TypeRef {
    #[must_use]
    pub const fn primitive(kind: PrimitiveKind) -> Self {
        Self::Primitive {
            kind,
            nullable: false,
        }
    }

    #[must_use]
    pub const fn nullable(kind: PrimitiveKind) -> Self {
        Self::Primitive {
            kind,
            nullable: true,
        }
    }

    #[must_use]
    pub fn complex(name: impl Into<String>) -> Self {
        Self::Complex { name: name.into() }
    }

    #[must_use]
    pub fn collection(item: Self) -> Self {
        Self::Collection {
            item: Box::new(item),
        }
    }

    #[must_use]
    pub const fn is_complex(&self) -> bool {
        matches!(self, Self::Complex { .. })
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self, Self::Collection { .. })
    }

    /// Complex type full name, when this reference is complex-typed.
    #[must_use]
    pub fn complex_name(&self) -> Option<&str> {
        match self {
            Self::Complex { name } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive { kind, nullable } => {
                write!(f, "{kind}")?;
                if *nullable {
                    write!(f, "?")?;
                }
                Ok(())
            }
            Self::Complex { name } => write!(f, "{name}"),
            Self::Collection { item } => write!(f, "Collection({item})"),
            Self::Stream => write!(f, "Stream"),
        }
    }
}

///
/// PropertyDef
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PropertyDef {
    pub name: String,
    pub ty: TypeRef,
}

impl PropertyDef {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Whether an explicit null is acceptable for this property.
    ///
    /// Complex and collection properties carry null through their own
    /// traversal rules; only the primitive flag is consulted here.
    #[must_use]
    pub const fn allows_null(&self) -> bool {
        match &self.ty {
            TypeRef::Primitive { nullable, .. } => *nullable,
            TypeRef::Complex { .. } | TypeRef::Collection { .. } => true,
            TypeRef::Stream => false,
        }
    }
}

///
/// StructuralKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum StructuralKind {
    Entity,
    Complex,
}

///
/// StructuralType
///
/// An entity or complex type declaration. Open types accept properties
/// beyond the declared list.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StructuralType {
    pub name: String,
    pub kind: StructuralKind,
    pub is_open: bool,
    pub properties: Vec<PropertyDef>,
}

impl StructuralType {
    #[must_use]
    pub fn entity(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StructuralKind::Entity,
            is_open: false,
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn complex(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StructuralKind::Complex,
            is_open: false,
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub const fn open(mut self) -> Self {
        self.is_open = true;
        self
    }

    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.properties.push(PropertyDef::new(name, ty));
        self
    }

    /// Declared property lookup; `None` for undeclared names.
    ///
    /// Undeclared-on-open is a legal outcome the caller resolves against
    /// `is_open`; this lookup never errors.
    #[must_use]
    pub fn declared_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }
}

///
/// TESTS
///
