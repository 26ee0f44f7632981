//! Static model layer for plumage: primitive kinds, type references,
//! structural type declarations, mapping declarations, and the compiled
//! source path tree the runtime engines traverse.
#![warn(unreachable_pub)]

pub mod kind;
pub mod mapping;
pub mod model;
pub mod tree;
pub mod types;

use crate::{model::ModelError, tree::CompileError};
use thiserror::Error as ThisError;

///
/// CONSTANTS
///

/// Maximum number of segments allowed on a mapping source path.
///
/// Keeps compiled trees and traversal recursion within bounded depth; real
/// models rarely nest mapped properties more than three levels.
pub const MAX_PATH_DEPTH: usize = 16;

/// Maximum length for a mapping source path segment name.
pub const MAX_SEGMENT_NAME_LEN: usize = 128;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors or compilation entry points are re-exported here.
///

pub mod prelude {
    pub use crate::{
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

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Model(#[from] ModelError),
}
