use crate::types::TypeRef;
use serde::Serialize;
use std::fmt;

///
/// SyndicationTarget
///
/// Native document elements a mapped property may surface in. The engines
/// never interpret these; they travel with the mapping for the surrounding
/// writer/reader to act on.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum SyndicationTarget {
    AuthorEmail,
    AuthorName,
    AuthorUri,
    ContributorEmail,
    ContributorName,
    ContributorUri,
    Published,
    Rights,
    Summary,
    Title,
    Updated,
}

impl SyndicationTarget {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AuthorEmail => "author/email",
            Self::AuthorName => "author/name",
            Self::AuthorUri => "author/uri",
            Self::ContributorEmail => "contributor/email",
            Self::ContributorName => "contributor/name",
            Self::ContributorUri => "contributor/uri",
            Self::Published => "published",
            Self::Rights => "rights",
            Self::Summary => "summary",
            Self::Title => "title",
            Self::Updated => "updated",
        }
    }
}

///
/// TargetContentKind
///
/// Text construct flavor for the target element.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum TargetContentKind {
    #[default]
    Plaintext,
    Html,
    Xhtml,
}

///
/// TargetKind
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum TargetKind {
    Syndication(SyndicationTarget),
    Custom {
        /// Target element path, e.g. `"nightclub/entrance"`.
        path: String,
        namespace_uri: Option<String>,
        namespace_prefix: Option<String>,
    },
}

///
/// TargetDescriptor
///
/// Custom-location metadata attached to a mapping. Opaque to the traversal
/// engines beyond carry-through and diagnostics labels.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TargetDescriptor {
    pub kind: TargetKind,
    pub content_kind: TargetContentKind,

    /// When false, the mapped value appears only at the custom location and
    /// is omitted from the default structured serialization.
    pub keep_in_content: bool,
}

impl TargetDescriptor {
    #[must_use]
    pub const fn syndication(target: SyndicationTarget) -> Self {
        Self {
            kind: TargetKind::Syndication(target),
            content_kind: TargetContentKind::Plaintext,
            keep_in_content: true,
        }
    }

    #[must_use]
    pub fn custom(path: impl Into<String>, namespace_uri: Option<&str>) -> Self {
        Self {
            kind: TargetKind::Custom {
                path: path.into(),
                namespace_uri: namespace_uri.map(ToString::to_string),
                namespace_prefix: None,
            },
            content_kind: TargetContentKind::Plaintext,
            keep_in_content: true,
        }
    }

    #[must_use]
    pub const fn without_content_copy(mut self) -> Self {
        self.keep_in_content = false;
        self
    }

    #[must_use]
    pub const fn with_content_kind(mut self, content_kind: TargetContentKind) -> Self {
        self.content_kind = content_kind;
        self
    }
}

impl fmt::Display for TargetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TargetKind::Syndication(target) => write!(f, "{}", target.label()),
            TargetKind::Custom { path, .. } => write!(f, "{path}"),
        }
    }
}

///
/// MultivalueStatus
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum MultivalueStatus {
    #[default]
    None,
    MultivalueProperty,
}

///
/// MappingDeclaration
///
/// Pre-compilation form of a mapping: a raw source path plus target
/// metadata. Compilation against a model resolves multivalue status and
/// item types and produces a [`PropertyMapping`].
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MappingDeclaration {
    pub source_path: Vec<String>,
    pub target: TargetDescriptor,
}

impl MappingDeclaration {
    #[must_use]
    pub fn new(source_path: Vec<String>, target: TargetDescriptor) -> Self {
        Self {
            source_path,
            target,
        }
    }

    /// Build a declaration from a `'/'`-separated source path string.
    #[must_use]
    pub fn from_path_str(path: &str, target: TargetDescriptor) -> Self {
        Self {
            source_path: path.split('/').map(ToString::to_string).collect(),
            target,
        }
    }
}

///
/// PropertyMapping
///
/// Immutable compiled mapping, one per declaration. Owned by the source
/// tree; entity instances share the compiled set by reference.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PropertyMapping {
    pub source_path: Vec<String>,
    pub target: TargetDescriptor,
    pub multivalue_status: MultivalueStatus,

    /// Resolved item type when the mapped property is a collection.
    pub item_type: Option<TypeRef>,
}

impl PropertyMapping {
    #[must_use]
    pub const fn is_multivalue(&self) -> bool {
        matches!(self.multivalue_status, MultivalueStatus::MultivalueProperty)
    }

    /// Source path rendered with `'/'` separators for diagnostics.
    #[must_use]
    pub fn path_label(&self) -> String {
        self.source_path.join("/")
    }
}

///
/// TESTS
///
