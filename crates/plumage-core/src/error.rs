use plumage_schema::{kind::PrimitiveKind, model::ModelError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Signals a defect in mapping compilation or engine dispatch rather than
/// bad input data; diagnostics must keep it distinct from the
/// user-triggerable [`MappingError`] variants.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{origin}:{class}: {message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct a codec-origin unsupported-kind error.
    ///
    /// Raised for target kinds with no text representation; these are
    /// policy gaps filtered out upstream, never user input errors.
    pub(crate) fn codec_unsupported(kind: PrimitiveKind) -> Self {
        Self::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Codec,
            format!("no text representation for primitive kind {kind}"),
        )
    }

    /// Construct a codec-origin invariant violation.
    pub(crate) fn codec_invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvariantViolation, ErrorOrigin::Codec, message)
    }

    /// Construct an extraction-origin invariant violation.
    pub(crate) fn extract_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Extract,
            message,
        )
    }

    /// Construct an injection-origin invariant violation.
    pub(crate) fn inject_invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvariantViolation, ErrorOrigin::Inject, message)
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Internal,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Internal => "internal",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Codec,
    Extract,
    Inject,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Codec => "codec",
            Self::Extract => "extract",
            Self::Inject => "inject",
        };
        write!(f, "{label}")
    }
}

///
/// MappingError
///
/// Failures surfaced by the traversal engines and the codec. All are
/// terminal for the current document: the engines signal and never
/// partially commit, and nothing here is retried internally.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum MappingError {
    #[error("mapping path traverses property '{property}', which is not complex on the instance")]
    TraversalNotComplex { property: String },

    #[error(
        "mapping path ends at property '{property}', which is not primitive or collection typed"
    )]
    TerminalNotPrimitive { property: String },

    #[error("mapped property '{property}' is missing from the instance")]
    MissingProperty { property: String },

    #[error(
        "value of kind {found} for property '{property}' does not match its declared type {declared}"
    )]
    ValueKindMismatch {
        property: String,
        found: &'static str,
        declared: String,
    },

    #[error("cannot convert '{text}' to a value of primitive kind {target}")]
    TextNotConvertible { target: PrimitiveKind, text: String },

    #[error("property '{property}' is undeclared on type '{type_name}', which is not open")]
    OpenTypeViolation {
        property: String,
        type_name: String,
    },

    #[error("null value is not allowed for property '{property}'")]
    NullNotAllowed { property: String },

    #[error("duplicate property '{property}' on the entry")]
    DuplicateProperty { property: String },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl MappingError {
    /// Whether this failure signals an engine/model defect rather than bad
    /// input data.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_display_with_taxonomy() {
        let err = InternalError::codec_unsupported(PrimitiveKind::Stream);
        assert_eq!(
            err.to_string(),
            "codec:unsupported: no text representation for primitive kind Stream"
        );
    }

    #[test]
    fn internal_variant_is_classified() {
        let err = MappingError::from(InternalError::inject_invariant("boom"));
        assert!(err.is_internal());

        let err = MappingError::MissingProperty {
            property: "Name".to_string(),
        };
        assert!(!err.is_internal());
    }
}
