use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};

///
/// PrimitiveKind
///
/// Closed enumeration of scalar kinds a declared property may carry.
///
/// `Stream`, `Geography`, and `Geometry` are declarable but have no text
/// representation in the primitive codec; reaching them during mapping
/// traversal signals a model defect rather than bad input.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, Hash, PartialEq, Serialize,
)]
pub enum PrimitiveKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    DateTime,
    DateTimeOffset,
    Guid,
    Binary,
    Text,
    Duration,
    Stream,
    Geography,
    Geometry,
}

impl PrimitiveKind {
    /// Returns true for kinds the primitive codec can render as text.
    #[must_use]
    pub const fn supports_text_codec(self) -> bool {
        !matches!(self, Self::Stream | Self::Geography | Self::Geometry)
    }

    /// Returns true for the spatial kinds, which are policy gaps in the
    /// codec rather than user-facing conversion targets.
    #[must_use]
    pub const fn is_spatial(self) -> bool {
        matches!(self, Self::Geography | Self::Geometry)
    }

    #[must_use]
    pub const fn is_stream(self) -> bool {
        matches!(self, Self::Stream)
    }

    /// Stable human-readable kind label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::Decimal => "Decimal",
            Self::DateTime => "DateTime",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::Guid => "Guid",
            Self::Binary => "Binary",
            Self::Text => "Text",
            Self::Duration => "Duration",
            Self::Stream => "Stream",
            Self::Geography => "Geography",
            Self::Geometry => "Geometry",
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_support_excludes_stream_and_spatial() {
        assert!(PrimitiveKind::Text.supports_text_codec());
        assert!(PrimitiveKind::Binary.supports_text_codec());
        assert!(!PrimitiveKind::Stream.supports_text_codec());
        assert!(!PrimitiveKind::Geography.supports_text_codec());
        assert!(!PrimitiveKind::Geometry.supports_text_codec());
    }

    #[test]
    fn label_matches_display() {
        for kind in [
            PrimitiveKind::Bool,
            PrimitiveKind::Int32,
            PrimitiveKind::DateTimeOffset,
            PrimitiveKind::Guid,
        ] {
            assert_eq!(kind.label(), kind.to_string());
        }
    }

    #[test]
    fn from_str_round_trips() {
        let kind: PrimitiveKind = "Duration".parse().unwrap();
        assert_eq!(kind, PrimitiveKind::Duration);
        assert!("NotAKind".parse::<PrimitiveKind>().is_err());
    }

    #[test]
    fn serializes_as_variant_name() {
        assert_eq!(
            serde_json::to_string(&PrimitiveKind::DateTimeOffset).unwrap(),
            "\"DateTimeOffset\""
        );
    }
}
