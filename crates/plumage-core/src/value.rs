use plumage_schema::kind::PrimitiveKind;
use rust_decimal::Decimal;
use serde::Serialize;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};
use uuid::Uuid;

///
/// Value
///
/// A runtime scalar carried by the entity property graph. The variant set
/// is closed over the codec-supported primitive kinds; stream and spatial
/// kinds have no runtime scalar and are excluded by construction.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Value {
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
    DateTime(PrimitiveDateTime),
    DateTimeOffset(OffsetDateTime),
    Guid(Uuid),
    Binary(#[serde(with = "serde_bytes")] Vec<u8>),
    Text(String),
    Duration(Duration),
}

impl Value {
    /// Projection onto the declared primitive kind enumeration.
    #[must_use]
    pub const fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::Int8(_) => PrimitiveKind::Int8,
            Self::Int16(_) => PrimitiveKind::Int16,
            Self::Int32(_) => PrimitiveKind::Int32,
            Self::Int64(_) => PrimitiveKind::Int64,
            Self::Float32(_) => PrimitiveKind::Float32,
            Self::Float64(_) => PrimitiveKind::Float64,
            Self::Decimal(_) => PrimitiveKind::Decimal,
            Self::DateTime(_) => PrimitiveKind::DateTime,
            Self::DateTimeOffset(_) => PrimitiveKind::DateTimeOffset,
            Self::Guid(_) => PrimitiveKind::Guid,
            Self::Binary(_) => PrimitiveKind::Binary,
            Self::Text(_) => PrimitiveKind::Text,
            Self::Duration(_) => PrimitiveKind::Duration,
        }
    }

    /// Stable human-readable value kind label for diagnostics.
    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        self.kind().label()
    }

    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        if let Self::Text(s) = self {
            Some(s.as_str())
        } else {
            None
        }
    }
}

#[macro_export]
macro_rules! impl_from_for {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for! {
    bool               => Bool,
    i8                 => Int8,
    i16                => Int16,
    i32                => Int32,
    i64                => Int64,
    f32                => Float32,
    f64                => Float64,
    Decimal            => Decimal,
    PrimitiveDateTime  => DateTime,
    OffsetDateTime     => DateTimeOffset,
    Uuid               => Guid,
    Vec<u8>            => Binary,
    &str               => Text,
    String             => Text,
    Duration           => Duration,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_projection_matches_variant() {
        assert_eq!(Value::Bool(true).kind(), PrimitiveKind::Bool);
        assert_eq!(Value::from("abc").kind(), PrimitiveKind::Text);
        assert_eq!(Value::from(42i32).kind(), PrimitiveKind::Int32);
        assert_eq!(Value::Binary(vec![1, 2]).kind(), PrimitiveKind::Binary);
    }

    #[test]
    fn kind_label_is_stable() {
        assert_eq!(Value::from(1i64).kind_label(), "Int64");
        assert_eq!(
            Value::Guid(Uuid::nil()).kind_label(),
            PrimitiveKind::Guid.label()
        );
    }

    #[test]
    fn as_text_only_for_text_values() {
        assert_eq!(Value::from("abc").as_text(), Some("abc"));
        assert_eq!(Value::from(1i32).as_text(), None);
    }

    #[test]
    fn serializes_as_externally_tagged_variants() {
        let json = serde_json::to_value(Value::Int32(7)).unwrap();
        assert_eq!(json, serde_json::json!({ "Int32": 7 }));

        let json = serde_json::to_value(Value::Binary(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({ "Binary": [1, 2] }));
    }
}
