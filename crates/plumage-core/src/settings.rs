use crate::error::MappingError;
use plumage_schema::types::PropertyDef;

///
/// ReaderSettings
///
/// Read-direction view of the surrounding message configuration. The
/// engine consults only the conversion switch; everything else about the
/// reader stays outside the core.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct ReaderSettings {
    /// When set, injected text is stored as nullable text without
    /// conversion to the declared primitive kind.
    pub disable_primitive_type_conversion: bool,
}

///
/// NullPolicy
///
/// What an explicit null means for a declared property in the active
/// protocol version.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum NullPolicy {
    /// Null must be permitted by the declared type.
    #[default]
    Strict,
    /// Null is accepted for any declared property.
    Lenient,
}

///
/// WriterSettings
///

#[derive(Clone, Copy, Debug, Default)]
pub struct WriterSettings {
    pub null_policy: NullPolicy,
}

impl WriterSettings {
    /// Validate an explicit null for a property. An undeclared (open)
    /// property is nullable text and always accepts null.
    pub fn validate_null(
        &self,
        property: &str,
        declared: Option<&PropertyDef>,
    ) -> Result<(), MappingError> {
        match (self.null_policy, declared) {
            (NullPolicy::Lenient, _) | (NullPolicy::Strict, None) => Ok(()),
            (NullPolicy::Strict, Some(def)) => {
                if def.allows_null() {
                    Ok(())
                } else {
                    Err(MappingError::NullNotAllowed {
                        property: property.to_string(),
                    })
                }
            }
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use plumage_schema::{kind::PrimitiveKind, types::TypeRef};

    #[test]
    fn strict_policy_follows_declared_nullability() {
        let settings = WriterSettings::default();

        let nullable = PropertyDef::new("A", TypeRef::nullable(PrimitiveKind::Int32));
        assert!(settings.validate_null("A", Some(&nullable)).is_ok());

        let required = PropertyDef::new("B", TypeRef::primitive(PrimitiveKind::Int32));
        assert_eq!(
            settings.validate_null("B", Some(&required)),
            Err(MappingError::NullNotAllowed {
                property: "B".to_string()
            })
        );

        assert!(settings.validate_null("C", None).is_ok());
    }

    #[test]
    fn lenient_policy_accepts_any_null() {
        let settings = WriterSettings {
            null_policy: NullPolicy::Lenient,
        };
        let required = PropertyDef::new("B", TypeRef::primitive(PrimitiveKind::Int32));
        assert!(settings.validate_null("B", Some(&required)).is_ok());
    }
}
