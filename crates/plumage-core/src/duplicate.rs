use crate::error::MappingError;
use std::collections::HashSet;

///
/// DuplicateChecker
///
/// Owned by the entry being processed. Records the names injection added
/// at the entry's own property level; two mappings terminating at the same
/// entry-level name surface as a duplicate, while a name already present
/// from document content stays untouched under the precedence rule.
///
/// Inner complex values skip this check: injection never adds a name an
/// in-document parse already produced at that level, and duplicate source
/// paths are rejected at mapping compilation.
///

#[derive(Debug, Default)]
pub struct DuplicateChecker {
    injected: HashSet<String>,
}

impl DuplicateChecker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a prior injection added this entry-level name.
    #[must_use]
    pub fn was_injected(&self, name: &str) -> bool {
        self.injected.contains(name)
    }

    /// Record a name about to be inserted at the entry level.
    pub fn record(&mut self, name: &str) -> Result<(), MappingError> {
        if self.injected.insert(name.to_string()) {
            Ok(())
        } else {
            Err(MappingError::DuplicateProperty {
                property: name.to_string(),
            })
        }
    }
}

///
/// TESTS
///
