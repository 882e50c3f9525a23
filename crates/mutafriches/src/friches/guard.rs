use std::collections::BTreeMap;

use super::criteria::{CriterionKey, SiteInput};
use super::evaluation::MutabiliteError;

/// Guard turning raw key/code maps into a typed `SiteInput`.
#[derive(Debug, Clone, Default)]
pub struct InputGuard {
    strict: bool,
}

impl InputGuard {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Whether every criterion must be present in the raw map.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Validate each raw field against its criterion domain.
    ///
    /// Absent criteria stay at `ne-sait-pas` unless the guard is strict.
    pub fn site_from_fields(
        &self,
        fields: &BTreeMap<String, String>,
    ) -> Result<SiteInput, MutabiliteError> {
        let mut input = SiteInput::default();

        for (raw_key, code) in fields {
            let key = CriterionKey::from_key(raw_key).ok_or_else(|| {
                MutabiliteError::UnknownCriterion {
                    key: raw_key.clone(),
                }
            })?;
            if !input.set_code(key, code.trim()) {
                return Err(MutabiliteError::InvalidInputValue {
                    key: raw_key.clone(),
                    value: code.clone(),
                });
            }
        }

        if self.strict {
            if let Some(missing) = CriterionKey::ALL
                .iter()
                .find(|key| !fields.contains_key(key.key()))
            {
                return Err(MutabiliteError::MissingInputField {
                    key: missing.key().to_string(),
                });
            }
        }

        Ok(input)
    }
}
