//! Local submit gate: required fields and the optional postal code shape.

use regex::Regex;
use thiserror::Error;

use address_editor_sdk::{Address, AddressField};

/// Why a draft was rejected before any network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required fields missing: {}", join_fields(.fields))]
    MissingFields { fields: Vec<AddressField> },

    #[error("postal code does not match the expected format")]
    InvalidPostalCode,
}

fn join_fields(fields: &[AddressField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Rules applied by `submit()` before talking to the backend.
#[derive(Debug, Clone, Default)]
pub struct ValidationRules {
    postal_code: Option<Regex>,
}

impl ValidationRules {
    /// Only the required-field check.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also require the postal code to match `pattern`.
    ///
    /// # Errors
    /// Returns the regex compile error if `pattern` is not a valid regex.
    pub fn with_postal_code_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.postal_code = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Check `address`.
    ///
    /// Missing fields are reported before the postal code shape; a blank
    /// postal code is a missing field, never an invalid one.
    ///
    /// # Errors
    /// Returns the first failing rule.
    pub fn validate(&self, address: &Address) -> Result<(), ValidationError> {
        let missing: Vec<AddressField> = AddressField::REQUIRED
            .into_iter()
            .filter(|field| address.is_blank(*field))
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields { fields: missing });
        }

        if let Some(re) = &self.postal_code
            && !re.is_match(address.postal_code.trim())
        {
            return Err(ValidationError::InvalidPostalCode);
        }

        Ok(())
    }
}
