//! Public models for the `address-editor` module.
//!
//! These are transport-agnostic data structures; the wire format lives in
//! the module's HTTP adapter.

use std::fmt;

/// Customer identifier the address belongs to (a CPF in the Brazilian storefront).
///
/// Opaque to this module: no shape validation is performed.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CustomerId(String);

impl CustomerId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Personal data: keep it out of logs and panics.
impl fmt::Debug for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomerId(***)")
    }
}

/// A shipping address draft.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    pub street: String,
    pub number: u32,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    /// Optional; never required for submission.
    pub complement: String,
}

/// One field of an [`Address`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    Street,
    Number,
    Neighborhood,
    City,
    State,
    PostalCode,
    Country,
    Complement,
}

impl AddressField {
    /// All fields in form order.
    pub const ALL: [AddressField; 8] = [
        AddressField::Street,
        AddressField::Number,
        AddressField::Neighborhood,
        AddressField::City,
        AddressField::State,
        AddressField::PostalCode,
        AddressField::Country,
        AddressField::Complement,
    ];

    /// Fields that must be filled before a draft may be submitted.
    pub const REQUIRED: [AddressField; 7] = [
        AddressField::Street,
        AddressField::Number,
        AddressField::Neighborhood,
        AddressField::City,
        AddressField::State,
        AddressField::PostalCode,
        AddressField::Country,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AddressField::Street => "street",
            AddressField::Number => "number",
            AddressField::Neighborhood => "neighborhood",
            AddressField::City => "city",
            AddressField::State => "state",
            AddressField::PostalCode => "postal_code",
            AddressField::Country => "country",
            AddressField::Complement => "complement",
        }
    }

    #[must_use]
    pub fn is_required(self) -> bool {
        self != AddressField::Complement
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value typed into a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(u32),
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(value)
    }
}

impl Address {
    /// Overwrite one field.
    ///
    /// Never fails: text given for `number` is parsed (trimmed) and becomes
    /// `0` when it is not a valid `u32`, which the submit gate then rejects;
    /// a number given for a text field is stored in decimal form.
    pub fn set(&mut self, field: AddressField, value: FieldValue) {
        match self.text_slot(field) {
            Some(slot) => {
                *slot = match value {
                    FieldValue::Text(text) => text,
                    FieldValue::Number(n) => n.to_string(),
                };
            }
            None => {
                self.number = match value {
                    FieldValue::Number(n) => n,
                    FieldValue::Text(text) => text.trim().parse().unwrap_or(0),
                };
            }
        }
    }

    /// Whether `field` counts as empty (blank text or a zero number).
    #[must_use]
    pub fn is_blank(&self, field: AddressField) -> bool {
        match field {
            AddressField::Number => self.number == 0,
            _ => self.text(field).is_none_or(|text| text.trim().is_empty()),
        }
    }

    /// Text content of `field`, or `None` for the numeric field.
    #[must_use]
    pub fn text(&self, field: AddressField) -> Option<&str> {
        let text = match field {
            AddressField::Street => &self.street,
            AddressField::Neighborhood => &self.neighborhood,
            AddressField::City => &self.city,
            AddressField::State => &self.state,
            AddressField::PostalCode => &self.postal_code,
            AddressField::Country => &self.country,
            AddressField::Complement => &self.complement,
            AddressField::Number => return None,
        };
        Some(text)
    }

    fn text_slot(&mut self, field: AddressField) -> Option<&mut String> {
        let slot = match field {
            AddressField::Street => &mut self.street,
            AddressField::Neighborhood => &mut self.neighborhood,
            AddressField::City => &mut self.city,
            AddressField::State => &mut self.state,
            AddressField::PostalCode => &mut self.postal_code,
            AddressField::Country => &mut self.country,
            AddressField::Complement => &mut self.complement,
            AddressField::Number => return None,
        };
        Some(slot)
    }
}
