//! Validation of the two-field lead form.
//!
//! Both fields are always checked together so the visitor sees every
//! problem at once. A draft that passes becomes a [`ValidLead`], which is
//! the only input [`crate::LeadRecord`] can be built from.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::phone::canonicalize_phone;

/// Optional `+`, then at least ten digits, spaces, hyphens or parentheses.
///
/// Intentionally loose: it checks the shape of what was typed, not that the
/// number is dialable.
static PHONE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-()]{10,}$").expect("valid phone shape regex"));

/// The fields of the lead form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Phone,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Name, Field::Phone];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Phone => "phone",
        }
    }

    fn required_message(self) -> &'static str {
        match self {
            Field::Name => "Enter your name",
            Field::Phone => "Enter your phone number",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single field was rejected. `Display` is the message shown to the
/// visitor under the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{}", .0.required_message())]
    Required(Field),

    #[error("Enter a valid phone number")]
    Format,
}

/// Per-field validation results for the current draft.
///
/// Recomputed wholesale by [`validate_draft`]; individual entries are cleared
/// with [`FieldErrors::clear`] as soon as the visitor edits that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    name: Option<FieldError>,
    phone: Option<FieldError>,
}

impl FieldErrors {
    #[must_use]
    pub fn get(&self, field: Field) -> Option<FieldError> {
        match field {
            Field::Name => self.name,
            Field::Phone => self.phone,
        }
    }

    pub fn set(&mut self, field: Field, error: FieldError) {
        *self.slot(field) = Some(error);
    }

    /// Removes the error for `field`, returning it if there was one.
    pub fn clear(&mut self, field: Field) -> Option<FieldError> {
        self.slot(field).take()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Iterates over the fields that currently have an error, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        Field::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|error| (field, error)))
    }

    fn slot(&mut self, field: Field) -> &mut Option<FieldError> {
        match field {
            Field::Name => &mut self.name,
            Field::Phone => &mut self.phone,
        }
    }
}

/// What the visitor has typed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadDraft {
    pub name: String,
    pub phone: String,
}

/// A draft that passed validation, with the name trimmed and the phone
/// canonicalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLead {
    name: String,
    phone: String,
}

impl ValidLead {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }
}

/// Validates both fields of `draft`.
///
/// # Errors
///
/// Returns the complete [`FieldErrors`] set when at least one field fails.
pub fn validate_draft(draft: &LeadDraft) -> Result<ValidLead, FieldErrors> {
    let mut errors = FieldErrors::default();

    if let Some(error) = check_name(&draft.name) {
        errors.set(Field::Name, error);
    }
    if let Some(error) = check_phone(&draft.phone) {
        errors.set(Field::Phone, error);
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidLead {
        name: draft.name.trim().to_owned(),
        phone: canonicalize_phone(&draft.phone),
    })
}

fn check_name(name: &str) -> Option<FieldError> {
    name.trim()
        .is_empty()
        .then_some(FieldError::Required(Field::Name))
}

/// The shape check runs on the raw value with whitespace removed, not on the
/// canonical form.
fn check_phone(phone: &str) -> Option<FieldError> {
    if phone.trim().is_empty() {
        return Some(FieldError::Required(Field::Phone));
    }

    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    if PHONE_SHAPE.is_match(&compact) {
        None
    } else {
        Some(FieldError::Format)
    }
}
