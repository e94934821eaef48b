use std::fmt;

use thiserror::Error;

/// Minimum length of the trimmed user name.
pub const MIN_NAME_CHARS: usize = 2;

pub const NAME_MESSAGE: &str = "Please enter your full name (at least 2 characters)";
pub const CATEGORY_MESSAGE: &str = "Please select a category";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryField {
    Name,
    Category,
}

/// A single inline validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: EntryField,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

/// All field problems found on the entry form, reported together.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid entry: {}", .errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct EntryError {
    errors: Vec<FieldError>,
}

impl EntryError {
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    #[must_use]
    pub fn message_for(&self, field: EntryField) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }
}

/// Raw input from the entry page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub name: String,
    pub category: Option<String>,
}

/// Entry data that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEntry {
    pub name: String,
    pub category: String,
}

impl EntryForm {
    #[must_use]
    pub fn new(name: impl Into<String>, category: Option<String>) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }

    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns `EntryError` listing every invalid field.
    pub fn validate(&self) -> Result<ValidEntry, EntryError> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.chars().count() < MIN_NAME_CHARS {
            errors.push(FieldError {
                field: EntryField::Name,
                message: NAME_MESSAGE,
            });
        }

        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        if category.is_none() {
            errors.push(FieldError {
                field: EntryField::Category,
                message: CATEGORY_MESSAGE,
            });
        }

        match category {
            Some(category) if errors.is_empty() => Ok(ValidEntry {
                name: name.to_string(),
                category: category.to_string(),
            }),
            _ => Err(EntryError { errors }),
        }
    }
}
