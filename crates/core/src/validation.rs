//! Form input validation
//!
//! Provides a fluent validator for client-side form schemas. Rules are
//! evaluated in order and only the first failing rule of each field is
//! reported, so every field shows at most one message.
//!
//! # Example
//!
//! ```rust
//! use homecook_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("name", "", "Name is required.")
//!     .min_length("name", "", 2, "Name must be at least 2 characters.")
//!     .validate();
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.message_for("name"), Some("Name is required."));
//! ```

use serde::{Deserialize, Serialize};

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Message shown next to the field
    pub message: String,
    /// Rule code
    pub code: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get the error reported for a field
    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// Get the message reported for a field
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.field_error(field).map(|e| e.message.as_str())
    }

    /// Check whether a field already failed
    #[must_use]
    pub fn has_error(&self, field: &str) -> bool {
        self.field_error(field).is_some()
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }
}

/// Fluent validator builder
pub struct Validator {
    result: ValidationResult,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator
    #[must_use]
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    fn fail(&mut self, field: &str, code: &str, message: &str) {
        self.result.add_error(ValidationError {
            field: field.to_string(),
            message: message.to_string(),
            code: code.to_string(),
        });
    }

    /// Validate that a field is not blank
    #[must_use]
    pub fn required(mut self, field: &str, value: &str, message: &str) -> Self {
        if !self.result.has_error(field) && value.trim().is_empty() {
            self.fail(field, "REQUIRED", message);
        }
        self
    }

    /// Validate minimum length in characters
    #[must_use]
    pub fn min_length(mut self, field: &str, value: &str, min: usize, message: &str) -> Self {
        if !self.result.has_error(field) && value.chars().count() < min {
            self.fail(field, "MIN_LENGTH", message);
        }
        self
    }

    /// Validate a numeric lower bound (inclusive)
    #[must_use]
    pub fn min<T: PartialOrd>(mut self, field: &str, value: T, min: T, message: &str) -> Self {
        if !self.result.has_error(field) && value < min {
            self.fail(field, "MIN", message);
        }
        self
    }

    /// Validate a numeric upper bound (inclusive)
    #[must_use]
    pub fn max<T: PartialOrd>(mut self, field: &str, value: T, max: T, message: &str) -> Self {
        if !self.result.has_error(field) && value > max {
            self.fail(field, "MAX", message);
        }
        self
    }

    /// Validate a minimum number of collection items
    #[must_use]
    pub fn min_items(mut self, field: &str, len: usize, min: usize, message: &str) -> Self {
        if !self.result.has_error(field) && len < min {
            self.fail(field, "MIN_ITEMS", message);
        }
        self
    }

    /// Add a custom validation; the closure returns a message on failure
    #[must_use]
    pub fn custom<F>(mut self, field: &str, f: F) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        if !self.result.has_error(field) {
            if let Some(message) = f() {
                self.fail(field, "CUSTOM", &message);
            }
        }
        self
    }

    /// Complete validation and return result
    #[must_use]
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}
