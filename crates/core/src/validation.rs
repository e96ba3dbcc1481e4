//! Per-field input validation.
//!
//! Rules push into a [`FieldErrors`] collector so that every problem with a
//! request is reported at once instead of failing on the first one.

use serde::Serialize;

use crate::DomainError;

/// A single validation failure on a named input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Ordered collection of field failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether any failure was recorded against `field`.
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Record a failure unless `value` is present and non-empty.
    ///
    /// Returns the value when it passed, so callers can keep going.
    pub fn require_non_empty<'a>(
        &mut self,
        field: &str,
        value: Option<&'a str>,
        message: &str,
    ) -> Option<&'a str> {
        match value {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                self.push(field, message);
                None
            }
        }
    }

    /// Record a failure unless `value` has at least `min` characters.
    pub fn require_min_chars<'a>(
        &mut self,
        field: &str,
        value: Option<&'a str>,
        min: usize,
        message: &str,
    ) -> Option<&'a str> {
        match value {
            Some(v) if v.chars().count() >= min => Some(v),
            _ => {
                self.push(field, message);
                None
            }
        }
    }

    /// `Ok(value)` if nothing was recorded, otherwise `DomainError::Validation`.
    pub fn finish<T>(self, value: T) -> Result<T, DomainError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(DomainError::Validation(self))
        }
    }
}

impl core::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (idx, e) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_failure_in_order() {
        let mut errors = FieldErrors::new();
        assert!(errors.require_non_empty("username", Some(""), "Username is required").is_none());
        assert!(errors
            .require_min_chars("password", Some("abcd"), 5, "Password must be at least 5 characters long")
            .is_none());

        assert_eq!(errors.len(), 2);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["username", "password"]);
        assert_eq!(
            errors.to_string(),
            "username: Username is required; password: Password must be at least 5 characters long"
        );
    }

    #[test]
    fn passing_values_are_returned() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.require_non_empty("username", Some("alice"), "required"), Some("alice"));
        assert_eq!(errors.require_min_chars("password", Some("hunter2"), 5, "short"), Some("hunter2"));
        assert_eq!(errors.finish(42), Ok(42));
    }

    #[test]
    fn min_chars_counts_characters_not_bytes() {
        let mut errors = FieldErrors::new();
        // five characters, ten bytes
        assert!(errors.require_min_chars("password", Some("ééééé"), 5, "short").is_some());
        assert!(errors.is_empty());
    }

    #[test]
    fn missing_value_is_a_failure() {
        let mut errors = FieldErrors::new();
        errors.require_non_empty("username", None, "Username is required");
        match errors.finish(()) {
            Err(DomainError::Validation(e)) => assert!(e.has("username")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
