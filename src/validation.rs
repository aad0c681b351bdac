//! Validation support shared by search criteria and write payloads.
//!
//! Every check reports the public (camelCase) field name it concerns so the
//! client can map an error back to its input. Problems are collected into
//! [`ValidationErrors`] rather than stopping at the first one.

use serde::Serialize;
use std::fmt;

/// Validation error with field name and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Appends every error of `other`.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    /// Records the error of a failed check, passing the success value through.
    pub fn check<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.add(error);
                None
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Human-readable messages, one per error.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Convert to Result
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.messages().join("; ");
        write!(f, "{joined}")
    }
}

impl std::error::Error for ValidationErrors {}

/// Implemented by write payloads (create/update bodies) that must be checked
/// before touching storage.
pub trait Validatable {
    /// # Errors
    ///
    /// Returns every rule the payload violates.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Helper validators for common patterns
pub mod validators {
    use super::ValidationError;
    use std::fmt;

    /// Validate trimmed string length is within range
    ///
    /// # Errors
    ///
    /// Fails when the length falls outside `[min, max]`.
    pub fn validate_length(
        field: &str,
        value: &str,
        min: Option<usize>,
        max: Option<usize>,
    ) -> Result<(), ValidationError> {
        let len = value.trim().chars().count();

        if let Some(min_len) = min
            && len < min_len
        {
            return Err(ValidationError::new(
                field,
                format!("must be at least {min_len} characters"),
            ));
        }

        if let Some(max_len) = max
            && len > max_len
        {
            return Err(ValidationError::new(
                field,
                format!("must be at most {max_len} characters"),
            ));
        }

        Ok(())
    }

    /// Validate number is within range
    ///
    /// # Errors
    ///
    /// Fails when `value` falls outside `[min, max]`.
    pub fn validate_range<T: PartialOrd + fmt::Display>(
        field: &str,
        value: T,
        min: Option<T>,
        max: Option<T>,
    ) -> Result<(), ValidationError> {
        if let Some(min_val) = min
            && value < min_val
        {
            return Err(ValidationError::new(
                field,
                format!("must be at least {min_val}"),
            ));
        }

        if let Some(max_val) = max
            && value > max_val
        {
            return Err(ValidationError::new(
                field,
                format!("must be at most {max_val}"),
            ));
        }

        Ok(())
    }

    /// Validate a monetary amount: finite and not negative.
    ///
    /// # Errors
    ///
    /// Fails for NaN, infinities and negative values.
    pub fn validate_amount(field: &str, value: f64) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::new(field, "must be a finite number"));
        }
        if value < 0.0 {
            return Err(ValidationError::new(field, "must not be negative"));
        }
        Ok(())
    }

    /// Basic email validation
    ///
    /// # Errors
    ///
    /// Fails unless the value looks like `local@domain.tld`.
    pub fn validate_email(field: &str, value: &str) -> Result<(), ValidationError> {
        let valid = value.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        });
        if !valid {
            return Err(ValidationError::new(field, "invalid email format"));
        }

        if value.len() > 255 {
            return Err(ValidationError::new(
                field,
                "must be at most 255 characters",
            ));
        }

        Ok(())
    }

    /// Validate value is not empty
    ///
    /// # Errors
    ///
    /// Fails for empty or whitespace-only values.
    pub fn validate_required(field: &str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new(field, "is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_collection() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.add(ValidationError::new("minYear", "must be an integer"));
        errors.add(ValidationError::new("sort", "unsupported sort field 'x'"));
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.to_string(),
            "minYear: must be an integer; sort: unsupported sort field 'x'"
        );
        assert!(errors.result().is_err());
    }

    #[test]
    fn test_check_passes_values_through() {
        let mut errors = ValidationErrors::new();
        assert_eq!(errors.check(Ok::<_, ValidationError>(3)), Some(3));
        assert_eq!(
            errors.check::<i32>(Err(ValidationError::new("page", "must be at least 1"))),
            None
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_validate_length() {
        use validators::validate_length;

        assert!(validate_length("brand", "ab", Some(3), None).is_err());
        assert!(validate_length("brand", "abcdef", None, Some(5)).is_err());
        assert!(validate_length("brand", "  abc  ", Some(3), Some(5)).is_ok());
    }

    #[test]
    fn test_validate_range() {
        use validators::validate_range;

        assert!(validate_range("year", 1800, Some(1900), None).is_err());
        assert!(validate_range("seats", 150, None, Some(60)).is_err());
        assert!(validate_range("seats", 5, Some(1), Some(60)).is_ok());
    }

    #[test]
    fn test_validate_amount() {
        use validators::validate_amount;

        assert!(validate_amount("dailyRentalFee", f64::NAN).is_err());
        assert!(validate_amount("dailyRentalFee", f64::INFINITY).is_err());
        assert!(validate_amount("dailyRentalFee", -1.0).is_err());
        assert!(validate_amount("dailyRentalFee", 0.0).is_ok());
        assert!(validate_amount("dailyRentalFee", 129.5).is_ok());
    }

    #[test]
    fn test_validate_email() {
        use validators::validate_email;

        assert!(validate_email("email", "invalid").is_err());
        assert!(validate_email("email", "@example.com").is_err());
        assert!(validate_email("email", "driver@localhost").is_err());
        assert!(validate_email("email", "driver@example.com").is_ok());
    }

    #[test]
    fn test_validate_required() {
        use validators::validate_required;

        assert!(validate_required("fullName", "").is_err());
        assert!(validate_required("fullName", "   ").is_err());
        assert!(validate_required("fullName", "Ada Lovelace").is_ok());
    }
}
