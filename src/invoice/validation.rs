//! Input validation for invoice requests.
//!
//! Errors are collected rather than returned one at a time, so a caller sees
//! every problem with a request in a single message.

use std::fmt;

use rust_decimal::Decimal;

use super::traits::Validator;
use super::InvoiceRequest;

/// Validation error with a readable message.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} must not be empty", label))
    }

    pub fn negative_amount(field: &str, value: &Decimal) -> Self {
        Self::new(field, format!("amount '{}' is negative", value))
            .with_suggestion("Use a value of zero or more, e.g. 500")
    }

    pub fn zero_quantity(field: &str) -> Self {
        Self::new(field, "quantity must be at least 1")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Numbered, one-per-line summary of every collected error.
    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validation failed: {} problem(s) found",
            self.errors.len()
        )];
        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }

        parts.join("\n")
    }

    pub fn into_result(self) -> Result<(), String> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.to_message())
        }
    }
}

// ============================================================================
// Validation functions
// ============================================================================

/// Validate that a string is not empty after trimming
pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

/// Validate that a money value is zero or positive
pub fn validate_non_negative(value: &Decimal, field: &str, errors: &mut ValidationErrors) {
    if value.is_sign_negative() && !value.is_zero() {
        errors.add(ValidationError::negative_amount(field, value));
    }
}

pub fn validate_quantity(value: u32, field: &str, errors: &mut ValidationErrors) {
    if value == 0 {
        errors.add(ValidationError::zero_quantity(field));
    }
}

impl Validator for InvoiceRequest {
    fn validate(&self) -> Result<(), String> {
        let mut errors = ValidationErrors::new();

        validate_required(&self.customer_name, "customer_name", "Customer name", &mut errors);
        validate_required(&self.company_name, "company_name", "Company name", &mut errors);
        validate_non_negative(&self.amount, "amount", &mut errors);

        for (i, item) in self.line_items.iter().enumerate() {
            let prefix = format!("line_items[{}]", i);
            validate_required(
                &item.description,
                &format!("{}.description", prefix),
                "Item description",
                &mut errors,
            );
            validate_quantity(item.quantity, &format!("{}.quantity", prefix), &mut errors);
            validate_non_negative(&item.unit_price, &format!("{}.unit_price", prefix), &mut errors);
        }

        errors.into_result()
    }
}
