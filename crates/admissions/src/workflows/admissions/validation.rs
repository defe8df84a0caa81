use std::fmt;

use serde::Serialize;

use super::domain::ApplicantDetails;

/// A single rejected payload field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field problem found in one payload, reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.errors.iter().map(|error| error.field).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn contains(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }
}

/// Accumulates field errors so callers see all problems at once.
#[derive(Debug, Default)]
pub(crate) struct FieldChecks {
    errors: Vec<FieldError>,
}

impl FieldChecks {
    pub(crate) fn required_text(&mut self, field: &'static str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.push(field, "is required");
        }
        self
    }

    pub(crate) fn required_option(
        &mut self,
        field: &'static str,
        value: Option<&String>,
    ) -> &mut Self {
        match value {
            Some(text) => self.required_text(field, text),
            None => {
                self.push(field, "is required");
                self
            }
        }
    }

    pub(crate) fn email(&mut self, field: &'static str, value: &str) -> &mut Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return self;
        }
        let valid = match trimmed.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.'),
            None => false,
        };
        if !valid {
            self.push(field, "must be an email address");
        }
        self
    }

    pub(crate) fn score(&mut self, field: &'static str, value: Option<u8>) -> &mut Self {
        if let Some(score) = value {
            if !(1..=5).contains(&score) {
                self.push(field, format!("must be between 1 and 5 (found {score})"));
            }
        }
        self
    }

    pub(crate) fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors {
                errors: std::mem::take(&mut self.errors),
            })
        }
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }
}

pub(crate) fn validate_applicant(details: &ApplicantDetails) -> Result<(), ValidationErrors> {
    FieldChecks::default()
        .required_text("parent_name", &details.parent_name)
        .required_text("parent_email", &details.parent_email)
        .email("parent_email", &details.parent_email)
        .required_text("child_name", &details.child_name)
        .finish()
}
