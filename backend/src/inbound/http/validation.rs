//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    EmptyField,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::EmptyField => "empty_field",
        }
    }
}

/// Newtype wrapper for camelCase request field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {}", field.as_str()),
    )
}

pub(crate) fn empty_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::EmptyField,
        format!("{} must not be empty", field.as_str()),
    )
}

/// Require a present, non-blank value.
pub(crate) fn require_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    let value = value.ok_or_else(|| missing_field_error(field))?;
    if value.trim().is_empty() {
        return Err(empty_field_error(field));
    }
    Ok(value)
}
