//! Client-side form validation.
//!
//! The DTOs in `types` derive `Validate` and point their fields at the rules
//! below. Validation runs in the calling screen before any request is built;
//! the entity services never invoke it. `field_messages` reports failures
//! under the wire field name so a form can show each message next to its
//! input.

use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidationError, ValidationErrors};

pub const MIN_PASSWORD_LEN: usize = 6;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern");
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Rejects empty and whitespace-only text.
pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("required", "This field is required"))
    } else {
        Ok(())
    }
}

pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    validate_required(value)?;
    if EMAIL.is_match(value.trim()) {
        Ok(())
    } else {
        Err(error("email", "Invalid email address"))
    }
}

pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    validate_required(value)?;
    if value.chars().count() < MIN_PASSWORD_LEN {
        Err(error("password_length", "Password must be at least 6 characters"))
    } else {
        Ok(())
    }
}

pub fn validate_mileage(value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        Err(error("mileage_range", "Mileage must be a non-negative number"))
    } else {
        Ok(())
    }
}

pub fn validate_fuel_level(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(error("fuel_level_range", "Fuel level must be a non-negative number"))
    }
}

/// Flatten validation errors into `(field, message)` pairs, sorted by field.
pub fn field_messages(errors: &ValidationErrors) -> Vec<(String, String)> {
    let mut messages: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                (wire_name(&field), message)
            })
        })
        .collect();
    messages.sort();
    messages
}

/// `license_plate` -> `licensePlate`. Names already in camelCase pass through.
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            name.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}
