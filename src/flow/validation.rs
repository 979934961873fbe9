//! Local input validation for the auth and product forms.
//!
//! These checks run before any network call; a failed check means the
//! request never leaves the client.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::ProductDraft;

/// Minimum password length accepted by the signup form
const MIN_PASSWORD_LEN: usize = 6;

lazy_static! {
    /// Practical email shape check; the backend remains the authority
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a password for login (presence only; existing accounts may
/// predate the length rule)
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.trim().is_empty() {
        return Err("Password is required".to_string());
    }

    Ok(())
}

/// Validate a password for signup
pub fn validate_new_password(password: &str) -> Result<(), String> {
    validate_password(password)?;

    if password.len() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }

    Ok(())
}

/// Validate an account display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    Ok(())
}

/// Validate the product form fields that must not be blank
pub fn validate_product_draft(draft: &ProductDraft) -> Result<(), String> {
    if draft.name.trim().is_empty() {
        return Err("Product name is required".to_string());
    }

    if draft.brand.trim().is_empty() {
        return Err("Brand is required".to_string());
    }

    if draft.category.trim().is_empty() {
        return Err("Category is required".to_string());
    }

    Ok(())
}

/// Parse a price field. Blank or unparsable input deliberately falls back
/// to 0 instead of failing, matching the product form's historical behavior.
pub fn parse_price(input: &str) -> f64 {
    input.trim().parse().unwrap_or(0.0)
}

/// Parse a stock count with the same leniency as [`parse_price`].
pub fn parse_stock(input: &str) -> i64 {
    input.trim().parse().unwrap_or(0)
}
