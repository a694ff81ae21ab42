//! Field validation for company records.
//!
//! One pure function per field, each returning the normalized value or
//! the reason it was rejected. Callers collect failures instead of
//! short-circuiting so a bad request reports every problem at once.

use thiserror::Error;

use crate::countries::is_valid_country;

/// Reason a single company field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("company name must be at least 4 characters")]
    NameTooShort,
    #[error("company name can contain only letters and spaces")]
    NameInvalidChars,
    #[error("company code must be at least 2 characters")]
    CodeTooShort,
    #[error("company code can contain only uppercase letters")]
    CodeInvalidChars,
    #[error("invalid country")]
    UnknownCountry,
    #[error("website is not valid url")]
    WebsiteNotUrl,
}

/// Validate and normalize a company name: trimmed, >= 4 chars, letters
/// and spaces only.
pub fn validate_name(raw: &str) -> Result<String, FieldError> {
    let name = raw.trim();
    if name.chars().count() < 4 {
        return Err(FieldError::NameTooShort);
    }
    if !name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        return Err(FieldError::NameInvalidChars);
    }
    Ok(name.to_string())
}

/// Validate and normalize a company code: trimmed, >= 2 uppercase letters.
pub fn validate_code(raw: &str) -> Result<String, FieldError> {
    let code = raw.trim();
    if code.chars().count() < 2 {
        return Err(FieldError::CodeTooShort);
    }
    if !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(FieldError::CodeInvalidChars);
    }
    Ok(code.to_string())
}

/// Validate a country name against the fixed country list. No
/// normalization; the match is case-sensitive.
pub fn validate_country(raw: &str) -> Result<String, FieldError> {
    if !is_valid_country(raw) {
        return Err(FieldError::UnknownCountry);
    }
    Ok(raw.to_string())
}

/// Validate a website: must parse as an absolute URI with a host.
/// The value is stored as supplied; only validation happens here.
pub fn validate_website(raw: &str) -> Result<String, FieldError> {
    match url::Url::parse(raw) {
        Ok(parsed) if parsed.has_host() => Ok(raw.to_string()),
        _ => Err(FieldError::WebsiteNotUrl),
    }
}

/// Phone numbers are stored verbatim. No format is enforced.
pub fn validate_phone(raw: &str) -> Result<String, FieldError> {
    Ok(raw.to_string())
}
