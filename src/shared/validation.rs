use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidateEmail, ValidationError};

lazy_static! {
    /// Regex for phone numbers used as OTP identifiers
    /// Optional leading plus, 8 to 15 digits, no separators
    /// - Valid: "+251911223344", "0911223344"
    /// - Invalid: "0911-223-344", "12345", "phone"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9]{8,15}$").unwrap();

    /// Regex for one-time codes (4 to 8 digits)
    pub static ref OTP_CODE_REGEX: Regex = Regex::new(r"^[0-9]{4,8}$").unwrap();
}

/// An OTP identifier is either a phone number or an email address
pub fn validate_otp_identifier(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if PHONE_REGEX.is_match(value) || value.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("otp_identifier")
            .with_message("Identifier must be a phone number or an email address".into()))
    }
}

/// OTP codes are 4-8 digits
pub fn validate_otp_code(value: &str) -> Result<(), ValidationError> {
    if OTP_CODE_REGEX.is_match(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("otp_code").with_message("OTP code must be 4-8 digits".into()))
    }
}

/// Report ids are opaque, but must be non-empty and free of whitespace
pub fn validate_report_id(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        Err(ValidationError::new("report_id").with_message("Invalid report id".into()))
    } else {
        Ok(())
    }
}
