//! Customer profile form and sign-up input validation.

use std::sync::OnceLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::auth::SignUpProfile;

/// Minimum password length accepted by the identity service.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Profile validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// A required field is blank
    #[error("{0} is required")]
    Required(&'static str),

    /// The phone number has no digits or a malformed country code
    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    /// The email address is malformed
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// The password is too short
    #[error("Password must be at least {} characters", MIN_PASSWORD_LEN)]
    WeakPassword,
}

/// Customer details collected after sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Phone number as typed (may contain spaces and dashes)
    pub phone_number: String,

    /// Dialing prefix, e.g. `+1` or `+886`
    pub country_code: String,
}

impl Default for UserInfo {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            phone_number: String::new(),
            country_code: "+1".to_string(),
        }
    }
}

impl UserInfo {
    /// Check required fields.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.first_name.trim().is_empty() {
            return Err(ProfileError::Required("First name"));
        }
        if self.last_name.trim().is_empty() {
            return Err(ProfileError::Required("Last name"));
        }
        if self.phone_number.trim().is_empty() {
            return Err(ProfileError::Required("Phone number"));
        }
        self.formatted_phone().map(|_| ())
    }

    /// Country code followed by the digits of the phone number.
    pub fn formatted_phone(&self) -> Result<String, ProfileError> {
        format_phone(&self.country_code, &self.phone_number)
    }

    /// Copy of the form with the phone normalized, ready for submission.
    pub fn normalized(&self) -> Result<UserInfo, ProfileError> {
        self.validate()?;
        Ok(UserInfo {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone_number: self.formatted_phone()?,
            country_code: self.country_code.clone(),
        })
    }
}

/// Join a dialing prefix and a typed number, dropping every non-digit.
pub fn format_phone(country_code: &str, number: &str) -> Result<String, ProfileError> {
    if !country_code_regex().is_match(country_code) {
        return Err(ProfileError::InvalidPhone(country_code.to_string()));
    }
    let digits: String = non_digit_regex().replace_all(number, "").into_owned();
    if digits.is_empty() {
        return Err(ProfileError::InvalidPhone(number.to_string()));
    }
    Ok(format!("{}{}", country_code, digits))
}

/// Validate sign-up input before it reaches the identity service.
pub fn validate_sign_up(profile: &SignUpProfile) -> Result<(), ProfileError> {
    if profile.username.trim().is_empty() {
        return Err(ProfileError::Required("Username"));
    }
    if !email_regex().is_match(profile.email.trim()) {
        return Err(ProfileError::InvalidEmail(profile.email.clone()));
    }
    if profile.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ProfileError::WeakPassword);
    }
    if let Some(phone) = &profile.phone_number {
        if !e164_regex().is_match(phone) {
            return Err(ProfileError::InvalidPhone(phone.clone()));
        }
    }
    Ok(())
}

fn non_digit_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\D").expect("static regex"))
}

fn country_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+[0-9]{1,3}$").expect("static regex"))
}

fn e164_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+[0-9]{6,15}$").expect("static regex"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static regex"))
}
