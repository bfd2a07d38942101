//! Closed model of the identity provider's user attributes.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::auth::AttributeMap;

/// Standard attribute names the identity provider may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeName {
    /// Provider user id
    Sub,
    /// Full name
    Name,
    /// First name
    GivenName,
    /// Last name
    FamilyName,
    /// Middle name
    MiddleName,
    /// Casual name
    Nickname,
    /// Username shown to others
    PreferredUsername,
    /// Profile page URL
    Profile,
    /// Avatar URL
    Picture,
    /// Personal website
    Website,
    /// Email address
    Email,
    /// "true" once the email is confirmed
    EmailVerified,
    /// Gender
    Gender,
    /// Birth date, `YYYY-MM-DD`
    Birthdate,
    /// Time zone name
    Zoneinfo,
    /// Locale tag
    Locale,
    /// Phone number
    PhoneNumber,
    /// "true" once the phone number is confirmed
    PhoneNumberVerified,
    /// Postal address
    Address,
    /// Seconds since the epoch of the last profile change
    UpdatedAt,
}

impl AttributeName {
    /// All known attributes.
    pub const ALL: [AttributeName; 20] = [
        AttributeName::Sub,
        AttributeName::Name,
        AttributeName::GivenName,
        AttributeName::FamilyName,
        AttributeName::MiddleName,
        AttributeName::Nickname,
        AttributeName::PreferredUsername,
        AttributeName::Profile,
        AttributeName::Picture,
        AttributeName::Website,
        AttributeName::Email,
        AttributeName::EmailVerified,
        AttributeName::Gender,
        AttributeName::Birthdate,
        AttributeName::Zoneinfo,
        AttributeName::Locale,
        AttributeName::PhoneNumber,
        AttributeName::PhoneNumberVerified,
        AttributeName::Address,
        AttributeName::UpdatedAt,
    ];

    /// Wire name used by the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeName::Sub => "sub",
            AttributeName::Name => "name",
            AttributeName::GivenName => "given_name",
            AttributeName::FamilyName => "family_name",
            AttributeName::MiddleName => "middle_name",
            AttributeName::Nickname => "nickname",
            AttributeName::PreferredUsername => "preferred_username",
            AttributeName::Profile => "profile",
            AttributeName::Picture => "picture",
            AttributeName::Website => "website",
            AttributeName::Email => "email",
            AttributeName::EmailVerified => "email_verified",
            AttributeName::Gender => "gender",
            AttributeName::Birthdate => "birthdate",
            AttributeName::Zoneinfo => "zoneinfo",
            AttributeName::Locale => "locale",
            AttributeName::PhoneNumber => "phone_number",
            AttributeName::PhoneNumberVerified => "phone_number_verified",
            AttributeName::Address => "address",
            AttributeName::UpdatedAt => "updated_at",
        }
    }

    /// Parse a wire name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == name)
    }
}

impl std::fmt::Display for AttributeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    /// The provider sent a key the app does not know
    #[error("Unknown user attribute: {0}")]
    Unknown(String),
}

/// Validated user attributes: every known name maps to an optional value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAttributes {
    values: BTreeMap<AttributeName, String>,
}

impl UserAttributes {
    /// Validate a raw attribute bag.
    ///
    /// `custom:` attributes are app-defined extensions and are skipped; any
    /// other unrecognized key is rejected.
    pub fn from_raw(raw: &AttributeMap) -> Result<Self, AttributeError> {
        let mut values = BTreeMap::new();
        for (key, value) in raw {
            if key.starts_with("custom:") {
                debug!("Skipping app-defined attribute {}", key);
                continue;
            }
            let name = AttributeName::parse(key)
                .ok_or_else(|| AttributeError::Unknown(key.clone()))?;
            values.insert(name, value.clone());
        }
        Ok(Self { values })
    }

    /// Get an attribute.
    pub fn get(&self, name: AttributeName) -> Option<&str> {
        self.values.get(&name).map(String::as_str)
    }

    /// Email address.
    pub fn email(&self) -> Option<&str> {
        self.get(AttributeName::Email)
    }

    /// Whether the provider marked the email as verified.
    pub fn email_verified(&self) -> bool {
        self.get(AttributeName::EmailVerified) == Some("true")
    }

    /// Whether the provider marked the phone number as verified.
    pub fn phone_number_verified(&self) -> bool {
        self.get(AttributeName::PhoneNumberVerified) == Some("true")
    }

    /// "Given Family", falling back to whichever part is present, then to
    /// the full `name` attribute.
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [AttributeName::GivenName, AttributeName::FamilyName]
            .into_iter()
            .filter_map(|n| self.get(n))
            .filter(|s| !s.trim().is_empty())
            .collect();
        if parts.is_empty() {
            self.get(AttributeName::Name)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        } else {
            Some(parts.join(" "))
        }
    }
}
