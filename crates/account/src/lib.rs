//! Customer accounts.
//!
//! Thin layer over the hosted identity service: input validation, session
//! state, and a closed model of user attributes.

#![warn(missing_docs)]

pub mod auth;
pub mod attributes;
pub mod profile;
pub mod service;

pub use auth::{
    AttributeMap, AuthError, AuthProvider, Credentials, PendingConfirmation, ResetDelivery,
    Session, SignUpProfile, UserIdentity,
};
pub use attributes::{AttributeError, AttributeName, UserAttributes};
pub use profile::{format_phone, validate_sign_up, ProfileError, UserInfo};
pub use service::{AccountService, AuthState};
