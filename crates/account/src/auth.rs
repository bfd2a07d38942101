//! Authentication provider abstraction.
//!
//! The hosted identity service is external; this module only describes the
//! calls the app makes and what comes back.

use std::collections::HashMap;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Raw attribute bag as returned by the identity provider.
pub type AttributeMap = HashMap<String, String>;

/// Errors reported by the identity provider or by local validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Wrong username or password
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// The account exists but has not been confirmed yet
    #[error("User is not confirmed")]
    UserNotConfirmed,

    /// Sign-up with a username that is taken
    #[error("An account with this username already exists")]
    UsernameExists,

    /// No user is signed in
    #[error("No signed-in user")]
    NotSignedIn,

    /// Input rejected before calling the provider
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput {
        /// Field name
        field: String,
        /// Why it was rejected
        reason: String,
    },

    /// Network or provider failure
    #[error("Identity service error: {0}")]
    Service(String),
}

/// Sign-in credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Username or email
    pub identifier: String,

    /// Password
    pub secret: String,
}

impl Credentials {
    /// Create credentials.
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

/// Data submitted on the sign-up screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpProfile {
    /// Username
    pub username: String,

    /// Password
    pub password: String,

    /// Email address
    pub email: String,

    /// Phone number in E.164 form (`+15551234567`)
    pub phone_number: Option<String>,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Provider user id
    pub user_id: String,

    /// Username
    pub username: String,
}

/// Result of a sign-up: the account still has to be confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingConfirmation {
    /// Provider user id
    pub user_id: String,

    /// Where the confirmation code was sent (masked email or phone)
    pub destination: Option<String>,
}

/// Where a password reset code was delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetDelivery {
    /// Masked destination
    pub destination: String,
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Provider user id
    pub user_id: String,

    /// Username
    pub username: String,
}

/// Identity service calls used by the app.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Sign in with username/password.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    /// Register a new account.
    async fn sign_up(&self, profile: &SignUpProfile) -> Result<PendingConfirmation, AuthError>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Get the signed-in user.
    async fn current_user(&self) -> Result<UserIdentity, AuthError>;

    /// Fetch the signed-in user's attributes.
    async fn fetch_user_attributes(&self) -> Result<AttributeMap, AuthError>;

    /// Start the forgot-password flow.
    async fn reset_password(&self, username: &str) -> Result<ResetDelivery, AuthError>;
}
