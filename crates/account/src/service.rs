//! Account service - what the auth screens call.

use tracing::{debug, info, warn};
use crate::attributes::UserAttributes;
use crate::auth::{
    AuthError, AuthProvider, Credentials, PendingConfirmation, ResetDelivery, Session,
    SignUpProfile, UserIdentity,
};
use crate::profile::{validate_sign_up, ProfileError};

/// Authentication state seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Nobody signed in
    SignedOut,
    /// A confirmed session
    SignedIn(Session),
}

impl From<ProfileError> for AuthError {
    fn from(err: ProfileError) -> Self {
        let field = match &err {
            ProfileError::Required(field) => field.to_lowercase(),
            ProfileError::InvalidPhone(_) => "phone_number".to_string(),
            ProfileError::InvalidEmail(_) => "email".to_string(),
            ProfileError::WeakPassword => "password".to_string(),
        };
        AuthError::InvalidInput {
            field,
            reason: err.to_string(),
        }
    }
}

/// Wraps an [`AuthProvider`], validating input and tracking the session.
pub struct AccountService<P: AuthProvider> {
    provider: P,
    state: AuthState,
}

impl<P: AuthProvider> AccountService<P> {
    /// Create a signed-out service.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            state: AuthState::SignedOut,
        }
    }

    /// Current state.
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Check if a user is signed in.
    pub fn is_signed_in(&self) -> bool {
        matches!(self.state, AuthState::SignedIn(_))
    }

    /// Pick up an existing session at startup.
    pub async fn restore(&mut self) -> &AuthState {
        match self.provider.current_user().await {
            Ok(user) => {
                debug!("Restored session for {}", user.username);
                self.state = AuthState::SignedIn(Session {
                    user_id: user.user_id,
                    username: user.username,
                });
            }
            Err(e) => {
                debug!("No session to restore: {}", e);
                self.state = AuthState::SignedOut;
            }
        }
        &self.state
    }

    /// Sign in.
    pub async fn sign_in(&mut self, identifier: &str, secret: &str) -> Result<Session, AuthError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ProfileError::Required("Username").into());
        }
        if secret.is_empty() {
            return Err(ProfileError::Required("Password").into());
        }

        match self.provider.sign_in(&Credentials::new(identifier, secret)).await {
            Ok(session) => {
                info!("Signed in as {}", session.username);
                self.state = AuthState::SignedIn(session.clone());
                Ok(session)
            }
            Err(e) => {
                warn!("Sign-in failed for {}: {}", identifier, e);
                Err(e)
            }
        }
    }

    /// Register a new account.
    pub async fn sign_up(&self, profile: &SignUpProfile) -> Result<PendingConfirmation, AuthError> {
        validate_sign_up(profile)?;
        let pending = self.provider.sign_up(profile).await.map_err(|e| {
            warn!("Sign-up failed for {}: {}", profile.username, e);
            e
        })?;
        info!("Registered {}, awaiting confirmation", profile.username);
        Ok(pending)
    }

    /// Sign out. The session is kept if the provider call fails.
    pub async fn sign_out(&mut self) -> Result<(), AuthError> {
        if let Err(e) = self.provider.sign_out().await {
            warn!("Error signing out: {}", e);
            return Err(e);
        }
        self.state = AuthState::SignedOut;
        info!("Signed out");
        Ok(())
    }

    /// Start the forgot-password flow.
    pub async fn forgot_password(&self, username: &str) -> Result<ResetDelivery, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ProfileError::Required("Username").into());
        }
        let delivery = self.provider.reset_password(username).await?;
        info!("Password reset code sent to {}", delivery.destination);
        Ok(delivery)
    }

    /// The signed-in user.
    pub async fn current_user(&self) -> Result<UserIdentity, AuthError> {
        if !self.is_signed_in() {
            return Err(AuthError::NotSignedIn);
        }
        self.provider.current_user().await
    }

    /// Fetch and validate the signed-in user's attributes.
    pub async fn load_attributes(&self) -> Result<UserAttributes, AuthError> {
        if !self.is_signed_in() {
            return Err(AuthError::NotSignedIn);
        }
        let raw = self.provider.fetch_user_attributes().await?;
        UserAttributes::from_raw(&raw).map_err(|e| AuthError::Service(e.to_string()))
    }
}
