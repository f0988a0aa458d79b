//! Account creation and the sign-in exchange
//!
//! Sign-up only registers the account; the session is created by signing in,
//! which trades a username and password for a token and stores it together
//! with the `id` decoded from it.

use nagamed_api::{LoginRequest, RegisterRequest, PATIENT_TYPE_ID};
use nagamed_common::{Error, Result};
use nagamed_session::{subject_from_token, TokenError};

use crate::{App, Route};

/// Shown when a sign-in failure carries no server message
pub const SIGN_IN_FALLBACK: &str = "Invalid credentials";

/// Shown when a registration failure carries no server message
pub const SIGN_UP_FALLBACK: &str = "An error occurred during registration.";

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Clone, Default)]
pub struct SignInForm {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SignInForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct SignUpForm {
    pub fullname: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl std::fmt::Debug for SignUpForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpForm")
            .field("fullname", &self.fullname)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

impl SignUpForm {
    /// Check the form and build the registration body.
    ///
    /// Rules are checked in order and the first failure is reported.
    pub fn validate(&self) -> Result<RegisterRequest> {
        if self.fullname.trim().is_empty() {
            return Err(Error::Validation("Full Name is required.".to_string()));
        }
        if self.username.trim().is_empty() {
            return Err(Error::Validation("Username is required.".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(Error::Validation(
                "Password must be at least 8 characters long.".to_string(),
            ));
        }
        if self.password != self.confirm_password {
            return Err(Error::Validation("Passwords do not match.".to_string()));
        }

        Ok(RegisterRequest {
            fullname: self.fullname.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            type_id: PATIENT_TYPE_ID,
        })
    }
}

/// Register a new patient account. Returns the screen to show next.
pub async fn sign_up(app: &App, form: &SignUpForm) -> Result<Route> {
    let request = form.validate()?;

    app.api().register(&request).await.map_err(|e| {
        tracing::warn!(username = %request.username, error = %e, "Registration failed");
        Error::from(e)
    })?;

    tracing::info!(username = %request.username, "Account created");
    Ok(Route::SignIn)
}

/// Exchange credentials for a stored session. Returns the screen to show next.
///
/// Every failure leaves the stored session as it was.
pub async fn sign_in(app: &App, form: &SignInForm) -> Result<Route> {
    if form.username.trim().is_empty() || form.password.is_empty() {
        return Err(Error::Validation(
            "Username and password are required.".to_string(),
        ));
    }

    let request = LoginRequest {
        username: form.username.clone(),
        password: form.password.clone(),
    };
    let response = app.api().login(&request).await.map_err(|e| {
        tracing::warn!(username = %form.username, error = %e, "Login failed");
        Error::from(e)
    })?;

    let token = response
        .token
        .filter(|token| !token.trim().is_empty())
        .ok_or(TokenError::MissingToken)?;
    let user_id = subject_from_token(&token).map_err(|e| {
        tracing::warn!(username = %form.username, error = %e, "Rejected login token");
        e
    })?;

    app.session().establish(&user_id, &token).await.map_err(|e| {
        tracing::warn!(user_id = %user_id, error = %e, "Signed in but the session could not be stored");
        Error::from(e)
    })?;

    tracing::info!(user_id = %user_id, "Signed in");
    Ok(Route::Home)
}
