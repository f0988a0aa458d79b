//! Display identity shared by the Home, Appointment and Status screens

use serde::Serialize;

use crate::authenticated::{authenticated, Authenticated};
use crate::App;

pub const GUEST_NAME: &str = "Guest";

/// Inline error shown when the profile could not be fetched
pub const IDENTITY_ERROR_MESSAGE: &str = "Failed to retrieve full name.";

/// Who the current screen greets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityView {
    pub name: String,
    pub error: Option<String>,
}

impl IdentityView {
    pub fn guest() -> Self {
        Self {
            name: GUEST_NAME.to_string(),
            error: None,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            error: None,
        }
    }

    fn failed() -> Self {
        Self {
            name: GUEST_NAME.to_string(),
            error: Some(IDENTITY_ERROR_MESSAGE.to_string()),
        }
    }
}

/// Resolve the name to greet. Never fails: problems degrade to the guest name.
pub async fn load_identity(app: &App) -> IdentityView {
    let result = authenticated(app.session(), "load_identity", |record| async move {
        app.api()
            .get_user(&record.user_id, record.authorization())
            .await
    })
    .await;

    match result {
        Ok(Authenticated::Guest) => IdentityView::guest(),
        Ok(Authenticated::Fetched(profile)) if profile.fullname.trim().is_empty() => {
            IdentityView::guest()
        }
        Ok(Authenticated::Fetched(profile)) => IdentityView::named(profile.fullname),
        Err(e) => {
            tracing::debug!(error = %e, "Showing guest name after failed profile fetch");
            IdentityView::failed()
        }
    }
}
