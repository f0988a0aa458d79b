//! Profile screen: view, edit, logout

use nagamed_api::{UpdateUserRequest, UserProfile};
use nagamed_common::{Error, Result};

use crate::authenticated::authenticated;
use crate::{App, Route};

/// Shown when the profile could not be loaded
pub const PROFILE_LOAD_FALLBACK: &str = "Failed to fetch profile details.";

/// Shown when the profile screen opens without a stored session
pub const PROFILE_MISSING_SESSION_MESSAGE: &str = "User ID or Token not found.";

/// Shown when an update failure carries no server message
pub const PROFILE_UPDATE_FALLBACK: &str = "Failed to update profile.";

/// Edit state of the profile screen
#[derive(Clone)]
pub struct ProfileEditor {
    /// Last profile known to be saved on the server
    pub profile: UserProfile,
    pub fullname: String,
    pub username: String,
    pub change_password: bool,
    pub new_password: String,
}

impl std::fmt::Debug for ProfileEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileEditor")
            .field("profile", &self.profile)
            .field("fullname", &self.fullname)
            .field("username", &self.username)
            .field("change_password", &self.change_password)
            .field("new_password", &"[REDACTED]")
            .finish()
    }
}

impl ProfileEditor {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            fullname: profile.fullname.clone(),
            username: profile.username.clone(),
            profile,
            change_password: false,
            new_password: String::new(),
        }
    }

    /// Build the update body from the drafts
    pub fn request(&self) -> Result<UpdateUserRequest> {
        let fullname = self.fullname.trim();
        let username = self.username.trim();
        if fullname.is_empty() || username.is_empty() {
            return Err(Error::Validation(
                "Full Name and Username cannot be empty.".to_string(),
            ));
        }

        let password = Some(self.new_password.trim())
            .filter(|password| self.change_password && !password.is_empty())
            .map(str::to_string);

        Ok(UpdateUserRequest {
            fullname: fullname.to_string(),
            username: username.to_string(),
            type_id: self.profile.type_id_or_fallback(),
            password,
        })
    }

    fn saved(&mut self, request: &UpdateUserRequest) {
        self.profile.fullname = request.fullname.clone();
        self.profile.username = request.username.clone();
        self.fullname = request.fullname.clone();
        self.username = request.username.clone();
        self.new_password.clear();
        self.change_password = false;
    }
}

/// Fetch the signed-in user's profile for editing.
///
/// Server payload messages are dropped so a failed load always reads as
/// [`PROFILE_LOAD_FALLBACK`]; see [`load_failure_message`].
pub async fn load_profile(app: &App) -> Result<ProfileEditor> {
    let profile = authenticated(app.session(), "load_profile", |record| async move {
        app.api()
            .get_user(&record.user_id, record.authorization())
            .await
    })
    .await
    .map_err(|e| match e {
        Error::FetchFailed {
            status: Some(status),
            detail,
            ..
        } => Error::FetchFailed {
            status: Some(status),
            message: None,
            detail,
        },
        other => other,
    })?
    .require()?;

    Ok(ProfileEditor::new(profile))
}

/// Text shown when [`load_profile`] fails
pub fn load_failure_message(err: &Error) -> String {
    match err {
        Error::Unauthenticated => PROFILE_MISSING_SESSION_MESSAGE.to_string(),
        other => other.user_message(PROFILE_LOAD_FALLBACK),
    }
}

/// Save the editor's drafts. The stored session is not touched.
pub async fn update_profile(app: &App, editor: &mut ProfileEditor) -> Result<()> {
    if !app.session().state().await?.is_authenticated() {
        return Err(Error::Unauthenticated);
    }

    let request = editor.request()?;
    authenticated(app.session(), "update_profile", |record| {
        let request = &request;
        async move {
            app.api()
                .update_user(&record.user_id, record.authorization(), request)
                .await
        }
    })
    .await?
    .require()?;

    tracing::info!(
        username = %request.username,
        password_changed = request.password.is_some(),
        "Profile updated"
    );
    editor.saved(&request);
    Ok(())
}

/// Forget the stored session. Purely local; the server is not told.
pub async fn logout(app: &App) -> Result<Route> {
    app.session().clear().await?;
    tracing::info!("Logged out");
    Ok(Route::SignIn)
}
