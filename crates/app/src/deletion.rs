//! Account deletion
//!
//! Deleting an account takes two explicit confirmations. The flow is a small
//! state machine:
//! - `Idle` → `AwaitingFirstConfirm` when the user asks to delete
//! - `AwaitingFirstConfirm` → `AwaitingFinalConfirm` on the first "yes"
//! - `AwaitingFinalConfirm` → `Executing` on the final "yes"
//! - either prompt → `Idle` on "no"
//! - `Executing` → `Deleted` on success, back to `Idle` on failure

use thiserror::Error;

use nagamed_common::{Error, Result};

use crate::authenticated::authenticated;
use crate::{App, Route};

/// Shown when a deletion failure carries no server message
pub const DELETE_ACCOUNT_FALLBACK: &str = "Failed to delete account.";

/// A yes/no question put to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    pub title: &'static str,
    pub message: &'static str,
}

pub const FIRST_PROMPT: ConfirmationPrompt = ConfirmationPrompt {
    title: "Confirm Deletion",
    message: "Are you absolutely sure you want to delete your account? This action cannot be undone.",
};

pub const FINAL_PROMPT: ConfirmationPrompt = ConfirmationPrompt {
    title: "Final Confirmation",
    message: "This is your last chance! Deleting your account will remove all associated data permanently.",
};

/// Source of the user's answers to confirmation prompts
#[async_trait::async_trait]
pub trait Confirmer: Send + Sync {
    /// `true` only for an explicit affirmative answer
    async fn confirm(&self, prompt: &ConfirmationPrompt) -> bool;
}

/// Errors that can occur during deletion state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Invalid transition: cannot handle {event} in state {from}")]
    InvalidTransition { from: String, event: String },

    #[error("Terminal state: {0} is a terminal state and cannot transition")]
    TerminalState(String),
}

impl From<StateError> for Error {
    fn from(err: StateError) -> Self {
        Error::Unexpected(anyhow::Error::new(err))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeletionState {
    Idle,
    AwaitingFirstConfirm,
    AwaitingFinalConfirm,
    Executing,
    Deleted,
}

impl DeletionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Deleted)
    }

    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [DeletionState] {
        match self {
            Self::Idle => &[Self::AwaitingFirstConfirm],
            Self::AwaitingFirstConfirm => &[Self::AwaitingFinalConfirm, Self::Idle],
            Self::AwaitingFinalConfirm => &[Self::Executing, Self::Idle],
            Self::Executing => &[Self::Deleted, Self::Idle],
            Self::Deleted => &[],
        }
    }

    /// Prompt to show while in this state, if any
    pub fn prompt(&self) -> Option<&'static ConfirmationPrompt> {
        match self {
            Self::AwaitingFirstConfirm => Some(&FIRST_PROMPT),
            Self::AwaitingFinalConfirm => Some(&FINAL_PROMPT),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeletionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::AwaitingFirstConfirm => write!(f, "awaiting_first_confirm"),
            Self::AwaitingFinalConfirm => write!(f, "awaiting_final_confirm"),
            Self::Executing => write!(f, "executing"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeletionEvent {
    /// User asked to delete the account
    Request,
    Confirm,
    Decline,
    /// The server accepted the DELETE
    Succeeded,
    /// The DELETE failed
    Failed,
}

impl std::fmt::Display for DeletionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Request => write!(f, "request"),
            Self::Confirm => write!(f, "confirm"),
            Self::Decline => write!(f, "decline"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Deletion state machine
pub struct DeletionStateMachine;

impl DeletionStateMachine {
    /// Attempt a state transition
    pub fn transition(
        current: DeletionState,
        event: DeletionEvent,
    ) -> std::result::Result<DeletionState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (&current, &event) {
            (DeletionState::Idle, DeletionEvent::Request) => DeletionState::AwaitingFirstConfirm,

            (DeletionState::AwaitingFirstConfirm, DeletionEvent::Confirm) => {
                DeletionState::AwaitingFinalConfirm
            }
            (DeletionState::AwaitingFinalConfirm, DeletionEvent::Confirm) => {
                DeletionState::Executing
            }
            (
                DeletionState::AwaitingFirstConfirm | DeletionState::AwaitingFinalConfirm,
                DeletionEvent::Decline,
            ) => DeletionState::Idle,

            (DeletionState::Executing, DeletionEvent::Succeeded) => DeletionState::Deleted,
            (DeletionState::Executing, DeletionEvent::Failed) => DeletionState::Idle,

            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: DeletionState, event: &DeletionEvent) -> bool {
        Self::transition(current, event.clone()).is_ok()
    }
}

/// How a deletion attempt ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// The user declined a prompt; nothing was sent or removed
    Declined,
    /// Account deleted and local data wiped; show this screen next
    Deleted(Route),
}

/// Run the two-step confirmation and, if both are accepted, delete the account.
///
/// A guest session fails before any prompt is shown.
pub async fn delete_account(app: &App, confirmer: &dyn Confirmer) -> Result<DeletionOutcome> {
    if app.session().read().await?.is_none() {
        return Err(Error::Unauthenticated);
    }

    let mut state = DeletionStateMachine::transition(DeletionState::Idle, DeletionEvent::Request)?;
    while let Some(prompt) = state.prompt() {
        let event = if confirmer.confirm(prompt).await {
            DeletionEvent::Confirm
        } else {
            DeletionEvent::Decline
        };
        state = DeletionStateMachine::transition(state, event)?;
    }

    if state != DeletionState::Executing {
        tracing::info!(state = %state, "Account deletion declined");
        return Ok(DeletionOutcome::Declined);
    }

    let result = authenticated(app.session(), "delete_account", |record| async move {
        app.api()
            .delete_user(&record.user_id, record.authorization())
            .await
    })
    .await
    .and_then(|outcome| outcome.require());

    if let Err(e) = result {
        DeletionStateMachine::transition(state, DeletionEvent::Failed)?;
        return Err(e);
    }

    DeletionStateMachine::transition(state, DeletionEvent::Succeeded)?;
    app.session().wipe().await?;
    tracing::info!("Account deleted");
    Ok(DeletionOutcome::Deleted(Route::SignIn))
}
