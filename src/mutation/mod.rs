//! Add, edit and delete flows: their state machine and what they report.

use serde::Serialize;

use crate::gateway::RequestError;

pub mod form;

pub use form::{EventForm, Field, FieldProblem, Problem, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

/// `Idle -> Validating -> Invalid | Submitting -> Succeeded | Failed`.
///
/// `Invalid`, `Succeeded` and `Failed` are resting states: a flow in any of
/// them may start again. Only `Submitting` blocks a new attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MutationState {
    #[default]
    Idle,
    Validating,
    Invalid(ValidationError),
    Submitting,
    Succeeded,
    Failed(RequestError),
}

#[derive(Debug, Clone, Default)]
pub struct MutationFlow {
    state: MutationState,
}

impl MutationFlow {
    pub fn state(&self) -> &MutationState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == MutationState::Submitting
    }

    pub fn begin(&mut self) -> Result<(), MutationError> {
        if self.is_submitting() {
            return Err(MutationError::AlreadySubmitting);
        }
        self.state = MutationState::Validating;
        Ok(())
    }

    pub fn reject(&mut self, error: ValidationError) {
        self.state = MutationState::Invalid(error);
    }

    pub fn submit(&mut self) {
        self.state = MutationState::Submitting;
    }

    pub fn finish<T>(&mut self, result: &Result<T, RequestError>) {
        self.state = match result {
            Ok(_) => MutationState::Succeeded,
            Err(err) => MutationState::Failed(err.clone()),
        };
    }

    pub fn reset(&mut self) {
        self.state = MutationState::Idle;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("a submission is already in progress")]
    AlreadySubmitting,
    #[error("the view is no longer mounted")]
    Unmounted,
    #[error("there is no event to {0}")]
    NothingLoaded(&'static str),
}

impl MutationError {
    /// The notification shown when `kind` fails with this error.
    pub fn notification(&self, kind: MutationKind) -> Notification {
        match (self, kind) {
            (Self::Invalid(err), _) => Notification::error(err.title(), Some(err.description())),
            (Self::Request(_), MutationKind::Delete) => {
                Notification::error("An error occurred.", Some("Unable to delete the event."))
            }
            (Self::Request(err), MutationKind::Update) => {
                Notification::error("Failed to update event", Some(err.message()))
            }
            (Self::Request(err), MutationKind::Create) => {
                Notification::error("Failed to add event", Some(err.message()))
            }
            (other, _) => Notification::error(other.to_string(), None::<String>),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

/// Content of a transient toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub description: Option<String>,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: Option<impl Into<String>>) -> Self {
        Self {
            level: Level::Success,
            title: title.into(),
            description: description.map(Into::into),
        }
    }

    pub fn error(title: impl Into<String>, description: Option<impl Into<String>>) -> Self {
        Self {
            level: Level::Error,
            title: title.into(),
            description: description.map(Into::into),
        }
    }
}

/// Where the front end goes once a flow succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Navigation {
    CloseForm,
    Collection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome<T> {
    pub value: T,
    pub navigation: Navigation,
    pub notification: Notification,
    /// False when the view was unmounted before the response arrived and
    /// its state was left untouched.
    pub applied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_flow_blocks_only_while_submitting() {
        let mut flow = MutationFlow::default();
        flow.begin().expect("idle flow can begin");
        flow.submit();
        assert!(matches!(flow.begin(), Err(MutationError::AlreadySubmitting)));

        flow.finish::<()>(&Err(RequestError::Transport("down".to_string())));
        assert!(matches!(flow.state(), MutationState::Failed(_)));
        flow.begin().expect("failed flow can retry");
        assert_eq!(flow.state(), &MutationState::Validating);
    }

    #[test]
    fn test_invalid_flow_returns_to_resting_state() {
        let mut flow = MutationFlow::default();
        flow.begin().expect("idle flow can begin");
        flow.reject(ValidationError { problems: vec![] });
        assert!(!flow.is_submitting());
        flow.begin().expect("invalid flow can begin again");
    }

    #[test]
    fn test_delete_failure_notification() {
        let err = MutationError::Request(RequestError::Status {
            status: StatusCode::NOT_FOUND,
            message: "Failed to delete event".to_string(),
        });
        let note = err.notification(MutationKind::Delete);
        assert_eq!(note.level, Level::Error);
        assert_eq!(note.title, "An error occurred.");
        assert_eq!(note.description.as_deref(), Some("Unable to delete the event."));
    }

    #[test]
    fn test_update_failure_carries_request_message() {
        let err = MutationError::Request(RequestError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Failed to update event".to_string(),
        });
        let note = err.notification(MutationKind::Update);
        assert_eq!(note.title, "Failed to update event");
        assert_eq!(note.description.as_deref(), Some("Failed to update event"));
    }
}
