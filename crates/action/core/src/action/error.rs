//! Item action errors.

use crate::error::{ErrorSeverity, ModuleError};
use crate::group::GroupError;
use crate::ids::GroupId;

use super::ActionPhase;

/// Errors returned by [`ItemAction`](super::ItemAction) operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The call is not valid in the current lifecycle phase.
    #[error("expected phase {expected}, action is {actual}")]
    InvalidPhase {
        expected: ActionPhase,
        actual: ActionPhase,
    },

    /// Live behavior was requested while authoring.
    #[error("operation requires running mode")]
    AuthoringMode,

    #[error("no group registered under {0}")]
    UnknownGroup(GroupId),

    /// The group exists but is of another kind.
    #[error("group {id} is a {actual} group, not {expected}")]
    GroupKindMismatch {
        id: GroupId,
        expected: &'static str,
        actual: &'static str,
    },

    /// The group holds no module at the given position.
    #[error("group {group} has no module at {index}")]
    UnknownModule { group: GroupId, index: usize },

    #[error(transparent)]
    Group(#[from] GroupError),
}

impl ModuleError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidPhase { actual, .. } if *actual == ActionPhase::Destroyed => {
                ErrorSeverity::Fatal
            }
            Self::InvalidPhase { .. } | Self::AuthoringMode => ErrorSeverity::Recoverable,
            Self::UnknownGroup(_) | Self::UnknownModule { .. } => ErrorSeverity::Validation,
            Self::GroupKindMismatch { .. } => ErrorSeverity::Internal,
            Self::Group(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPhase { .. } => "ACTION_INVALID_PHASE",
            Self::AuthoringMode => "ACTION_AUTHORING_MODE",
            Self::UnknownGroup(_) => "ACTION_UNKNOWN_GROUP",
            Self::GroupKindMismatch { .. } => "ACTION_GROUP_KIND_MISMATCH",
            Self::UnknownModule { .. } => "ACTION_UNKNOWN_MODULE",
            Self::Group(err) => err.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destroyed_phase_is_fatal() {
        let err = ActionError::InvalidPhase {
            expected: ActionPhase::Active,
            actual: ActionPhase::Destroyed,
        };
        assert_eq!(err.severity(), ErrorSeverity::Fatal);

        let err = ActionError::InvalidPhase {
            expected: ActionPhase::Active,
            actual: ActionPhase::Initialized,
        };
        assert!(err.severity().is_recoverable());
    }

    #[test]
    fn group_errors_keep_their_code() {
        let err = ActionError::from(GroupError::MissingAction { group: "triggers" });
        assert_eq!(err.error_code(), "GROUP_MISSING_ACTION");
        assert_eq!(err.severity(), ErrorSeverity::Validation);
    }
}
