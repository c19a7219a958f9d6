//! Module group errors.

use crate::capability::Capabilities;
use crate::error::{ErrorSeverity, ModuleError};
use crate::ids::ActionId;

/// Errors surfaced by module group mutation and initialization.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GroupError {
    /// The group was initialized without an owning action.
    #[error("{group} group initialized without an owning action")]
    MissingAction { group: &'static str },

    /// A module lacking the group's required capability was offered.
    #[error("module '{module}' lacks {required:?} required by the {group} group")]
    TypeMismatch {
        group: &'static str,
        module: String,
        required: Capabilities,
    },

    /// Structural edits to an asset template are refused at runtime.
    #[error("cannot change modules of template action {action} at runtime")]
    TemplateLocked { action: ActionId },
}

impl ModuleError for GroupError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingAction { .. } | Self::TypeMismatch { .. } => ErrorSeverity::Validation,
            Self::TemplateLocked { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingAction { .. } => "GROUP_MISSING_ACTION",
            Self::TypeMismatch { .. } => "GROUP_TYPE_MISMATCH",
            Self::TemplateLocked { .. } => "GROUP_TEMPLATE_LOCKED",
        }
    }
}
