//! Common error infrastructure for action-core.
//!
//! Domain errors (`GroupError`, `ActionError`) live next to the code that
//! produces them. Nothing in this crate panics on bad input: configuration
//! errors are returned and logged, consistency problems are logged as
//! warnings and skipped, and idempotent replays are silent no-ops.

/// Severity level of an error, used for categorization and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; the same call may succeed later.
    ///
    /// Examples: item action not equipped yet
    Recoverable,

    /// Invalid input that should not be retried unchanged.
    ///
    /// Examples: module of the wrong capability added to a typed group
    Validation,

    /// Unexpected inconsistency between collaborators.
    ///
    /// Examples: group registered under an id that resolves to another kind
    Internal,

    /// The item action cannot be used any more.
    ///
    /// Examples: operation on a destroyed action
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all action-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Error codes are stable strings usable in logs and tests
pub trait ModuleError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Logs an error at the level matching its severity.
///
/// Used at the points where the subsystem aborts an operation but keeps
/// running, so the failure is visible without unwinding the caller.
pub fn report<E: ModuleError>(error: &E) {
    let code = error.error_code();
    let severity = error.severity().as_str();
    match error.severity() {
        ErrorSeverity::Recoverable => {
            tracing::debug!(code, severity, "{error}");
        }
        ErrorSeverity::Validation | ErrorSeverity::Internal | ErrorSeverity::Fatal => {
            tracing::error!(code, severity, "{error}");
        }
    }
}
