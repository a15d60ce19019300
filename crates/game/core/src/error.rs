//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (e.g. [`Rejection`](crate::action::Rejection),
//! [`StateError`](crate::state::StateError)) live next to the code that
//! produces them and share the classification defined here.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed once the state changes
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistency that requires investigation
/// - **Fatal**: required collaborators are missing, the session cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: board full, synthesis already running, not enough gold.
    Recoverable,

    /// Examples: unknown card id, unknown recipe id.
    Validation,

    /// Examples: post-transition invariant violated.
    Internal,

    /// Examples: content oracle missing at initialization.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common interface for game-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Used for log fields and event payloads.
    fn error_code(&self) -> &'static str;
}
