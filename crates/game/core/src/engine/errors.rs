//! Phase bookkeeping for the transition pipeline.

use crate::action::Rejection;
use crate::error::{ErrorSeverity, GameError};

/// Identifies which stage of the transition pipeline produced a rejection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying rejection.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError {
    pub phase: TransitionPhase,
    pub rejection: Rejection,
}

impl TransitionPhaseError {
    pub fn new(phase: TransitionPhase, rejection: Rejection) -> Self {
        Self { phase, rejection }
    }
}

impl std::fmt::Display for TransitionPhaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.rejection)
    }
}

impl std::error::Error for TransitionPhaseError {}

impl GameError for TransitionPhaseError {
    fn severity(&self) -> ErrorSeverity {
        self.rejection.severity()
    }

    fn error_code(&self) -> &'static str {
        self.rejection.error_code()
    }
}
