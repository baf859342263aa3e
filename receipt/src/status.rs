//! Presentation state for the "verify a receipt" dialog.

use serde::{Deserialize, Serialize};

use crate::verify::{TokenRejection, normalize_input, verify_token};

/// Display state of a verification. `Idle` is the pre-check state, not a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    Idle,
    Valid,
    Invalid,
}

impl VerificationStatus {
    #[must_use]
    pub fn from_verdict(valid: bool) -> Self {
        if valid { Self::Valid } else { Self::Invalid }
    }

    #[must_use]
    pub fn is_settled(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Input buffer plus status for an interactive verifier.
///
/// Every edit uppercases the input and drops back to `Idle`.
#[derive(Debug, Clone, Default)]
pub struct TokenVerifier {
    input: String,
    status: VerificationStatus,
    last_rejection: Option<TokenRejection>,
}

impl TokenVerifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, raw: &str) {
        self.input = normalize_input(raw);
        self.status = VerificationStatus::Idle;
        self.last_rejection = None;
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn status(&self) -> VerificationStatus {
        self.status
    }

    /// Which check failed on the last submit, if any.
    #[must_use]
    pub fn last_rejection(&self) -> Option<TokenRejection> {
        self.last_rejection
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.input.is_empty()
    }

    /// Run the verifier on the current input. Empty input stays `Idle`.
    pub fn submit(&mut self) -> VerificationStatus {
        if !self.can_submit() {
            return self.status;
        }
        let verdict = verify_token(&self.input);
        self.last_rejection = verdict.as_ref().err().copied();
        self.status = VerificationStatus::from_verdict(verdict.is_ok());
        tracing::debug!(status = ?self.status, "receipt token checked");
        self.status
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
