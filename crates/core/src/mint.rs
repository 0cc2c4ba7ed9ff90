//! Mint request status constants and transition rules.
//!
//! These match the `status` CHECK constraint on the `nft_mint_requests`
//! table. A request starts `pending` and moves exactly once, to `minted`
//! or `failed`; both are terminal.

use crate::error::CoreError;

/// Request created, confirmation outstanding.
pub const MINT_STATUS_PENDING: &str = "pending";

/// Confirmed on chain; `txn_hash` and `metadata_url` are populated.
pub const MINT_STATUS_MINTED: &str = "minted";

/// Confirmation reported failure; no transaction hash exists.
pub const MINT_STATUS_FAILED: &str = "failed";

/// All valid status values.
pub const VALID_MINT_STATUSES: &[&str] =
    &[MINT_STATUS_PENDING, MINT_STATUS_MINTED, MINT_STATUS_FAILED];

/// Whether a status permits no further transitions.
pub fn is_terminal(status: &str) -> bool {
    status == MINT_STATUS_MINTED || status == MINT_STATUS_FAILED
}

/// Validate a status transition.
///
/// Only `pending -> minted` and `pending -> failed` are legal. Anything
/// out of a terminal state is a [`CoreError::Conflict`], which callers
/// treat as a no-op rejection rather than a crash -- duplicate confirmation
/// deliveries land here.
pub fn validate_transition(from: &str, to: &str) -> Result<(), CoreError> {
    if !VALID_MINT_STATUSES.contains(&to) {
        return Err(CoreError::Validation(format!(
            "Unknown mint status '{to}'"
        )));
    }
    if from == MINT_STATUS_PENDING && is_terminal(to) {
        return Ok(());
    }
    Err(CoreError::Conflict(format!(
        "Invalid mint transition from '{from}' to '{to}'"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_to_minted_allowed() {
        assert!(validate_transition(MINT_STATUS_PENDING, MINT_STATUS_MINTED).is_ok());
    }

    #[test]
    fn pending_to_failed_allowed() {
        assert!(validate_transition(MINT_STATUS_PENDING, MINT_STATUS_FAILED).is_ok());
    }

    #[test]
    fn terminal_states_reject_all_transitions() {
        assert!(matches!(
            validate_transition(MINT_STATUS_MINTED, MINT_STATUS_FAILED),
            Err(CoreError::Conflict(_))
        ));
        assert!(matches!(
            validate_transition(MINT_STATUS_MINTED, MINT_STATUS_MINTED),
            Err(CoreError::Conflict(_))
        ));
        assert!(matches!(
            validate_transition(MINT_STATUS_FAILED, MINT_STATUS_MINTED),
            Err(CoreError::Conflict(_))
        ));
    }

    #[test]
    fn pending_to_pending_rejected() {
        assert!(validate_transition(MINT_STATUS_PENDING, MINT_STATUS_PENDING).is_err());
    }

    #[test]
    fn unknown_target_status_is_validation_error() {
        assert!(matches!(
            validate_transition(MINT_STATUS_PENDING, "confirmed"),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn terminal_classification() {
        assert!(!is_terminal(MINT_STATUS_PENDING));
        assert!(is_terminal(MINT_STATUS_MINTED));
        assert!(is_terminal(MINT_STATUS_FAILED));
    }
}
