//! Common types shared across the Clockin crates.
//!
//! This crate defines the shared error type, the run outcome reported by the
//! attendance flow, and observability helpers. It is intentionally lightweight
//! and dependency-minimal so that all crates can depend on it without
//! introducing heavy transitive costs.
//!
//! # Overview
//!
//! - [`ClockinError`] and [`Result`]: shared error handling
//! - [`RunOutcome`]: what a single attendance attempt concluded
//! - [`observability`]: centralised tracing/logging initialisation
use serde::{Deserialize, Serialize};

pub mod observability;

/// Error types used across the Clockin system.
#[derive(thiserror::Error, Debug)]
pub enum ClockinError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The browser driver reported an error.
    #[error("Driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// A bounded wait elapsed before the page reached the expected state.
    #[error("Timed out waiting for {0}")]
    Timeout(String),

    /// The sign-in flow itself failed (element missing, click rejected, ...).
    #[error("Sign-in failed: {0}")]
    SignIn(String),
}

/// Convenient alias for results that use [`ClockinError`].
pub type Result<T> = std::result::Result<T, ClockinError>;

/// What a single attendance attempt concluded.
///
/// The portal gives no structured acknowledgement, so every variant carries
/// the heuristic evidence it was derived from. [`RunOutcome::success`] is the
/// single place the process exit code is decided from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// A Sign Out button or a success phrase appeared after our click.
    SignedIn { indicator: String },
    /// Attendance was already marked before we touched anything.
    AlreadySignedIn,
    /// The modal closed but no positive signal was found.
    Unconfirmed { reason: String },
}

impl RunOutcome {
    /// Whether this outcome maps to exit code 0.
    ///
    /// `Unconfirmed` is treated as failure: an ambiguous page after a click
    /// is exactly the case a scheduled run must surface loudly.
    pub fn success(&self) -> bool {
        matches!(self, Self::SignedIn { .. } | Self::AlreadySignedIn)
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignedIn { indicator } => write!(f, "signed in ({indicator})"),
            Self::AlreadySignedIn => write!(f, "already signed in"),
            Self::Unconfirmed { reason } => write!(f, "unconfirmed: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_success_mapping() {
        assert!(RunOutcome::SignedIn {
            indicator: "Sign Out button present".into()
        }
        .success());
        assert!(RunOutcome::AlreadySignedIn.success());
        assert!(!RunOutcome::Unconfirmed {
            reason: "modal closed but sign-in status unclear".into()
        }
        .success());
    }

    #[test]
    fn outcome_display_is_log_friendly() {
        let o = RunOutcome::SignedIn {
            indicator: "attendance marked".into(),
        };
        assert_eq!(o.to_string(), "signed in (attendance marked)");
    }
}
