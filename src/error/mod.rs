//! Error types for quotaboard.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! - **Configuration**: bad interval, width, `--show` token, or config file.
//!   Fatal, never retried.
//! - **Credential read**: the credential store could not be read. Fatal in
//!   single-shot mode, a skipped frame in watch mode.
//! - **Internal**: I/O and serialization failures.
//!
//! Provider query failures are not errors at this level: they are collected
//! as [`crate::core::models::ProviderFailure`] values and rendered alongside
//! partial results.

use thiserror::Error;

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Normal completion, with or without results, or graceful interrupt.
    Success = 0,
    /// Configuration or credential store failure.
    GeneralError = 1,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as Self
    }
}

/// Main error type for quotaboard operations.
#[derive(Error, Debug)]
pub enum QuotaError {
    // ==========================================================================
    // Configuration errors
    // ==========================================================================
    /// Generic configuration error (config file parse, validation).
    #[error("configuration error: {0}")]
    Config(String),

    /// Polling interval is not a positive number of minutes.
    #[error("invalid interval '{0}': must be a positive whole number of minutes")]
    InvalidInterval(String),

    /// Width cap is below the supported minimum.
    #[error("invalid width '{value}': must be at least {min} columns")]
    InvalidWidth { value: String, min: u16 },

    /// Width cap is not a column count at all (non-numeric or too large).
    #[error("invalid width '{value}': must be a whole number from {min} to {max} columns")]
    UnparsableWidth { value: String, min: u16, max: u16 },

    /// Unknown region name passed to `--show`.
    #[error("unknown --show region '{token}' (valid: header, summary, dashboard, footer)")]
    UnknownShowToken { token: String },

    // ==========================================================================
    // Credential store errors
    // ==========================================================================
    /// The credential store could not be read or parsed.
    #[error("cannot read credential store {path}: {reason}")]
    CredentialRead { path: String, reason: String },

    // ==========================================================================
    // Internal errors
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QuotaError {
    /// Map error to a process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_)
            | Self::InvalidInterval(_)
            | Self::InvalidWidth { .. }
            | Self::UnparsableWidth { .. }
            | Self::UnknownShowToken { .. }
            | Self::CredentialRead { .. }
            | Self::Io(_)
            | Self::Json(_) => ExitCode::GeneralError,
        }
    }

    /// Whether this is a configuration error (never retried, even in watch mode).
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::InvalidInterval(_)
                | Self::InvalidWidth { .. }
                | Self::UnparsableWidth { .. }
                | Self::UnknownShowToken { .. }
        )
    }

    /// Whether watch mode may skip the current frame and keep polling.
    #[must_use]
    pub const fn is_frame_recoverable(&self) -> bool {
        matches!(self, Self::CredentialRead { .. } | Self::Io(_))
    }
}

/// Result type alias using [`QuotaError`].
pub type Result<T> = std::result::Result<T, QuotaError>;
