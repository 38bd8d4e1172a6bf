//! # Sync Error Types
//!
//! Error types for ERPNext sync operations.
//!
//! ## Two Layers of Failure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                                                                     │
//! │  SyncError (this file)          SyncOutcome (client module)         │
//! │  ──────────────────────         ─────────────────────────────       │
//! │  Local faults that stop an      Per-write classification of what    │
//! │  operation from being issued    the ERP said. Never an Err: a       │
//! │  at all: bad config, broken     rejected or unreachable write is    │
//! │  URL, serialization.            a RESULT the orchestrator reports,  │
//! │                                 not an exception it propagates.     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Sync error type covering local (pre-dispatch) failures.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid sync configuration.
    #[error("Invalid sync configuration: {0}")]
    InvalidConfig(String),

    /// Invalid ERP base URL.
    #[error("Invalid ERP URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Client Errors
    // =========================================================================
    /// The HTTP client could not be constructed (bad credentials header).
    #[error("Failed to build HTTP client: {0}")]
    ClientBuildFailed(String),

    /// A request failed before any classification applied (e.g., a GET
    /// for catalog refresh — the dual-write POSTs classify instead).
    #[error("ERP request failed: {0}")]
    RequestFailed(String),

    /// Failed to serialize an outbound payload.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Failed to parse an ERP response body.
    #[error("Unexpected ERP response: {0}")]
    UnexpectedResponse(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::SerializationFailed(err.to_string())
    }
}

impl From<url::ParseError> for SyncError {
    fn from(err: url::ParseError) -> Self {
        SyncError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        SyncError::ConfigSaveFailed(err.to_string())
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::RequestFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SyncError {
    /// Returns true if this error indicates a configuration problem
    /// (fix the config, not the network).
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidConfig(_)
                | SyncError::InvalidUrl(_)
                | SyncError::ConfigLoadFailed(_)
                | SyncError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_categorization() {
        assert!(SyncError::InvalidConfig("bad".into()).is_config_error());
        assert!(SyncError::InvalidUrl("bad".into()).is_config_error());
        assert!(!SyncError::RequestFailed("timeout".into()).is_config_error());
    }

    #[test]
    fn test_error_display() {
        let err = SyncError::InvalidUrl("not-a-url".into());
        assert!(err.to_string().contains("not-a-url"));
    }
}
