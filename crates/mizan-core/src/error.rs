//! # Error Types
//!
//! Domain-specific error types for mizan-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  mizan-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                    │
//! │  ├── ValidationError  - Malformed pricing input (fails fast,        │
//! │  │                      never reaches the ERP)                      │
//! │  └── EncodingError    - ZATCA TLV field missing/invalid; blocks     │
//! │                         checkout completion                         │
//! │                                                                     │
//! │  mizan-sync errors (separate crate)                                 │
//! │  └── SyncError        - Remote classification + transport failures  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item code, field, amounts)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Redemption requested for more points than the account holds.
    #[error("Insufficient points: account has {available}, redemption needs {requested}")]
    InsufficientPoints { available: i64, requested: i64 },

    /// Account balance is below the minimum redeemable threshold.
    #[error("Point balance {points} is below the redemption threshold {threshold}")]
    BelowRedeemThreshold { points: i64, threshold: i64 },

    /// Redemption amount is not a whole multiple of the threshold.
    #[error("Redemption of {points} points is not a multiple of the threshold {threshold}")]
    UnevenRedemption { points: i64, threshold: i64 },

    /// A points discount would push the payable amount below zero.
    #[error("Points discount of {discount_halalas} halalas exceeds the discounted cart total of {payable_halalas} halalas")]
    RedemptionExceedsCartTotal {
        discount_halalas: i64,
        payable_halalas: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// TLV encoding error (wraps EncodingError).
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any pricing math runs, so a malformed cart can never
/// produce an invoice with incorrect totals.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// A fixed discount would exceed the line's own subtotal.
    #[error("discount of {discount_halalas} halalas exceeds line subtotal of {line_subtotal_halalas} halalas for {item_code}")]
    DiscountExceedsLine {
        item_code: String,
        discount_halalas: i64,
        line_subtotal_halalas: i64,
    },

    /// Invalid format (e.g., malformed VAT registration number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Encoding Error
// =============================================================================

/// ZATCA TLV encoding errors.
///
/// Checkout must not reach the payment-success state while one of these
/// is outstanding: no QR payload, no finalized invoice.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// A mandatory TLV field is empty. All five tags are required.
    #[error("ZATCA field '{field}' (tag {tag}) is empty")]
    MissingField { field: &'static str, tag: u8 },

    /// A field value exceeds the single-byte TLV length limit.
    #[error("ZATCA field '{field}' (tag {tag}) is {len} bytes; TLV length is a single byte (max 255)")]
    ValueTooLong {
        field: &'static str,
        tag: u8,
        len: usize,
    },

    /// A TLV payload could not be parsed back into fields.
    #[error("Malformed TLV payload: {0}")]
    MalformedPayload(String),

    /// The Base64 wrapper around a TLV payload is invalid.
    #[error("Invalid Base64: {0}")]
    InvalidBase64(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientPoints {
            available: 100,
            requested: 500,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient points: account has 100, redemption needs 500"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_encoding_error_message_names_tag() {
        let err = EncodingError::MissingField {
            field: "seller_name",
            tag: 1,
        };
        assert!(err.to_string().contains("tag 1"));
    }
}
