//! # mizan-core: Pure Business Logic for Mizan POS
//!
//! This crate is the **heart** of Mizan POS. It contains all checkout
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Mizan POS Architecture                         │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                    Application / UI layer                     │ │
//! │  │      cart screens ──► payment ──► receipt (out of scope)      │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │               ★ mizan-core (THIS CRATE) ★                     │ │
//! │  │                                                               │ │
//! │  │  ┌─────────┐ ┌─────────┐ ┌───────┐ ┌────────────┐ ┌────────┐ │ │
//! │  │  │  money  │ │ pricing │ │ zatca │ │ attendance │ │ types  │ │ │
//! │  │  │  Money  │ │ VAT,    │ │ TLV   │ │ access     │ │ Cart,  │ │ │
//! │  │  │  Rate   │ │ loyalty │ │ + QR  │ │ gate       │ │ ...    │ │ │
//! │  │  └─────────┘ └─────────┘ └───────┘ └────────────┘ └────────┘ │ │
//! │  │                                                               │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │                mizan-sync (ERPNext dual-write)                │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Cart, LoyaltyAccount, ZatcaInvoiceData, ...)
//! - [`money`] - Money type with integer halala arithmetic (no floats!)
//! - [`pricing`] - Cart pricing, discounts, VAT, loyalty redemption
//! - [`zatca`] - ZATCA TLV/QR payload encoding
//! - [`attendance`] - Attendance access gate state machine
//! - [`validation`] - Fail-fast business rule validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, always
//! 2. **No I/O**: database, network, and file access are FORBIDDEN here
//! 3. **Integer Money**: all amounts are halalas (i64) to avoid float drift
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use mizan_core::pricing::price_cart;
//! use mizan_core::types::{Cart, CartLine};
//!
//! let mut cart = Cart::new();
//! cart.lines.push(CartLine::new("COKE-330", 4500, 2)); // SAR 45.00 × 2
//!
//! let pricing = price_cart(&cart, None).unwrap();
//! assert_eq!(pricing.grand_total.halalas(), 10350); // SAR 103.50 incl. VAT
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod attendance;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;
pub mod zatca;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, EncodingError, ValidationError};
pub use money::{Money, Rate, VAT_RATE_BPS};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps a single Sales Invoice payload a
/// reasonable size for the ERP.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in a cart line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
