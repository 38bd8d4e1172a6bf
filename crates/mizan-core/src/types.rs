//! # Domain Types
//!
//! Core domain types used throughout Mizan POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌───────────────┐   ┌──────────────────┐   ┌────────────────────┐ │
//! │  │   CartLine    │   │  LoyaltyAccount  │   │  ZatcaInvoiceData  │ │
//! │  │  ───────────  │   │  ──────────────  │   │  ────────────────  │ │
//! │  │  item_code    │   │  customer_id     │   │  invoice_id        │ │
//! │  │  unit_price   │   │  phone / email   │   │  seller_name       │ │
//! │  │  quantity     │   │  points          │   │  vat_number        │ │
//! │  │  discount     │   └──────────────────┘   │  issued_at         │ │
//! │  └───────────────┘                          │  total / vat       │ │
//! │                                             └────────────────────┘ │
//! │                                                                     │
//! │  Cart + PricingResult exist only inside an open transaction and     │
//! │  are recomputed on every mutation; ZatcaInvoiceData is immutable    │
//! │  once a sale completes.                                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Discount Kind
// =============================================================================

/// How a line discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// `discount_value` is basis points off the line subtotal
    /// (2000 = 20%). Must not exceed 10000 (100%).
    Percentage,
    /// `discount_value` is halalas off per unit sold.
    Fixed,
}

impl Default for DiscountKind {
    fn default() -> Self {
        DiscountKind::Percentage
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One line of an open cart.
///
/// Monetary fields are halalas; percentage discounts are basis points so
/// that fractional percentages (12.5%) stay exact integers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// ERPNext item code of the product being sold.
    pub item_code: String,

    /// Display name at time of sale (frozen snapshot).
    pub name: String,

    /// Unit sale price in halalas.
    pub unit_price_halalas: i64,

    /// Unit cost price in halalas (used for the Stock Entry basic_rate).
    pub cost_halalas: i64,

    /// Quantity sold. Must be >= 1.
    pub quantity: i64,

    /// Discount value: basis points if `Percentage`, halalas per unit
    /// if `Fixed`. Must be >= 0.
    pub discount_value: i64,

    /// Interpretation of `discount_value`.
    pub discount_kind: DiscountKind,
}

impl CartLine {
    /// Convenience constructor for an undiscounted line.
    pub fn new(item_code: impl Into<String>, unit_price_halalas: i64, quantity: i64) -> Self {
        let item_code = item_code.into();
        CartLine {
            name: item_code.clone(),
            item_code,
            unit_price_halalas,
            cost_halalas: 0,
            quantity,
            discount_value: 0,
            discount_kind: DiscountKind::Percentage,
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_halalas(self.unit_price_halalas)
    }

    /// Line subtotal before any discount: `unit_price × quantity`.
    #[inline]
    pub fn line_subtotal(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// An open cart: the lines of an in-progress transaction.
///
/// Carts carry no derived totals. Every total is recomputed from the lines
/// by [`crate::pricing`] on demand, so the cart can never disagree with
/// its own pricing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Loyalty
// =============================================================================

/// A customer loyalty account.
///
/// The point balance is mutated only by [`crate::pricing::redeem`] (and by
/// post-sale accrual, which lives outside this crate).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyAccount {
    pub customer_id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    /// Current point balance. Never negative.
    pub points: i64,
}

/// Process-wide loyalty configuration. Read-only during a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoyaltyRule {
    /// Points earned per riyal spent (accrual side, applied externally).
    pub points_per_riyal: i64,

    /// Minimum point balance before any redemption is allowed. Redeemed
    /// amounts are always whole multiples of this threshold.
    pub redeem_threshold: i64,

    /// Monetary value of one point, in halalas (10 = SAR 0.10).
    pub point_value_halalas: i64,
}

impl Default for LoyaltyRule {
    fn default() -> Self {
        LoyaltyRule {
            points_per_riyal: 1,
            redeem_threshold: 500,
            point_value_halalas: 10,
        }
    }
}

// =============================================================================
// Pricing Result
// =============================================================================

/// The fully derived pricing of a cart.
///
/// Never stored independently of the cart that produced it; recomputed on
/// every cart mutation. Satisfies the identity
/// `grand_total = subtotal - total_discount - points_discount + vat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    /// Σ unit_price × quantity over all lines.
    pub subtotal: Money,

    /// Σ line discounts over all lines.
    pub total_discount: Money,

    /// Monetary value of redeemed loyalty points (zero when redemption is
    /// not activated for the transaction).
    pub points_discount: Money,

    /// VAT on the discounted taxable base.
    pub vat: Money,

    /// Final amount payable.
    pub grand_total: Money,
}

// =============================================================================
// ZATCA Invoice Data
// =============================================================================

/// The five mandatory fields of a ZATCA simplified-invoice QR payload.
///
/// Immutable once constructed for a given sale: re-encoding the same data
/// must yield a byte-identical TLV blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZatcaInvoiceData {
    /// Caller-supplied unique invoice identifier (not itself a TLV tag,
    /// but pins the payload to one sale).
    pub invoice_id: String,

    /// Tag 1: configured store display name. May be Arabic.
    pub seller_name: String,

    /// Tag 2: VAT registration number of the seller.
    pub vat_number: String,

    /// Tag 3: invoice timestamp, ISO-8601, as generated at sale completion.
    pub issued_at: String,

    /// Tag 4: invoice grand total including VAT.
    pub total: Money,

    /// Tag 5: VAT amount.
    pub vat: Money,
}

impl ZatcaInvoiceData {
    /// Assembles the invoice data from a pricing result at sale completion.
    pub fn from_pricing(
        invoice_id: impl Into<String>,
        seller_name: impl Into<String>,
        vat_number: impl Into<String>,
        issued_at: DateTime<Utc>,
        pricing: &PricingResult,
    ) -> Self {
        ZatcaInvoiceData {
            invoice_id: invoice_id.into(),
            seller_name: seller_name.into(),
            vat_number: vat_number.into(),
            issued_at: issued_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            total: pricing.grand_total,
            vat: pricing.vat,
        }
    }
}

// =============================================================================
// Invoice Id Generation
// =============================================================================

/// Generates a fresh, timestamp-derived invoice id.
///
/// A stale or duplicate invoice id must never be reused; callers generate
/// one of these per completed sale so ERP-side duplicate detection stays
/// meaningful.
pub fn new_invoice_id(now: DateTime<Utc>) -> String {
    format!("INV-{}", now.format("%Y%m%d%H%M%S%3f"))
}

// =============================================================================
// Unit Tests
// =============================================================================
