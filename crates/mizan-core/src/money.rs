//! # Money Module
//!
//! Provides the `Money` type for handling Saudi Riyal amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  Repeated additions across a cart drift, and ZATCA requires the     │
//! │  QR totals to match the invoice to the halala.                      │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Halalas                                      │
//! │    1 SAR = 100 halalas; all arithmetic is exact i64 math.           │
//! │    Rounding happens once, at presentation time.                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mizan_core::money::Money;
//!
//! // Create from halalas (preferred)
//! let price = Money::from_halalas(4500); // SAR 45.00
//!
//! // Arithmetic operations
//! let line = price * 2;                  // SAR 90.00
//!
//! // ZATCA tag 4/5 rendering: two decimal places, exact
//! assert_eq!(line.to_decimal_string(), "90.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// VAT Rate
// =============================================================================

/// Saudi standard VAT rate in basis points (15.00%).
pub const VAT_RATE_BPS: u32 = 1500;

/// A percentage rate in basis points (1 bps = 0.01%).
///
/// Used for VAT (1500 bps = 15%) and percentage line discounts
/// (2000 bps = 20% off).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// The standard Saudi VAT rate (15%).
    #[inline]
    pub const fn vat() -> Self {
        Rate(VAT_RATE_BPS)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in halalas (the smallest SAR unit, 1/100 riyal).
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative intermediate values (discrepancies,
///   cash-drawer shortfalls) even though invoice amounts are non-negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Rounding**: half-up via integer math, applied once per derivation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from halalas.
    ///
    /// ## Example
    /// ```rust
    /// use mizan_core::money::Money;
    ///
    /// let price = Money::from_halalas(1050); // SAR 10.50
    /// assert_eq!(price.halalas(), 1050);
    /// ```
    #[inline]
    pub const fn from_halalas(halalas: i64) -> Self {
        Money(halalas)
    }

    /// Creates a Money value from riyals and halalas.
    ///
    /// For negative amounts, only the riyal part should be negative:
    /// `from_riyals(-5, 50)` is SAR -5.50.
    #[inline]
    pub const fn from_riyals(riyals: i64, halalas: i64) -> Self {
        if riyals < 0 {
            Money(riyals * 100 - halalas)
        } else {
            Money(riyals * 100 + halalas)
        }
    }

    /// Returns the value in halalas.
    #[inline]
    pub const fn halalas(&self) -> i64 {
        self.0
    }

    /// Returns the whole-riyal portion.
    #[inline]
    pub const fn riyals(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the halala portion (always 0-99).
    #[inline]
    pub const fn halalas_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is strictly positive.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Clamps negative values to zero.
    ///
    /// Discounts must never go below zero (a "discount" can never add to
    /// the total), so derived discount amounts pass through this.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Multiplies by an item quantity.
    ///
    /// ## Example
    /// ```rust
    /// use mizan_core::money::Money;
    ///
    /// let unit_price = Money::from_halalas(4500); // SAR 45.00
    /// assert_eq!(unit_price.multiply_quantity(2).halalas(), 9000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns `rate` percent of this amount, rounded half-up.
    ///
    /// Used for both VAT and percentage discounts:
    /// `SAR 90.00 × 15% = SAR 13.50`.
    ///
    /// ## Implementation
    /// Integer math in i128 to prevent overflow on large amounts:
    /// `(amount * bps + 5000) / 10000` — the +5000 provides half-up
    /// rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use mizan_core::money::{Money, Rate};
    ///
    /// let taxable = Money::from_halalas(9000); // SAR 90.00
    /// let vat = taxable.percentage_of(Rate::vat());
    /// assert_eq!(vat.halalas(), 1350); // SAR 13.50
    /// ```
    pub fn percentage_of(&self, rate: Rate) -> Money {
        let amount = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_halalas(amount as i64)
    }

    /// Renders the amount as a plain decimal string with exactly two
    /// fraction digits, as mandated for ZATCA TLV tags 4 and 5.
    ///
    /// No currency symbol, no thousands separators: `"103.50"`.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.riyals().abs(), self.halalas_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount with a currency prefix for logs and receipts.
/// Use [`Money::to_decimal_string`] for ZATCA wire formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SAR {}", self.to_decimal_string())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
