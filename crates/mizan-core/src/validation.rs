//! # Validation Module
//!
//! Fail-fast input validation for carts and seller configuration.
//!
//! ## Validation Strategy
//! Out-of-range pricing input (zero quantity, a percentage discount above
//! 100%, a fixed discount bigger than its own line) is rejected here with
//! a typed [`ValidationError`] instead of being silently clamped. Silent
//! clamping would let a malformed cart produce an invoice with plausible
//! but wrong totals, which is exactly the failure mode a tax-compliant
//! POS cannot afford.
//!
//! ## Usage
//! ```rust
//! use mizan_core::types::{Cart, CartLine};
//! use mizan_core::validation::validate_cart;
//!
//! let mut cart = Cart::new();
//! cart.lines.push(CartLine::new("COKE-330", 450, 2));
//! validate_cart(&cart).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::{Cart, CartLine, DiscountKind};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an item quantity.
///
/// ## Rules
/// - Must be >= 1
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in halalas.
///
/// Zero is allowed (promotional free items); negative prices are not.
pub fn validate_unit_price(halalas: i64) -> ValidationResult<()> {
    if halalas < 0 {
        return Err(ValidationError::OutOfRange {
            field: "unit_price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a loyalty point count (balance or redemption amount).
pub fn validate_points(points: i64) -> ValidationResult<()> {
    if points < 0 {
        return Err(ValidationError::OutOfRange {
            field: "points".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Line Validators
// =============================================================================

/// Validates a cart line's discount against its kind.
///
/// ## Rules
/// - Discount value must be >= 0 for both kinds
/// - Percentage: at most 10000 bps (100%)
/// - Fixed: `discount × quantity` must not exceed the line subtotal
///   (a negative line would understate the invoice)
pub fn validate_line_discount(line: &CartLine) -> ValidationResult<()> {
    if line.discount_value < 0 {
        return Err(ValidationError::OutOfRange {
            field: "discount_value".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    match line.discount_kind {
        DiscountKind::Percentage => {
            if line.discount_value > 10000 {
                return Err(ValidationError::OutOfRange {
                    field: "discount_value".to_string(),
                    min: 0,
                    max: 10000,
                });
            }
        }
        DiscountKind::Fixed => {
            let discount = line.discount_value * line.quantity;
            let subtotal = line.line_subtotal().halalas();
            if discount > subtotal {
                return Err(ValidationError::DiscountExceedsLine {
                    item_code: line.item_code.clone(),
                    discount_halalas: discount,
                    line_subtotal_halalas: subtotal,
                });
            }
        }
    }

    Ok(())
}

/// Validates a full cart line.
pub fn validate_line(line: &CartLine) -> ValidationResult<()> {
    if line.item_code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "item_code".to_string(),
        });
    }

    validate_quantity(line.quantity)?;
    validate_unit_price(line.unit_price_halalas)?;
    validate_line_discount(line)?;

    Ok(())
}

// =============================================================================
// Cart Validator
// =============================================================================

/// Validates every line of a cart plus the overall cart size.
///
/// An empty cart is valid input for pricing (it prices to zero); whether
/// an empty cart may be checked out is the caller's concern.
pub fn validate_cart(cart: &Cart) -> ValidationResult<()> {
    if cart.len() > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    for line in &cart.lines {
        validate_line(line)?;
    }

    Ok(())
}

// =============================================================================
// Seller Validators
// =============================================================================

/// Validates a Saudi VAT registration number.
///
/// ## Rules
/// - Exactly 15 ASCII digits
/// - Begins with '3' (ZATCA allocation for VAT-registered entities)
pub fn validate_vat_number(vat_number: &str) -> ValidationResult<()> {
    let vat_number = vat_number.trim();

    if vat_number.is_empty() {
        return Err(ValidationError::Required {
            field: "vat_number".to_string(),
        });
    }

    if vat_number.len() != 15 || !vat_number.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "vat_number".to_string(),
            reason: "must be exactly 15 digits".to_string(),
        });
    }

    if !vat_number.starts_with('3') {
        return Err(ValidationError::InvalidFormat {
            field: "vat_number".to_string(),
            reason: "must start with 3".to_string(),
        });
    }

    Ok(())
}

/// Validates the configured seller display name.
pub fn validate_seller_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "seller_name".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(0).is_ok());
        assert!(validate_unit_price(4500).is_ok());
        assert!(validate_unit_price(-1).is_err());
    }

    #[test]
    fn test_percentage_discount_over_100_rejected() {
        let mut line = CartLine::new("TEA-01", 1000, 1);
        line.discount_value = 10001; // 100.01%
        line.discount_kind = DiscountKind::Percentage;
        assert!(validate_line_discount(&line).is_err());

        line.discount_value = 10000; // exactly 100%
        assert!(validate_line_discount(&line).is_ok());
    }

    #[test]
    fn test_negative_discount_rejected() {
        let mut line = CartLine::new("TEA-01", 1000, 1);
        line.discount_value = -5;
        assert!(validate_line_discount(&line).is_err());
    }

    #[test]
    fn test_fixed_discount_exceeding_line_rejected() {
        let mut line = CartLine::new("TEA-01", 1000, 2);
        line.discount_kind = DiscountKind::Fixed;
        line.discount_value = 1001; // 1001 × 2 > 2000
        assert!(matches!(
            validate_line_discount(&line),
            Err(ValidationError::DiscountExceedsLine { .. })
        ));

        line.discount_value = 1000; // 1000 × 2 == 2000, allowed (free line)
        assert!(validate_line_discount(&line).is_ok());
    }

    #[test]
    fn test_validate_cart() {
        let mut cart = Cart::new();
        cart.lines.push(CartLine::new("COKE-330", 450, 2));
        assert!(validate_cart(&cart).is_ok());

        cart.lines.push(CartLine::new("", 450, 1));
        assert!(validate_cart(&cart).is_err());
    }

    #[test]
    fn test_validate_vat_number() {
        assert!(validate_vat_number("310122393500003").is_ok());

        assert!(validate_vat_number("").is_err());
        assert!(validate_vat_number("31012239350000").is_err()); // 14 digits
        assert!(validate_vat_number("110122393500003").is_err()); // not 3-prefixed
        assert!(validate_vat_number("31012239350000x").is_err());
    }
}
