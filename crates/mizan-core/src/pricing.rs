//! # Pricing Engine
//!
//! Pure cart pricing: subtotal, per-line and total discounts, loyalty
//! redemption, VAT, and grand total. No I/O, no hidden state.
//!
//! ## Computation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Pricing Pipeline                                │
//! │                                                                     │
//! │  Subtotal        Σ unit_price × quantity                            │
//! │      │                                                              │
//! │      ▼                                                              │
//! │  TotalDiscount   Σ per-line discounts (percentage or fixed)         │
//! │      │                                                              │
//! │      ▼                                                              │
//! │  PointsDiscount  redeemed points × point value (only when a         │
//! │      │           redemption plan is explicitly attached)            │
//! │      ▼                                                              │
//! │  VAT             (Subtotal - TotalDiscount - PointsDiscount) × 15%  │
//! │      │                                                              │
//! │      ▼                                                              │
//! │  GrandTotal      taxable base + VAT                                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## VAT Base Rule
//! VAT is computed on the subtotal net of BOTH line discounts and the
//! points discount, in every path. Earlier revisions of this system
//! applied the points discount to the VAT base only in the final checkout
//! path; that inconsistency is deliberately not preserved.
//!
//! ## Redemption Is A Separate Mutation
//! Everything in this module is a pure query except [`redeem`], which
//! decrements the account balance. The split keeps the eager side effect
//! auditable: plan first ([`plan_redemption`]), price with the plan
//! ([`price_cart`]), then commit the plan exactly once ([`redeem`]).

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Rate};
use crate::types::{Cart, CartLine, DiscountKind, LoyaltyAccount, LoyaltyRule, PricingResult};
use crate::validation;

// =============================================================================
// Pure Queries
// =============================================================================

/// Cart subtotal: Σ unit_price × quantity. No rounding at this stage.
pub fn subtotal(cart: &Cart) -> Money {
    cart.lines.iter().map(CartLine::line_subtotal).sum()
}

/// Discount for one line, per its kind.
///
/// Percentage: `line_subtotal × bps / 10000`, rounded half-up.
/// Fixed: `discount_value × quantity`.
///
/// The result is clamped at zero minimum; validation has already rejected
/// values that would exceed the line subtotal.
pub fn line_discount(line: &CartLine) -> Money {
    let discount = match line.discount_kind {
        DiscountKind::Percentage => line
            .line_subtotal()
            .percentage_of(Rate::from_bps(line.discount_value as u32)),
        DiscountKind::Fixed => Money::from_halalas(line.discount_value * line.quantity),
    };
    discount.clamp_non_negative()
}

/// Total line-level discount: Σ line_discount over all lines.
pub fn total_discount(cart: &Cart) -> Money {
    cart.lines.iter().map(line_discount).sum()
}

/// Monetary value of a number of redeemed points.
pub fn points_discount(points_to_redeem: i64, rule: &LoyaltyRule) -> Money {
    Money::from_halalas(points_to_redeem * rule.point_value_halalas)
}

/// VAT on an already-discounted taxable base, at the standard 15% rate.
pub fn vat(taxable: Money) -> Money {
    taxable.percentage_of(Rate::vat())
}

// =============================================================================
// Redemption Planning
// =============================================================================

/// A redemption decided for one transaction: how many points to burn and
/// what they are worth. Produced by [`plan_redemption`], consumed by
/// [`price_cart`] and [`redeem`].
///
/// Attaching a plan to `price_cart` is the explicit activation flag the
/// redemption contract requires; a customer merely having a balance never
/// discounts anything by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedemptionPlan {
    /// Points to deduct. Always a whole multiple of the rule threshold.
    pub points: i64,

    /// Monetary value of those points.
    pub discount: Money,
}

/// Computes the redeemable portion of an account's balance.
///
/// Eligible only when `points >= redeem_threshold`; the redeemable amount
/// is floored to the largest whole multiple of the threshold, never an
/// arbitrary partial amount.
///
/// ## Example
/// ```rust
/// use mizan_core::pricing::plan_redemption;
/// use mizan_core::types::{LoyaltyAccount, LoyaltyRule};
///
/// let account = LoyaltyAccount {
///     customer_id: "C-1".into(),
///     name: "Huda".into(),
///     phone: "0500000000".into(),
///     email: None,
///     points: 600,
/// };
/// let rule = LoyaltyRule { points_per_riyal: 1, redeem_threshold: 500, point_value_halalas: 10 };
///
/// let plan = plan_redemption(&account, &rule).unwrap();
/// assert_eq!(plan.points, 500);
/// assert_eq!(plan.discount.halalas(), 5000); // SAR 50.00
/// ```
pub fn plan_redemption(account: &LoyaltyAccount, rule: &LoyaltyRule) -> Option<RedemptionPlan> {
    if rule.redeem_threshold <= 0 || account.points < rule.redeem_threshold {
        return None;
    }

    let points = (account.points / rule.redeem_threshold) * rule.redeem_threshold;
    Some(RedemptionPlan {
        points,
        discount: points_discount(points, rule),
    })
}

/// Commits a redemption plan: eagerly decrements the account balance.
///
/// This is the single mutation in the pricing component. It runs at sale
/// completion, before any network call, so the UI balance is immediately
/// consistent regardless of remote sync outcome.
pub fn redeem(account: &mut LoyaltyAccount, plan: &RedemptionPlan, rule: &LoyaltyRule) -> CoreResult<()> {
    if account.points < rule.redeem_threshold {
        return Err(CoreError::BelowRedeemThreshold {
            points: account.points,
            threshold: rule.redeem_threshold,
        });
    }

    if plan.points > account.points {
        return Err(CoreError::InsufficientPoints {
            available: account.points,
            requested: plan.points,
        });
    }

    if rule.redeem_threshold > 0 && plan.points % rule.redeem_threshold != 0 {
        return Err(CoreError::UnevenRedemption {
            points: plan.points,
            threshold: rule.redeem_threshold,
        });
    }

    account.points -= plan.points;
    Ok(())
}

// =============================================================================
// Full Cart Pricing
// =============================================================================

/// Prices a cart, with an optional redemption plan attached.
///
/// Validates every line first (fail fast, see [`crate::validation`]),
/// then derives the full [`PricingResult`]. The identity
/// `grand_total = subtotal - total_discount - points_discount + vat`
/// holds exactly; no intermediate value is ever rounded to display
/// precision.
///
/// ## Example
/// ```rust
/// use mizan_core::pricing::price_cart;
/// use mizan_core::types::{Cart, CartLine};
///
/// let mut cart = Cart::new();
/// cart.lines.push(CartLine::new("COKE-330", 4500, 2));
///
/// let pricing = price_cart(&cart, None).unwrap();
/// assert_eq!(pricing.subtotal.halalas(), 9000);      // SAR 90.00
/// assert_eq!(pricing.vat.halalas(), 1350);           // SAR 13.50
/// assert_eq!(pricing.grand_total.halalas(), 10350);  // SAR 103.50
/// ```
pub fn price_cart(cart: &Cart, redemption: Option<&RedemptionPlan>) -> CoreResult<PricingResult> {
    validation::validate_cart(cart)?;

    let subtotal = subtotal(cart);
    let total_discount = total_discount(cart);
    let points_discount = redemption
        .map(|plan| plan.discount)
        .unwrap_or_else(Money::zero);

    let taxable = subtotal - total_discount - points_discount;
    if taxable.is_negative() {
        // The grand total can never go below zero; a plan worth more
        // than the cart must shrink before pricing, not here.
        return Err(CoreError::RedemptionExceedsCartTotal {
            discount_halalas: points_discount.halalas(),
            payable_halalas: (subtotal - total_discount).halalas(),
        });
    }
    let vat = vat(taxable);
    let grand_total = taxable + vat;

    Ok(PricingResult {
        subtotal,
        total_discount,
        points_discount,
        vat,
        grand_total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn account_with(points: i64) -> LoyaltyAccount {
        LoyaltyAccount {
            customer_id: "C-1".to_string(),
            name: "Test".to_string(),
            phone: "0500000000".to_string(),
            email: None,
            points,
        }
    }

    fn rule() -> LoyaltyRule {
        LoyaltyRule {
            points_per_riyal: 1,
            redeem_threshold: 500,
            point_value_halalas: 10,
        }
    }

    // Reference scenario: [{price: 45.00, qty: 2, discount: 0}], no redemption.
    #[test]
    fn test_plain_cart() {
        let mut cart = Cart::new();
        cart.lines.push(CartLine::new("A", 4500, 2));

        let p = price_cart(&cart, None).unwrap();
        assert_eq!(p.subtotal.halalas(), 9000);
        assert_eq!(p.total_discount.halalas(), 0);
        assert_eq!(p.points_discount.halalas(), 0);
        assert_eq!(p.vat.halalas(), 1350);
        assert_eq!(p.grand_total.halalas(), 10350);
    }

    // Reference scenario: [{price: 100.00, qty: 1, discount: 20%}].
    #[test]
    fn test_percentage_discount_cart() {
        let mut cart = Cart::new();
        let mut line = CartLine::new("B", 10000, 1);
        line.discount_value = 2000; // 20%
        line.discount_kind = DiscountKind::Percentage;
        cart.lines.push(line);

        let p = price_cart(&cart, None).unwrap();
        assert_eq!(p.subtotal.halalas(), 10000);
        assert_eq!(p.total_discount.halalas(), 2000);
        assert_eq!(p.vat.halalas(), 1200); // (100 - 20) × 15%
        assert_eq!(p.grand_total.halalas(), 9200);
    }

    #[test]
    fn test_fixed_discount_per_unit() {
        let mut cart = Cart::new();
        let mut line = CartLine::new("C", 1000, 3);
        line.discount_value = 100; // SAR 1.00 off each unit
        line.discount_kind = DiscountKind::Fixed;
        cart.lines.push(line);

        let p = price_cart(&cart, None).unwrap();
        assert_eq!(p.subtotal.halalas(), 3000);
        assert_eq!(p.total_discount.halalas(), 300);
    }

    // Reference scenario: 600 points, threshold 500, value 0.10.
    #[test]
    fn test_redemption_floors_to_threshold_multiple() {
        let account = account_with(600);
        let plan = plan_redemption(&account, &rule()).unwrap();

        assert_eq!(plan.points, 500);
        assert_eq!(plan.discount.halalas(), 5000);
    }

    #[test]
    fn test_redemption_requires_threshold() {
        let account = account_with(499);
        assert!(plan_redemption(&account, &rule()).is_none());
    }

    #[test]
    fn test_redemption_plan_properties() {
        // Redeemable is always a multiple of the threshold and <= balance.
        for balance in [500, 750, 999, 1000, 1500, 12345] {
            let plan = plan_redemption(&account_with(balance), &rule()).unwrap();
            assert_eq!(plan.points % 500, 0);
            assert!(plan.points <= balance);
        }
    }

    #[test]
    fn test_redeem_decrements_balance() {
        let mut account = account_with(600);
        let plan = plan_redemption(&account, &rule()).unwrap();
        redeem(&mut account, &plan, &rule()).unwrap();
        assert_eq!(account.points, 100);
    }

    #[test]
    fn test_redeem_rejects_oversized_plan() {
        let mut account = account_with(600);
        let plan = RedemptionPlan {
            points: 1000,
            discount: Money::from_halalas(10000),
        };
        assert!(matches!(
            redeem(&mut account, &plan, &rule()),
            Err(CoreError::InsufficientPoints { .. })
        ));
        assert_eq!(account.points, 600); // untouched on failure
    }

    #[test]
    fn test_redeem_rejects_uneven_plan() {
        let mut account = account_with(600);
        let plan = RedemptionPlan {
            points: 300,
            discount: Money::from_halalas(3000),
        };
        assert!(matches!(
            redeem(&mut account, &plan, &rule()),
            Err(CoreError::UnevenRedemption { .. })
        ));
    }

    #[test]
    fn test_vat_base_net_of_points_discount() {
        // SAR 100.00 cart, SAR 50.00 points redemption:
        // VAT = (100 - 50) × 15% = 7.50, grand total = 57.50.
        let mut cart = Cart::new();
        cart.lines.push(CartLine::new("D", 10000, 1));

        let account = account_with(500);
        let plan = plan_redemption(&account, &rule()).unwrap();
        let p = price_cart(&cart, Some(&plan)).unwrap();

        assert_eq!(p.points_discount.halalas(), 5000);
        assert_eq!(p.vat.halalas(), 750);
        assert_eq!(p.grand_total.halalas(), 5750);
    }

    #[test]
    fn test_grand_total_identity() {
        let mut cart = Cart::new();
        let mut line = CartLine::new("E", 3333, 3);
        line.discount_value = 1250; // 12.5%
        cart.lines.push(line);
        cart.lines.push(CartLine::new("F", 199, 7));

        let p = price_cart(&cart, None).unwrap();
        assert_eq!(
            p.grand_total,
            p.subtotal - p.total_discount - p.points_discount + p.vat
        );
        assert!(!p.grand_total.is_negative());
    }

    #[test]
    fn test_redemption_worth_more_than_cart_is_rejected() {
        // SAR 10.00 cart, SAR 50.00 redemption plan.
        let mut cart = Cart::new();
        cart.lines.push(CartLine::new("H", 1000, 1));

        let plan = plan_redemption(&account_with(500), &rule()).unwrap();
        assert!(matches!(
            price_cart(&cart, Some(&plan)),
            Err(CoreError::RedemptionExceedsCartTotal { .. })
        ));
    }

    #[test]
    fn test_empty_cart_prices_to_zero() {
        let p = price_cart(&Cart::new(), None).unwrap();
        assert!(p.grand_total.is_zero());
    }

    #[test]
    fn test_invalid_cart_fails_fast() {
        let mut cart = Cart::new();
        cart.lines.push(CartLine::new("G", 1000, 0)); // zero quantity
        assert!(price_cart(&cart, None).is_err());
    }
}
