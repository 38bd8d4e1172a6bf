//! # Outbound ERPNext Payloads
//!
//! The documents Mizan POS writes to ERPNext, and the [`CompletedSale`]
//! aggregate they are built from.
//!
//! ## Document Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  CompletedSale ──┬──► Sales Invoice   (revenue record, QR payload)  │
//! │                  └──► Stock Entry     (Material Issue, deducts qty) │
//! │                                                                     │
//! │  Shift open   ──────► POS Opening Entry  (opening float)            │
//! │  Shift close  ──────► POS Closing Entry  (embedded X-report)        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts cross into these structs as `f64` riyals because that is what
//! ERPNext stores. The conversion happens HERE and nowhere earlier — all
//! arithmetic upstream stays in integer halalas.

use chrono::{DateTime, Utc};
use mizan_core::error::EncodingError;
use mizan_core::types::{new_invoice_id, Cart, PricingResult, ZatcaInvoiceData};
use mizan_core::{zatca, Money};
use serde::{Deserialize, Serialize};

/// Converts halalas to the fractional riyals ERPNext expects.
fn riyals(amount: Money) -> f64 {
    amount.halalas() as f64 / 100.0
}

// =============================================================================
// Completed Sale
// =============================================================================

/// A sale that has finished checkout locally and is ready to sync.
///
/// Construction goes through [`CompletedSale::finalize`], which encodes
/// the QR payload. A sale that cannot produce a valid payload never
/// becomes a `CompletedSale` — checkout surfaces the error instead.
#[derive(Debug, Clone)]
pub struct CompletedSale {
    /// Local invoice id, e.g. `INV-20260314092653001`.
    pub invoice_id: String,

    /// The cart as sold.
    pub cart: Cart,

    /// Pricing totals computed at checkout.
    pub pricing: PricingResult,

    /// Base64 TLV payload for the receipt QR code.
    pub qr_payload: String,

    /// Loyalty customer id, if one was attached.
    pub customer: Option<String>,

    /// Payment method as recorded at the till, e.g. `Cash`, `Card`.
    pub payment_method: String,

    /// Completion timestamp.
    pub completed_at: DateTime<Utc>,
}

impl CompletedSale {
    /// Finalizes a checkout: assigns the invoice id and encodes the QR
    /// payload from the seller identity and the pricing totals.
    pub fn finalize(
        cart: Cart,
        pricing: PricingResult,
        seller_name: &str,
        vat_number: &str,
        customer: Option<String>,
        payment_method: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, EncodingError> {
        let invoice_id = new_invoice_id(now);
        let invoice_data =
            ZatcaInvoiceData::from_pricing(&invoice_id, seller_name, vat_number, now, &pricing);
        let qr_payload = zatca::encode(&invoice_data)?;

        Ok(Self {
            invoice_id,
            cart,
            pricing,
            qr_payload,
            customer,
            payment_method: payment_method.to_string(),
            completed_at: now,
        })
    }
}

// =============================================================================
// Sales Invoice
// =============================================================================

/// One item row on a Sales Invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesInvoiceItem {
    pub item_code: String,
    pub qty: i64,
    pub rate: f64,
}

/// One payment row on a POS Sales Invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesInvoicePayment {
    pub mode_of_payment: String,
    pub amount: f64,
}

/// ERPNext `Sales Invoice` document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesInvoicePayload {
    pub customer: String,
    pub is_pos: u8,
    pub items: Vec<SalesInvoiceItem>,
    pub payments: Vec<SalesInvoicePayment>,
    /// Base64 TLV payload, mirrored so the ERP can re-render the QR.
    pub custom_zatca_qr: String,
    /// Local invoice id for cross-referencing till records.
    pub remarks: String,
}

impl SalesInvoicePayload {
    /// Builds the invoice document from a completed sale.
    ///
    /// Sales with no loyalty customer attach to the configured walk-in
    /// placeholder so the ERP always has a valid customer link.
    pub fn build(sale: &CompletedSale, walk_in_customer: &str) -> Self {
        let customer = sale
            .customer
            .clone()
            .unwrap_or_else(|| walk_in_customer.to_string());

        let items = sale
            .cart
            .lines
            .iter()
            .map(|line| SalesInvoiceItem {
                item_code: line.item_code.clone(),
                qty: line.quantity,
                rate: riyals(line.unit_price()),
            })
            .collect();

        Self {
            customer,
            is_pos: 1,
            items,
            payments: vec![SalesInvoicePayment {
                mode_of_payment: sale.payment_method.clone(),
                amount: riyals(sale.pricing.grand_total),
            }],
            custom_zatca_qr: sale.qr_payload.clone(),
            remarks: sale.invoice_id.clone(),
        }
    }
}

// =============================================================================
// Stock Entry
// =============================================================================

/// One item row on a Stock Entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockEntryItem {
    pub item_code: String,
    pub qty: i64,
    pub basic_rate: f64,
    pub s_warehouse: String,
    pub uom: String,
}

/// ERPNext `Stock Entry` document of type `Material Issue`, deducting
/// the sold quantities from the store warehouse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockEntryPayload {
    pub stock_entry_type: String,
    pub items: Vec<StockEntryItem>,
    pub remarks: String,
}

impl StockEntryPayload {
    /// Builds the stock deduction document from a completed sale.
    pub fn build(sale: &CompletedSale, warehouse: &str, uom: &str) -> Self {
        let items = sale
            .cart
            .lines
            .iter()
            .map(|line| StockEntryItem {
                item_code: line.item_code.clone(),
                qty: line.quantity,
                basic_rate: riyals(Money::from_halalas(line.cost_halalas)),
                s_warehouse: warehouse.to_string(),
                uom: uom.to_string(),
            })
            .collect();

        Self {
            stock_entry_type: "Material Issue".to_string(),
            items,
            remarks: sale.invoice_id.clone(),
        }
    }
}

// =============================================================================
// Shift Documents
// =============================================================================

/// Opening balance row on a POS Opening Entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningBalanceDetail {
    pub mode_of_payment: String,
    pub opening_amount: f64,
}

/// ERPNext `POS Opening Entry` document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosOpeningPayload {
    pub period_start_date: String,
    pub balance_details: Vec<OpeningBalanceDetail>,
}

impl PosOpeningPayload {
    pub fn build(opening_float: Money, opened_at: DateTime<Utc>) -> Self {
        Self {
            period_start_date: opened_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            balance_details: vec![OpeningBalanceDetail {
                mode_of_payment: "Cash".to_string(),
                opening_amount: riyals(opening_float),
            }],
        }
    }
}

/// End-of-shift cash reconciliation.
///
/// `expected_total_cash = opening_float + cash_sales`;
/// `cash_discrepancy = counted_cash − expected_total_cash`, so a till
/// that is short reports a negative discrepancy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XReport {
    pub opening_float: f64,
    pub cash_sales: f64,
    pub counted_cash: f64,
    pub expected_total_cash: f64,
    pub cash_discrepancy: f64,
}

impl XReport {
    pub fn new(opening_float: Money, cash_sales: Money, counted_cash: Money) -> Self {
        let expected = opening_float + cash_sales;
        let discrepancy = counted_cash - expected;

        Self {
            opening_float: riyals(opening_float),
            cash_sales: riyals(cash_sales),
            counted_cash: riyals(counted_cash),
            expected_total_cash: riyals(expected),
            cash_discrepancy: riyals(discrepancy),
        }
    }
}

/// ERPNext `POS Closing Entry` document with the X-report embedded as a
/// JSON blob in a custom field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosClosingPayload {
    pub period_end_date: String,
    pub custom_x_report_json: String,
}

impl PosClosingPayload {
    pub fn build(report: &XReport, closed_at: DateTime<Utc>) -> Result<Self, serde_json::Error> {
        Ok(Self {
            period_end_date: closed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            custom_x_report_json: serde_json::to_string(report)?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mizan_core::pricing::price_cart;
    use mizan_core::types::CartLine;

    fn checkout_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    fn completed_sale() -> CompletedSale {
        let mut cart = Cart::new();
        let mut line = CartLine::new("COKE-330", 4500, 2);
        line.cost_halalas = 3000;
        cart.lines.push(line);

        let pricing = price_cart(&cart, None).unwrap();
        CompletedSale::finalize(
            cart,
            pricing,
            "Mizan Store",
            "310122393500003",
            None,
            "Cash",
            checkout_time(),
        )
        .unwrap()
    }

    #[test]
    fn test_finalize_assigns_invoice_id_and_qr() {
        let sale = completed_sale();
        assert!(sale.invoice_id.starts_with("INV-20260314"));

        let fields = zatca::decode(&sale.qr_payload).unwrap();
        assert_eq!(fields[3], (4, "103.50".to_string()));
        assert_eq!(fields[4], (5, "13.50".to_string()));
    }

    #[test]
    fn test_finalize_rejects_empty_seller() {
        let mut cart = Cart::new();
        cart.lines.push(CartLine::new("COKE-330", 4500, 1));
        let pricing = price_cart(&cart, None).unwrap();

        let result = CompletedSale::finalize(
            cart,
            pricing,
            "",
            "310122393500003",
            None,
            "Cash",
            checkout_time(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invoice_payload_uses_walk_in_placeholder() {
        let sale = completed_sale();
        let payload = SalesInvoicePayload::build(&sale, "Walk-in Customer");

        assert_eq!(payload.customer, "Walk-in Customer");
        assert_eq!(payload.is_pos, 1);
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].qty, 2);
        assert_eq!(payload.items[0].rate, 45.0);
        assert_eq!(payload.payments[0].amount, 103.5);
        assert_eq!(payload.remarks, sale.invoice_id);
    }

    #[test]
    fn test_invoice_payload_keeps_attached_customer() {
        let mut sale = completed_sale();
        sale.customer = Some("CUST-0042".to_string());
        let payload = SalesInvoicePayload::build(&sale, "Walk-in Customer");
        assert_eq!(payload.customer, "CUST-0042");
    }

    #[test]
    fn test_stock_entry_is_material_issue_at_cost() {
        let sale = completed_sale();
        let payload = StockEntryPayload::build(&sale, "Stores - M", "Nos");

        assert_eq!(payload.stock_entry_type, "Material Issue");
        assert_eq!(payload.items[0].s_warehouse, "Stores - M");
        assert_eq!(payload.items[0].basic_rate, 30.0);
        assert_eq!(payload.items[0].qty, 2);
    }

    #[test]
    fn test_x_report_math() {
        let report = XReport::new(
            Money::from_halalas(50_000),  // SAR 500 float
            Money::from_halalas(123_450), // SAR 1234.50 cash sales
            Money::from_halalas(172_000), // SAR 1720 counted
        );

        assert_eq!(report.expected_total_cash, 1734.5);
        assert_eq!(report.cash_discrepancy, -14.5); // till is short
    }

    #[test]
    fn test_closing_payload_embeds_x_report() {
        let report = XReport::new(
            Money::from_halalas(50_000),
            Money::from_halalas(100_000),
            Money::from_halalas(150_000),
        );
        let payload = PosClosingPayload::build(&report, checkout_time()).unwrap();

        let embedded: XReport = serde_json::from_str(&payload.custom_x_report_json).unwrap();
        assert_eq!(embedded.expected_total_cash, 1500.0);
        assert_eq!(embedded.cash_discrepancy, 0.0);
    }

    #[test]
    fn test_opening_payload_carries_float() {
        let payload = PosOpeningPayload::build(Money::from_halalas(50_000), checkout_time());
        assert_eq!(payload.balance_details[0].opening_amount, 500.0);
        assert_eq!(payload.balance_details[0].mode_of_payment, "Cash");
    }
}
