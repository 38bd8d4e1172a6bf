//! # Sale Sync Orchestrator
//!
//! Drives the local-commit-then-best-effort sync of completed sales.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  sale committed locally (cart, pricing, QR — all done)              │
//! │        │                                                            │
//! │        ▼                                                            │
//! │  sync_sale ──┬── POST Sales Invoice ──► SyncAttempt + Notification  │
//! │   (join!)    └── POST Stock Entry   ──► SyncAttempt + Notification  │
//! │        │                                                            │
//! │        └── any success? ── after delay ── fetch_items ──► channel   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two writes are independent: each is attempted exactly once, each
//! is classified on its own, and one failing never rolls back the other
//! or the local sale. The deferred catalog refresh runs once, with no
//! retry of its own.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mizan_core::Money;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::client::{ErpClient, ErpItem, SyncOutcome};
use crate::config::SyncConfig;
use crate::error::SyncResult;
use crate::payload::{
    CompletedSale, PosClosingPayload, PosOpeningPayload, SalesInvoicePayload, StockEntryPayload,
    XReport,
};

/// Buffered catalog refreshes a slow consumer may lag behind by.
const REFRESH_CHANNEL_CAPACITY: usize = 8;

// =============================================================================
// Attempts
// =============================================================================

/// Which ERP write an attempt belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOperation {
    Invoice,
    Stock,
    ShiftOpen,
    ShiftClose,
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncOperation::Invoice => "invoice",
            SyncOperation::Stock => "stock",
            SyncOperation::ShiftOpen => "shift_open",
            SyncOperation::ShiftClose => "shift_close",
        };
        f.write_str(name)
    }
}

/// Immutable record of one ERP write attempt.
///
/// Created after classification and never updated; a later manual retry
/// would be a NEW attempt on a new sale-level action, not a mutation of
/// this one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncAttempt {
    pub id: Uuid,
    pub operation: SyncOperation,
    /// The document as sent, for replay and support inspection.
    pub payload: serde_json::Value,
    pub outcome: SyncOutcome,
    pub attempted_at: DateTime<Utc>,
}

impl SyncAttempt {
    fn record<T: Serialize>(operation: SyncOperation, payload: &T, outcome: SyncOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation,
            payload: serde_json::to_value(payload).unwrap_or(serde_json::Value::Null),
            outcome,
            attempted_at: Utc::now(),
        }
    }
}

// =============================================================================
// Notifications
// =============================================================================

/// Notification severity for the till UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One user-facing notification. Each ERP write produces exactly one,
/// independent of how the sibling write fared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub operation: SyncOperation,
    pub severity: Severity,
    pub message: String,
}

/// Maps one write's outcome to its notification.
fn notify(operation: SyncOperation, outcome: &SyncOutcome, invoice_id: &str) -> Notification {
    let (severity, message) = match (operation, outcome) {
        (SyncOperation::Invoice, SyncOutcome::Success) => (
            Severity::Info,
            format!("Invoice {invoice_id} synced to ERP"),
        ),
        (SyncOperation::Stock, SyncOutcome::Success) => (
            Severity::Info,
            format!("Stock deducted in ERP for {invoice_id}"),
        ),
        (_, SyncOutcome::Success) => (
            Severity::Info,
            format!("{operation} synced to ERP"),
        ),
        (_, SyncOutcome::StockError(detail)) => (
            Severity::Warning,
            format!(
                "ERP reports insufficient stock for {invoice_id}; local quantities may be stale: {detail}"
            ),
        ),
        (_, SyncOutcome::ValidationError(detail)) => (
            Severity::Error,
            format!("ERP rejected {operation} for {invoice_id}: {detail}"),
        ),
        (_, SyncOutcome::NetworkError(detail)) => (
            Severity::Warning,
            format!("{invoice_id} saved locally; {operation} sync failed: {detail}"),
        ),
    };

    Notification {
        operation,
        severity,
        message,
    }
}

// =============================================================================
// Sale Sync Report
// =============================================================================

/// Everything one `sync_sale` call produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleSyncReport {
    pub invoice_id: String,
    pub invoice: SyncAttempt,
    pub stock: SyncAttempt,
    pub notifications: Vec<Notification>,
}

impl SaleSyncReport {
    /// True when at least one of the two writes landed. Gates the
    /// deferred catalog refresh.
    pub fn any_succeeded(&self) -> bool {
        self.invoice.outcome.is_success() || self.stock.outcome.is_success()
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Coordinates the ERP dual-write and the deferred catalog refresh.
pub struct SyncOrchestrator {
    client: Arc<ErpClient>,
    config: Arc<SyncConfig>,
    refresh_tx: Option<mpsc::Sender<Vec<ErpItem>>>,
}

impl SyncOrchestrator {
    pub fn new(client: ErpClient, config: SyncConfig) -> Self {
        Self {
            client: Arc::new(client),
            config: Arc::new(config),
            refresh_tx: None,
        }
    }

    /// Opens the catalog-refresh channel. Refreshed item lists arrive on
    /// the returned receiver after successful sale syncs.
    pub fn subscribe_stock_refresh(&mut self) -> mpsc::Receiver<Vec<ErpItem>> {
        let (tx, rx) = mpsc::channel(REFRESH_CHANNEL_CAPACITY);
        self.refresh_tx = Some(tx);
        rx
    }

    /// Syncs one completed sale: both writes dispatched together, each
    /// classified and notified on its own. Never fails — the report IS
    /// the result, whatever the ERP did.
    pub async fn sync_sale(&self, sale: &CompletedSale) -> SaleSyncReport {
        let invoice_payload =
            SalesInvoicePayload::build(sale, &self.config.store.walk_in_customer);
        let stock_payload = StockEntryPayload::build(
            sale,
            &self.config.store.warehouse,
            &self.config.store.stock_uom,
        );

        let (invoice_outcome, stock_outcome) = tokio::join!(
            self.client.create_sales_invoice(&invoice_payload),
            self.client.create_stock_entry(&stock_payload),
        );

        for (operation, outcome) in [
            (SyncOperation::Invoice, &invoice_outcome),
            (SyncOperation::Stock, &stock_outcome),
        ] {
            match outcome {
                SyncOutcome::Success => {
                    info!(invoice_id = %sale.invoice_id, %operation, "ERP write succeeded")
                }
                other => warn!(
                    invoice_id = %sale.invoice_id,
                    %operation,
                    outcome = other.label(),
                    detail = other.detail().unwrap_or(""),
                    "ERP write failed"
                ),
            }
        }

        let notifications = vec![
            notify(SyncOperation::Invoice, &invoice_outcome, &sale.invoice_id),
            notify(SyncOperation::Stock, &stock_outcome, &sale.invoice_id),
        ];

        let report = SaleSyncReport {
            invoice_id: sale.invoice_id.clone(),
            invoice: SyncAttempt::record(SyncOperation::Invoice, &invoice_payload, invoice_outcome),
            stock: SyncAttempt::record(SyncOperation::Stock, &stock_payload, stock_outcome),
            notifications,
        };

        if report.any_succeeded() {
            self.schedule_stock_refresh();
        }

        report
    }

    /// One-shot deferred catalog refresh: wait out the ERP's own
    /// submission processing, fetch once, deliver or drop.
    fn schedule_stock_refresh(&self) {
        let client = Arc::clone(&self.client);
        let delay = self.config.stock_refresh_delay();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match client.fetch_items().await {
                Ok(items) => {
                    info!(count = items.len(), "Catalog refreshed after sale sync");
                    if let Some(tx) = tx {
                        if tx.send(items).await.is_err() {
                            warn!("Catalog refresh receiver dropped");
                        }
                    }
                }
                Err(e) => warn!(error = %e, "Deferred catalog refresh failed"),
            }
        });
    }

    // =========================================================================
    // Shift Lifecycle
    // =========================================================================

    /// Records the opening float in the ERP at the start of a shift.
    pub async fn open_shift(&self, opening_float: Money, opened_at: DateTime<Utc>) -> SyncAttempt {
        let payload = PosOpeningPayload::build(opening_float, opened_at);
        let outcome = self.client.create_pos_opening(&payload).await;

        info!(outcome = outcome.label(), "Shift opening synced");
        SyncAttempt::record(SyncOperation::ShiftOpen, &payload, outcome)
    }

    /// Closes the shift in the ERP with the reconciliation X-report
    /// embedded in the closing entry.
    pub async fn close_shift(
        &self,
        report: &XReport,
        closed_at: DateTime<Utc>,
    ) -> SyncResult<SyncAttempt> {
        let payload = PosClosingPayload::build(report, closed_at)?;
        let outcome = self.client.create_pos_closing(&payload).await;

        info!(outcome = outcome.label(), "Shift closing synced");
        Ok(SyncAttempt::record(
            SyncOperation::ShiftClose,
            &payload,
            outcome,
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_notifications_are_info() {
        let n = notify(SyncOperation::Invoice, &SyncOutcome::Success, "INV-1");
        assert_eq!(n.severity, Severity::Info);
        assert!(n.message.contains("INV-1"));

        let n = notify(SyncOperation::Stock, &SyncOutcome::Success, "INV-1");
        assert_eq!(n.severity, Severity::Info);
    }

    #[test]
    fn test_stock_shortage_warns_about_stale_quantities() {
        let outcome = SyncOutcome::StockError("-3 units of COKE-330".to_string());
        let n = notify(SyncOperation::Stock, &outcome, "INV-1");
        assert_eq!(n.severity, Severity::Warning);
        assert!(n.message.contains("insufficient stock"));
    }

    #[test]
    fn test_validation_failure_is_an_error() {
        let outcome = SyncOutcome::ValidationError("customer is required".to_string());
        let n = notify(SyncOperation::Invoice, &outcome, "INV-1");
        assert_eq!(n.severity, Severity::Error);
    }

    #[test]
    fn test_network_failure_reassures_about_local_commit() {
        let outcome = SyncOutcome::NetworkError("connection refused".to_string());
        let n = notify(SyncOperation::Invoice, &outcome, "INV-1");
        assert_eq!(n.severity, Severity::Warning);
        assert!(n.message.contains("saved locally"));
    }

    #[test]
    fn test_report_any_succeeded() {
        let attempt = |outcome: SyncOutcome| SyncAttempt {
            id: Uuid::new_v4(),
            operation: SyncOperation::Invoice,
            payload: serde_json::Value::Null,
            outcome,
            attempted_at: Utc::now(),
        };

        let report = SaleSyncReport {
            invoice_id: "INV-1".to_string(),
            invoice: attempt(SyncOutcome::NetworkError("down".into())),
            stock: attempt(SyncOutcome::Success),
            notifications: vec![],
        };
        assert!(report.any_succeeded());

        let report = SaleSyncReport {
            invoice_id: "INV-1".to_string(),
            invoice: attempt(SyncOutcome::NetworkError("down".into())),
            stock: attempt(SyncOutcome::NetworkError("down".into())),
            notifications: vec![],
        };
        assert!(!report.any_succeeded());
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(SyncOperation::Invoice.to_string(), "invoice");
        assert_eq!(SyncOperation::ShiftClose.to_string(), "shift_close");
    }
}
