//! # mizan-sync: ERPNext Integration for Mizan POS
//!
//! Best-effort, local-first synchronization between the till and an
//! ERPNext backend.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Mizan POS Architecture                         │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                mizan-core (pure business logic)               │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │                ★ mizan-sync (THIS CRATE) ★                    │ │
//! │  │                                                               │ │
//! │  │  ┌──────────┐ ┌─────────┐ ┌──────────┐ ┌──────────────────┐  │ │
//! │  │  │  config  │ │ payload │ │  client  │ │   orchestrator   │  │ │
//! │  │  │  TOML +  │ │ ERP doc │ │ REST +   │ │ dual-write,      │  │ │
//! │  │  │  env     │ │ builders│ │ classify │ │ notify, refresh  │  │ │
//! │  │  └──────────┘ └─────────┘ └──────────┘ └──────────────────┘  │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │ HTTPS (token auth)                │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │                           ERPNext                             │ │
//! │  │   Sales Invoice • Stock Entry • POS Opening/Closing • Item    │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! 1. **Local first**: a sale is committed before any network I/O starts;
//!    no ERP failure can undo it.
//! 2. **At most once**: each ERP write is attempted exactly once per sale
//!    and its outcome recorded as an immutable [`orchestrator::SyncAttempt`].
//! 3. **Independent writes**: invoice and stock outcomes are classified
//!    and notified separately; neither blocks or rolls back the other.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod client;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod payload;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use client::{ErpClient, ErpItem, ErpItemGroup, SyncOutcome};
pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use orchestrator::{
    Notification, SaleSyncReport, Severity, SyncAttempt, SyncOperation, SyncOrchestrator,
};
pub use payload::{CompletedSale, XReport};
