//! # Attendance Access Gate
//!
//! A pure state machine mapping an employee's attendance event stream to a
//! current access status. The rest of the application consults
//! [`is_system_accessible`] before rendering or accepting any action
//! outside the attendance workspace itself.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  Attendance States (per day)                        │
//! │                                                                     │
//! │   (no event today)                                                  │
//! │        absent ──check_in──► present ◄──break_end──── on_break       │
//! │                               │  ▲                      ▲           │
//! │                               │  └─permission_end─┐     │           │
//! │                               │                   │ break_start     │
//! │                        check_out        on_permission   │           │
//! │                               │                   ▲     │           │
//! │                               ▼        permission_start─┘           │
//! │                         checked_out ──check_in──► present           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Status is folded from the chronologically LAST event of the current
//! calendar day; prior-day events never carry over, so every employee
//! starts each day `absent`. `checked_out` is terminal for the day except
//! that a fresh `check_in` (valid from any state) re-enters `present`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Events
// =============================================================================

/// An attendance action recorded by the time clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceAction {
    CheckIn,
    CheckOut,
    BreakStart,
    BreakEnd,
    PermissionStart,
    PermissionEnd,
}

/// One entry in the append-only attendance log.
///
/// The gate never mutates past events; it only folds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEvent {
    pub employee_id: String,
    pub action: AttendanceAction,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Status
// =============================================================================

/// Derived access status for an employee, recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Absent,
    Present,
    OnBreak,
    OnPermission,
    CheckedOut,
}

impl AttendanceStatus {
    /// The status implied by a single action.
    fn from_action(action: AttendanceAction) -> Self {
        match action {
            AttendanceAction::CheckIn => AttendanceStatus::Present,
            AttendanceAction::BreakStart => AttendanceStatus::OnBreak,
            AttendanceAction::BreakEnd => AttendanceStatus::Present,
            AttendanceAction::PermissionStart => AttendanceStatus::OnPermission,
            AttendanceAction::PermissionEnd => AttendanceStatus::Present,
            AttendanceAction::CheckOut => AttendanceStatus::CheckedOut,
        }
    }
}

/// Folds the event log into the employee's current status.
///
/// Only events matching the employee AND the calendar day of `now` (UTC)
/// are considered; the latest such event wins. No event today means
/// `Absent`.
pub fn current_status(
    employee_id: &str,
    events: &[AttendanceEvent],
    now: DateTime<Utc>,
) -> AttendanceStatus {
    let today = now.date_naive();

    events
        .iter()
        .filter(|e| e.employee_id == employee_id && e.timestamp.date_naive() == today)
        // max_by_key keeps the LAST maximum, so same-timestamp events
        // resolve in favor of the later log entry.
        .max_by_key(|e| e.timestamp)
        .map(|e| AttendanceStatus::from_action(e.action))
        .unwrap_or(AttendanceStatus::Absent)
}

/// The single gate predicate: true only for `Present`.
///
/// Employees on break or permission keep their session but lose access
/// until the corresponding `*_end` event.
pub fn is_system_accessible(status: AttendanceStatus) -> bool {
    status == AttendanceStatus::Present
}

// =============================================================================
// Capabilities
// =============================================================================

/// The fixed set of capabilities a status can grant.
///
/// A closed enum (rather than a string-keyed permission map) so every
/// gate check is covered at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Complete sales and take payment.
    Checkout,
    /// Browse the product catalog.
    CatalogBrowse,
    /// Open or close a shift.
    ShiftManage,
    /// Use the attendance workspace (clock in/out).
    AttendanceWorkspace,
}

/// Capabilities granted by a status.
///
/// The attendance workspace is always reachable — otherwise an absent
/// employee could never check in.
pub fn capabilities(status: AttendanceStatus) -> &'static [Capability] {
    match status {
        AttendanceStatus::Present => &[
            Capability::Checkout,
            Capability::CatalogBrowse,
            Capability::ShiftManage,
            Capability::AttendanceWorkspace,
        ],
        _ => &[Capability::AttendanceWorkspace],
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
