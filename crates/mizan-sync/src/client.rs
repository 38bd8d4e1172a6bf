//! # ERPNext REST Client
//!
//! Thin HTTP client for the ERPNext resource API, plus the
//! [`SyncOutcome`] classification every write resolves to.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  transport error / timeout ──────────────► NetworkError             │
//! │  2xx ────────────────────────────────────► Success                  │
//! │  4xx, body names a stock shortage ───────► StockError               │
//! │  4xx otherwise (417 validation, etc.) ───► ValidationError          │
//! │  5xx ────────────────────────────────────► NetworkError             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A write is attempted AT MOST ONCE. Whatever comes back is recorded and
//! reported; retry policy is a human decision made off the notification,
//! not something this client does on its own.

use mizan_core::types::LoyaltyAccount;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::payload::{
    PosClosingPayload, PosOpeningPayload, SalesInvoicePayload, StockEntryPayload,
};

/// Max response-body bytes carried into an outcome detail.
const DETAIL_LIMIT: usize = 300;

// =============================================================================
// Sync Outcome
// =============================================================================

/// The classified result of one ERP write attempt.
///
/// This is a value, not an error: the orchestrator records it, notifies
/// on it, and moves on. The sale itself is already committed locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum SyncOutcome {
    /// The ERP accepted the document.
    Success,
    /// The ERP rejected the document as malformed or incomplete.
    ValidationError(String),
    /// The ERP rejected a stock deduction for insufficient quantity.
    StockError(String),
    /// The ERP never gave a usable answer: unreachable, timeout, or 5xx.
    NetworkError(String),
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Success)
    }

    /// Stable label for logs and persisted attempt records.
    pub fn label(&self) -> &'static str {
        match self {
            SyncOutcome::Success => "success",
            SyncOutcome::ValidationError(_) => "validation_error",
            SyncOutcome::StockError(_) => "stock_error",
            SyncOutcome::NetworkError(_) => "network_error",
        }
    }

    /// Whether a later manual retry could plausibly succeed with the
    /// same document. Only network failures qualify; validation and
    /// stock rejections need the document or the stock fixed first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncOutcome::NetworkError(_))
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            SyncOutcome::Success => None,
            SyncOutcome::ValidationError(d)
            | SyncOutcome::StockError(d)
            | SyncOutcome::NetworkError(d) => Some(d),
        }
    }
}

/// Classifies a status code and response body into an outcome.
///
/// ERPNext reports Frappe exceptions in the body with HTTP 417, so the
/// body text (not the status) distinguishes a stock shortage from any
/// other validation failure.
fn classify(status: StatusCode, body: &str) -> SyncOutcome {
    if status.is_success() {
        return SyncOutcome::Success;
    }

    let detail = excerpt(body);
    if status.is_client_error() {
        let lowered = body.to_lowercase();
        if lowered.contains("negativestockerror") || lowered.contains("insufficient stock") {
            SyncOutcome::StockError(detail)
        } else {
            SyncOutcome::ValidationError(detail)
        }
    } else {
        SyncOutcome::NetworkError(format!("HTTP {}: {detail}", status.as_u16()))
    }
}

/// Truncates a response body to a loggable detail string.
fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= DETAIL_LIMIT {
        trimmed.to_string()
    } else {
        let mut end = DETAIL_LIMIT;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &trimmed[..end])
    }
}

async fn classify_response(response: Response) -> SyncOutcome {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    classify(status, &body)
}

// =============================================================================
// Catalog Items
// =============================================================================

/// One product row from the ERP item catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErpItem {
    pub item_code: String,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub standard_rate: Option<f64>,
    #[serde(default)]
    pub valuation_rate: Option<f64>,
}

/// One category row from the ERP item-group tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErpItemGroup {
    pub name: String,
    #[serde(default)]
    pub parent_item_group: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResourceList<T> {
    data: Vec<T>,
}

// =============================================================================
// Client
// =============================================================================

/// ERPNext REST client.
///
/// Authenticates every request with the token pair from config
/// (`Authorization: token <key>:<secret>`). Doctype names contain spaces
/// (`Sales Invoice`); [`Url`] path segments percent-encode them.
#[derive(Debug, Clone)]
pub struct ErpClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ErpClient {
    /// Builds a client from validated config.
    pub fn new(config: &SyncConfig) -> SyncResult<Self> {
        let base_url = Url::parse(&config.erp.base_url)?;

        let token = format!("token {}:{}", config.erp.api_key, config.erp.api_secret);
        let mut auth = HeaderValue::from_str(&token)
            .map_err(|e| SyncError::ClientBuildFailed(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| SyncError::ClientBuildFailed(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    /// `{base}/api/resource/{doctype}` with the doctype percent-encoded.
    fn resource_url(&self, doctype: &str) -> SyncResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SyncError::InvalidUrl("base URL cannot be a base".to_string()))?
            .push("api")
            .push("resource")
            .push(doctype);
        Ok(url)
    }

    /// POSTs a document and classifies the result. Never retries.
    async fn post_resource<T: Serialize>(&self, doctype: &str, payload: &T) -> SyncOutcome {
        let url = match self.resource_url(doctype) {
            Ok(u) => u,
            Err(e) => return SyncOutcome::NetworkError(e.to_string()),
        };

        debug!(doctype, "POST {}", url);
        match self.http.post(url).json(payload).send().await {
            Ok(response) => classify_response(response).await,
            Err(e) if e.is_timeout() => {
                SyncOutcome::NetworkError(format!("request timed out: {e}"))
            }
            Err(e) => SyncOutcome::NetworkError(e.to_string()),
        }
    }

    // =========================================================================
    // Dual-Write Documents
    // =========================================================================

    pub async fn create_sales_invoice(&self, payload: &SalesInvoicePayload) -> SyncOutcome {
        self.post_resource("Sales Invoice", payload).await
    }

    pub async fn create_stock_entry(&self, payload: &StockEntryPayload) -> SyncOutcome {
        self.post_resource("Stock Entry", payload).await
    }

    // =========================================================================
    // Shift Documents
    // =========================================================================

    pub async fn create_pos_opening(&self, payload: &PosOpeningPayload) -> SyncOutcome {
        self.post_resource("POS Opening Entry", payload).await
    }

    pub async fn create_pos_closing(&self, payload: &PosClosingPayload) -> SyncOutcome {
        self.post_resource("POS Closing Entry", payload).await
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetches the product catalog for a local refresh.
    pub async fn fetch_items(&self) -> SyncResult<Vec<ErpItem>> {
        let mut url = self.resource_url("Item")?;
        url.query_pairs_mut()
            .append_pair("fields", r#"["item_code","item_name","standard_rate","valuation_rate"]"#)
            .append_pair("limit_page_length", "0");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::RequestFailed(format!(
                "Item list returned HTTP {}: {}",
                status.as_u16(),
                excerpt(&body)
            )));
        }

        let list: ResourceList<ErpItem> = response.json().await?;
        Ok(list.data)
    }

    /// Fetches the item-group tree backing local category filters.
    pub async fn fetch_item_groups(&self) -> SyncResult<Vec<ErpItemGroup>> {
        let mut url = self.resource_url("Item Group")?;
        url.query_pairs_mut()
            .append_pair("fields", r#"["name","parent_item_group"]"#)
            .append_pair("limit_page_length", "0");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::RequestFailed(format!(
                "Item Group list returned HTTP {}: {}",
                status.as_u16(),
                excerpt(&body)
            )));
        }

        let list: ResourceList<ErpItemGroup> = response.json().await?;
        Ok(list.data)
    }

    /// Looks up a loyalty customer by id. `Ok(None)` when not found.
    pub async fn fetch_customer(&self, customer_id: &str) -> SyncResult<Option<LoyaltyAccount>> {
        let mut url = self.resource_url("Customer")?;
        url.path_segments_mut()
            .map_err(|_| SyncError::InvalidUrl("base URL cannot be a base".to_string()))?
            .push(customer_id);

        let response = self.http.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(SyncError::RequestFailed(format!(
                "Customer lookup returned HTTP {}",
                response.status().as_u16()
            )));
        }

        #[derive(Deserialize)]
        struct CustomerDoc {
            name: String,
            #[serde(default)]
            customer_name: String,
            #[serde(default)]
            mobile_no: String,
            #[serde(default)]
            email_id: Option<String>,
            #[serde(default)]
            loyalty_points: i64,
        }
        #[derive(Deserialize)]
        struct ResourceDoc {
            data: CustomerDoc,
        }

        let doc: ResourceDoc = response.json().await?;
        Ok(Some(LoyaltyAccount {
            customer_id: doc.data.name,
            name: doc.data.customer_name,
            phone: doc.data.mobile_no,
            email: doc.data.email_id,
            points: doc.data.loyalty_points,
        }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
