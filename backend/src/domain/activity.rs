//! Request-level activity records: visits and search queries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{SearchLogId, UserId, VisitId};

/// Used when neither a forwarding header nor a peer address is available.
pub const UNKNOWN_IP: &str = "unknown";

/// One authenticated request, captured by the visit middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visit {
    pub id: VisitId,
    pub user_id: Option<UserId>,
    pub ip_address: String,
    pub user_agent: String,
    pub visit_time: DateTime<Utc>,
}

/// Request details the middleware hands to the activity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitDetails {
    pub user_id: UserId,
    pub ip_address: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchLog {
    pub id: SearchLogId,
    pub query: String,
    pub searched_at: DateTime<Utc>,
    pub user_id: Option<UserId>,
}

/// Pick the client address from `X-Forwarded-For`, falling back to the peer.
///
/// Only the first comma-separated entry of the header is used.
///
/// # Examples
/// ```
/// use ecoactions::domain::activity::client_ip;
///
/// assert_eq!(client_ip(Some("203.0.113.9, 10.0.0.1"), Some("10.0.0.1")), "203.0.113.9");
/// assert_eq!(client_ip(None, Some("198.51.100.4")), "198.51.100.4");
/// assert_eq!(client_ip(None, None), "unknown");
/// ```
pub fn client_ip(forwarded_for: Option<&str>, peer: Option<&str>) -> String {
    let forwarded = forwarded_for
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    forwarded
        .or(peer)
        .unwrap_or(UNKNOWN_IP)
        .to_owned()
}
