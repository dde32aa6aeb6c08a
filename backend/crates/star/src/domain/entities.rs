//! Domain Entities
//!
//! A delegation passes through three shapes:
//! - [`RawDelegation`]: whatever the client sent, untrusted
//! - [`NewDelegation`]: sanitized by the validator, not yet stored
//! - [`Delegation`]: persisted, carries its engine-assigned id

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{DelegationId, DelegationStatus};

/// Persisted delegation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delegation {
    pub id: DelegationId,
    /// Certificate signing request, opaque
    pub csr: String,
    /// Total validity window of the delegation, in seconds
    pub duration_secs: i64,
    /// Lifetime of each issued certificate, in seconds
    pub cert_lifetime_secs: i64,
    pub status: DelegationStatus,
    /// Where the issued certificate can be fetched
    pub cert_url: Option<String>,
    /// Free-text details, e.g. the failure reason
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_update: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Sanitized, not yet persisted delegation
///
/// Only [`crate::domain::validator::sanitize`] builds one, so a repository
/// can never be handed unchecked client input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDelegation {
    pub(crate) csr: String,
    pub(crate) duration_secs: i64,
    pub(crate) cert_lifetime_secs: i64,
    pub(crate) status: DelegationStatus,
}

impl NewDelegation {
    pub fn csr(&self) -> &str {
        &self.csr
    }

    pub fn duration_secs(&self) -> i64 {
        self.duration_secs
    }

    pub fn cert_lifetime_secs(&self) -> i64 {
        self.cert_lifetime_secs
    }

    pub fn status(&self) -> DelegationStatus {
        self.status
    }

    /// Build the stored record once the engine has assigned id and creation time
    pub(crate) fn into_persisted(self, id: DelegationId, created_at: DateTime<Utc>) -> Delegation {
        Delegation {
            id,
            csr: self.csr,
            duration_secs: self.duration_secs,
            cert_lifetime_secs: self.cert_lifetime_secs,
            status: self.status,
            cert_url: None,
            details: None,
            created_at,
            last_update: None,
            expires_at: None,
            completed_at: None,
        }
    }
}

/// Creation request exactly as decoded from the client
///
/// Server-owned fields are kept (as raw JSON values) only so that the
/// validator can report that it dropped them.
#[derive(Debug, Clone, Default)]
pub struct RawDelegation {
    pub csr: Option<String>,
    pub duration_secs: Option<i64>,
    pub cert_lifetime_secs: Option<i64>,

    pub id: Option<serde_json::Value>,
    pub status: Option<serde_json::Value>,
    pub cert_url: Option<serde_json::Value>,
    pub details: Option<serde_json::Value>,
    pub creation_date: Option<serde_json::Value>,
    pub last_update: Option<serde_json::Value>,
    pub expiration_date: Option<serde_json::Value>,
    pub completion_date: Option<serde_json::Value>,
}

impl RawDelegation {
    /// Names of the server-owned fields the client tried to set
    pub fn server_owned_fields(&self) -> Vec<&'static str> {
        [
            ("id", &self.id),
            ("status", &self.status),
            ("cert-url", &self.cert_url),
            ("details", &self.details),
            ("creation-date", &self.creation_date),
            ("last-update", &self.last_update),
            ("expiration-date", &self.expiration_date),
            ("completion-date", &self.completion_date),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_ref().is_some_and(|v| !v.is_null()))
        .map(|(name, _)| name)
        .collect()
    }
}
