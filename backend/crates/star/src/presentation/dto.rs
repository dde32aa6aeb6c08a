//! API DTOs (Data Transfer Objects)

use crate::domain::entities::{Delegation, RawDelegation};
use chrono::{DateTime, SecondsFormat, Utc};
use kernel::id::IdCodec;
use serde::{Deserialize, Serialize};

/// Request for POST {delegation_path}
///
/// Every field is optional at this layer; server-owned ones are accepted
/// only to be dropped by the validator. The flattened group makes serde read
/// the body as a map, so only a JSON object is a valid request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DelegationRequest {
    #[serde(default)]
    pub csr: Option<String>,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default, alias = "certLifetime", alias = "certificateLifetime")]
    pub certificate_lifetime: Option<i64>,
    #[serde(flatten)]
    pub server_owned: ServerOwnedFields,
}

/// Fields a client may send but never sets
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServerOwnedFields {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default, alias = "certURL")]
    pub cert_url: Option<serde_json::Value>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    #[serde(default)]
    pub creation_date: Option<serde_json::Value>,
    #[serde(default)]
    pub last_update: Option<serde_json::Value>,
    #[serde(default)]
    pub expiration_date: Option<serde_json::Value>,
    #[serde(default)]
    pub completion_date: Option<serde_json::Value>,
}

impl From<DelegationRequest> for RawDelegation {
    fn from(req: DelegationRequest) -> Self {
        let owned = req.server_owned;
        Self {
            csr: req.csr,
            duration_secs: req.duration,
            cert_lifetime_secs: req.certificate_lifetime,
            id: owned.id,
            status: owned.status,
            cert_url: owned.cert_url,
            details: owned.details,
            creation_date: owned.creation_date,
            last_update: owned.last_update,
            expiration_date: owned.expiration_date,
            completion_date: owned.completion_date,
        }
    }
}

/// Response body for a single delegation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DelegationResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_url: Option<String>,
    pub creation_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub csr: String,
    pub certificate_lifetime: i64,
    pub duration: i64,
}

fn rfc3339(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl From<&Delegation> for DelegationResponse {
    fn from(d: &Delegation) -> Self {
        Self {
            id: d.id.encode(),
            cert_url: d.cert_url.clone(),
            creation_date: rfc3339(&d.created_at),
            last_update: d.last_update.as_ref().map(rfc3339),
            expiration_date: d.expires_at.as_ref().map(rfc3339),
            completion_date: d.completed_at.as_ref().map(rfc3339),
            status: d.status.code(),
            details: d.details.clone(),
            csr: d.csr.clone(),
            certificate_lifetime: d.cert_lifetime_secs,
            duration: d.duration_secs,
        }
    }
}
