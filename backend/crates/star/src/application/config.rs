//! Application Configuration
//!
//! Configuration for the STAR application layer.

use crate::domain::value_objects::{DelegationBounds, DelegationId};
use crate::error::{StarError, StarResult};
use kernel::id::IdCodec;
use std::time::Duration;

/// STAR application configuration
#[derive(Debug, Clone)]
pub struct StarConfig {
    /// Ceiling for the requested delegation duration
    pub max_duration: Duration,
    /// Ceiling for the requested certificate lifetime
    pub max_cert_lifetime: Duration,
    /// Scheme and authority prefixed to `Location` headers
    pub virtual_host: String,
    /// Collection path of the delegation resource
    pub delegation_path: String,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            max_duration: Duration::from_secs(DelegationBounds::DEFAULT_MAX_DURATION_SECS as u64),
            max_cert_lifetime: Duration::from_secs(
                DelegationBounds::DEFAULT_MAX_CERT_LIFETIME_SECS as u64,
            ),
            virtual_host: "http://localhost:3000".to_string(),
            delegation_path: "/star/delegation".to_string(),
        }
    }
}

impl StarConfig {
    /// Create config for development (short ceilings, local virtual host)
    pub fn development() -> Self {
        Self {
            max_duration: Duration::from_secs(24 * 3600),
            max_cert_lifetime: Duration::from_secs(3600),
            ..Default::default()
        }
    }

    /// Validated ceilings for the validator
    pub fn bounds(&self) -> StarResult<DelegationBounds> {
        DelegationBounds::new(self.max_duration, self.max_cert_lifetime).ok_or_else(|| {
            StarError::Internal(format!(
                "invalid delegation bounds: max_duration={:?}, max_cert_lifetime={:?}",
                self.max_duration, self.max_cert_lifetime
            ))
        })
    }

    /// Absolute URL of a single delegation, used for `Location`
    pub fn location_for(&self, id: &DelegationId) -> String {
        format!(
            "{}{}/{}",
            self.virtual_host.trim_end_matches('/'),
            self.delegation_path.trim_end_matches('/'),
            id.encode()
        )
    }

    /// Route of the delegation collection, without trailing slash
    ///
    /// Must start with `/`, name at least one segment and be a literal path
    /// (no route parameters or wildcards).
    pub fn collection_route(&self) -> StarResult<String> {
        let path = self.delegation_path.trim_end_matches('/');
        let literal = path
            .chars()
            .all(|c| !c.is_whitespace() && !matches!(c, '{' | '}' | '*' | ':' | '?' | '#'));
        if !path.starts_with('/') || path.len() < 2 || !literal {
            return Err(StarError::Internal(format!(
                "invalid delegation path {:?}",
                self.delegation_path
            )));
        }
        Ok(path.to_string())
    }

    /// Route pattern of a single delegation
    pub fn item_route(&self) -> StarResult<String> {
        Ok(format!("{}/{{id}}", self.collection_route()?))
    }
}
