//! Delegation Service Use Case
//!
//! Sits between the HTTP boundary and the store. Creation goes through the
//! validator first; reads are passed straight through. Both are the place
//! to hang authorization or CSR policy checks later on.

use crate::application::config::StarConfig;
use crate::domain::entities::{Delegation, RawDelegation};
use crate::domain::repository::DelegationRepository;
use crate::domain::validator;
use crate::error::StarResult;
use std::sync::Arc;

/// Delegation Service
pub struct DelegationService<R>
where
    R: DelegationRepository,
{
    repo: Arc<R>,
    config: Arc<StarConfig>,
}

impl<R> DelegationService<R>
where
    R: DelegationRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<StarConfig>) -> Self {
        Self { repo, config }
    }

    /// Fetch a delegation by its textual id
    pub async fn read_delegation(&self, id: &str) -> StarResult<Delegation> {
        self.repo.read(id).await
    }

    /// Sanitize a creation request and persist it
    pub async fn add_delegation(&self, raw: RawDelegation) -> StarResult<Delegation> {
        let bounds = self.config.bounds()?;
        let sanitized = validator::sanitize(raw, &bounds)?;

        let delegation = self.repo.add(&sanitized).await?;

        tracing::info!(
            delegation_id = %delegation.id,
            duration_secs = delegation.duration_secs,
            cert_lifetime_secs = delegation.cert_lifetime_secs,
            "Delegation created"
        );

        Ok(delegation)
    }
}
