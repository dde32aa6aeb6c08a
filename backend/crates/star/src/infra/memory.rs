//! In-Memory Repository Implementation
//!
//! Used when no database is configured and by the tests. Applies the same
//! schema constraints as the PostgreSQL table.

use crate::domain::entities::{Delegation, NewDelegation};
use crate::domain::repository::DelegationRepository;
use crate::domain::value_objects::DelegationId;
use crate::error::{StarError, StarResult};
use chrono::{SubsecRound, Utc};
use kernel::id::IdCodec;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory repository
#[derive(Clone, Default)]
pub struct InMemoryDelegationRepository {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    last_id: u64,
    rows: BTreeMap<DelegationId, Delegation>,
}

impl InMemoryDelegationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored delegations
    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Overwrite a stored record, as the issuance worker would
    ///
    /// `csr`, both durations and the creation date are fixed at creation.
    /// The status may stay as is or take one legal step; a record in a
    /// terminal state is no longer writable.
    pub async fn replace(&self, delegation: Delegation) -> StarResult<()> {
        let mut inner = self.inner.write().await;
        let current = inner
            .rows
            .get_mut(&delegation.id)
            .ok_or(StarError::UnknownResource)?;

        check_update(current, &delegation)?;
        *current = delegation;
        Ok(())
    }
}

fn check_update(current: &Delegation, next: &Delegation) -> StarResult<()> {
    let id = current.id;
    if current.csr != next.csr
        || current.duration_secs != next.duration_secs
        || current.cert_lifetime_secs != next.cert_lifetime_secs
        || current.created_at != next.created_at
    {
        return Err(StarError::Storage(format!(
            "delegation {id}: csr, durations and creation date are immutable"
        )));
    }
    if current.status.is_terminal() && current != next {
        return Err(StarError::Storage(format!(
            "delegation {id} is {} and can no longer change",
            current.status
        )));
    }
    if current.status != next.status && !current.status.can_transition_to(next.status) {
        return Err(StarError::Storage(format!(
            "delegation {id}: illegal status change {} -> {}",
            current.status, next.status
        )));
    }
    Ok(())
}

fn check_constraints(duration_secs: i64, cert_lifetime_secs: i64) -> StarResult<()> {
    if duration_secs <= 0 {
        return Err(StarError::Storage(format!(
            "duration must be positive, got {duration_secs}"
        )));
    }
    if cert_lifetime_secs <= 0 {
        return Err(StarError::Storage(format!(
            "cert_lifetime must be positive, got {cert_lifetime_secs}"
        )));
    }
    if cert_lifetime_secs > duration_secs {
        return Err(StarError::Storage(format!(
            "cert_lifetime {cert_lifetime_secs} exceeds duration {duration_secs}"
        )));
    }
    Ok(())
}

impl DelegationRepository for InMemoryDelegationRepository {
    async fn add(&self, delegation: &NewDelegation) -> StarResult<Delegation> {
        check_constraints(delegation.duration_secs(), delegation.cert_lifetime_secs())?;

        let mut inner = self.inner.write().await;
        let next = inner
            .last_id
            .checked_add(1)
            .ok_or_else(|| StarError::Storage("delegation id space exhausted".to_string()))?;
        inner.last_id = next;

        let id = DelegationId::from_u64(next);
        let stored = delegation
            .clone()
            .into_persisted(id, Utc::now().trunc_subsecs(6));
        inner.rows.insert(id, stored.clone());

        Ok(stored)
    }

    async fn read(&self, id: &str) -> StarResult<Delegation> {
        let id = DelegationId::decode(id).map_err(|e| {
            tracing::debug!(error = %e, "Malformed delegation id");
            StarError::UnknownResource
        })?;

        self.inner
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| {
                tracing::debug!(delegation_id = %id, "Delegation not found");
                StarError::UnknownResource
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::DelegationStatus;
    use chrono::DateTime;

    fn new_delegation(duration_secs: i64, cert_lifetime_secs: i64) -> NewDelegation {
        NewDelegation {
            csr: "CSR".to_string(),
            duration_secs,
            cert_lifetime_secs,
            status: DelegationStatus::New,
        }
    }

    #[tokio::test]
    async fn test_add_then_read() {
        let repo = InMemoryDelegationRepository::new();
        let added = repo.add(&new_delegation(100, 50)).await.unwrap();
        assert_eq!(added.status, DelegationStatus::New);
        assert_eq!(added.cert_url, None);
        assert_eq!(added.created_at.timestamp_subsec_nanos() % 1_000, 0);

        let read = repo.read(&added.id.encode()).await.unwrap();
        assert_eq!(read, added);
    }

    #[tokio::test]
    async fn test_ids_are_distinct_and_increasing() {
        let repo = InMemoryDelegationRepository::new();
        let first = repo.add(&new_delegation(100, 50)).await.unwrap();
        let second = repo.add(&new_delegation(100, 50)).await.unwrap();
        assert!(second.id > first.id);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_concurrent_adds_get_unique_ids() {
        let repo = InMemoryDelegationRepository::new();
        let handles: Vec<_> = (0..32)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.add(&new_delegation(100, 50)).await.unwrap().id })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 32);
    }

    #[tokio::test]
    async fn test_read_unknown() {
        let repo = InMemoryDelegationRepository::new();
        repo.add(&new_delegation(100, 50)).await.unwrap();
        for id in ["not-a-number", "999999999", "", "-1", "18446744073709551616"] {
            let err = repo.read(id).await.unwrap_err();
            assert!(matches!(err, StarError::UnknownResource), "id {id:?}");
        }
    }

    #[tokio::test]
    async fn test_constraints() {
        let repo = InMemoryDelegationRepository::new();
        for (duration, lifetime) in [(0, 0), (100, 0), (0, 50), (50, 100)] {
            let err = repo.add(&new_delegation(duration, lifetime)).await.unwrap_err();
            assert!(matches!(err, StarError::Storage(_)));
        }
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_replace() {
        let repo = InMemoryDelegationRepository::new();
        let mut delegation = repo.add(&new_delegation(100, 50)).await.unwrap();
        delegation.status = DelegationStatus::Wip;
        repo.replace(delegation.clone()).await.unwrap();
        let read = repo.read(&delegation.id.encode()).await.unwrap();
        assert_eq!(read.status, DelegationStatus::Wip);

        delegation.status = DelegationStatus::Success;
        delegation.cert_url = Some("https://star.example/cert/1".to_string());
        repo.replace(delegation.clone()).await.unwrap();
        let read = repo.read(&delegation.id.encode()).await.unwrap();
        assert_eq!(read, delegation);

        delegation.id = DelegationId::from_u64(999);
        let err = repo.replace(delegation).await.unwrap_err();
        assert!(matches!(err, StarError::UnknownResource));
    }

    #[tokio::test]
    async fn test_replace_keeps_status_for_detail_updates() {
        let repo = InMemoryDelegationRepository::new();
        let mut delegation = repo.add(&new_delegation(100, 50)).await.unwrap();
        delegation.details = Some("queued".to_string());
        repo.replace(delegation.clone()).await.unwrap();
        assert_eq!(repo.read("1").await.unwrap(), delegation);
    }

    #[tokio::test]
    async fn test_replace_rejects_immutable_changes() {
        let repo = InMemoryDelegationRepository::new();
        let stored = repo.add(&new_delegation(100, 50)).await.unwrap();

        let forged = [
            Delegation {
                csr: "FORGED".to_string(),
                ..stored.clone()
            },
            Delegation {
                duration_secs: 90,
                ..stored.clone()
            },
            Delegation {
                cert_lifetime_secs: 40,
                ..stored.clone()
            },
            Delegation {
                created_at: DateTime::<Utc>::UNIX_EPOCH,
                ..stored.clone()
            },
        ];
        for delegation in forged {
            let err = repo.replace(delegation).await.unwrap_err();
            assert!(matches!(err, StarError::Storage(_)));
        }
        assert_eq!(repo.read("1").await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_replace_rejects_illegal_transitions() {
        let repo = InMemoryDelegationRepository::new();
        let stored = repo.add(&new_delegation(100, 50)).await.unwrap();

        for status in [DelegationStatus::Success, DelegationStatus::Failed] {
            let err = repo
                .replace(Delegation {
                    status,
                    ..stored.clone()
                })
                .await
                .unwrap_err();
            assert!(matches!(err, StarError::Storage(_)), "new -> {status}");
        }

        let wip = Delegation {
            status: DelegationStatus::Wip,
            ..stored.clone()
        };
        repo.replace(wip.clone()).await.unwrap();
        let err = repo
            .replace(Delegation {
                status: DelegationStatus::New,
                ..wip.clone()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StarError::Storage(_)));

        let failed = Delegation {
            status: DelegationStatus::Failed,
            details: Some("CA unreachable".to_string()),
            ..wip
        };
        repo.replace(failed.clone()).await.unwrap();
        for status in DelegationStatus::ALL {
            let err = repo
                .replace(Delegation {
                    status,
                    details: None,
                    ..failed.clone()
                })
                .await
                .unwrap_err();
            assert!(matches!(err, StarError::Storage(_)), "failed -> {status}");
        }
        assert_eq!(repo.read("1").await.unwrap(), failed);
    }
}
