//! PostgreSQL Repository Implementation

use crate::domain::entities::{Delegation, NewDelegation};
use crate::domain::repository::DelegationRepository;
use crate::domain::value_objects::{DelegationId, DelegationStatus};
use crate::error::{StarError, StarResult};
use chrono::{DateTime, SubsecRound, Utc};
use kernel::id::IdCodec;
use sqlx::PgPool;

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgDelegationRepository {
    pool: PgPool,
}

impl PgDelegationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DelegationRepository for PgDelegationRepository {
    async fn add(&self, delegation: &NewDelegation) -> StarResult<Delegation> {
        let created_at = Utc::now().trunc_subsecs(6);

        let row = sqlx::query_as::<_, DelegationRow>(
            r#"
            INSERT INTO delegations (
                creation_date,
                status,
                csr,
                cert_lifetime,
                duration
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id,
                cert_url,
                creation_date,
                last_update,
                expiration_date,
                completion_date,
                status,
                details,
                csr,
                cert_lifetime,
                duration
            "#,
        )
        .bind(created_at)
        .bind(delegation.status().code())
        .bind(delegation.csr())
        .bind(delegation.cert_lifetime_secs())
        .bind(delegation.duration_secs())
        .fetch_one(&self.pool)
        .await?;

        row.into_delegation()
    }

    async fn read(&self, id: &str) -> StarResult<Delegation> {
        let id = DelegationId::decode(id).map_err(|e| {
            tracing::debug!(error = %e, "Malformed delegation id");
            StarError::UnknownResource
        })?;
        let key = i64::try_from(id.get()).map_err(|_| {
            tracing::debug!(delegation_id = %id, "Delegation id beyond key range");
            StarError::UnknownResource
        })?;

        let row = sqlx::query_as::<_, DelegationRow>(
            r#"
            SELECT
                id,
                cert_url,
                creation_date,
                last_update,
                expiration_date,
                completion_date,
                status,
                details,
                csr,
                cert_lifetime,
                duration
            FROM delegations
            WHERE id = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => r.into_delegation(),
            None => {
                tracing::debug!(delegation_id = %id, "Delegation not found");
                Err(StarError::UnknownResource)
            }
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DelegationRow {
    id: i64,
    cert_url: Option<String>,
    creation_date: DateTime<Utc>,
    last_update: Option<DateTime<Utc>>,
    expiration_date: Option<DateTime<Utc>>,
    completion_date: Option<DateTime<Utc>>,
    status: String,
    details: Option<String>,
    csr: String,
    cert_lifetime: i64,
    duration: i64,
}

impl DelegationRow {
    fn into_delegation(self) -> StarResult<Delegation> {
        let id = u64::try_from(self.id)
            .map(DelegationId::from_u64)
            .map_err(|_| StarError::Internal(format!("negative delegation id {}", self.id)))?;
        let status = DelegationStatus::from_code(&self.status).ok_or_else(|| {
            StarError::Internal(format!(
                "delegation {id} has unknown status {:?}",
                self.status
            ))
        })?;

        Ok(Delegation {
            id,
            csr: self.csr,
            duration_secs: self.duration,
            cert_lifetime_secs: self.cert_lifetime,
            status,
            cert_url: self.cert_url,
            details: self.details,
            created_at: self.creation_date,
            last_update: self.last_update,
            expires_at: self.expiration_date,
            completed_at: self.completion_date,
        })
    }
}
