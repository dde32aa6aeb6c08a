//! HTTP Handlers

use crate::application::config::StarConfig;
use crate::application::delegation_service::DelegationService;
use crate::domain::entities::Delegation;
use crate::domain::repository::DelegationRepository;
use crate::domain::services::{compute_etag, if_none_match_hits};
use crate::error::{StarError, StarResult};
use crate::presentation::dto::{DelegationRequest, DelegationResponse};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

/// Shared state for delegation handlers
#[derive(Clone)]
pub struct StarAppState<R>
where
    R: DelegationRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<StarConfig>,
}

impl<R> StarAppState<R>
where
    R: DelegationRepository + Clone + Send + Sync + 'static,
{
    fn service(&self) -> DelegationService<R> {
        DelegationService::new(self.repo.clone(), self.config.clone())
    }
}

/// Serialize a delegation and tag the exact bytes
fn render(delegation: &Delegation) -> StarResult<(Vec<u8>, String)> {
    let body = serde_json::to_vec(&DelegationResponse::from(delegation))
        .map_err(|e| StarError::Internal(format!("response serialization failed: {e}")))?;
    let etag = compute_etag(&body);
    Ok((body, etag))
}

/// POST {delegation_path}
pub async fn add_delegation<R>(
    State(state): State<StarAppState<R>>,
    body: Bytes,
) -> StarResult<Response>
where
    R: DelegationRepository + Clone + Send + Sync + 'static,
{
    let request: DelegationRequest = serde_json::from_slice(&body)
        .map_err(|e| StarError::BadParameter(format!("request body is not a delegation: {e}")))?;

    let delegation = state.service().add_delegation(request.into()).await?;

    let (body, etag) = render(&delegation)?;
    let location = state.config.location_for(&delegation.id);

    Ok((
        StatusCode::CREATED,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::ETAG, etag),
            (header::LOCATION, location),
        ],
        body,
    )
        .into_response())
}

/// GET {delegation_path}/{id}
pub async fn read_delegation<R>(
    State(state): State<StarAppState<R>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> StarResult<Response>
where
    R: DelegationRepository + Clone + Send + Sync + 'static,
{
    let delegation = state.service().read_delegation(&id).await?;
    let (body, etag) = render(&delegation)?;

    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| if_none_match_hits(v, &etag));
    if not_modified {
        tracing::debug!(delegation_id = %delegation.id, "Delegation not modified");
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::ETAG, etag),
        ],
        body,
    )
        .into_response())
}
