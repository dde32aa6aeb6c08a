//! STAR Router

use crate::application::config::StarConfig;
use crate::domain::repository::DelegationRepository;
use crate::error::StarResult;
use crate::infra::postgres::PgDelegationRepository;
use crate::presentation::handlers::{self, StarAppState};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// Create the STAR router with PostgreSQL repository
pub fn star_router(repo: PgDelegationRepository, config: StarConfig) -> StarResult<Router> {
    star_router_generic(repo, config)
}

/// Create a generic STAR router for any repository implementation
///
/// Fails if the configured delegation path is not a usable route.
pub fn star_router_generic<R>(repo: R, config: StarConfig) -> StarResult<Router>
where
    R: DelegationRepository + Clone + Send + Sync + 'static,
{
    let collection = config.collection_route()?;
    let item = config.item_route()?;
    let state = StarAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Ok(Router::new()
        .route(&collection, post(handlers::add_delegation::<R>))
        .route(&item, get(handlers::read_delegation::<R>))
        .with_state(state))
}
