//! STAR Delegation Backend Module
//!
//! Accepts requests to delegate certificate issuance from a CSR, tracks each
//! delegation through its lifecycle and serves it back for polling.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, validator, ETag computation, repository traits
//! - `application/` - Configuration and the delegation service
//! - `infra/` - PostgreSQL and in-memory repository implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Security Model
//! - Clients may only choose `csr`, `duration` and `certificate-lifetime`;
//!   every server-owned field in a creation request is dropped
//! - Durations are clamped to configured ceilings before anything is stored
//! - The storage schema re-checks the numeric invariants

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::StarConfig;
pub use application::delegation_service::DelegationService;
pub use error::{StarError, StarResult};
pub use infra::memory::InMemoryDelegationRepository;
pub use infra::postgres::PgDelegationRepository;
pub use presentation::router::{star_router, star_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{app_error::AppError, kind::ErrorKind};
