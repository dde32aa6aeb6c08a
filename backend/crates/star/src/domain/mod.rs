//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Delegation, NewDelegation, RawDelegation)
//! - Domain value objects (DelegationId, DelegationStatus, DelegationBounds)
//! - Domain services (ETag computation)
//! - The validator that sanitizes creation requests
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod services;
pub mod validator;
pub mod value_objects;
