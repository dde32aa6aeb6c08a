//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infrastructure layer.

use crate::domain::entities::{Delegation, NewDelegation};
use crate::error::StarResult;

/// Delegation repository trait
///
/// The engine owns id allocation and the creation timestamp, and enforces
/// the schema constraints (positive durations, lifetime within duration,
/// known status). A violation surfaces as a server-side error.
#[trait_variant::make(DelegationRepository: Send)]
pub trait LocalDelegationRepository {
    /// Persist a sanitized delegation and return it as stored
    async fn add(&self, delegation: &NewDelegation) -> StarResult<Delegation>;

    /// Look up a delegation by its textual id
    ///
    /// A malformed id and an absent row both yield `StarError::UnknownResource`.
    async fn read(&self, id: &str) -> StarResult<Delegation>;
}
