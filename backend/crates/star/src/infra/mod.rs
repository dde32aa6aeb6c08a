//! Infrastructure Layer
//!
//! Storage engines behind `DelegationRepository`.

pub mod memory;
pub mod postgres;
