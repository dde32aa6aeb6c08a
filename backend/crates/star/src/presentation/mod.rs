//! Presentation Layer
//!
//! HTTP handlers and DTOs for the delegation resource.

pub mod dto;
pub mod handlers;
pub mod router;
