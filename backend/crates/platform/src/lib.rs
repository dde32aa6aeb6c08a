//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, URL-safe Base64)
//! - Access-log middleware (one line per HTTP transaction)

pub mod access_log;
pub mod crypto;
