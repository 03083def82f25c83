//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- session-token generation and validation.
//! - [`cookie`] -- session cookie construction and constants.

pub mod cookie;
pub mod jwt;
pub mod password;
