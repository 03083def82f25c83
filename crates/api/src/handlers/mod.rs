//! HTTP request handlers, grouped by resource.
//!
//! [`collection`] holds the generic CRUD plumbing shared by the entity
//! modules; the per-resource modules add extraction, guards, and the
//! behaviour that is specific to one entity.

pub mod auth;
pub mod collection;
pub mod reviews;
pub mod tours;
pub mod users;
pub mod views;
