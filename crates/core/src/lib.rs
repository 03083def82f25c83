//! Domain logic shared by the Trailhead server and tooling.
//!
//! Everything in this crate is pure: no I/O, no database handles, no HTTP
//! types. The API crate wires these building blocks into handlers; the db
//! crate translates [`query::QuerySpec`] values into SQL.

pub mod error;
pub mod query;
pub mod reset;
pub mod roles;
pub mod text;
pub mod types;
pub mod validate;
