//! # API Bindings
//!
//! reqwest-backed implementations of the sources the admin screens load from,
//! plus the side actions that are not plain CRUD.

pub mod council;
pub mod http;
pub mod users;

pub use council::CouncilClient;
pub use http::{server_message, ApiClient, HttpSource, ListQuery};
pub use users::UserRoleClient;
