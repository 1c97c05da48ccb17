//! # Degree Admin Library
//!
//! The admin screens of the degree-modality system, each one a
//! [`ResourceListController`](list_controller::ResourceListController) over a
//! REST endpoint. Exposed as a library for integration testing.

pub mod api;
pub mod console;
pub mod model;
pub mod settings;
