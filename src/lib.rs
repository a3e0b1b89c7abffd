//! Nextcloud Operator
//!
//! Reconciles a Nextcloud workload against its charm configuration and the
//! `database` relation, and publishes the resulting pod spec to the host
//! platform.

pub mod config;
pub mod controller;
pub mod error;
pub mod relation;

pub use error::{Error, Result};
