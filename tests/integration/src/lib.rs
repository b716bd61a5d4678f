//! Integration test utilities for the cloud gaming API
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API backed by in-memory repositories.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
