//! Shared fixtures for rendezvous integration tests.

pub mod fixtures;
