//! Test fixtures.

pub mod rendezvous_point;
