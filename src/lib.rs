//! stratlab: strategy back-testing and risk analytics.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], command line front-end in [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
