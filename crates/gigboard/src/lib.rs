//! Core library for the gigboard freelance marketplace.
//!
//! The `market` module carries the domain: pricing, the job lifecycle state
//! machine, the per-user mailbox, payment confirmation, the freelancer
//! directory, and the ledgers that persist them. `config`, `telemetry`, and
//! `error` hold the service plumbing shared with the API binary.

pub mod config;
pub mod error;
pub mod market;
pub mod telemetry;
