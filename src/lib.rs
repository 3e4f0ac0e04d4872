//! LOOPER — Leveraged Looping Yield Estimator
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod console;
pub mod data;
pub mod rates;
pub mod sim;
pub mod types;
