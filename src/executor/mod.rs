//! Command execution module
//!
//! Runs external programs with a timeout and bounded output capture.

pub mod runner;

pub use runner::*;
