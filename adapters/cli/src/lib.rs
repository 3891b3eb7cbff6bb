#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless adapter for the Zombie Defence simulation.
//!
//! Bundles the session orchestration (the fixed per-tick ordering over the
//! world and its systems), TOML-backed tuning, and a built-in demo level
//! for the command-line binary.

pub mod config;
pub mod demo;
pub mod session;
