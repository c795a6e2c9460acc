//! Infrastructure implementations.
//!
//! Contains port traits and their adapters for the world outside the rules:
//! time and the filesystem.

pub mod clock;
pub mod content_probe;
pub mod ports;
