//! Core type definitions used across the Dropcode workspace.

pub mod id;

pub use id::*;
