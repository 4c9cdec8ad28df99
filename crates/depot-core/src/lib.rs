//! Core data types for the depot dependency resolver.
//!
//! This crate defines the fundamental types the resolution engine works
//! over: library identifiers, provider-tagged coordinates, the provider
//! contract, run configuration, and deps-file parsing.
//!
//! This crate is intentionally free of async code and network I/O.

pub mod config;
pub mod dependency;
pub mod manifest;
pub mod provider;
