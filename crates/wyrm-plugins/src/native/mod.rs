//! Native plugin discovery and loading
//!
//! Synchronous, blocking filesystem and dynamic-loader I/O, intended for
//! the single-threaded initialization phase of an embedding application.
//! Loads on distinct paths touch no shared mutable state and may run
//! concurrently.

pub mod host_module;
pub mod loader;

pub use host_module::NativeHostModule;
pub use loader::{Plugin, PluginCandidates, PluginLoader, enumerate};
