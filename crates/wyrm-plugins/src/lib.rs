//! Native plugin extensibility for the Wyrm VM runtime.
//!
//! Plugins are shared libraries that extend the runtime with additional
//! host modules without recompiling the host process. The contract is
//! deliberately minimal:
//!
//! - [`abi`]: the fixed, versioned record every plugin exports through a
//!   single well-known entry symbol
//! - [`native`]: discovery ([`enumerate`]) and loading ([`PluginLoader`])
//!   of plugin libraries into immutable [`Plugin`] values
//!
//! The loader inspects nothing beyond the ABI record; plugin binaries built
//! with a different toolchain interoperate as long as they agree on the
//! API version, the record layout and the C calling convention.

pub mod abi;
pub mod native;

pub use native::{NativeHostModule, Plugin, PluginCandidates, PluginLoader, enumerate};

pub use wyrm_kernel::plugin::{
    HostModule, OptionDef, OptionRegistry, PluginError, PluginModule, PluginResult,
};
