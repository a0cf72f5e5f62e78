//! Wyrm Kernel: core vocabulary of the Wyrm embeddable VM runtime.
//!
//! This crate carries the types an embedding application exchanges with the
//! engine before and after execution:
//!
//! - [`config`]: pre-construction feature configuration ([`ConfigureContext`])
//! - [`result`]: execution outcome vocabulary ([`VmResult`], [`ErrCode`])
//! - [`plugin`]: the capability interface satisfied by loaded native plugins
//! - [`version`]: runtime version accessors
//!
//! The interpreter, module loader and built-in host modules live in the
//! engine crates and consume these types; nothing here executes bytecode.

// config module
pub mod config;
pub use config::{ConfigureContext, HostRegistration, HostRegistrationSet, Proposal, ProposalSet};

// plugin module
pub mod plugin;
pub use plugin::{
    HostModule, OptionDef, OptionRegistry, PluginError, PluginModule, PluginResult,
};

// result module
pub mod result;
pub use result::{ErrCode, VmResult};

// version module
pub mod version;
