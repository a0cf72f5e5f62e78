//! Plugin capability vocabulary.
//!
//! Native plugins extend the runtime with additional host modules. The
//! loader (in `wyrm-plugins`) produces values satisfying [`PluginModule`];
//! everything else in the system programs against that interface and the
//! [`HostModule`] objects it creates, never against the underlying ABI
//! record or its raw function pointers.

use std::ffi::c_void;

pub mod error;
pub use error::PluginError;

/// Plugin operation result type using the typed [`PluginError`].
pub type PluginResult<T> = Result<T, PluginError>;

// ============================================================================
// Option registration
// ============================================================================

/// A single command-line option contributed by a plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDef {
    /// Option name as it should appear in the embedder's CLI.
    pub name: String,
    /// Help text.
    pub help: String,
    /// Default value, if the option has one.
    pub default: Option<String>,
}

impl OptionDef {
    pub fn new(name: &str, help: &str) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }
}

/// Shared, embedder-owned option-parser builder.
///
/// Plugins contribute [`OptionDef`] entries through their registration hook;
/// the embedding application then maps the collected definitions onto its
/// own argument parser. The registry itself parses nothing.
#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    options: Vec<OptionDef>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an option definition.
    pub fn add(&mut self, option: OptionDef) {
        self.options.push(option);
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterate the collected definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionDef> {
        self.options.iter()
    }
}

// ============================================================================
// Capability interfaces
// ============================================================================

/// A provider object exposing native functions importable by executing
/// code.
///
/// Concrete implementations live in the engine's built-in host bundles or
/// behind the plugin ABI; this crate only defines the handle the VM wires
/// imports through. Instances are independently owned: dropping one never
/// affects another, even when both came from the same plugin.
pub trait HostModule: Send {
    /// Raw pointer to the underlying instance, consumed by VM construction.
    ///
    /// The pointer stays valid exactly as long as the `HostModule` value;
    /// callers must not retain it past the object's lifetime.
    fn as_ptr(&self) -> *mut c_void;
}

/// Capability interface of a loaded plugin.
///
/// Satisfied by `wyrm_plugins::Plugin`, which backs each method with the
/// validated ABI record of the loaded library.
pub trait PluginModule {
    /// Plugin name, valid for the plugin's lifetime.
    fn name(&self) -> &str;

    /// Plugin version string, valid for the plugin's lifetime.
    fn version(&self) -> &str;

    /// ABI version the plugin was built against.
    fn api_version(&self) -> u32;

    /// Contribute option definitions into the shared registry.
    ///
    /// May be called multiple times; whether repeated registration is
    /// idempotent is up to the plugin.
    fn register_options(&self, registry: &mut OptionRegistry);

    /// Construct one new, independent host-module instance. Ownership
    /// transfers to the caller; repeated calls share no state.
    fn create_host_module(&self) -> PluginResult<Box<dyn HostModule>>;
}

#[cfg(test)]
mod tests;
