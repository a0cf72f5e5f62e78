//! Fixed plugin ABI.
//!
//! Every plugin binary exports exactly one no-argument function named
//! [`PLUGIN_ENTRY_SYMBOL`], using the platform C calling convention and
//! returning a [`PluginInfo`] record by value. That record is the entire
//! trust boundary between the host and the plugin: the loader reads it,
//! validates it, and never inspects the library further.
//!
//! Compatibility is exact-match on [`PLUGIN_API_VERSION`]. The record
//! layout itself may change between API versions, so a version mismatch is
//! rejected outright rather than probed.

use std::ffi::{c_char, c_void};

/// ABI version this loader was compiled against.
pub const PLUGIN_API_VERSION: u32 = 1;

/// Name of the single entry symbol every plugin exports.
pub const PLUGIN_ENTRY_SYMBOL: &str = "wyrm_plugin_info";

/// Type of the entry function behind [`PLUGIN_ENTRY_SYMBOL`].
pub type PluginEntryFn = unsafe extern "C" fn() -> PluginInfo;

/// Record describing a plugin's identity and capabilities.
///
/// String pointers must stay valid for the backing library's lifetime
/// (static data in the plugin image). All fields are required; the loader
/// rejects a record with any null field.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct PluginInfo {
    /// ABI version the plugin was built against; must equal
    /// [`PLUGIN_API_VERSION`] exactly.
    pub api_version: u32,
    /// Plugin name, NUL-terminated UTF-8.
    pub name: *const c_char,
    /// Plugin version string, NUL-terminated UTF-8.
    pub version: *const c_char,
    /// Contributes option definitions into the host's parser builder.
    pub register_options: Option<unsafe extern "C" fn(builder: *mut OptionParserBuilder)>,
    /// Allocates one new, independent host-module instance inside the
    /// plugin's memory domain and transfers ownership to the host.
    pub create_host_module: Option<unsafe extern "C" fn() -> *mut c_void>,
    /// Releases an instance produced by `create_host_module`. Paired with
    /// the allocator so the instance is freed by the same binary that
    /// allocated it, never by the host's allocator.
    pub destroy_host_module: Option<unsafe extern "C" fn(instance: *mut c_void)>,
}

/// One option definition crossing the ABI, all pointers NUL-terminated.
/// `default_value` may be null for options without a default.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct OptionDesc {
    pub name: *const c_char,
    pub help: *const c_char,
    pub default_value: *const c_char,
}

/// Callback table handed to a plugin's `register_options` hook.
///
/// The plugin appends entries by invoking `add` with the opaque `ctx`; it
/// never links host symbols, so plugins built with a different toolchain
/// can still contribute options.
#[repr(C)]
pub struct OptionParserBuilder {
    /// Host-owned context, opaque to the plugin.
    pub ctx: *mut c_void,
    /// Appends one [`OptionDesc`] to the host's registry.
    pub add: unsafe extern "C" fn(ctx: *mut c_void, desc: *const OptionDesc),
}

/// Emit the plugin entry symbol for a Rust-built plugin.
///
/// # Example
///
/// ```rust,ignore
/// use std::ffi::c_void;
/// use wyrm_plugins::abi::OptionParserBuilder;
///
/// unsafe extern "C" fn register(_builder: *mut OptionParserBuilder) {}
/// unsafe extern "C" fn create() -> *mut c_void { /* ... */ }
/// unsafe extern "C" fn destroy(_instance: *mut c_void) { /* ... */ }
///
/// wyrm_plugins::declare_plugin! {
///     name: "my-plugin",
///     version: "0.1.0",
///     register: register,
///     create: create,
///     destroy: destroy,
/// }
/// ```
#[macro_export]
macro_rules! declare_plugin {
    (
        name: $name:literal,
        version: $version:literal,
        register: $register:path,
        create: $create:path,
        destroy: $destroy:path $(,)?
    ) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn wyrm_plugin_info() -> $crate::abi::PluginInfo {
            $crate::abi::PluginInfo {
                api_version: $crate::abi::PLUGIN_API_VERSION,
                name: concat!($name, "\0").as_ptr().cast(),
                version: concat!($version, "\0").as_ptr().cast(),
                register_options: Some($register),
                create_host_module: Some($create),
                destroy_host_module: Some($destroy),
            }
        }
    };
}
