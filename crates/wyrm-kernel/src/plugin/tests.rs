//! Unit tests for the plugin vocabulary
//!
//! Covers:
//! - [`OptionDef`] construction and defaults
//! - [`OptionRegistry`] collection order
//! - [`PluginError`] display formatting
//! - [`HostModule`] object safety with a stub implementation
#![allow(clippy::module_inception)]

#[cfg(test)]
mod tests {
    use std::ffi::c_void;
    use std::path::PathBuf;

    use crate::plugin::{HostModule, OptionDef, OptionRegistry, PluginError};

    #[test]
    fn test_option_def_builder() {
        let opt = OptionDef::new("threshold", "reactor threshold").with_default("4");
        assert_eq!(opt.name, "threshold");
        assert_eq!(opt.help, "reactor threshold");
        assert_eq!(opt.default.as_deref(), Some("4"));

        let bare = OptionDef::new("trace", "enable tracing");
        assert_eq!(bare.default, None);
    }

    #[test]
    fn test_option_registry_preserves_registration_order() {
        let mut registry = OptionRegistry::new();
        assert!(registry.is_empty());

        registry.add(OptionDef::new("alpha", "first"));
        registry.add(OptionDef::new("beta", "second"));

        assert_eq!(registry.len(), 2);
        let names: Vec<&str> = registry.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_plugin_error_messages_name_the_failure() {
        let err = PluginError::VersionMismatch {
            expected: 1,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "plugin API version mismatch: expected 1, found 2"
        );

        let err = PluginError::MalformedInfo { field: "name" };
        assert!(err.to_string().contains("`name`"));

        let err = PluginError::NotADirectory(PathBuf::from("/tmp/plugin.so"));
        assert!(err.to_string().contains("/tmp/plugin.so"));
    }

    /// A stub provider; real implementations live behind the plugin ABI.
    struct StubModule {
        marker: u32,
    }

    impl HostModule for StubModule {
        fn as_ptr(&self) -> *mut c_void {
            std::ptr::from_ref(&self.marker).cast_mut().cast()
        }
    }

    #[test]
    fn test_host_module_is_object_safe() {
        let module: Box<dyn HostModule> = Box::new(StubModule { marker: 7 });
        assert!(!module.as_ptr().is_null());
    }
}
