//! Plugin discovery and loading.

use std::ffi::{CStr, c_char, c_void};
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::Arc;

use libloading::{Library, Symbol};
use tracing::{debug, info, warn};
use wyrm_kernel::plugin::{
    HostModule, OptionDef, OptionRegistry, PluginError, PluginModule, PluginResult,
};

use crate::abi::{self, OptionDesc, OptionParserBuilder, PluginEntryFn, PluginInfo};
use crate::native::host_module::NativeHostModule;

// ============================================================================
// Discovery
// ============================================================================

/// Enumerate candidate plugin files directly under `search_path`.
///
/// A candidate is a regular file whose name carries the platform
/// shared-library suffix (`.so`, `.dylib` or `.dll`). No file is opened and
/// no ABI handshake happens here; that is [`PluginLoader::load`]'s job.
/// Each call re-scans the directory; nothing is cached.
pub fn enumerate(search_path: impl AsRef<Path>) -> PluginResult<PluginCandidates> {
    let search_path = search_path.as_ref();

    let metadata = match std::fs::metadata(search_path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(PluginError::NotFound(search_path.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };
    if !metadata.is_dir() {
        return Err(PluginError::NotADirectory(search_path.to_path_buf()));
    }

    debug!(path = %search_path.display(), "enumerating plugin candidates");
    Ok(PluginCandidates {
        walker: walkdir::WalkDir::new(search_path)
            .min_depth(1)
            .max_depth(1)
            .into_iter(),
    })
}

/// Lazy sequence of candidate plugin paths produced by [`enumerate`].
#[derive(Debug)]
pub struct PluginCandidates {
    walker: walkdir::IntoIter,
}

impl Iterator for PluginCandidates {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("skipping unreadable directory entry: {err}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();
            if has_library_suffix(&path) {
                return Some(path);
            }
        }
    }
}

fn has_library_suffix(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(std::env::consts::DLL_SUFFIX))
}

// ============================================================================
// Loading
// ============================================================================

/// Loads plugin libraries and validates their ABI record.
///
/// The loader itself is stateless apart from its compiled-in expected API
/// version: distinct [`load`](Self::load) calls share nothing, and a failed
/// load leaves no trace.
#[derive(Debug, Clone)]
pub struct PluginLoader {
    api_version: u32,
}

impl PluginLoader {
    /// ABI version this loader expects; exact match required.
    pub const CURRENT_API_VERSION: u32 = abi::PLUGIN_API_VERSION;

    pub fn new() -> Self {
        Self {
            api_version: Self::CURRENT_API_VERSION,
        }
    }

    /// The expected ABI version.
    pub fn api_version(&self) -> u32 {
        self.api_version
    }

    /// Load the library at `path` and validate it as a Wyrm plugin.
    ///
    /// Performs, in order: map the library image, resolve the entry symbol,
    /// call it for the [`PluginInfo`] record, check the API version
    /// (exact-match only), reject null required fields, and wrap the result
    /// into an immutable [`Plugin`] holding a shared handle to the image.
    ///
    /// Every failure mode is reported as a [`PluginError`]; nothing panics
    /// across the module boundary and no caller-visible state is mutated on
    /// failure.
    pub fn load(&self, path: impl AsRef<Path>) -> PluginResult<Plugin> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading plugin library");

        // SAFETY: mapping a library runs its initializers; that is the
        // irreducible trust boundary of native plugins. Everything the
        // loader touches afterwards is validated before use.
        let library = unsafe { Library::new(path) }
            .map_err(|err| PluginError::LoadFailure(err.to_string()))?;

        let raw_info = {
            // SAFETY: the symbol is typed as the well-known entry
            // signature; agreement on it is part of the ABI contract.
            let entry: Symbol<PluginEntryFn> = unsafe {
                library.get(abi::PLUGIN_ENTRY_SYMBOL.as_bytes()).map_err(|err| {
                    PluginError::SymbolResolutionFailure {
                        symbol: abi::PLUGIN_ENTRY_SYMBOL.to_string(),
                        reason: err.to_string(),
                    }
                })?
            };
            // SAFETY: entry resolved above; returns the record by value.
            unsafe { entry() }
        };

        // Version first: on mismatch the rest of the record cannot be
        // trusted to have the layout we just read it with.
        if raw_info.api_version != self.api_version {
            return Err(PluginError::VersionMismatch {
                expected: self.api_version,
                found: raw_info.api_version,
            });
        }

        let info = ValidatedInfo::from_raw(&raw_info)?;
        info!(
            name = %info.name,
            version = %info.version,
            path = %path.display(),
            "loaded plugin"
        );

        Ok(Plugin {
            path: path.to_path_buf(),
            library: Arc::new(library),
            info,
        })
    }
}

impl Default for PluginLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validated, owned copy of a plugin's ABI record.
#[derive(Debug, Clone)]
struct ValidatedInfo {
    api_version: u32,
    name: String,
    version: String,
    register_options: unsafe extern "C" fn(*mut OptionParserBuilder),
    create_host_module: unsafe extern "C" fn() -> *mut c_void,
    destroy_host_module: unsafe extern "C" fn(*mut c_void),
}

impl ValidatedInfo {
    fn from_raw(info: &PluginInfo) -> PluginResult<Self> {
        Ok(Self {
            api_version: info.api_version,
            name: read_required_str(info.name, "name")?,
            version: read_required_str(info.version, "version")?,
            register_options: info.register_options.ok_or(PluginError::MalformedInfo {
                field: "register_options",
            })?,
            create_host_module: info.create_host_module.ok_or(PluginError::MalformedInfo {
                field: "create_host_module",
            })?,
            destroy_host_module: info.destroy_host_module.ok_or(PluginError::MalformedInfo {
                field: "destroy_host_module",
            })?,
        })
    }
}

fn read_required_str(ptr: *const c_char, field: &'static str) -> PluginResult<String> {
    if ptr.is_null() {
        return Err(PluginError::MalformedInfo { field });
    }
    // SAFETY: non-null and, per the ABI contract, points at a
    // NUL-terminated string that stays valid for the library's lifetime;
    // the bytes are copied out before this frame returns.
    let raw = unsafe { CStr::from_ptr(ptr) };
    raw.to_str()
        .map(str::to_owned)
        .map_err(|_| PluginError::MalformedInfo { field })
}

// ============================================================================
// Plugin
// ============================================================================

/// An immutable, loaded plugin.
///
/// Holds a shared, reference-counted handle to the backing library image;
/// the image stays mapped at least as long as this value and every host
/// module it allocated, regardless of drop order or thread.
pub struct Plugin {
    path: PathBuf,
    library: Arc<Library>,
    info: ValidatedInfo,
}

impl Plugin {
    /// Path the plugin was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ABI version the plugin was built against.
    pub fn api_version(&self) -> u32 {
        self.info.api_version
    }

    /// Plugin name.
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Plugin version string.
    pub fn version(&self) -> &str {
        &self.info.version
    }

    /// Forward the plugin's option definitions into `registry`.
    ///
    /// Safe to call multiple times; whether repeated registration is
    /// idempotent is up to the plugin.
    pub fn register_options(&self, registry: &mut OptionRegistry) {
        unsafe extern "C" fn add_option(ctx: *mut c_void, desc: *const OptionDesc) {
            // SAFETY: `ctx` is the `&mut OptionRegistry` passed below,
            // alive for the whole `register_options` call.
            let registry = unsafe { &mut *ctx.cast::<OptionRegistry>() };
            if desc.is_null() {
                warn!("plugin passed a null option descriptor; skipping");
                return;
            }
            // SAFETY: non-null; the descriptor only needs to live for this
            // callback, and its strings are copied out immediately.
            let desc = unsafe { &*desc };
            let (Some(name), Some(help)) = (read_optional_str(desc.name), read_optional_str(desc.help))
            else {
                warn!("plugin passed an option descriptor with null fields; skipping");
                return;
            };
            let mut option = OptionDef::new(&name, &help);
            if let Some(default) = read_optional_str(desc.default_value) {
                option = option.with_default(&default);
            }
            registry.add(option);
        }

        fn read_optional_str(ptr: *const c_char) -> Option<String> {
            if ptr.is_null() {
                return None;
            }
            // SAFETY: non-null, NUL-terminated per the ABI contract, copied
            // out immediately.
            let raw = unsafe { CStr::from_ptr(ptr) };
            Some(raw.to_string_lossy().into_owned())
        }

        let mut builder = OptionParserBuilder {
            ctx: std::ptr::from_mut(registry).cast(),
            add: add_option,
        };
        // SAFETY: the function pointer was validated non-null at load time
        // and the library it points into is kept alive by `self.library`.
        unsafe { (self.info.register_options)(&mut builder) }
    }

    /// Allocate one new, independent host-module instance.
    ///
    /// Ownership transfers to the caller; repeated calls share no state, so
    /// multiple VM instances may each hold their own module from the same
    /// plugin. The instance keeps the library image alive on its own.
    pub fn create_host_module(&self) -> PluginResult<NativeHostModule> {
        // SAFETY: validated non-null at load time; library alive via self.
        let raw = unsafe { (self.info.create_host_module)() };
        let raw = NonNull::new(raw).ok_or_else(|| {
            PluginError::CreationFailed(format!(
                "plugin `{}` returned a null host-module instance",
                self.info.name
            ))
        })?;
        Ok(NativeHostModule::new(
            raw,
            self.info.destroy_host_module,
            Arc::clone(&self.library),
        ))
    }
}

impl PluginModule for Plugin {
    fn name(&self) -> &str {
        Plugin::name(self)
    }

    fn version(&self) -> &str {
        Plugin::version(self)
    }

    fn api_version(&self) -> u32 {
        Plugin::api_version(self)
    }

    fn register_options(&self, registry: &mut OptionRegistry) {
        Plugin::register_options(self, registry);
    }

    fn create_host_module(&self) -> PluginResult<Box<dyn HostModule>> {
        Plugin::create_host_module(self).map(|module| Box::new(module) as Box<dyn HostModule>)
    }
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("path", &self.path)
            .field("name", &self.info.name)
            .field("version", &self.info.version)
            .field("api_version", &self.info.api_version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::consts::DLL_SUFFIX;
    use std::fs;

    #[test]
    fn test_loader_expects_the_compiled_in_api_version() {
        let loader = PluginLoader::new();
        assert_eq!(loader.api_version(), PluginLoader::CURRENT_API_VERSION);
        assert_eq!(loader.api_version(), abi::PLUGIN_API_VERSION);
    }

    #[test]
    fn test_enumerate_missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir");

        match enumerate(&missing) {
            Err(PluginError::NotFound(path)) => assert_eq!(path, missing),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_enumerate_file_path_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plugin.txt");
        fs::write(&file, b"not a directory").unwrap();

        match enumerate(&file) {
            Err(PluginError::NotADirectory(path)) => assert_eq!(path, file),
            other => panic!("expected NotADirectory, got {other:?}"),
        }
    }

    #[test]
    fn test_enumerate_filters_by_library_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let lib_a = dir.path().join(format!("libalpha{DLL_SUFFIX}"));
        let lib_b = dir.path().join(format!("libbeta{DLL_SUFFIX}"));
        fs::write(&lib_a, b"").unwrap();
        fs::write(&lib_b, b"").unwrap();
        fs::write(dir.path().join("README.md"), b"not a plugin").unwrap();
        fs::create_dir(dir.path().join(format!("subdir{DLL_SUFFIX}"))).unwrap();

        let mut found: Vec<PathBuf> = enumerate(dir.path()).unwrap().collect();
        found.sort();
        assert_eq!(found, vec![lib_a, lib_b]);

        // Restartable: a second scan with no filesystem change yields the
        // same set.
        let mut again: Vec<PathBuf> = enumerate(dir.path()).unwrap().collect();
        again.sort();
        assert_eq!(again, found);
    }

    #[test]
    fn test_load_missing_file_is_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join(format!("libgone{DLL_SUFFIX}"));

        let err = PluginLoader::new().load(&missing).unwrap_err();
        assert!(matches!(err, PluginError::LoadFailure(_)), "got {err:?}");
    }

    #[test]
    fn test_load_non_library_file_is_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join(format!("libempty{DLL_SUFFIX}"));
        fs::write(&bogus, b"").unwrap();

        let err = PluginLoader::new().load(&bogus).unwrap_err();
        assert!(matches!(err, PluginError::LoadFailure(_)), "got {err:?}");
    }
}
