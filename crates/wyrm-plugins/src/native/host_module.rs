//! Host-module instances allocated behind the plugin ABI.

use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;
use std::sync::Arc;

use libloading::Library;
use wyrm_kernel::plugin::HostModule;

/// A host-module instance allocated by a plugin.
///
/// The instance lives inside the plugin's memory domain; dropping this
/// value releases it through the plugin's paired deallocator, never through
/// the host allocator. The backing library image is kept mapped by a shared
/// handle, so the instance stays valid even if the originating [`Plugin`]
/// is dropped first; whichever side drops last unmaps the image.
///
/// [`Plugin`]: crate::native::Plugin
pub struct NativeHostModule {
    raw: NonNull<c_void>,
    destroy: unsafe extern "C" fn(*mut c_void),
    _library: Arc<Library>,
}

impl NativeHostModule {
    pub(crate) fn new(
        raw: NonNull<c_void>,
        destroy: unsafe extern "C" fn(*mut c_void),
        library: Arc<Library>,
    ) -> Self {
        Self {
            raw,
            destroy,
            _library: library,
        }
    }
}

// SAFETY: the instance is exclusively owned, the ABI requires instances
// from repeated allocations to share no state, and the code the pointers
// reference stays mapped via the library handle. Destruction on another
// thread may race with the originating Plugin being dropped; the atomic
// refcount on the library handle makes that safe.
unsafe impl Send for NativeHostModule {}

impl HostModule for NativeHostModule {
    fn as_ptr(&self) -> *mut c_void {
        self.raw.as_ptr()
    }
}

impl Drop for NativeHostModule {
    fn drop(&mut self) {
        // SAFETY: `raw` came from the plugin's allocator and is released
        // exactly once, through the matching deallocator from the same
        // binary; the image is still mapped because `_library` is alive.
        unsafe { (self.destroy)(self.raw.as_ptr()) }
    }
}

impl fmt::Debug for NativeHostModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeHostModule")
            .field("raw", &self.raw)
            .finish_non_exhaustive()
    }
}
