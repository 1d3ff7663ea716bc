//! Per-group store of runtime-wide objects

use std::sync::Arc;

use crate::ffi::registry::CallbackRegistry;
use crate::runtime::function::Library;

pub struct ObjectStore {
    ffi_library: Arc<Library>,
    ffi_callback_functions: CallbackRegistry,
}

impl ObjectStore {
    pub fn new(ffi_library: Arc<Library>, ffi_callback_functions: CallbackRegistry) -> Self {
        Self {
            ffi_library,
            ffi_callback_functions,
        }
    }

    /// Placeholder library owning all FFI trampolines
    pub fn ffi_library(&self) -> &Arc<Library> {
        &self.ffi_library
    }

    pub fn ffi_callback_functions(&self) -> &CallbackRegistry {
        &self.ffi_callback_functions
    }
}
