//! FFI callback trampolines for a managed runtime
//!
//! Synthesizes the function objects native code uses to call managed
//! functions, and interns them per runtime group so that every registration
//! of the same callback shares one trampoline (and one native entry point).

// Core modules
pub mod core;
pub mod config;
pub mod errors;
pub mod ffi;
pub mod logging;
pub mod runtime;

// Re-export commonly used items
pub use crate::core::{ClassFinalizer, FunctionType, Interned, Symbol, Type, TypeTable};
pub use config::RuntimeConfig;
pub use errors::{ConfigError, ContractViolation};
pub use ffi::{
    native_callback_function, CallbackKey, CallbackRegistry, CallingConvention,
    NativeFunctionType, NativeSignature, NativeType,
};
pub use runtime::{Function, Heap, Instance, ObjectData, RuntimeGroup, Space};

/// Create a runtime group from discovered configuration, with logging set up
pub fn init() -> RuntimeGroup {
    let config = RuntimeConfig::from_env();
    logging::init_with_config(config.log_config());
    RuntimeGroup::new(config)
}
