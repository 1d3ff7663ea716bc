//! Foreign-function callbacks - native code calling managed functions
//!
//! Architecture:
//! - `native.rs` - native types, calling conventions and signatures
//! - `preconditions.rs` - input guard (canonical signature, value domain)
//! - `placement.rs` - keeps exceptional returns out of new space
//! - `callback.rs` - trampoline synthesis
//! - `registry.rs` - per-group interning of trampolines

pub mod native;
pub mod preconditions;
pub mod placement;
mod callback;
pub mod registry;

pub use native::{CallingConvention, NativeFunctionType, NativeSignature, NativeType};
pub use callback::{native_callback_function, FFI_CALLBACK_PREFIX};
pub use registry::{CallbackKey, CallbackRegistry, ExceptionalReturnKey};

#[cfg(test)]
mod tests;
