//! Callback trampoline synthesis
//!
//! Builds the function object native code calls into. The code generator
//! later turns it into a native entry stub that invokes the managed target
//! and falls back to the exceptional return when the target throws.

use std::sync::Arc;

use crate::core::{ClassFinalizer, FunctionType, Type};
use crate::ffi::native::NativeFunctionType;
use crate::ffi::{placement, preconditions};
use crate::logging::{log_trampoline_synthesized, perf};
use crate::runtime::function::{FfiCallbackData, Function, FunctionKind, Modifiers, TokenPosition};
use crate::runtime::objects::Instance;
use crate::runtime::RuntimeGroup;

/// Prefix of every trampoline name; the target's name follows
pub const FFI_CALLBACK_PREFIX: &str = "_FfiCallback";

/// Create the trampoline for `target` under `c_signature`
///
/// With `register_function`, the result is the runtime group's canonical
/// trampoline for these inputs (possibly one built by an earlier call).
/// Without it, a fresh unregistered trampoline is returned.
///
/// Stops the process if `c_signature` is not canonical or
/// `exceptional_return` is not a canonical null, number or bool.
pub fn native_callback_function(
    group: &RuntimeGroup,
    c_signature: &NativeFunctionType,
    target: &Arc<Function>,
    exceptional_return: &Instance,
    register_function: bool,
) -> Arc<Function> {
    let _guard = perf::track("native_callback_function");
    preconditions::check(group.types(), c_signature, exceptional_return);

    // Trampolines are never called from managed code, so names may repeat.
    let name = group.symbols().from_concat(FFI_CALLBACK_PREFIX, target.name());
    let owner = Arc::clone(group.object_store().ffi_library().toplevel_class());

    // No parameters keeps scope building from inventing parameter variables
    // for a function only native code enters.
    let mut signature = FunctionType::new();
    signature.set_result_type(Type::Dynamic);
    let signature = ClassFinalizer::finalize_type(group.types(), signature);

    let data = FfiCallbackData {
        c_signature: c_signature.clone(),
        target: Arc::clone(target),
        exceptional_return: placement::exceptional_return_for_storage(
            group.heap(),
            exceptional_return,
        ),
    };

    let mut function = Function::new(
        signature,
        name,
        FunctionKind::FfiTrampoline(data),
        Modifiers::top_level(),
        owner,
        TokenPosition::NoSource,
    );
    function.set_is_debuggable(false);

    log_trampoline_synthesized(function.name(), target.name(), &c_signature.to_string());

    let function = Arc::new(function);
    if register_function {
        group.object_store().ffi_callback_functions().insert_or_get(function)
    } else {
        function
    }
}
