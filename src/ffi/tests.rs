//! Test suite for callback synthesis and registration

use super::*;
use crate::core::Type;
use crate::core::{ClassFinalizer, FunctionType};
use crate::runtime::{
    FfiCallbackData, Function, FunctionKind, FunctionKindTag, Instance, Modifiers, ObjectData,
    RuntimeGroup, Space, TokenPosition,
};
use std::sync::Arc;

// Test helpers
fn int32_unary(group: &RuntimeGroup) -> NativeFunctionType {
    group.native_signature([NativeType::I32], NativeType::I32, CallingConvention::C)
}

fn define_add(group: &RuntimeGroup) -> Arc<Function> {
    let lib = group.new_library("package:test/add");
    group.define_function(&lib, "add", &[("a", Type::Int)], Type::Int)
}

#[test]
fn test_trampoline_shape() {
    let group = RuntimeGroup::with_defaults();
    let sig = int32_unary(&group);
    let add = define_add(&group);

    let tramp = native_callback_function(&group, &sig, &add, &group.heap().null(), false);

    assert_eq!(tramp.name().as_str(), "_FfiCallbackadd");
    assert_eq!(tramp.kind_tag(), FunctionKindTag::FfiTrampoline);
    assert!(tramp.is_static());
    let modifiers = tramp.modifiers();
    assert!(!modifiers.is_const && !modifiers.is_abstract);
    assert!(!modifiers.is_external && !modifiers.is_native);
    assert!(!tramp.is_debuggable());
    assert_eq!(tramp.token_pos(), TokenPosition::NoSource);
    assert!(tramp.parameter_names().is_empty());

    let owner = tramp.owner();
    assert!(Arc::ptr_eq(owner, group.object_store().ffi_library().toplevel_class()));

    assert!(tramp.ffi_c_signature().unwrap().ptr_eq(&sig));
    assert!(Arc::ptr_eq(tramp.ffi_callback_target().unwrap(), &add));
    assert!(tramp.ffi_callback_exceptional_return().unwrap().is_null());
}

#[test]
fn test_degenerate_signature_for_any_arity() {
    let group = RuntimeGroup::with_defaults();
    let add = define_add(&group);
    let wide = group.native_signature(
        std::iter::repeat(NativeType::F64).take(12),
        NativeType::Void,
        CallingConvention::SysV,
    );

    let tramp = native_callback_function(&group, &wide, &add, &group.heap().null(), true);
    let sig = tramp.signature().as_function().unwrap();

    assert_eq!(sig.num_parameters(), 0);
    assert_eq!(sig.num_type_parameters(), 0);
    assert_eq!(sig.result, Type::Dynamic);
    assert!(group.types().is_canonical(tramp.signature()));
}

#[test]
fn test_registered_twice_is_identical() {
    let group = RuntimeGroup::with_defaults();
    let sig = int32_unary(&group);
    let add = define_add(&group);
    let registry = group.object_store().ffi_callback_functions();

    let first = native_callback_function(&group, &sig, &add, &group.heap().null(), true);
    let second = native_callback_function(&group, &sig, &add, &group.heap().null(), true);

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
    assert!(registry.contains(&first));
}

#[test]
fn test_registry_created_lazily() {
    let group = RuntimeGroup::with_defaults();
    let registry = group.object_store().ffi_callback_functions();
    assert!(!registry.is_initialized());
    assert_eq!(registry.capacity(), 0);

    let sig = int32_unary(&group);
    let add = define_add(&group);
    native_callback_function(&group, &sig, &add, &Instance::Smi(0), true);

    assert!(registry.is_initialized());
    assert!(registry.capacity() >= 4);
}

#[test]
fn test_exceptional_return_values_distinguish_entries() {
    let group = RuntimeGroup::with_defaults();
    let heap = group.heap();
    let sig = int32_unary(&group);
    let add = define_add(&group);

    let values = [
        heap.null(),
        heap.boolean(true),
        heap.boolean(false),
        Instance::Smi(0),
        Instance::Smi(1),
        heap.double(0.0, Space::Old),
        heap.double(-0.0, Space::Old),
    ];
    for value in &values {
        native_callback_function(&group, &sig, &add, value, true);
    }

    assert_eq!(group.object_store().ffi_callback_functions().len(), values.len());
}

#[test]
fn test_young_mint_deduplicates_by_value() {
    let group = RuntimeGroup::with_defaults();
    let heap = group.heap();
    let sig = int32_unary(&group);
    let add = define_add(&group);

    let a = heap.integer(i64::MAX, Space::New);
    let b = heap.integer(i64::MAX, Space::New);
    assert!(!a.ptr_eq(&b));

    let first = native_callback_function(&group, &sig, &add, &a, true);
    let second = native_callback_function(&group, &sig, &add, &b, true);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_lookup_without_insert() {
    let group = RuntimeGroup::with_defaults();
    let sig = int32_unary(&group);
    let add = define_add(&group);
    let registry = group.object_store().ffi_callback_functions();

    let unregistered = native_callback_function(&group, &sig, &add, &Instance::Smi(9), false);
    let key = CallbackKey::of(&unregistered).unwrap();
    assert!(registry.lookup(&key).is_none());

    let registered = native_callback_function(&group, &sig, &add, &Instance::Smi(9), true);
    let found = registry.lookup(&key).unwrap();
    assert!(Arc::ptr_eq(&found, &registered));
    assert!(!registry.contains(&unregistered));
}

#[test]
fn test_snapshot_lists_entries() {
    let group = RuntimeGroup::with_defaults();
    let sig = int32_unary(&group);
    let add = define_add(&group);

    native_callback_function(&group, &sig, &add, &Instance::Smi(1), true);
    native_callback_function(&group, &sig, &add, &Instance::Smi(2), true);

    let entries = group.object_store().ffi_callback_functions().snapshot();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|f| f.is_ffi_callback_trampoline()));
}

#[test]
fn test_exceptional_return_key() {
    assert_eq!(ExceptionalReturnKey::of(&Instance::Smi(5)), ExceptionalReturnKey::Int(5));

    let group = RuntimeGroup::with_defaults();
    let heap = group.heap();
    assert_eq!(ExceptionalReturnKey::of(&heap.null()), ExceptionalReturnKey::Null);
    assert_eq!(ExceptionalReturnKey::of(&heap.boolean(true)), ExceptionalReturnKey::Bool(true));
    assert_ne!(
        ExceptionalReturnKey::of(&heap.double(0.0, Space::Old)),
        ExceptionalReturnKey::of(&heap.double(-0.0, Space::Old)),
    );
}

#[test]
#[should_panic(expected = "is not an FFI callback trampoline")]
fn test_registry_rejects_regular_function() {
    let group = RuntimeGroup::with_defaults();
    let add = define_add(&group);
    group.object_store().ffi_callback_functions().insert_or_get(add);
}

#[test]
#[should_panic(expected = "exceptional return must be null, a number or a bool")]
fn test_pointer_exceptional_return_is_fatal() {
    let group = RuntimeGroup::with_defaults();
    let sig = int32_unary(&group);
    let add = define_add(&group);
    let ptr = group.heap().allocate_constant(ObjectData::Pointer(0x40), Space::Old);
    let ptr = Instance::Object(ptr);

    native_callback_function(&group, &sig, &add, &ptr, true);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "is still in new space")]
fn test_registry_rejects_young_exceptional_return() {
    let group = RuntimeGroup::with_defaults();
    let sig = int32_unary(&group);
    let add = define_add(&group);
    let young = group.heap().double(1.5, Space::New);
    assert!(young.is_new());

    // Built by hand, skipping the placement step
    let data = FfiCallbackData {
        c_signature: sig,
        target: add,
        exceptional_return: young,
    };
    let tramp = Function::new(
        ClassFinalizer::finalize_type(group.types(), FunctionType::new()),
        group.symbols().intern("_FfiCallbackadd"),
        FunctionKind::FfiTrampoline(data),
        Modifiers::top_level(),
        Arc::clone(group.object_store().ffi_library().toplevel_class()),
        TokenPosition::NoSource,
    );
    group.object_store().ffi_callback_functions().insert_or_get(Arc::new(tramp));
}
