use ffi_callbacks::{
    native_callback_function, CallingConvention, Instance, NativeType, RuntimeGroup, Space, Type,
};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

fn native_type() -> impl Strategy<Value = NativeType> {
    prop_oneof![
        Just(NativeType::Bool),
        Just(NativeType::I8),
        Just(NativeType::I32),
        Just(NativeType::U64),
        Just(NativeType::F32),
        Just(NativeType::F64),
        Just(NativeType::Pointer),
    ]
}

#[derive(Debug, Clone)]
enum ReturnValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
}

fn return_value() -> impl Strategy<Value = ReturnValue> {
    prop_oneof![
        Just(ReturnValue::Null),
        any::<bool>().prop_map(ReturnValue::Bool),
        any::<i64>().prop_map(ReturnValue::Int),
        (-1.0e6f64..1.0e6).prop_map(ReturnValue::Double),
    ]
}

fn materialize(group: &RuntimeGroup, value: &ReturnValue, space: Space) -> Instance {
    let heap = group.heap();
    match value {
        ReturnValue::Null => heap.null(),
        ReturnValue::Bool(b) => heap.boolean(*b),
        ReturnValue::Int(v) => heap.integer(*v, space),
        ReturnValue::Double(v) => heap.double(*v, space),
    }
}

proptest! {
    #[test]
    fn registration_is_idempotent(
        requests in prop::collection::vec(
            (prop::collection::vec(native_type(), 0..6), 0usize..3, return_value(), any::<bool>()),
            1..24,
        )
    ) {
        let group = RuntimeGroup::with_defaults();
        let lib = group.new_library("package:prop/prop");
        let targets: Vec<_> = ["f", "g", "h"]
            .iter()
            .map(|name| group.define_function(&lib, name, &[], Type::Void))
            .collect();

        let mut distinct = HashSet::new();
        for (params, target, value, young) in &requests {
            let sig = group.native_signature(
                params.iter().copied(),
                NativeType::Void,
                CallingConvention::C,
            );
            let space = if *young { Space::New } else { Space::Old };
            let target = &targets[*target];

            let first_value = materialize(&group, value, space);
            let first = native_callback_function(&group, &sig, target, &first_value, true);
            let second_value = materialize(&group, value, space);
            let second = native_callback_function(&group, &sig, target, &second_value, true);

            prop_assert!(Arc::ptr_eq(&first, &second));
            prop_assert_eq!(first.signature().as_function().map(|f| f.num_parameters()), Some(0));
            prop_assert!(!first.ffi_callback_exceptional_return().map_or(false, |v| v.is_new()));

            distinct.insert(Arc::as_ptr(&first) as usize);
        }

        prop_assert_eq!(group.object_store().ffi_callback_functions().len(), distinct.len());
    }
}
