//! Exceptional-return placement
//!
//! A trampoline lives as long as its runtime group and is never rescanned, so
//! the value it holds must not live in new space.

use crate::logging::log_exceptional_return_promoted;
use crate::runtime::heap::Heap;
use crate::runtime::objects::Instance;

/// Value safe to attach to a long-lived trampoline
///
/// Small integers need no storage and are attached as is. New-space objects
/// are copied to old space; old-space objects are attached without copying.
pub fn exceptional_return_for_storage(heap: &Heap, value: &Instance) -> Instance {
    match value {
        Instance::Object(obj) if obj.is_new() => {
            log_exceptional_return_promoted(&value.to_string());
            Instance::Object(heap.copy_shallow_to_old_space(obj))
        }
        _ => value.clone(),
    }
}
