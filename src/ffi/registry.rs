//! Interning registry for FFI callback trampolines
//!
//! One per runtime group. Structurally equal trampolines (same native
//! signature, target, exceptional return and name) resolve to a single
//! instance, so the code generator emits one native entry point for all of
//! them. Entries are never removed.
//!
//! Lazy creation, insertion and growth all happen under one mutex.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::RegistryConfig;
use crate::core::Symbol;
use crate::errors::{fatal, ContractViolation};
use crate::ffi::native::NativeFunctionType;
use crate::logging::{log_registry_created, log_registry_hit, log_registry_insert};
use crate::runtime::function::Function;
use crate::runtime::objects::{Instance, ObjectData};

/// Exceptional return compared by kind and value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionalReturnKey {
    Null,
    Bool(bool),
    Int(i64),
    /// Bit pattern, so NaNs and signed zeros stay distinct
    Double(u64),
    /// Out-of-domain values compare by identity
    Object(usize),
}

impl ExceptionalReturnKey {
    pub fn of(value: &Instance) -> Self {
        match value {
            Instance::Smi(v) => Self::Int(*v),
            Instance::Object(obj) => match obj.data() {
                ObjectData::Null => Self::Null,
                ObjectData::Bool(b) => Self::Bool(*b),
                ObjectData::Mint(v) => Self::Int(*v),
                ObjectData::Double(d) => Self::Double(d.to_bits()),
                ObjectData::Pointer(_) | ObjectData::String(_) => {
                    Self::Object(&**obj as *const _ as usize)
                }
            },
        }
    }
}

/// Structural identity of a trampoline
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallbackKey {
    c_signature: NativeFunctionType,
    target: usize,
    exceptional_return: ExceptionalReturnKey,
    name: Symbol,
}

impl CallbackKey {
    pub fn new(
        c_signature: &NativeFunctionType,
        target: &Arc<Function>,
        exceptional_return: &Instance,
        name: &Symbol,
    ) -> Self {
        Self {
            c_signature: c_signature.clone(),
            target: Arc::as_ptr(target) as usize,
            exceptional_return: ExceptionalReturnKey::of(exceptional_return),
            name: name.clone(),
        }
    }

    /// Key of a trampoline (None for ordinary functions)
    pub fn of(function: &Function) -> Option<Self> {
        let data = function.ffi_callback_data()?;
        Some(Self::new(
            &data.c_signature,
            &data.target,
            &data.exceptional_return,
            function.name(),
        ))
    }
}

type CallbackSet = HashMap<CallbackKey, Arc<Function>>;

pub struct CallbackRegistry {
    initial_capacity: usize,
    set: Mutex<Option<CallbackSet>>,
}

impl CallbackRegistry {
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            initial_capacity: config.initial_capacity,
            set: Mutex::new(None),
        }
    }

    /// Return the registered trampoline equal to `function`, inserting it if none
    pub fn insert_or_get(&self, function: Arc<Function>) -> Arc<Function> {
        let key = match CallbackKey::of(&function) {
            Some(key) => key,
            None => fatal(ContractViolation::NotACallbackTrampoline {
                name: function.name().to_string(),
            }),
        };
        debug_assert!(
            !function.ffi_callback_exceptional_return().map_or(false, Instance::is_new),
            "exceptional return of '{}' is still in new space",
            function.name()
        );

        let mut guard = self.set.lock();
        let set = guard.get_or_insert_with(|| {
            log_registry_created(self.initial_capacity);
            HashMap::with_capacity(self.initial_capacity)
        });

        if let Some(existing) = set.get(&key) {
            log_registry_hit(existing.name(), set.len());
            return Arc::clone(existing);
        }

        set.insert(key, Arc::clone(&function));
        log_registry_insert(function.name(), set.len());
        function
    }

    /// Registered trampoline for `key`, without inserting
    pub fn lookup(&self, key: &CallbackKey) -> Option<Arc<Function>> {
        self.set.lock().as_ref()?.get(key).cloned()
    }

    pub fn contains(&self, function: &Arc<Function>) -> bool {
        CallbackKey::of(function)
            .and_then(|key| self.lookup(&key))
            .map_or(false, |registered| Arc::ptr_eq(&registered, function))
    }

    pub fn len(&self) -> usize {
        self.set.lock().as_ref().map_or(0, |set| set.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the backing set has been allocated
    pub fn is_initialized(&self) -> bool {
        self.set.lock().is_some()
    }

    /// Slots available before the next growth (0 before first use)
    pub fn capacity(&self) -> usize {
        self.set.lock().as_ref().map_or(0, |set| set.capacity())
    }

    /// All registered trampolines, in no particular order
    pub fn snapshot(&self) -> Vec<Arc<Function>> {
        self.set
            .lock()
            .as_ref()
            .map(|set| set.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new(&RegistryConfig::default())
    }
}
