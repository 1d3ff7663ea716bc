//! Runtime group - state shared by every execution context of one program
//!
//! Design: One `RuntimeGroup` owns the canonicalization tables, the heap and
//! the object store (including the FFI callback registry). It is `Send + Sync`
//! and shared through `Arc`; nothing here is a process global.

pub mod heap;
pub mod objects;
pub mod function;
pub mod object_store;

pub use heap::{Heap, HeapObject, HeapStats, ObjRef, Space};
pub use objects::{Instance, ObjectData, SMI_MAX, SMI_MIN};
pub use function::{
    Class, FfiCallbackData, Function, FunctionKind, FunctionKindTag, Library, Modifiers,
    TokenPosition, TOPLEVEL_CLASS_NAME,
};
pub use object_store::ObjectStore;

use std::sync::Arc;

use crate::config::RuntimeConfig;
use crate::core::{ClassFinalizer, FunctionType, SymbolTable, Type, TypeTable};
use crate::ffi::native::{CallingConvention, NativeFunctionType, NativeSignature, NativeType};
use crate::ffi::registry::CallbackRegistry;
use crate::logging::log_runtime_group_created;

/// Url of the placeholder library that owns FFI trampolines
pub const FFI_LIBRARY_URL: &str = "ffi";

pub struct RuntimeGroup {
    config: RuntimeConfig,
    types: TypeTable,
    symbols: SymbolTable,
    heap: Heap,
    object_store: ObjectStore,
}

impl RuntimeGroup {
    pub fn new(config: RuntimeConfig) -> Self {
        let types = TypeTable::new();
        let symbols = SymbolTable::new();
        let heap = Heap::new(&config.heap);

        let ffi_library = Arc::new(Library::new(
            symbols.intern(FFI_LIBRARY_URL),
            symbols.intern(TOPLEVEL_CLASS_NAME),
        ));
        let object_store = ObjectStore::new(ffi_library, CallbackRegistry::new(&config.registry));

        log_runtime_group_created(config.registry.initial_capacity, config.heap.nursery_size);

        Self {
            config,
            types,
            symbols,
            heap,
            object_store,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RuntimeConfig::default())
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn object_store(&self) -> &ObjectStore {
        &self.object_store
    }

    /// Create a library with its top-level class
    pub fn new_library(&self, url: &str) -> Arc<Library> {
        Arc::new(Library::new(
            self.symbols.intern(url),
            self.symbols.intern(TOPLEVEL_CLASS_NAME),
        ))
    }

    /// Define an ordinary top-level function in `library`
    pub fn define_function(
        &self,
        library: &Library,
        name: &str,
        params: &[(&str, Type)],
        result: Type,
    ) -> Arc<Function> {
        let parameter_names = params.iter().map(|(n, _)| self.symbols.intern(n)).collect();
        let parameter_types = params.iter().map(|(_, ty)| ty.clone()).collect();
        let signature = ClassFinalizer::finalize_type(
            &self.types,
            FunctionType::with_parameters(parameter_types, result),
        );

        Arc::new(Function::new(
            signature,
            self.symbols.intern(name),
            FunctionKind::Regular { parameter_names },
            Modifiers::top_level(),
            Arc::clone(library.toplevel_class()),
            TokenPosition::Offset(0),
        ))
    }

    /// Canonical native signature
    pub fn native_signature(
        &self,
        params: impl IntoIterator<Item = NativeType>,
        result: NativeType,
        convention: CallingConvention,
    ) -> NativeFunctionType {
        self.types
            .canonicalize_native(NativeSignature::new(params, result, convention))
    }
}

impl Default for RuntimeGroup {
    fn default() -> Self {
        Self::with_defaults()
    }
}
