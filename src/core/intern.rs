//! Canonicalization tables
//!
//! Maps structurally equal values to one shared handle so that equality of
//! canonical values reduces to pointer comparison. Used for managed function
//! types, native signatures and symbols.

use crate::core::types::Type;
use crate::ffi::native::NativeSignature;
use dashmap::DashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Shared handle to a value, compared and hashed by identity
pub struct Interned<T: ?Sized>(Arc<T>);

impl<T> Interned<T> {
    /// Build a handle that no table owns
    ///
    /// Such a handle is never canonical, even when a structurally equal
    /// value has been canonicalized.
    pub fn new_detached(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl<T: ?Sized> Interned<T> {
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address used as the identity of this handle
    #[inline]
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const u8 as usize
    }
}

impl<T: ?Sized> Clone for Interned<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> Deref for Interned<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized> PartialEq for Interned<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: ?Sized> Eq for Interned<T> {}

impl<T: ?Sized> Hash for Interned<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Interned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl<T: ?Sized + fmt::Display> fmt::Display for Interned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

/// Thread-safe structural value → canonical handle table
pub struct CanonicalTable<T: Eq + Hash> {
    entries: DashMap<T, Interned<T>>,
}

impl<T: Eq + Hash + Clone> CanonicalTable<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(capacity),
        }
    }

    /// Return the canonical handle for `value`, creating it on first use
    pub fn canonicalize(&self, value: T) -> Interned<T> {
        // Fast path: already canonical
        if let Some(handle) = self.entries.get(&value) {
            return handle.clone();
        }

        // Slow path: the entry lock makes concurrent inserts agree on one handle
        self.entries
            .entry(value.clone())
            .or_insert_with(|| Interned::new_detached(value))
            .clone()
    }

    /// Check whether `handle` is the handle this table owns for its value
    pub fn is_canonical(&self, handle: &Interned<T>) -> bool {
        self.entries
            .get(&**handle)
            .map_or(false, |canonical| canonical.ptr_eq(handle))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonical managed types and native signatures of one runtime group
pub struct TypeTable {
    types: CanonicalTable<Type>,
    native_signatures: CanonicalTable<NativeSignature>,
}

impl TypeTable {
    pub fn new() -> Self {
        let table = Self {
            types: CanonicalTable::with_capacity(256),
            native_signatures: CanonicalTable::with_capacity(64),
        };

        // Pre-canonicalize the types every function signature refers to
        table.canonicalize(Type::Dynamic);
        table.canonicalize(Type::Void);
        table.canonicalize(Type::Null);
        table.canonicalize(Type::Bool);
        table.canonicalize(Type::Int);
        table.canonicalize(Type::Double);

        table
    }

    pub fn canonicalize(&self, ty: Type) -> Interned<Type> {
        self.types.canonicalize(ty)
    }

    pub fn is_canonical(&self, ty: &Interned<Type>) -> bool {
        self.types.is_canonical(ty)
    }

    pub fn canonicalize_native(&self, signature: NativeSignature) -> Interned<NativeSignature> {
        self.native_signatures.canonicalize(signature)
    }

    pub fn is_canonical_native(&self, signature: &Interned<NativeSignature>) -> bool {
        self.native_signatures.is_canonical(signature)
    }

    /// Number of canonical managed types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn native_len(&self) -> usize {
        self.native_signatures.len()
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Interned name
pub type Symbol = Interned<String>;

/// Symbol interning for function, class and library names
pub struct SymbolTable {
    symbols: CanonicalTable<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            symbols: CanonicalTable::with_capacity(1024),
        }
    }

    pub fn intern(&self, name: &str) -> Symbol {
        self.symbols.canonicalize(name.to_string())
    }

    /// Intern the concatenation `prefix` + `suffix`
    pub fn from_concat(&self, prefix: &str, suffix: &Symbol) -> Symbol {
        let mut name = String::with_capacity(prefix.len() + suffix.len());
        name.push_str(prefix);
        name.push_str(suffix);
        self.symbols.canonicalize(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
