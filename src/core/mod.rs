//! Core type system components
//!
//! Managed type definitions plus the canonicalization tables and the
//! finalizer shared by the whole runtime group.

pub mod types;
pub mod intern;
pub mod finalizer;

pub use types::{Type, FunctionType, CanonicalType};
pub use intern::{Interned, CanonicalTable, TypeTable, Symbol, SymbolTable};
pub use finalizer::ClassFinalizer;
