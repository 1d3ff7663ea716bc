//! Native signature descriptions
//!
//! Types and calling conventions of functions on the native side of the
//! boundary. Signatures reach the callback machinery already canonical.

use std::fmt;

use smallvec::SmallVec;

use crate::core::intern::Interned;

/// Canonical (or detached) handle to a native signature
pub type NativeFunctionType = Interned<NativeSignature>;

/// Native value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    Void,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Pointer,
    /// Aggregate passed or returned by pointer
    StructPointer { size: u32, align: u32 },
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => write!(f, "void"),
            Self::Bool => write!(f, "bool"),
            Self::I8 => write!(f, "int8_t"),
            Self::I16 => write!(f, "int16_t"),
            Self::I32 => write!(f, "int32_t"),
            Self::I64 => write!(f, "int64_t"),
            Self::U8 => write!(f, "uint8_t"),
            Self::U16 => write!(f, "uint16_t"),
            Self::U32 => write!(f, "uint32_t"),
            Self::U64 => write!(f, "uint64_t"),
            Self::F32 => write!(f, "float"),
            Self::F64 => write!(f, "double"),
            Self::Pointer => write!(f, "void*"),
            Self::StructPointer { size, .. } => write!(f, "struct[{}]*", size),
        }
    }
}

/// Calling convention tag; part of a signature's identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CallingConvention {
    /// C calling convention (platform default)
    C,
    /// System V AMD64 ABI (Unix x86-64)
    SysV,
    /// Microsoft x64 calling convention (Windows)
    Win64,
    /// ARM AAPCS (ARM 32-bit)
    Aapcs,
    /// ARM64 calling convention
    Aarch64,
}

impl Default for CallingConvention {
    #[inline]
    fn default() -> Self {
        Self::C
    }
}

/// Parameter and return types of a native function
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NativeSignature {
    params: SmallVec<[NativeType; 4]>,
    result: NativeType,
    convention: CallingConvention,
}

impl NativeSignature {
    pub fn new(
        params: impl IntoIterator<Item = NativeType>,
        result: NativeType,
        convention: CallingConvention,
    ) -> Self {
        Self {
            params: params.into_iter().collect(),
            result,
            convention,
        }
    }

    pub fn params(&self) -> &[NativeType] {
        &self.params
    }

    pub fn result(&self) -> NativeType {
        self.result
    }

    pub fn convention(&self) -> CallingConvention {
        self.convention
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for NativeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<_> = self.params.iter().map(|p| p.to_string()).collect();
        write!(f, "{} ({})", self.result, params.join(", "))
    }
}
