//! Object system - values handed across the managed/native seam
//!
//! Design: Tagged values in the usual VM split:
//! - Small ints inline (62-bit signed), no heap storage
//! - Heap objects for everything else (mints, doubles, bools, null, ...)
//! - `null`, `true` and `false` are old-space singletons owned by the heap

use std::fmt;

use crate::runtime::heap::ObjRef;

/// Width of the small-integer payload
pub const SMI_BITS: u32 = 62;
pub const SMI_MIN: i64 = -(1i64 << (SMI_BITS - 1));
pub const SMI_MAX: i64 = (1i64 << (SMI_BITS - 1)) - 1;

/// Payload of a heap object
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectData {
    Null,
    Bool(bool),
    /// Integer outside the small-integer range
    Mint(i64),
    Double(f64),
    /// Foreign address
    Pointer(usize),
    String(Box<str>),
}

impl ObjectData {
    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Mint(_) | Self::Double(_))
    }

    /// Extra bytes stored out of line
    pub(crate) fn payload_size(&self) -> usize {
        match self {
            Self::String(s) => s.len(),
            _ => 0,
        }
    }
}

impl fmt::Display for ObjectData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Mint(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{:?}", v),
            Self::Pointer(addr) => write!(f, "Pointer({:#x})", addr),
            Self::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// Universal managed value reference
#[derive(Debug, Clone)]
pub enum Instance {
    /// Immediate small integer
    Smi(i64),
    Object(ObjRef),
}

impl Instance {
    /// Create small integer (None if out of range)
    #[inline]
    pub fn smi(value: i64) -> Option<Self> {
        Self::fits_smi(value).then_some(Self::Smi(value))
    }

    #[inline]
    pub const fn fits_smi(value: i64) -> bool {
        value >= SMI_MIN && value <= SMI_MAX
    }

    #[inline]
    pub fn is_smi(&self) -> bool {
        matches!(self, Self::Smi(_))
    }

    /// Heap object behind this value, if any
    #[inline]
    pub fn as_object(&self) -> Option<&ObjRef> {
        match self {
            Self::Smi(_) => None,
            Self::Object(obj) => Some(obj),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.as_object().map(|o| o.data()), Some(ObjectData::Null))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.as_object().map(|o| o.data()), Some(ObjectData::Bool(_)))
    }

    pub fn is_number(&self) -> bool {
        match self {
            Self::Smi(_) => true,
            Self::Object(obj) => obj.data().is_number(),
        }
    }

    /// Small integers are canonical by construction
    pub fn is_canonical(&self) -> bool {
        match self {
            Self::Smi(_) => true,
            Self::Object(obj) => obj.is_canonical(),
        }
    }

    /// True only for heap objects currently in new space
    pub fn is_new(&self) -> bool {
        self.as_object().map_or(false, |obj| obj.is_new())
    }

    /// Identity comparison (small integers compare by value)
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Smi(a), Self::Smi(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Smi(v) => write!(f, "{}", v),
            Self::Object(obj) => write!(f, "{}", obj.data()),
        }
    }
}
