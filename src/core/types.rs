use std::fmt;

use crate::core::intern::Interned;

/// Canonical handle to a managed type
pub type CanonicalType = Interned<Type>;

/// Managed-language types as seen by function signatures
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Dynamic,
    Void,
    Null,
    Bool,
    Int,
    Double,
    Num,
    String,
    Object,

    // Function types: <type params>(params) -> result
    Function(Box<FunctionType>),
}

impl Type {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Type::Dynamic)
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            Type::Function(sig) => Some(sig),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Dynamic => write!(f, "dynamic"),
            Type::Void => write!(f, "void"),
            Type::Null => write!(f, "Null"),
            Type::Bool => write!(f, "bool"),
            Type::Int => write!(f, "int"),
            Type::Double => write!(f, "double"),
            Type::Num => write!(f, "num"),
            Type::String => write!(f, "String"),
            Type::Object => write!(f, "Object"),
            Type::Function(sig) => write!(f, "{}", sig),
        }
    }
}

/// Signature of a managed function
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub type_parameters: Vec<String>,
    pub parameters: Vec<Type>,
    pub result: Type,
}

impl FunctionType {
    /// Empty signature: no type parameters, no parameters, dynamic result
    pub fn new() -> Self {
        Self {
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            result: Type::Dynamic,
        }
    }

    pub fn with_parameters(parameters: Vec<Type>, result: Type) -> Self {
        Self {
            type_parameters: Vec::new(),
            parameters,
            result,
        }
    }

    pub fn set_result_type(&mut self, result: Type) {
        self.result = result;
    }

    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }

    pub fn num_type_parameters(&self) -> usize {
        self.type_parameters.len()
    }
}

impl Default for FunctionType {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Function", self.result)?;
        if !self.type_parameters.is_empty() {
            write!(f, "<{}>", self.type_parameters.join(", "))?;
        }
        let params: Vec<_> = self.parameters.iter().map(|p| p.to_string()).collect();
        write!(f, "({})", params.join(", "))
    }
}
