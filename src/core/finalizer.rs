//! Type finalization
//!
//! A function type is finalized once its shape is validated; finalizing also
//! canonicalizes it, so finalized types can be compared by identity.

use crate::core::intern::TypeTable;
use crate::core::types::{CanonicalType, FunctionType, Type};
use crate::errors::{fatal, ContractViolation};
use std::collections::HashSet;

pub struct ClassFinalizer;

impl ClassFinalizer {
    /// Finalize and canonicalize a function type
    pub fn finalize_type(types: &TypeTable, signature: FunctionType) -> CanonicalType {
        Self::check_type_parameters(&signature);
        for parameter in &signature.parameters {
            if let Type::Function(nested) = parameter {
                Self::check_type_parameters(nested);
            }
        }

        types.canonicalize(Type::Function(Box::new(signature)))
    }

    fn check_type_parameters(signature: &FunctionType) {
        let mut seen = HashSet::with_capacity(signature.type_parameters.len());
        for name in &signature.type_parameters {
            if !seen.insert(name.as_str()) {
                fatal(ContractViolation::TypeParameterClash { name: name.clone() });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_canonicalizes() {
        let types = TypeTable::new();
        let a = ClassFinalizer::finalize_type(&types, FunctionType::new());
        let b = ClassFinalizer::finalize_type(&types, FunctionType::new());

        assert!(a.ptr_eq(&b));
        assert!(types.is_canonical(&a));
        assert_eq!(a.as_function().map(|f| f.num_parameters()), Some(0));
    }

    #[test]
    #[should_panic(expected = "type parameter")]
    fn test_duplicate_type_parameter() {
        let types = TypeTable::new();
        let mut sig = FunctionType::new();
        sig.type_parameters = vec!["T".to_string(), "T".to_string()];
        ClassFinalizer::finalize_type(&types, sig);
    }
}
