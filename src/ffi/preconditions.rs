//! Input guard for callback synthesis
//!
//! Pure checks, no allocation. A failed check is a caller bug and stops the
//! process before anything is built or registered.

use crate::core::TypeTable;
use crate::errors::{fatal, ContractViolation};
use crate::ffi::native::NativeFunctionType;
use crate::runtime::objects::Instance;

/// Validate callback inputs, returning the first violation found
pub fn validate(
    types: &TypeTable,
    c_signature: &NativeFunctionType,
    exceptional_return: &Instance,
) -> Result<(), ContractViolation> {
    if !types.is_canonical_native(c_signature) {
        return Err(ContractViolation::NonCanonicalSignature {
            signature: c_signature.to_string(),
        });
    }

    // Pointers have no constant representation, so they cannot be returned
    // without running marshaling code.
    let in_domain = exceptional_return.is_null()
        || exceptional_return.is_number()
        || exceptional_return.is_bool();
    if !in_domain {
        return Err(ContractViolation::ExceptionalReturnOutOfDomain {
            value: exceptional_return.to_string(),
        });
    }

    if !exceptional_return.is_canonical() {
        return Err(ContractViolation::NonCanonicalExceptionalReturn {
            value: exceptional_return.to_string(),
        });
    }

    Ok(())
}

/// Validate callback inputs, stopping on violation
pub fn check(types: &TypeTable, c_signature: &NativeFunctionType, exceptional_return: &Instance) {
    if let Err(violation) = validate(types, c_signature, exceptional_return) {
        fatal(violation);
    }
}
