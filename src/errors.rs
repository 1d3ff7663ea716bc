//! Error types
//!
//! Trampoline synthesis and registration have no recoverable failures: a
//! caller handing in non-canonical or out-of-domain inputs has a bug, and the
//! process stops at the first breach. Only configuration loading reports
//! errors to the caller.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::logging::log_contract_violation;

/// Fatal breach of a caller contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    NonCanonicalSignature { signature: String },
    NonCanonicalExceptionalReturn { value: String },
    ExceptionalReturnOutOfDomain { value: String },
    TypeParameterClash { name: String },
    NotACallbackTrampoline { name: String },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonCanonicalSignature { signature } => {
                write!(f, "native signature is not canonical: {}", signature)
            }
            Self::NonCanonicalExceptionalReturn { value } => {
                write!(
                    f,
                    "exceptional return is neither a small integer nor a canonical constant: {}",
                    value
                )
            }
            Self::ExceptionalReturnOutOfDomain { value } => {
                write!(f, "exceptional return must be null, a number or a bool, found {}", value)
            }
            Self::TypeParameterClash { name } => {
                write!(f, "duplicate type parameter '{}'", name)
            }
            Self::NotACallbackTrampoline { name } => {
                write!(f, "'{}' is not an FFI callback trampoline", name)
            }
        }
    }
}

/// Report a contract violation and stop
///
/// Panics (aborting under the release profile). Nothing has been allocated or
/// registered when this is reached from the callback path.
#[cold]
#[track_caller]
pub fn fatal(violation: ContractViolation) -> ! {
    let message = violation.to_string();
    log_contract_violation(&message);
    panic!("contract violation: {}", message)
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Failed to read config {}: {}", path.display(), source)
            }
            Self::Parse { message } => write!(f, "Failed to parse config: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(error: toml::de::Error) -> Self {
        Self::Parse { message: error.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_messages() {
        let v = ContractViolation::ExceptionalReturnOutOfDomain {
            value: "Pointer(0x10)".to_string(),
        };
        assert_eq!(
            v.to_string(),
            "exceptional return must be null, a number or a bool, found Pointer(0x10)"
        );
    }

    #[test]
    #[should_panic(expected = "contract violation: native signature is not canonical")]
    fn test_fatal_panics() {
        fatal(ContractViolation::NonCanonicalSignature { signature: "int32 (int32)".to_string() });
    }

    #[test]
    fn test_config_error_source() {
        use std::error::Error;

        let err = ConfigError::Io {
            path: PathBuf::from("missing.toml"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Failed to read config missing.toml"));
    }
}
