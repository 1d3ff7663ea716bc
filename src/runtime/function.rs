//! Function, class and library entities
//!
//! A callable is either an ordinary managed function, which carries its
//! parameter names alongside its signature, or a foreign-callback trampoline,
//! which carries the native signature, the managed target and the value
//! returned to native code when the target throws. Trampolines have no
//! managed parameters at all.

use std::fmt;
use std::sync::Arc;

use crate::core::{CanonicalType, Symbol};
use crate::ffi::native::NativeFunctionType;
use crate::runtime::objects::Instance;

/// Source position of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenPosition {
    NoSource,
    Offset(u32),
}

/// Declaration modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub is_static: bool,
    pub is_const: bool,
    pub is_abstract: bool,
    pub is_external: bool,
    pub is_native: bool,
}

impl Modifiers {
    /// Top-level function: static, nothing else
    pub const fn top_level() -> Self {
        Self {
            is_static: true,
            is_const: false,
            is_abstract: false,
            is_external: false,
            is_native: false,
        }
    }
}

/// Everything the code generator needs to emit a native entry stub
#[derive(Debug, Clone)]
pub struct FfiCallbackData {
    pub c_signature: NativeFunctionType,
    pub target: Arc<Function>,
    pub exceptional_return: Instance,
}

#[derive(Debug, Clone)]
pub enum FunctionKind {
    Regular { parameter_names: Vec<Symbol> },
    FfiTrampoline(FfiCallbackData),
}

/// Calling-kind marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKindTag {
    Regular,
    FfiTrampoline,
}

#[derive(Debug)]
pub struct Function {
    name: Symbol,
    owner: Arc<Class>,
    kind: FunctionKind,
    modifiers: Modifiers,
    is_debuggable: bool,
    token_pos: TokenPosition,
    signature: CanonicalType,
}

impl Function {
    pub fn new(
        signature: CanonicalType,
        name: Symbol,
        kind: FunctionKind,
        modifiers: Modifiers,
        owner: Arc<Class>,
        token_pos: TokenPosition,
    ) -> Self {
        Self {
            name,
            owner,
            kind,
            modifiers,
            is_debuggable: true,
            token_pos,
            signature,
        }
    }

    pub fn set_is_debuggable(&mut self, value: bool) {
        self.is_debuggable = value;
    }

    pub fn name(&self) -> &Symbol {
        &self.name
    }

    pub fn owner(&self) -> &Arc<Class> {
        &self.owner
    }

    pub fn kind(&self) -> &FunctionKind {
        &self.kind
    }

    pub fn kind_tag(&self) -> FunctionKindTag {
        match self.kind {
            FunctionKind::Regular { .. } => FunctionKindTag::Regular,
            FunctionKind::FfiTrampoline(_) => FunctionKindTag::FfiTrampoline,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.is_static
    }

    pub fn is_debuggable(&self) -> bool {
        self.is_debuggable
    }

    pub fn token_pos(&self) -> TokenPosition {
        self.token_pos
    }

    /// Canonical managed-facing signature
    pub fn signature(&self) -> &CanonicalType {
        &self.signature
    }

    pub fn parameter_names(&self) -> &[Symbol] {
        match &self.kind {
            FunctionKind::Regular { parameter_names } => parameter_names.as_slice(),
            FunctionKind::FfiTrampoline(_) => &[],
        }
    }

    pub fn is_ffi_callback_trampoline(&self) -> bool {
        matches!(self.kind, FunctionKind::FfiTrampoline(_))
    }

    pub fn ffi_callback_data(&self) -> Option<&FfiCallbackData> {
        match &self.kind {
            FunctionKind::FfiTrampoline(data) => Some(data),
            FunctionKind::Regular { .. } => None,
        }
    }

    pub fn ffi_c_signature(&self) -> Option<&NativeFunctionType> {
        self.ffi_callback_data().map(|data| &data.c_signature)
    }

    pub fn ffi_callback_target(&self) -> Option<&Arc<Function>> {
        self.ffi_callback_data().map(|data| &data.target)
    }

    pub fn ffi_callback_exceptional_return(&self) -> Option<&Instance> {
        self.ffi_callback_data().map(|data| &data.exceptional_return)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner.name(), self.name)
    }
}

#[derive(Debug)]
pub struct Class {
    name: Symbol,
    library_url: Symbol,
}

impl Class {
    pub fn new(name: Symbol, library_url: Symbol) -> Self {
        Self { name, library_url }
    }

    pub fn name(&self) -> &Symbol {
        &self.name
    }

    pub fn library_url(&self) -> &Symbol {
        &self.library_url
    }
}

/// Library with a single top-level class holding its top-level members
#[derive(Debug)]
pub struct Library {
    url: Symbol,
    toplevel_class: Arc<Class>,
}

/// Name of every library's top-level class
pub const TOPLEVEL_CLASS_NAME: &str = "::";

impl Library {
    pub fn new(url: Symbol, toplevel_name: Symbol) -> Self {
        let toplevel_class = Arc::new(Class::new(toplevel_name, url.clone()));
        Self { url, toplevel_class }
    }

    pub fn url(&self) -> &Symbol {
        &self.url
    }

    pub fn toplevel_class(&self) -> &Arc<Class> {
        &self.toplevel_class
    }
}
