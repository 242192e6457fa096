//! Function (including method and constructor/destructor) declarations
//! (spec.md §3 "Function").

use crate::ids::ExprId;

use super::template::TemplateInfo;

/// One formal parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub name: String,
    pub ty: ExprId,
    pub default: Option<ExprId>,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: ExprId) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
        }
    }
}

/// Boolean attributes on a function, mirroring the flag set the frontend
/// symbol table already tracks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionFlags {
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_const: bool,
    pub is_noexcept: bool,
    pub is_constructor: bool,
    pub is_destructor: bool,
    pub is_operator: bool,
    pub is_deleted: bool,
}

/// A free function, static method, instance method, constructor, or
/// destructor — all represented uniformly, distinguished by `flags`.
///
/// `maxState` is always `Partial` (spec.md §3): a function's one textual
/// form carries its real signature, there is no separate "complete" body
/// form in this model (bodies are not modeled — spec.md §1 Non-goals).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionDecl {
    pub return_type: Option<ExprId>,
    pub params: Vec<Param>,
    pub flags: FunctionFlags,
    pub template: TemplateInfo,
    /// Declarations in the same overload set merge instead of duplicating
    /// (spec.md §4.6 "dedup/merge overloads"); populated by
    /// [`crate::passes::dedup`], never set directly by the frontend.
    pub overload_key: Option<String>,
}
