//! Variable (data member / static/global variable) declarations
//! (spec.md §3 "Variable").

use crate::ids::ExprId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableFlags {
    pub is_static: bool,
    pub is_const: bool,
}

/// `maxState` is always `Partial` — a variable's declared type *is* its
/// complete textual form, same reasoning as [`super::function::FunctionDecl`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableDecl {
    pub ty: ExprId,
    pub flags: VariableFlags,
}
