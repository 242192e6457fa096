//! Class declarations (spec.md §3 "Class").

use crate::ids::{DeclId, ExprId};

use super::template::TemplateInfo;
use super::Visibility;

/// One entry in a class's base-class list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseClass {
    pub ty: ExprId,
    pub visibility: Visibility,
    /// Set by [`crate::passes::virtual_base`] when diamond inheritance
    /// requires `virtual` on this base, never by the frontend.
    pub is_virtual: bool,
}

impl BaseClass {
    pub fn new(ty: ExprId, visibility: Visibility) -> Self {
        Self {
            ty,
            visibility,
            is_virtual: false,
        }
    }
}

/// A class (or struct/union) declaration.
///
/// Classes are the only declaration kind whose `maxState` is `Complete`
/// (spec.md §3); forward declaration alone is a meaningful, final state for
/// every member except these.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDecl {
    pub bases: Vec<BaseClass>,
    pub members: Vec<DeclId>,
    /// SFINAE-style template constraints, e.g. `enable_if<is_same<T,U>>`
    /// folded into the class's template argument list.
    pub constraints: Vec<ExprId>,
    pub template: TemplateInfo,
    pub is_union: bool,
    /// Names this class should add base-member using-declarations for,
    /// beyond the one hard-coded default (`operator[]`, see
    /// [`crate::passes::using_decls`]).
    pub using_decl_names: Vec<String>,
}

impl ClassDecl {
    pub fn has_constraints(&self) -> bool {
        !self.constraints.is_empty()
    }
}
