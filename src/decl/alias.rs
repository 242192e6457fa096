//! Type alias declarations (spec.md §3 "Type alias").

use crate::ids::ExprId;

use super::template::TemplateInfo;

/// `using Name = target;` (or `typedef`). `maxState` is always `Partial`,
/// same reasoning as [`super::function::FunctionDecl`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AliasDecl {
    pub target: ExprId,
    pub template: TemplateInfo,
    /// When set, `target` is a member-access expression naming a base's
    /// member (e.g. `Base::operator[]`) and this alias renders as a bare
    /// using-declaration (`using Base::operator[];`) instead of a type
    /// alias (`using Name = Target;`). Set by
    /// [`crate::passes::using_decls`], never by the frontend.
    pub is_using_decl: bool,
}
