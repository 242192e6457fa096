//! Global passes that run over the whole declaration graph after
//! construction and before the resolver starts (spec.md §4.6).

pub mod dedup;
pub mod using_decls;
pub mod virtual_base;

use crate::decl::{DeclArena, NamespaceArena};
use crate::expr::ExprArena;

/// Runs every global pass in the fixed order spec.md §4.6 lists them:
/// dedup/merge first (so later passes see the post-merge member list),
/// then virtual-base marking, then using-declaration insertion.
pub fn run_all(decls: &mut DeclArena, exprs: &mut ExprArena, namespaces: &NamespaceArena) {
    dedup::run(decls, exprs);
    virtual_base::run(decls, exprs);
    using_decls::run(decls, exprs, namespaces);
}
