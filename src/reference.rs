//! The reference analyzer (spec.md §4.3).
//!
//! Decides, for every declaration, whether a complete declaration is
//! needed somewhere that forces it to be emitted within its enclosing
//! class body rather than merely forward-declared, and records the
//! causal chain the error formatter uses when a cycle can't be broken.

use std::fmt;

use crate::decl::{DeclArena, Parent};
use crate::expr::ExprArena;
use crate::ids::DeclId;
use crate::state::State;

/// The role an edge plays in a dependency/cycle chain (spec.md §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reason {
    BaseClass,
    Type,
    ReturnType,
    ParameterType,
    AliasType,
    Constraint,
    InnerClass,
    Member,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Reason::BaseClass => "base class",
            Reason::Type => "type",
            Reason::ReturnType => "return type",
            Reason::ParameterType => "parameter type",
            Reason::AliasType => "alias type",
            Reason::Constraint => "constraint",
            Reason::InnerClass => "inner class",
            Reason::Member => "member",
        };
        write!(f, "{s}")
    }
}

/// The first place a declaration was referenced from, and why.
///
/// Set once per declaration — the first reference wins and it is never
/// cleared (spec.md §3 ownership & lifecycle).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferenceData {
    pub referenced_by: DeclId,
    pub referenced_in: DeclId,
    pub reason: Reason,
}

/// Marks inner declarations that must be completed within their enclosing
/// class, per spec.md §4.3's algorithm. Mutates [`DeclArena`] reference
/// data and the `referenced` flag that [`crate::class_planner`] later reads
/// to decide each member's target state.
pub struct ReferenceAnalyzer<'a> {
    decls: &'a mut DeclArena,
    exprs: &'a ExprArena,
}

impl<'a> ReferenceAnalyzer<'a> {
    pub fn new(decls: &'a mut DeclArena, exprs: &'a ExprArena) -> Self {
        Self { decls, exprs }
    }

    /// Run the analyzer for one top-level declaration.
    pub fn analyze(&mut self, top: DeclId) {
        self.visit(top, top);
    }

    fn visit(&mut self, d: DeclId, root: DeclId) {
        // Step 1: direct Complete dependencies of `d`.
        let complete_deps = self.decls.direct_dependencies(d, State::Complete, self.exprs);
        for dep in complete_deps {
            let node = if dep.state == State::Complete {
                dep.on
            } else {
                match self.decls.get(dep.on).common.parent {
                    Some(Parent::Decl(p)) => p,
                    _ => dep.on,
                }
            };
            self.mark_ancestors_of(node, root, d, d, dep.reason);
        }

        // Step 2 & 3: each child, using the child's Partial dependencies,
        // recursing into unmarked children with their own root.
        let children: Vec<DeclId> = self.decls.children_of(d);
        for child in children {
            let partial_deps = self
                .decls
                .direct_dependencies(child, State::Partial, self.exprs);
            for dep in partial_deps {
                let node = if dep.state == State::Complete {
                    dep.on
                } else {
                    match self.decls.get(dep.on).common.parent {
                        Some(Parent::Decl(p)) => p,
                        _ => dep.on,
                    }
                };
                self.mark_ancestors_of(node, root, child, d, dep.reason);
            }
            if !self.decls.get(child).common.referenced {
                self.visit(child, child);
            }
        }
    }

    /// Walk `node` upward while it remains a descendant of `root` and is
    /// not yet marked, marking each as referenced, then recurse the
    /// analyzer on the newly marked node with the same `root`.
    fn mark_ancestors_of(
        &mut self,
        mut node: DeclId,
        root: DeclId,
        referenced_by: DeclId,
        referenced_in: DeclId,
        reason: Reason,
    ) {
        loop {
            if !self.is_descendant_of(node, root) {
                return;
            }
            if self.decls.get(node).common.referenced {
                return;
            }
            self.decls.get_mut(node).common.referenced = true;
            if self.decls.get(node).common.reference_data.is_none() {
                self.decls.get_mut(node).common.reference_data = Some(ReferenceData {
                    referenced_by,
                    referenced_in,
                    reason,
                });
            }
            self.visit(node, root);
            node = match self.decls.get(node).common.parent {
                Some(Parent::Decl(p)) => p,
                _ => return,
            };
        }
    }

    fn is_descendant_of(&self, node: DeclId, root: DeclId) -> bool {
        let mut cur = node;
        loop {
            if cur == root {
                return true;
            }
            match self.decls.get(cur).common.parent {
                Some(Parent::Decl(p)) => cur = p,
                _ => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{ClassDecl, DeclKind, Visibility};

    #[test]
    fn inner_class_referenced_by_pointer_field_stays_unmarked() {
        let mut exprs = ExprArena::new();
        let mut decls = DeclArena::new();

        let outer = decls.declare_class("Outer", None, ClassDecl::default());
        let inner = decls.declare_class(
            "Inner",
            Some(Parent::Decl(outer)),
            ClassDecl::default(),
        );
        decls.add_member(outer, inner, Visibility::Public);

        let inner_ty = exprs.declared(inner);
        let ptr = exprs.pointer(inner_ty);
        let field = decls.declare_variable(
            "field",
            Some(Parent::Decl(outer)),
            crate::decl::VariableDecl {
                ty: ptr,
                flags: Default::default(),
            },
        );
        decls.add_member(outer, field, Visibility::Public);

        ReferenceAnalyzer::new(&mut decls, &exprs).analyze(outer);

        assert!(!decls.get(inner).common.referenced);
    }

    #[test]
    fn member_access_in_return_type_marks_inner_class_referenced() {
        let mut exprs = ExprArena::new();
        let mut decls = DeclArena::new();

        let outer = decls.declare_class("Outer", None, ClassDecl::default());
        let inner = decls.declare_class("Inner", Some(Parent::Decl(outer)), ClassDecl::default());
        decls.add_member(outer, inner, Visibility::Public);

        let inner_ty = exprs.declared(inner);
        // `Outer::Inner::Nested`, a member-type access — requires Inner to
        // be Complete, unlike a bare by-value or by-pointer reference.
        let nested_member = exprs.member_of(inner_ty, "Nested");
        let method = decls.declare_function(
            "get",
            Some(Parent::Decl(outer)),
            crate::decl::FunctionDecl {
                return_type: Some(nested_member),
                ..Default::default()
            },
        );
        decls.add_member(outer, method, Visibility::Public);

        ReferenceAnalyzer::new(&mut decls, &exprs).analyze(outer);

        assert!(decls.get(inner).common.referenced);
        let data = decls.get(inner).common.reference_data.unwrap();
        assert_eq!(data.reason, Reason::ReturnType);
    }

    fn _decl_kind_is_exhaustive(k: &DeclKind) {
        match k {
            DeclKind::Class(_) | DeclKind::Function(_) | DeclKind::Variable(_) | DeclKind::Alias(_) => {}
        }
    }
}
