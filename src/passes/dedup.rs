//! Duplicate removal and overload merging (spec.md §4.6 "dedup/merge
//! overloads").
//!
//! Two declarations coming from independent parts of the source IDL can
//! describe the same C++ entity (e.g. a templated class declared once
//! per translation unit it's used from). This pass folds such siblings
//! into one before the resolver ever sees them, so it doesn't need to
//! reason about merge semantics at all.

use std::collections::HashMap;

use crate::decl::{ClassDecl, DeclArena, DeclKind, FunctionDecl, Param};
use crate::expr::{ExprArena, Qualifier};
use crate::ids::{DeclId, ExprId};

/// A key two members must share to be considered the same overload —
/// name plus parameter count is a coarse but sufficient key here, since
/// the frontend is expected to hand us already-type-checked signatures
/// (spec.md §1 Non-goals: type checking is an external collaborator's
/// job, so signature *conflicts* within one key are a programmer bug,
/// not a condition this pass recovers from).
fn overload_key(decls: &DeclArena, id: DeclId) -> Option<(String, usize)> {
    let decl = decls.get(id);
    match &decl.kind {
        DeclKind::Function(f) => Some((decl.common.name.clone(), f.params.len())),
        _ => None,
    }
}

/// Runs dedup over every class's member list in the arena.
pub fn run(decls: &mut DeclArena, exprs: &mut ExprArena) {
    let class_ids: Vec<DeclId> = decls
        .iter()
        .filter(|(_, d)| matches!(d.kind, DeclKind::Class(_)))
        .map(|(id, _)| id)
        .collect();
    for class in class_ids {
        dedup_members(decls, exprs, class);
    }
}

fn dedup_members(decls: &mut DeclArena, exprs: &mut ExprArena, class: DeclId) {
    let members = decls.children_of(class);
    let mut seen: HashMap<(String, usize), DeclId> = HashMap::new();
    let mut keep: Vec<DeclId> = Vec::new();

    for member in members {
        match overload_key(decls, member) {
            Some(key) => match seen.get(&key).copied() {
                Some(existing) => merge_function(decls, exprs, existing, member),
                None => {
                    seen.insert(key, member);
                    keep.push(member);
                }
            },
            None => keep.push(member),
        }
    }

    if let Some(c) = decls.get_mut(class).kind.as_class_mut() {
        c.members = keep;
    }
}

/// Merges `dup` into `into` in place (spec.md §4.6 "merge_function"):
/// flags OR together, parameters union position-by-position under a
/// const-reference qualifier (the longer list's tail passes through
/// unchanged), and the return type unions under a pointer qualifier,
/// either side deferring to the other when undefined or `void`. `dup` is
/// dropped from its parent's member list by the caller; it remains a
/// live, unreferenced arena slot (harmless — nothing points at it
/// anymore).
fn merge_function(decls: &mut DeclArena, exprs: &mut ExprArena, into: DeclId, dup: DeclId) {
    let (dup_flags, dup_return, dup_params) = match &decls.get(dup).kind {
        DeclKind::Function(f) => (f.flags, f.return_type, f.params.clone()),
        _ => return,
    };
    let (into_return, into_params) = match &decls.get(into).kind {
        DeclKind::Function(f) => (f.return_type, f.params.clone()),
        _ => return,
    };

    let merged_return = merge_return_type(exprs, into_return, dup_return);
    let merged_params = merge_params(exprs, &into_params, &dup_params);

    if let DeclKind::Function(f) = &mut decls.get_mut(into).kind {
        f.flags.is_virtual |= dup_flags.is_virtual;
        f.flags.is_const |= dup_flags.is_const;
        f.flags.is_noexcept |= dup_flags.is_noexcept;
        f.return_type = merged_return;
        f.params = merged_params;
    }
}

/// Return-type merge rule (spec.md §4.6): an undefined or `void` side
/// defers entirely to the other; two real, unequal types union under a
/// pointer qualifier, matching how this dialect returns union-typed
/// values.
fn merge_return_type(exprs: &mut ExprArena, a: Option<ExprId>, b: Option<ExprId>) -> Option<ExprId> {
    let a_is_void = a.map(|e| exprs.is_void_like(e)).unwrap_or(true);
    let b_is_void = b.map(|e| exprs.is_void_like(e)).unwrap_or(true);
    match (a_is_void, b_is_void) {
        (true, true) => a.or(b),
        (true, false) => b,
        (false, true) => a,
        (false, false) => {
            let (a, b) = (a.unwrap(), b.unwrap());
            if a == b {
                Some(a)
            } else {
                Some(exprs.union_of(Qualifier::POINTER, &[a, b]))
            }
        }
    }
}

/// Parameter-list merge rule (spec.md §4.6 "merge_function"): the longer
/// list dictates arity; shared positions with identical types pass
/// through, shared positions with differing types union under a
/// const-reference qualifier (taken by reference since the union itself
/// is never a value type here); the tail of the longer list is retained
/// unchanged.
fn merge_params(exprs: &mut ExprArena, into: &[Param], dup: &[Param]) -> Vec<Param> {
    let shared = into.len().min(dup.len());
    let mut merged = Vec::with_capacity(into.len().max(dup.len()));
    for i in 0..shared {
        let p = &into[i];
        let q = &dup[i];
        let ty = if p.ty == q.ty {
            p.ty
        } else {
            let union = exprs.union_of(Qualifier::NONE, &[p.ty, q.ty]);
            exprs.qualify(union, Qualifier::CONST.union(Qualifier::REFERENCE))
        };
        merged.push(Param {
            name: p.name.clone(),
            ty,
            default: p.default,
        });
    }

    let longer_tail = if into.len() > dup.len() {
        &into[shared..]
    } else {
        &dup[shared..]
    };
    merged.extend(longer_tail.iter().cloned());
    merged
}

/// Merges two duplicate class declarations that were constructed
/// separately but name the same type (spec.md §4.6, §9 "sibling merge as
/// a free function"). Bases and members are unioned; disagreeing
/// `is_union` flags are a programmer bug.
pub fn merge_class(decls: &mut DeclArena, into: DeclId, dup: DeclId) {
    let dup_class = match &decls.get(dup).kind {
        DeclKind::Class(c) => c.clone(),
        _ => return,
    };
    if let DeclKind::Class(c) = &mut decls.get_mut(into).kind {
        debug_assert_eq!(
            c.is_union, dup_class.is_union,
            "inconsistent merge: one declaration is a union, the other a class"
        );
        for base in dup_class.bases {
            if !c.bases.contains(&base) {
                c.bases.push(base);
            }
        }
        for member in dup_class.members {
            if !c.members.contains(&member) {
                c.members.push(member);
            }
        }
        for constraint in dup_class.constraints {
            if !c.constraints.contains(&constraint) {
                c.constraints.push(constraint);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{FunctionFlags, Visibility};
    use crate::expr::arena::PathContext;

    struct FlatCtx;
    impl PathContext for FlatCtx {
        fn path_of(&self, _decl: DeclId) -> String {
            unreachable!("no Declared types in these fixtures")
        }
    }

    #[test]
    fn duplicate_overloads_merge_into_one_member() {
        let mut decls = DeclArena::new();
        let mut exprs = ExprArena::new();
        let class = decls.declare_class("C", None, ClassDecl::default());
        let f1 = decls.declare_function(
            "get",
            None,
            FunctionDecl {
                flags: FunctionFlags {
                    is_const: true,
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        let f2 = decls.declare_function(
            "get",
            None,
            FunctionDecl {
                flags: FunctionFlags {
                    is_virtual: true,
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        decls.add_member(class, f1, Visibility::Public);
        decls.add_member(class, f2, Visibility::Public);

        run(&mut decls, &mut exprs);

        let members = decls.children_of(class);
        assert_eq!(members.len(), 1);
        let merged = match &decls.get(members[0]).kind {
            DeclKind::Function(f) => f.flags,
            _ => unreachable!(),
        };
        assert!(merged.is_const);
        assert!(merged.is_virtual);
    }

    /// `foo(a: string): number` and `foo(a: number): string` merge into
    /// one overload taking the union of the two parameter types by
    /// const reference and returning the union of the two return types
    /// by pointer.
    #[test]
    fn overloads_differing_only_in_types_union_their_parameter_and_return_types() {
        let mut decls = DeclArena::new();
        let mut exprs = ExprArena::new();
        let class = decls.declare_class("C", None, ClassDecl::default());

        let string_ptr = exprs.pointer(exprs.literal("String"));
        let double = exprs.literal("double");

        let f1 = decls.declare_function(
            "foo",
            None,
            FunctionDecl {
                return_type: Some(double),
                params: vec![Param::new("a", string_ptr)],
                ..Default::default()
            },
        );
        let f2 = decls.declare_function(
            "foo",
            None,
            FunctionDecl {
                return_type: Some(string_ptr),
                params: vec![Param::new("a", double)],
                ..Default::default()
            },
        );
        decls.add_member(class, f1, Visibility::Public);
        decls.add_member(class, f2, Visibility::Public);

        run(&mut decls, &mut exprs);

        let members = decls.children_of(class);
        assert_eq!(members.len(), 1);
        let merged = match &decls.get(members[0]).kind {
            DeclKind::Function(f) => f.clone(),
            _ => unreachable!(),
        };

        assert_eq!(merged.params.len(), 1);
        assert_eq!(
            exprs.write(merged.params[0].ty, &FlatCtx),
            "const _Union<String*, double>&"
        );

        let ret = merged.return_type.unwrap();
        assert_eq!(exprs.write(ret, &FlatCtx), "_Union<double, String*>*");
    }
}
