//! Virtual-base marking (spec.md §4.6).
//!
//! When a class inherits from the same base along two or more distinct
//! paths (the classic diamond), every one of those base edges must be
//! written `virtual` or the target ends up duplicated in the final
//! layout. This pass finds diamonds and flips `BaseClass::is_virtual`;
//! the frontend never sets it directly.

use std::collections::HashMap;

use crate::decl::{DeclArena, DeclKind};
use crate::expr::ExprArena;
use crate::ids::DeclId;

/// Runs the pass over every class in the arena.
pub fn run(decls: &mut DeclArena, exprs: &ExprArena) {
    let class_ids: Vec<DeclId> = decls
        .iter()
        .filter(|(_, d)| matches!(d.kind, DeclKind::Class(_)))
        .map(|(id, _)| id)
        .collect();

    for class in class_ids {
        let mut counts: HashMap<DeclId, u32> = HashMap::new();
        count_base_paths(decls, exprs, class, &mut counts);

        let diamonds: Vec<DeclId> = counts
            .into_iter()
            .filter(|(base, count)| *base != class && *count > 1)
            .map(|(base, _)| base)
            .collect();
        if diamonds.is_empty() {
            continue;
        }

        mark_virtual(decls, exprs, class, &diamonds);
    }
}

/// Counts, for every ancestor reachable from `class`, how many distinct
/// direct-base edges lead to it (a proxy for "how many inheritance paths
/// reach this ancestor" — more than one means a diamond).
fn count_base_paths(
    decls: &DeclArena,
    exprs: &ExprArena,
    class: DeclId,
    counts: &mut HashMap<DeclId, u32>,
) {
    let Some(c) = decls.get(class).kind.as_class() else {
        return;
    };
    for base in &c.bases {
        for base_decl in exprs.referenced_types(base.ty) {
            *counts.entry(base_decl).or_insert(0) += 1;
            count_base_paths(decls, exprs, base_decl, counts);
        }
    }
}

fn mark_virtual(decls: &mut DeclArena, exprs: &ExprArena, class: DeclId, diamonds: &[DeclId]) {
    let Some(c) = decls.get(class).kind.as_class() else {
        return;
    };
    let base_bases: Vec<DeclId> = c
        .bases
        .iter()
        .flat_map(|b| exprs.referenced_types(b.ty))
        .collect();

    if let Some(c) = decls.get_mut(class).kind.as_class_mut() {
        for base in &mut c.bases {
            if exprs
                .referenced_types(base.ty)
                .iter()
                .any(|d| diamonds.contains(d))
            {
                base.is_virtual = true;
            }
        }
    }

    for base in base_bases {
        mark_virtual(decls, exprs, base, diamonds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{BaseClass, ClassDecl, Visibility};
    use crate::expr::ExprArena;

    #[test]
    fn diamond_inheritance_marks_the_shared_base_virtual_on_both_paths() {
        let mut exprs = ExprArena::new();
        let mut decls = DeclArena::new();

        let base = decls.declare_class("Base", None, ClassDecl::default());
        let base_ty = exprs.declared(base);

        let left = decls.declare_class(
            "Left",
            None,
            ClassDecl {
                bases: vec![BaseClass::new(base_ty, Visibility::Public)],
                ..Default::default()
            },
        );
        let right = decls.declare_class(
            "Right",
            None,
            ClassDecl {
                bases: vec![BaseClass::new(base_ty, Visibility::Public)],
                ..Default::default()
            },
        );

        let left_ty = exprs.declared(left);
        let right_ty = exprs.declared(right);
        let bottom = decls.declare_class(
            "Bottom",
            None,
            ClassDecl {
                bases: vec![
                    BaseClass::new(left_ty, Visibility::Public),
                    BaseClass::new(right_ty, Visibility::Public),
                ],
                ..Default::default()
            },
        );

        run(&mut decls, &exprs);

        let left_base_virtual = decls.get(left).kind.as_class().unwrap().bases[0].is_virtual;
        let right_base_virtual = decls.get(right).kind.as_class().unwrap().bases[0].is_virtual;
        assert!(left_base_virtual);
        assert!(right_base_virtual);

        for base in &decls.get(bottom).kind.as_class().unwrap().bases {
            assert!(!base.is_virtual);
        }
    }

    #[test]
    fn single_inheritance_path_never_gets_marked_virtual() {
        let mut exprs = ExprArena::new();
        let mut decls = DeclArena::new();

        let base = decls.declare_class("Base", None, ClassDecl::default());
        let base_ty = exprs.declared(base);
        let derived = decls.declare_class(
            "Derived",
            None,
            ClassDecl {
                bases: vec![BaseClass::new(base_ty, Visibility::Public)],
                ..Default::default()
            },
        );

        run(&mut decls, &exprs);

        assert!(!decls.get(derived).kind.as_class().unwrap().bases[0].is_virtual);
    }
}
