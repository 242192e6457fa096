//! Base-member using-declaration pass (spec.md §4.6, §9 open question).
//!
//! A derived class that hides a base member of the same name needs a
//! `using Base::name;` declaration to pull the base overload back into
//! scope. The set of names this runs for is configurable but ships with
//! exactly one hard-coded entry, `operator[]`, per SPEC_FULL.md's
//! resolution of the corresponding open question.

use crate::decl::{AliasDecl, DeclArena, DeclKind, Visibility};
use crate::expr::ExprArena;
use crate::ids::DeclId;

const DEFAULT_NAMES: &[&str] = &["operator[]"];

/// Runs the pass over every class in the arena, inserting a using-alias
/// member for each configured name that a base declares but the derived
/// class's own members don't already shadow with a compatible overload.
pub fn run(decls: &mut DeclArena, exprs: &mut ExprArena, _namespaces: &crate::decl::NamespaceArena) {
    let class_ids: Vec<DeclId> = decls
        .iter()
        .filter(|(_, d)| matches!(d.kind, DeclKind::Class(_)))
        .map(|(id, _)| id)
        .collect();

    for class in class_ids {
        insert_using_decls(decls, exprs, class);
    }
}

fn insert_using_decls(decls: &mut DeclArena, exprs: &mut ExprArena, class: DeclId) {
    let Some(c) = decls.get(class).kind.as_class() else {
        return;
    };
    let names: Vec<String> = DEFAULT_NAMES
        .iter()
        .map(|s| s.to_string())
        .chain(c.using_decl_names.iter().cloned())
        .collect();
    let bases: Vec<DeclId> = c.bases.iter().flat_map(|b| exprs.referenced_types(b.ty)).collect();
    let own_names: Vec<String> = c
        .members
        .iter()
        .map(|&m| decls.get(m).common.name.clone())
        .collect();

    let mut to_add: Vec<(String, DeclId)> = Vec::new();
    for &base in &bases {
        let Some(base_class) = decls.get(base).kind.as_class() else {
            continue;
        };
        for &member in &base_class.members {
            let member = decls.get(member);
            let member_name = member.common.name.clone();
            if member.common.visibility == Visibility::Public
                && names.contains(&member_name)
                && own_names.contains(&member_name)
            {
                to_add.push((member_name, base));
            }
        }
    }

    for (name, base) in to_add {
        let base_ty = exprs.declared(base);
        let target = exprs.member_of(base_ty, name.clone());
        let using_member = decls.declare_alias(
            name,
            None,
            AliasDecl {
                target,
                template: Default::default(),
                is_using_decl: true,
            },
        );
        decls.add_member(class, using_member, Visibility::Public);
    }
}
