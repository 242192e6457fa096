//! Property tests for the quantified invariants the unit tests beside the
//! code only sample a handful of fixed cases for: interning, qualifier
//! composition, union canonicalization, enable-if folding, and dedup
//! idempotence. Mirrors the teacher's `tests/property_tests/` directory.

use proptest::prelude::*;

use cxxiface::decl::{
    BaseClass, ClassDecl, DeclArena, DeclKind, FunctionDecl, FunctionFlags, Visibility,
};
use cxxiface::expr::arena::ExprArena;
use cxxiface::expr::Qualifier;
use cxxiface::options::Options;
use cxxiface::passes;
use cxxiface::sink::StringWriter;
use cxxiface::Library;

fn arb_name() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9]{0,6}"
}

fn arb_qualifier() -> impl Strategy<Value = Qualifier> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(is_const, is_ptr, is_ref, is_variadic)| {
            let mut q = Qualifier::NONE;
            if is_const {
                q = q.union(Qualifier::CONST);
            }
            if is_ptr {
                q = q.union(Qualifier::POINTER);
            }
            if is_ref {
                q = q.union(Qualifier::REFERENCE);
            }
            if is_variadic {
                q = q.union(Qualifier::VARIADIC);
            }
            q
        },
    )
}

proptest! {
    /// Interning the same literal name twice, from any two arbitrary
    /// strings, returns the same id exactly when the strings are equal.
    #[test]
    fn interning_is_keyed_on_structural_equality(a in arb_name(), b in arb_name()) {
        let mut arena = ExprArena::new();
        let ia = arena.literal(a.clone());
        let ib = arena.literal(b.clone());
        prop_assert_eq!(ia == ib, a == b);
    }

    /// Qualifying a type twice with the same bits, in either order,
    /// produces the same interned id — composition is idempotent and
    /// order-independent since qualifiers are a bitmask union.
    #[test]
    fn qualifier_composition_is_order_independent(
        name in arb_name(),
        q1 in arb_qualifier(),
        q2 in arb_qualifier(),
    ) {
        let mut arena = ExprArena::new();
        let t = arena.literal(name);
        let forward = {
            let a = arena.qualify(t, q1);
            arena.qualify(a, q2)
        };
        let backward = {
            let b = arena.qualify(t, q2);
            arena.qualify(b, q1)
        };
        prop_assert_eq!(forward, backward);
    }

    /// A union of N copies of the same type collapses to that type alone,
    /// regardless of how many duplicates or what order they appear in.
    #[test]
    fn union_of_identical_types_collapses_to_one(
        name in arb_name(),
        copies in 1usize..8,
    ) {
        let mut arena = ExprArena::new();
        let t = arena.literal(name);
        let types = vec![t; copies];
        let u = arena.union_of(Qualifier::NONE, &types);
        prop_assert_eq!(u, t);
    }

    /// Flattening a union built directly from `n` distinct names matches
    /// one built by nesting an arbitrary split of those names into two
    /// sub-unions first — canonicalization doesn't care about grouping.
    #[test]
    fn union_flattening_is_associative(
        names in prop::collection::vec(arb_name(), 2..6),
        split in 1usize..5,
    ) {
        let mut arena = ExprArena::new();
        let split = split.min(names.len() - 1).max(1);
        let types: Vec<_> = names.iter().map(|n| arena.literal(n.clone())).collect();

        let direct = arena.union_of(Qualifier::NONE, &types);

        let left = arena.union_of(Qualifier::NONE, &types[..split]);
        let right = arena.union_of(Qualifier::NONE, &types[split..]);
        let nested = arena.union_of(Qualifier::NONE, &[left, right]);

        prop_assert_eq!(direct, nested);
    }

    /// `enable_if(is_same<T, T>, T)` always folds away to `T` itself,
    /// whatever `T` is named.
    #[test]
    fn enable_if_always_true_condition_folds_to_the_type(name in arb_name()) {
        let mut arena = ExprArena::new();
        let t = arena.literal(name);
        let is_same = arena.literal("is_same");
        let cond = arena.template_of(is_same, &[t, t]);
        let folded = arena.enable_if(cond, Some(t));
        prop_assert_eq!(folded, t);
    }

    /// Running the dedup pass a second time over its own output is a
    /// no-op: idempotence, for any number of duplicate overloads under
    /// one name.
    #[test]
    fn dedup_is_idempotent(duplicate_count in 1usize..6) {
        let mut decls = DeclArena::new();
        let mut exprs = ExprArena::new();
        let class = decls.declare_class("C", None, ClassDecl::default());
        for i in 0..duplicate_count {
            let f = decls.declare_function(
                "get",
                None,
                FunctionDecl {
                    flags: FunctionFlags {
                        is_const: i % 2 == 0,
                        ..Default::default()
                    },
                    ..Default::default()
                },
            );
            decls.add_member(class, f, Visibility::Public);
        }

        passes::dedup::run(&mut decls, &mut exprs);
        let members_once = decls.children_of(class);

        passes::dedup::run(&mut decls, &mut exprs);
        let members_twice = decls.children_of(class);

        prop_assert_eq!(members_once.len(), 1);
        prop_assert_eq!(members_once, members_twice);

        let flags = match &decls.get(members_twice[0]).kind {
            DeclKind::Function(f) => f.flags,
            _ => unreachable!(),
        };
        prop_assert!(flags.is_const);
    }

    /// Whatever the width, every base edge from one of `width` classes
    /// that all inherit directly from the same `Base` gets marked
    /// virtual — the diamond only needs two or more paths converging,
    /// not any particular shape.
    #[test]
    fn diamond_inheritance_always_marks_the_converging_base_edges_virtual(width in 2usize..6) {
        let mut decls = DeclArena::new();
        let mut exprs = ExprArena::new();
        let base = decls.declare_class("Base", None, ClassDecl::default());
        let base_ty = exprs.declared(base);

        let mut middles = Vec::new();
        for i in 0..width {
            let middle = decls.declare_class(format!("Middle{i}"), None, ClassDecl::default());
            if let Some(c) = decls.get_mut(middle).kind.as_class_mut() {
                c.bases.push(BaseClass::new(base_ty, Visibility::Public));
            }
            middles.push(middle);
        }

        let bottom = decls.declare_class("Bottom", None, ClassDecl::default());
        for &middle in &middles {
            let middle_ty = exprs.declared(middle);
            if let Some(c) = decls.get_mut(bottom).kind.as_class_mut() {
                c.bases.push(BaseClass::new(middle_ty, Visibility::Public));
            }
        }

        passes::virtual_base::run(&mut decls, &exprs);

        for &middle in &middles {
            let c = decls.get(middle).kind.as_class().unwrap();
            prop_assert!(c.bases[0].is_virtual);
        }

        let bottom_class = decls.get(bottom).kind.as_class().unwrap();
        for base_edge in &bottom_class.bases {
            prop_assert!(!base_edge.is_virtual);
        }
    }

    /// A chain of `len` classes under single inheritance (each derived
    /// from the one before it) always resolves to `Complete` without a
    /// cycle error, forward-declaring and completing every class in the
    /// chain exactly once, whatever the chain's length.
    #[test]
    fn a_single_inheritance_chain_of_any_length_resolves_without_cycles(len in 1usize..8) {
        let mut lib = Library::new(Options::default());
        let mut classes = Vec::new();
        let mut prev: Option<cxxiface::ids::DeclId> = None;
        for i in 0..len {
            let class = lib.declare_class(format!("C{i}"), None, ClassDecl::default());
            if let Some(base) = prev {
                let base_ty = lib.exprs_mut().declared(base);
                lib.add_base(class, BaseClass::new(base_ty, Visibility::Public));
            }
            classes.push(class);
            prev = Some(class);
        }

        let last = *classes.last().unwrap();
        let mut writer = StringWriter::new(true);
        let result = lib.emit(&[last], "CHAIN_H", &mut writer);
        prop_assert!(result.is_ok());

        let output = writer.into_string();
        for i in 0..len {
            prop_assert_eq!(output.matches(&format!("class C{i};")).count(), 1);
            prop_assert_eq!(output.matches(&format!("class C{i} ")).count(), 1);
        }
    }
}
