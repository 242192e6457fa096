//! The interning arena and algebra operations over [`super::ExprKind`].

use std::collections::HashMap;

use crate::ids::{DeclId, ExprId};
use crate::state::State;

use super::{BoolOp, ExprKind, Qualifier};

/// Something that can render a declaration's path relative to a current
/// namespace, used by [`ExprArena::write`] to shorten `Declared` names.
/// Implemented by [`crate::decl::namespace`] so `expr` stays independent
/// of the declaration graph's own module.
pub trait PathContext {
    fn path_of(&self, decl: DeclId) -> String;
}

/// The global, per-run intern table for expressions and types (spec.md §3,
/// §9 "the expression intern table is instantiated per-run rather than as
/// a true global").
#[derive(Debug, Default)]
pub struct ExprArena {
    nodes: Vec<ExprKind>,
    by_key: HashMap<String, ExprId>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ExprId) -> &ExprKind {
        &self.nodes[id.index()]
    }

    /// Hash-cons `kind`: a second construction of an equal value returns
    /// the same [`ExprId`] (spec.md §3 interning invariant).
    pub fn intern(&mut self, kind: ExprKind) -> ExprId {
        let key = kind.structural_key();
        if let Some(&id) = self.by_key.get(&key) {
            tracing::trace!(key = %key, "expr intern hit");
            return id;
        }
        let id = ExprId(self.nodes.len() as u32);
        self.nodes.push(kind);
        self.by_key.insert(key, id);
        tracing::trace!(?id, "expr intern miss");
        id
    }

    // ---- constructors ----------------------------------------------------

    pub fn literal(&mut self, name: impl Into<String>) -> ExprId {
        self.intern(ExprKind::LiteralName(name.into()))
    }

    pub fn declared(&mut self, decl: DeclId) -> ExprId {
        self.intern(ExprKind::Declared(decl))
    }

    pub fn bool_literal(&mut self, value: bool) -> ExprId {
        self.intern(ExprKind::BoolLiteral(value))
    }

    pub fn member_of(&mut self, inner: ExprId, member: impl Into<String>) -> ExprId {
        self.intern(ExprKind::Member {
            inner,
            member: member.into(),
        })
    }

    pub fn any(&mut self) -> ExprId {
        self.literal("_Any")
    }

    pub fn any_ptr(&mut self) -> ExprId {
        let any = self.any();
        self.pointer(any)
    }

    pub fn void(&mut self) -> ExprId {
        self.literal("void")
    }

    // ---- qualifier composition --------------------------------------------

    /// Composes `quals` onto `inner`, idempotently: qualifying an already
    /// qualified expression merges into a single `Qualified` node wrapping
    /// the original base, so qualifier bits never get lost or duplicated
    /// under re-interning.
    pub fn qualify(&mut self, inner: ExprId, quals: Qualifier) -> ExprId {
        if quals.is_none() {
            return inner;
        }
        let (base, merged, inner_state) = match self.nodes[inner.index()].clone() {
            ExprKind::Qualified {
                inner: base,
                quals: existing,
                inner_state,
            } => (base, existing.union(quals), inner_state),
            _ => (inner, quals, None),
        };
        self.intern(ExprKind::Qualified {
            inner: base,
            quals: merged,
            inner_state,
        })
    }

    pub fn pointer(&mut self, inner: ExprId) -> ExprId {
        self.qualify(inner, Qualifier::POINTER)
    }

    pub fn const_pointer(&mut self, inner: ExprId) -> ExprId {
        self.qualify(inner, Qualifier::CONST.union(Qualifier::POINTER))
    }

    pub fn reference(&mut self, inner: ExprId) -> ExprId {
        self.qualify(inner, Qualifier::REFERENCE)
    }

    pub fn const_reference(&mut self, inner: ExprId) -> ExprId {
        self.qualify(inner, Qualifier::CONST.union(Qualifier::REFERENCE))
    }

    pub fn rvalue_reference(&mut self, inner: ExprId) -> ExprId {
        self.qualify(inner, Qualifier::RVALUE_REF)
    }

    pub fn expand(&mut self, inner: ExprId) -> ExprId {
        self.qualify(inner, Qualifier::VARIADIC)
    }

    /// Marks a template argument as requiring `Complete` through its
    /// pointer/reference qualifier, as happens when the argument fills a
    /// constrained class's template parameter (spec.md §4.1 last
    /// paragraph). No-op if `arg` isn't itself qualified.
    pub fn with_inner_state_complete(&mut self, arg: ExprId) -> ExprId {
        if let ExprKind::Qualified { inner, quals, .. } = self.nodes[arg.index()].clone() {
            self.intern(ExprKind::Qualified {
                inner,
                quals,
                inner_state: Some(State::Complete),
            })
        } else {
            arg
        }
    }

    pub fn remove_qualifiers(&mut self, e: ExprId) -> ExprId {
        if let ExprKind::Qualified { inner, quals, .. } = self.nodes[e.index()].clone() {
            let kept = if quals.contains(Qualifier::VARIADIC) {
                Qualifier::VARIADIC
            } else {
                Qualifier::NONE
            };
            if kept.is_none() {
                return inner;
            }
            return self.intern(ExprKind::Qualified {
                inner,
                quals: kept,
                inner_state: None,
            });
        }
        e
    }

    // ---- templates, unions, functions -------------------------------------

    pub fn template_of(&mut self, head: ExprId, args: &[ExprId]) -> ExprId {
        self.intern(ExprKind::Template {
            head,
            args: args.to_vec(),
        })
    }

    /// Like [`Self::template_of`], but marks every qualified-pointer
    /// argument as requiring `Complete` through its pointer, for a `head`
    /// known to carry template constraints.
    pub fn template_of_constrained(&mut self, head: ExprId, args: &[ExprId]) -> ExprId {
        let args: Vec<ExprId> = args
            .iter()
            .map(|&a| self.with_inner_state_complete(a))
            .collect();
        self.template_of(head, &args)
    }

    fn is_literal_named(&self, e: ExprId, name: &str) -> bool {
        matches!(&self.nodes[e.index()], ExprKind::LiteralName(n) if n == name)
    }

    fn is_any_ptr(&self, e: ExprId) -> bool {
        matches!(
            &self.nodes[e.index()],
            ExprKind::Qualified { inner, quals, .. }
                if quals.contains(Qualifier::POINTER) && self.is_literal_named(*inner, "_Any")
        )
    }

    /// Builds `_Union<types...>` with canonicalization: duplicates removed,
    /// nested unions flattened, `_Any*` absorbing, single-member collapse
    /// (spec.md §4.1, tested by the `union_*` properties in spec.md §8).
    pub fn union_of(&mut self, quals: Qualifier, types: &[ExprId]) -> ExprId {
        let mut flat: Vec<ExprId> = Vec::new();
        for &t in types {
            if let ExprKind::Template { head, args } = self.nodes[t.index()].clone() {
                if self.is_literal_named(head, "_Union") {
                    flat.extend(args);
                    continue;
                }
            }
            flat.push(t);
        }

        if flat.iter().any(|&t| self.is_any_ptr(t)) {
            return self.any();
        }

        let mut deduped: Vec<ExprId> = Vec::new();
        for t in flat {
            if !deduped.contains(&t) {
                deduped.push(t);
            }
        }

        if deduped.len() == 1 {
            return self.qualify(deduped[0], quals);
        }

        let head = self.literal("_Union");
        let union = self.template_of(head, &deduped);
        self.qualify(union, quals)
    }

    /// Builds the C-style function type and wraps it in `_Function<...>`.
    pub fn function_of(&mut self, ret: ExprId, params: &[ExprId]) -> ExprId {
        let raw = self.intern(ExprKind::Function {
            ret,
            params: params.to_vec(),
        });
        let head = self.literal("_Function");
        self.template_of(head, &[raw])
    }

    fn as_enable_if(&self, e: ExprId) -> Option<(ExprId, ExprId)> {
        if let ExprKind::Template { head, args } = &self.nodes[e.index()] {
            if self.is_literal_named(*head, "enable_if") && args.len() == 2 {
                return Some((args[0], args[1]));
            }
        }
        None
    }

    /// `enable_if(cond, type?)`: constant-folds an always-true condition
    /// away, and merges nested `enable_if`s under logical-and.
    pub fn enable_if(&mut self, cond: ExprId, ty: Option<ExprId>) -> ExprId {
        if self.is_always_true(cond) {
            return ty.unwrap_or_else(|| self.void());
        }
        let target = ty.unwrap_or_else(|| self.void());
        if let Some((cond2, ty2)) = self.as_enable_if(target) {
            let merged_cond = self.compound(BoolOp::And, &[cond, cond2]);
            return self.enable_if(merged_cond, Some(ty2));
        }
        let head = self.literal("enable_if");
        self.template_of(head, &[cond, target])
    }

    pub fn compound(&mut self, op: BoolOp, children: &[ExprId]) -> ExprId {
        self.intern(ExprKind::Compound {
            op,
            children: children.to_vec(),
        })
    }

    /// `array_element_type(t)` (spec.md §4.1).
    pub fn array_element_type(&mut self, t: ExprId) -> ExprId {
        match self.nodes[t.index()].clone() {
            ExprKind::Template { head, args } if !args.is_empty() => {
                if matches!(self.nodes[head.index()], ExprKind::Declared(_)) {
                    return args[0];
                }
                self.array_element_type_fallback(t)
            }
            ExprKind::Declared(_) => self.any_ptr(),
            _ => self.array_element_type_fallback(t),
        }
    }

    fn array_element_type_fallback(&mut self, t: ExprId) -> ExprId {
        let head = self.literal("ArrayElementTypeT");
        self.template_of(head, &[t])
    }

    fn cast_predicate(&mut self, name: &str, from: ExprId, to: &[ExprId]) -> ExprId {
        if to.iter().any(|&t| self.is_any_ptr(t)) {
            return self.bool_literal(true);
        }
        let head = self.literal(name);
        let mut args = Vec::with_capacity(to.len() + 1);
        args.push(from);
        args.extend_from_slice(to);
        self.template_of(head, &args)
    }

    pub fn can_cast(&mut self, from: ExprId, to: &[ExprId]) -> ExprId {
        self.cast_predicate("can_cast", from, to)
    }

    pub fn can_cast_args(&mut self, from: ExprId, to: &[ExprId]) -> ExprId {
        self.cast_predicate("can_cast_args", from, to)
    }

    /// Constant-folds `is_same<T, T>` and any `can_cast`/`can_cast_args`
    /// whose target list contains `_Any*`.
    pub fn is_always_true(&self, e: ExprId) -> bool {
        match &self.nodes[e.index()] {
            ExprKind::BoolLiteral(true) => true,
            ExprKind::Template { head, args } => {
                if self.is_literal_named(*head, "is_same") && args.len() == 2 && args[0] == args[1]
                {
                    return true;
                }
                if (self.is_literal_named(*head, "can_cast")
                    || self.is_literal_named(*head, "can_cast_args"))
                    && args.iter().skip(1).any(|&a| self.is_any_ptr(a))
                {
                    return true;
                }
                false
            }
            ExprKind::Compound { op, children } => match op {
                BoolOp::And => children.iter().all(|&c| self.is_always_true(c)),
                BoolOp::Or => children.iter().any(|&c| self.is_always_true(c)),
            },
            _ => false,
        }
    }

    /// `void`, or `enable_if<cond, void>`.
    pub fn is_void_like(&self, e: ExprId) -> bool {
        match &self.nodes[e.index()] {
            ExprKind::LiteralName(n) if n == "void" => true,
            _ => self
                .as_enable_if(e)
                .map(|(_, ty)| self.is_void_like(ty))
                .unwrap_or(false),
        }
    }

    // ---- dependencies -------------------------------------------------------

    /// The set of `(declaration, required state)` pairs this expression
    /// depends on (spec.md §3 dependency-semantics table). `has_constraints`
    /// answers whether a given declared class carries template constraints,
    /// used to decide whether a template's parameters need `Complete`.
    pub fn dependencies(
        &self,
        e: ExprId,
        has_constraints: &dyn Fn(DeclId) -> bool,
    ) -> Vec<(DeclId, State)> {
        let mut out = Vec::new();
        self.collect_dependencies(e, has_constraints, &mut out);
        out
    }

    fn collect_dependencies(
        &self,
        e: ExprId,
        has_constraints: &dyn Fn(DeclId) -> bool,
        out: &mut Vec<(DeclId, State)>,
    ) {
        match &self.nodes[e.index()] {
            ExprKind::LiteralName(_) | ExprKind::BoolLiteral(_) => {}
            ExprKind::Declared(d) => out.push((*d, State::Partial)),
            ExprKind::Qualified {
                inner,
                quals,
                inner_state,
            } => {
                let mut inner_deps = Vec::new();
                self.collect_dependencies(*inner, has_constraints, &mut inner_deps);
                if quals.reduces_to_partial() {
                    let floor = inner_state.unwrap_or(State::Partial);
                    out.extend(inner_deps.into_iter().map(|(d, _)| (d, floor)));
                } else {
                    out.extend(inner_deps);
                }
            }
            ExprKind::Member { inner, .. } => {
                let mut inner_deps = Vec::new();
                self.collect_dependencies(*inner, has_constraints, &mut inner_deps);
                out.extend(inner_deps.into_iter().map(|(d, _)| (d, State::Complete)));
            }
            ExprKind::Template { head, args } => {
                let mut head_deps = Vec::new();
                self.collect_dependencies(*head, has_constraints, &mut head_deps);
                out.extend(raise_floor(head_deps, State::Partial));

                let constrained = self.template_head_is_constrained(*head, has_constraints);
                let floor = if constrained {
                    State::Complete
                } else {
                    State::Partial
                };
                for a in args {
                    let mut arg_deps = Vec::new();
                    self.collect_dependencies(*a, has_constraints, &mut arg_deps);
                    out.extend(raise_floor(arg_deps, floor));
                }
            }
            ExprKind::Function { ret, params } => {
                for e in std::iter::once(ret).chain(params.iter()) {
                    let mut deps = Vec::new();
                    self.collect_dependencies(*e, has_constraints, &mut deps);
                    out.extend(raise_floor(deps, State::Partial));
                }
            }
            ExprKind::Compound { children, .. } => {
                for c in children {
                    let mut deps = Vec::new();
                    self.collect_dependencies(*c, has_constraints, &mut deps);
                    out.extend(raise_floor(deps, State::Partial));
                }
            }
        }
    }

    fn template_head_is_constrained(
        &self,
        head: ExprId,
        has_constraints: &dyn Fn(DeclId) -> bool,
    ) -> bool {
        matches!(&self.nodes[head.index()], ExprKind::Declared(d) if has_constraints(*d))
    }

    /// The declarations directly named by this expression, regardless of
    /// required state (`getReferencedTypes`).
    pub fn referenced_types(&self, e: ExprId) -> Vec<DeclId> {
        self.dependencies(e, &|_| false)
            .into_iter()
            .map(|(d, _)| d)
            .collect()
    }

    // ---- writing --------------------------------------------------------

    pub fn write(&self, e: ExprId, ctx: &dyn PathContext) -> String {
        match &self.nodes[e.index()] {
            ExprKind::LiteralName(n) => n.clone(),
            ExprKind::Declared(d) => ctx.path_of(*d),
            ExprKind::Qualified { inner, quals, .. } => {
                let mut out = String::new();
                quals.write_prefix(&mut out);
                out.push_str(&self.write(*inner, ctx));
                quals.write_suffix(&mut out);
                out
            }
            ExprKind::Member { inner, member } => {
                format!("{}::{}", self.write(*inner, ctx), member)
            }
            ExprKind::Template { head, args } => {
                let args_text = args
                    .iter()
                    .map(|a| self.write(*a, ctx))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}<{}>", self.write(*head, ctx), args_text)
            }
            ExprKind::Function { ret, params } => {
                let params_text = params
                    .iter()
                    .map(|p| self.write(*p, ctx))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}({})", self.write(*ret, ctx), params_text)
            }
            ExprKind::Compound { op, children } => children
                .iter()
                .map(|c| self.write(*c, ctx))
                .collect::<Vec<_>>()
                .join(&format!(" {} ", op)),
            ExprKind::BoolLiteral(b) => b.to_string(),
        }
    }
}

fn raise_floor(deps: Vec<(DeclId, State)>, floor: State) -> Vec<(DeclId, State)> {
    deps.into_iter().map(|(d, s)| (d, s.max(floor))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlatCtx;
    impl PathContext for FlatCtx {
        fn path_of(&self, decl: DeclId) -> String {
            format!("T{}", decl.0)
        }
    }

    #[test]
    fn interning_is_reference_identity() {
        let mut arena = ExprArena::new();
        let a = arena.literal("Foo");
        let b = arena.literal("Foo");
        assert_eq!(a, b);
        let c = arena.literal("Bar");
        assert_ne!(a, c);
    }

    #[test]
    fn qualifier_composition_is_idempotent_under_reinterning() {
        let mut arena = ExprArena::new();
        let t = arena.literal("T");
        let manual = arena.qualify(t, Qualifier::CONST.union(Qualifier::POINTER));
        let composed = {
            let p = arena.pointer(t);
            arena.const_pointer(p)
        };
        assert_eq!(manual, composed);
    }

    #[test]
    fn union_dedup_collapses_to_single_type() {
        let mut arena = ExprArena::new();
        let t = arena.literal("T");
        let u = arena.union_of(Qualifier::NONE, &[t, t]);
        assert_eq!(u, t);
    }

    #[test]
    fn union_flattens_nested_union() {
        let mut arena = ExprArena::new();
        let a = arena.literal("A");
        let b = arena.literal("B");
        let c = arena.literal("C");
        let inner = arena.union_of(Qualifier::NONE, &[a, b]);
        let outer = arena.union_of(Qualifier::NONE, &[inner, c]);
        let direct = arena.union_of(Qualifier::NONE, &[a, b, c]);
        assert_eq!(outer, direct);
    }

    #[test]
    fn union_absorbs_any_pointer() {
        let mut arena = ExprArena::new();
        let x = arena.literal("X");
        let any_ptr = arena.any_ptr();
        let any = arena.any();
        let u = arena.union_of(Qualifier::NONE, &[x, any_ptr]);
        assert_eq!(u, any);
    }

    #[test]
    fn enable_if_folds_always_true_condition() {
        let mut arena = ExprArena::new();
        let t = arena.literal("T");
        let is_same = arena.literal("is_same");
        let same = arena.template_of(is_same, &[t, t]);
        let folded = arena.enable_if(same, Some(t));
        assert_eq!(folded, t);
    }

    #[test]
    fn qualified_pointer_reduces_dependency_to_partial() {
        let mut arena = ExprArena::new();
        let decl = DeclId(0);
        let ty = arena.declared(decl);
        let ptr = arena.pointer(ty);
        let deps = arena.dependencies(ptr, &|_| false);
        assert_eq!(deps, vec![(decl, State::Partial)]);
    }

    #[test]
    fn member_access_requires_complete() {
        let mut arena = ExprArena::new();
        let decl = DeclId(1);
        let ty = arena.declared(decl);
        let member = arena.member_of(ty, "iterator");
        let deps = arena.dependencies(member, &|_| false);
        assert_eq!(deps, vec![(decl, State::Complete)]);
    }

    #[test]
    fn write_renders_template_application() {
        let mut arena = ExprArena::new();
        let decl = DeclId(5);
        let ty = arena.declared(decl);
        let head = arena.literal("Vector");
        let tmpl = arena.template_of(head, &[ty]);
        assert_eq!(arena.write(tmpl, &FlatCtx), "Vector<T5>");
    }
}
