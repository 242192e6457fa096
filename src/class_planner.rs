//! The class body planner (spec.md §4.5).
//!
//! Once the resolver decides a class must reach `Complete`, the planner
//! decides *how* its body is laid out: bases in declaration order,
//! members grouped by visibility (each group emitted once, in the order
//! first seen, spec.md §4.5), and template/using-declaration headers
//! attached where the global passes (`crate::passes`) placed them.

use crate::decl::{DeclArena, DeclKind, NamespaceArena, TemplateInfo, Visibility};
use crate::expr::arena::PathContext;
use crate::expr::ExprArena;
use crate::ids::DeclId;
use crate::options::Options;

/// One member, already rendered to a single-line declaration string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMember {
    pub decl: DeclId,
    pub visibility: Visibility,
    pub text: String,
}

/// The full layout of one class's body, ready for a [`crate::sink::Writer`]
/// to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPlan {
    pub header: String,
    pub bases: Vec<String>,
    /// Visibility groups in first-seen order, each holding its members in
    /// declaration order (spec.md §4.5: members keep declaration order
    /// within a visibility group; groups themselves are not re-sorted
    /// beyond first-seen order, matching how hand-written headers read).
    pub groups: Vec<(Visibility, Vec<PlannedMember>)>,
    /// Rendered `static_assert(...);` lines for the class's SFINAE
    /// constraints (spec.md §4.5), written before any member group. Empty
    /// when the class has none or [`Options::emit_constraints`] is off.
    pub constraints: Vec<String>,
}

/// Renders a declaration's `template<...>` header line, or `None` when it
/// isn't a template (spec.md §6 "declaration text sketch"). Shared by
/// classes, functions, and type aliases, since all three carry the same
/// [`TemplateInfo`] mix-in.
fn render_template_header(template: &TemplateInfo, exprs: &ExprArena, ctx: &DeclCtx<'_>) -> Option<String> {
    if template.is_empty() {
        return None;
    }
    let params = template
        .params
        .iter()
        .map(|p| {
            let kw = if p.variadic { "typename..." } else { "typename" };
            let default = p
                .default
                .map(|d| format!(" = {}", exprs.write(d, ctx)))
                .unwrap_or_default();
            format!("{kw} {}{default}", p.name)
        })
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("template<{params}>"))
}

/// Shortens a [`DeclId`]'s written name relative to the current namespace,
/// or writes it fully qualified per [`Options::fully_qualified_paths`].
/// Shared between [`ClassPlanner`] and [`render_forward_decl`] so both
/// render names identically.
pub struct DeclCtx<'a> {
    pub decls: &'a DeclArena,
    pub namespaces: &'a NamespaceArena,
    pub fully_qualified: bool,
}

impl<'a> PathContext for DeclCtx<'a> {
    fn path_of(&self, decl: DeclId) -> String {
        let name = self.decls.full_path(decl, self.namespaces);
        if self.fully_qualified {
            format!("::{name}")
        } else {
            name
        }
    }
}

/// Builds [`ClassPlan`]s for classes the resolver has driven to `Complete`.
pub struct ClassPlanner<'a> {
    decls: &'a DeclArena,
    exprs: &'a ExprArena,
    namespaces: &'a NamespaceArena,
    options: &'a Options,
}

impl<'a> ClassPlanner<'a> {
    pub fn new(
        decls: &'a DeclArena,
        exprs: &'a ExprArena,
        namespaces: &'a NamespaceArena,
        options: &'a Options,
    ) -> Self {
        Self {
            decls,
            exprs,
            namespaces,
            options,
        }
    }

    fn ctx(&self) -> DeclCtx<'_> {
        DeclCtx {
            decls: self.decls,
            namespaces: self.namespaces,
            fully_qualified: self.options.fully_qualified_paths,
        }
    }

    pub fn plan(&self, id: DeclId) -> ClassPlan {
        let decl = self.decls.get(id);
        let class = decl
            .kind
            .as_class()
            .expect("class_planner: target is not a class");
        let ctx = self.ctx();

        let kw = if class.is_union { "union" } else { "class" };
        let header = match render_template_header(&class.template, self.exprs, &ctx) {
            Some(t) => format!("{t}\n{kw} {}", decl.common.name),
            None => format!("{kw} {}", decl.common.name),
        };

        let bases = class
            .bases
            .iter()
            .map(|b| {
                let vis = match b.visibility {
                    Visibility::Public => "public",
                    Visibility::Protected => "protected",
                    Visibility::Private => "private",
                };
                let virt = if b.is_virtual { "virtual " } else { "" };
                format!("{virt}{vis} {}", self.exprs.write(b.ty, &ctx))
            })
            .collect();

        let mut groups: Vec<(Visibility, Vec<PlannedMember>)> = Vec::new();
        for &member in &class.members {
            let m = self.decls.get(member);
            let text = render_decl_line(self.decls, self.exprs, &ctx, member);
            let group = groups.iter_mut().find(|(v, _)| *v == m.common.visibility);
            let planned = PlannedMember {
                decl: member,
                visibility: m.common.visibility,
                text,
            };
            match group {
                Some((_, members)) => members.push(planned),
                None => groups.push((m.common.visibility, vec![planned])),
            }
        }

        let constraints = if self.options.emit_constraints {
            class
                .constraints
                .iter()
                .map(|&c| format!("static_assert({});", self.exprs.write(c, &ctx)))
                .collect()
        } else {
            Vec::new()
        };

        ClassPlan {
            header,
            bases,
            groups,
            constraints,
        }
    }
}

/// The one-line declaration text for `id`, regardless of whether it's
/// being rendered as a class member or as a top-level forward
/// declaration — the two cases only differ in where the line is placed,
/// never in its text (spec.md §6 "declaration text sketch").
fn render_decl_line(decls: &DeclArena, exprs: &ExprArena, ctx: &DeclCtx<'_>, id: DeclId) -> String {
    let decl = decls.get(id);
    match &decl.kind {
        DeclKind::Class(c) => {
            let kw = if c.is_union { "union" } else { "class" };
            let line = format!("{kw} {};", decl.common.name);
            match render_template_header(&c.template, exprs, ctx) {
                Some(t) => format!("{t}\n{line}"),
                None => line,
            }
        }
        DeclKind::Function(f) => {
            let ret = f
                .return_type
                .map(|t| exprs.write(t, ctx))
                .unwrap_or_else(|| "void".to_string());
            let params = f
                .params
                .iter()
                .map(|p| format!("{} {}", exprs.write(p.ty, ctx), p.name))
                .collect::<Vec<_>>()
                .join(", ");
            let virt = if f.flags.is_virtual { "virtual " } else { "" };
            let statik = if f.flags.is_static { "static " } else { "" };
            let cnst = if f.flags.is_const { " const" } else { "" };
            let line = format!("{virt}{statik}{ret} {}({params}){cnst};", decl.common.name);
            match render_template_header(&f.template, exprs, ctx) {
                Some(t) => format!("{t}\n{line}"),
                None => line,
            }
        }
        DeclKind::Variable(v) => {
            let ty = exprs.write(v.ty, ctx);
            let statik = if v.flags.is_static { "static " } else { "" };
            format!("{statik}{ty} {};", decl.common.name)
        }
        DeclKind::Alias(a) if a.is_using_decl => {
            format!("using {};", exprs.write(a.target, ctx))
        }
        DeclKind::Alias(a) => {
            let ty = exprs.write(a.target, ctx);
            let line = format!("using {} = {ty};", decl.common.name);
            match render_template_header(&a.template, exprs, ctx) {
                Some(t) => format!("{t}\n{line}"),
                None => line,
            }
        }
    }
}

/// Renders the line emitted the moment a declaration first reaches
/// `Partial` (spec.md §4.4): a bare forward declaration for a `Class`, or
/// the complete one-line form for `Function`/`Variable`/`Alias`, whose
/// `maxState` is `Partial` to begin with.
pub fn render_forward_decl(
    decls: &DeclArena,
    exprs: &ExprArena,
    ctx: &DeclCtx<'_>,
    id: DeclId,
) -> String {
    render_decl_line(decls, exprs, ctx, id)
}
