//! The declaration graph (spec.md §3 "Declaration", §4.2, §4.3).
//!
//! Declarations live in one flat arena, identified by [`DeclId`], rather
//! than as owned trees — a class's bases, members, and a function's
//! parameter/return types all point across the arena by id, which is how
//! the graph tolerates the cycles real header libraries have (a class that
//! refers to itself through a pointer member, two classes that reference
//! each other, and so on).

pub mod alias;
pub mod builder;
pub mod class;
pub mod function;
pub mod namespace;
pub mod template;
pub mod variable;

pub use alias::AliasDecl;
pub use class::{BaseClass, ClassDecl};
pub use function::{FunctionDecl, FunctionFlags, Param};
pub use namespace::NamespaceArena;
pub use template::{TemplateInfo, TemplateParam};
pub use variable::{VariableDecl, VariableFlags};

use crate::expr::ExprArena;
use crate::ids::{DeclId, NsId};
use crate::reference::{Reason, ReferenceData};
use crate::state::{CurrentState, State};

/// Access control a member declaration was declared under (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// What a declaration is nested directly inside.
///
/// Namespaces are deliberately not a `DeclKind` variant (spec.md §3): they
/// never need forward declaration, never participate in the resolver, and
/// can't cycle, so modeling them as graph nodes would just be dead weight
/// on every lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parent {
    Decl(DeclId),
    Namespace(NsId),
}

/// The payload specific to each declaration kind.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeclKind {
    Class(ClassDecl),
    Function(FunctionDecl),
    Variable(VariableDecl),
    Alias(AliasDecl),
}

impl DeclKind {
    /// The strongest state this kind of declaration can ever reach
    /// (spec.md §3, §9 open question: "non-class declarations never reach
    /// Complete").
    pub fn max_state(&self) -> State {
        match self {
            DeclKind::Class(_) => State::Complete,
            DeclKind::Function(_) | DeclKind::Variable(_) | DeclKind::Alias(_) => State::Partial,
        }
    }

    pub fn as_class(&self) -> Option<&ClassDecl> {
        match self {
            DeclKind::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut ClassDecl> {
        match self {
            DeclKind::Class(c) => Some(c),
            _ => None,
        }
    }
}

/// Fields shared by every declaration kind.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclCommon {
    pub name: String,
    pub parent: Option<Parent>,
    pub visibility: Visibility,
    /// Set by [`crate::reference::ReferenceAnalyzer`]: whether some
    /// reference elsewhere forces this declaration to be emitted complete
    /// within its enclosing class rather than just forward-declared.
    pub referenced: bool,
    /// The first reference that set `referenced` (spec.md §3 "first
    /// reference wins").
    pub reference_data: Option<ReferenceData>,
    pub current_state: CurrentState,
    /// Which output file a global declaration is steered towards
    /// (spec.md §4.7 "Globals are declarations registered at library
    /// scope but tagged with a preferred file"). `None` for members
    /// (meaningless — they ride along with their enclosing class) and for
    /// anything emitted through the single-file [`crate::writer::library`]
    /// path, which ignores this field entirely.
    pub preferred_file: Option<crate::ids::FileId>,
}

impl DeclCommon {
    fn new(name: String, parent: Option<Parent>) -> Self {
        Self {
            name,
            parent,
            visibility: Visibility::default(),
            referenced: false,
            reference_data: None,
            current_state: CurrentState::default(),
            preferred_file: None,
        }
    }
}

/// A node in the declaration graph: shared bookkeeping plus a
/// kind-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Declaration {
    pub common: DeclCommon,
    pub kind: DeclKind,
}

/// One edge `direct_dependencies` reports: reaching `state` on `d`
/// requires reaching `state` on `on`, because of `reason`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    pub on: DeclId,
    pub state: State,
    pub reason: Reason,
}

/// The arena owning every declaration in one run (spec.md §9 "global
/// intern table scoped per-run" — the declaration arena follows the same
/// per-`Library` scoping).
#[derive(Debug, Default)]
pub struct DeclArena {
    nodes: Vec<Declaration>,
}

impl DeclArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, name: impl Into<String>, parent: Option<Parent>, kind: DeclKind) -> DeclId {
        let id = DeclId(self.nodes.len() as u32);
        self.nodes.push(Declaration {
            common: DeclCommon::new(name.into(), parent),
            kind,
        });
        id
    }

    pub fn declare_class(
        &mut self,
        name: impl Into<String>,
        parent: Option<Parent>,
        class: ClassDecl,
    ) -> DeclId {
        self.push(name, parent, DeclKind::Class(class))
    }

    pub fn declare_function(
        &mut self,
        name: impl Into<String>,
        parent: Option<Parent>,
        function: FunctionDecl,
    ) -> DeclId {
        self.push(name, parent, DeclKind::Function(function))
    }

    pub fn declare_variable(
        &mut self,
        name: impl Into<String>,
        parent: Option<Parent>,
        variable: VariableDecl,
    ) -> DeclId {
        self.push(name, parent, DeclKind::Variable(variable))
    }

    pub fn declare_alias(
        &mut self,
        name: impl Into<String>,
        parent: Option<Parent>,
        alias: AliasDecl,
    ) -> DeclId {
        self.push(name, parent, DeclKind::Alias(alias))
    }

    /// Links `child` into `parent`'s member list, setting `child`'s parent
    /// pointer and visibility. `parent` must be a `Class`.
    pub fn add_member(&mut self, parent: DeclId, child: DeclId, visibility: Visibility) {
        self.nodes[child.index()].common.parent = Some(Parent::Decl(parent));
        self.nodes[child.index()].common.visibility = visibility;
        match &mut self.nodes[parent.index()].kind {
            DeclKind::Class(c) => c.members.push(child),
            _ => panic!("add_member: parent {parent} is not a class"),
        }
    }

    /// Tags a global declaration with the output file it should be
    /// steered into (spec.md §4.7). Only meaningful for declarations
    /// emitted through [`crate::writer::files`]'s multi-file path.
    pub fn set_preferred_file(&mut self, id: DeclId, file: crate::ids::FileId) {
        self.nodes[id.index()].common.preferred_file = Some(file);
    }

    pub fn get(&self, id: DeclId) -> &Declaration {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, d)| (DeclId(i as u32), d))
    }

    /// Direct children: a class's members, empty for every other kind
    /// (spec.md §4.3 "repeat for each child of D").
    pub fn children_of(&self, id: DeclId) -> Vec<DeclId> {
        match &self.nodes[id.index()].kind {
            DeclKind::Class(c) => c.members.clone(),
            _ => Vec::new(),
        }
    }

    pub fn has_constraints(&self, id: DeclId) -> bool {
        self.nodes[id.index()]
            .kind
            .as_class()
            .map(ClassDecl::has_constraints)
            .unwrap_or(false)
    }

    /// What reaching `needed` on `id` directly requires (spec.md §4.4.1):
    /// for a `Class`, `Partial` needs nothing and `Complete` needs its
    /// bases, constraints, referenced members (forced to `Complete`), and
    /// every other member's own dependencies (at whatever floor the
    /// member's type algebra gives them — usually `Partial`, just enough
    /// to forward-declare a type this class body names); for everything
    /// else `needed` is irrelevant — their one textual form always carries
    /// their real return/parameter/variable/alias-target dependencies.
    pub fn direct_dependencies(
        &self,
        id: DeclId,
        needed: State,
        exprs: &ExprArena,
    ) -> Vec<Dependency> {
        let has_constraints = |d: DeclId| self.has_constraints(d);
        match &self.nodes[id.index()].kind {
            DeclKind::Class(c) => {
                if needed == State::Partial {
                    return Vec::new();
                }
                let mut out = Vec::new();
                for base in &c.bases {
                    // A base class always requires Complete: layout and
                    // member lookup through inheritance need the full
                    // definition regardless of how the type expression
                    // alone would reduce.
                    for (on, _) in exprs.dependencies(base.ty, &has_constraints) {
                        out.push(Dependency {
                            on,
                            state: State::Complete,
                            reason: Reason::BaseClass,
                        });
                    }
                }
                for &constraint in &c.constraints {
                    for (on, state) in exprs.dependencies(constraint, &has_constraints) {
                        out.push(Dependency {
                            on,
                            state,
                            reason: Reason::Constraint,
                        });
                    }
                }
                for &member in &c.members {
                    if self.nodes[member.index()].common.referenced {
                        out.push(Dependency {
                            on: member,
                            state: State::Complete,
                            reason: Reason::InnerClass,
                        });
                    } else {
                        // Not forced to Complete, but the member's own type
                        // still needs to be at least forward-declared before
                        // this class body can mention it by name.
                        out.extend(self.direct_dependencies(member, State::Partial, exprs));
                    }
                }
                out
            }
            DeclKind::Function(f) => {
                let mut out = Vec::new();
                if let Some(ret) = f.return_type {
                    for (on, state) in exprs.dependencies(ret, &has_constraints) {
                        out.push(Dependency {
                            on,
                            state,
                            reason: Reason::ReturnType,
                        });
                    }
                }
                for param in &f.params {
                    for (on, state) in exprs.dependencies(param.ty, &has_constraints) {
                        out.push(Dependency {
                            on,
                            state,
                            reason: Reason::ParameterType,
                        });
                    }
                }
                out
            }
            DeclKind::Variable(v) => exprs
                .dependencies(v.ty, &has_constraints)
                .into_iter()
                .map(|(on, state)| Dependency {
                    on,
                    state,
                    reason: Reason::Type,
                })
                .collect(),
            DeclKind::Alias(a) => exprs
                .dependencies(a.target, &has_constraints)
                .into_iter()
                .map(|(on, state)| Dependency {
                    on,
                    state,
                    reason: Reason::AliasType,
                })
                .collect(),
        }
    }

    /// `::`-separated path from the outermost namespace/class down to
    /// `id`, e.g. `ns::Outer::Inner`.
    pub fn full_path(&self, id: DeclId, namespaces: &NamespaceArena) -> String {
        let mut segments = vec![self.nodes[id.index()].common.name.clone()];
        let mut cur = self.nodes[id.index()].common.parent;
        let mut ns_prefix = None;
        loop {
            match cur {
                Some(Parent::Decl(p)) => {
                    segments.push(self.nodes[p.index()].common.name.clone());
                    cur = self.nodes[p.index()].common.parent;
                }
                Some(Parent::Namespace(ns)) => {
                    ns_prefix = Some(namespaces.full_path(ns));
                    break;
                }
                None => break,
            }
        }
        segments.reverse();
        let joined = segments.join("::");
        match ns_prefix {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}::{joined}"),
            _ => joined,
        }
    }

    /// The namespace `id` is emitted into: walks up past any enclosing
    /// class/function scopes (`Parent::Decl`) to the first
    /// `Parent::Namespace`, or `None` if `id` sits at the global scope
    /// (spec.md §4.2 — only top-level declarations the writer emits
    /// directly ever need this; members are part of their class's text).
    pub fn namespace_of(&self, id: DeclId) -> Option<NsId> {
        let mut cur = id;
        loop {
            match self.nodes[cur.index()].common.parent {
                Some(Parent::Namespace(ns)) => return Some(ns),
                Some(Parent::Decl(parent)) => cur = parent,
                None => return None,
            }
        }
    }
}
