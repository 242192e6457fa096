//! The dependency resolver (spec.md §4.4).
//!
//! Drives every declaration reachable from a set of emission targets up to
//! the state it needs to reach, emitting a forward declaration the moment
//! `Partial` is reached and a full body the moment `Complete` is reached,
//! and reporting an unresolvable cycle with the causal chain that produced
//! it.

use crate::class_planner::{self, ClassPlan, ClassPlanner};
use crate::decl::{DeclArena, NamespaceArena};
use crate::error::{CycleError, CycleFrame, EmitError};
use crate::expr::ExprArena;
use crate::ids::{DeclId, NsId};
use crate::options::Options;
use crate::reference::Reason;
use crate::state::State;

/// A request to emit one declaration at a given state — the unit of work
/// a `Library` hands the resolver (spec.md §4.4 "Target").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub decl: DeclId,
    pub state: State,
}

/// Receives already-rendered text as declarations cross a state boundary.
/// The resolver computes `text`/`plan` using a transient shared borrow of
/// the declaration arena and hands over owned data, so it never needs to
/// share its exclusive borrow with the sink — it only decides *when* each
/// declaration is ready, [`crate::class_planner`] decides *what* the text
/// looks like.
pub trait EmitSink {
    fn emit_forward_decl(
        &mut self,
        decl: DeclId,
        namespace: Option<NsId>,
        text: &str,
    ) -> std::io::Result<()>;
    fn emit_complete(
        &mut self,
        decl: DeclId,
        namespace: Option<NsId>,
        plan: &ClassPlan,
    ) -> std::io::Result<()>;
}

struct StackFrame {
    decl: DeclId,
    required: State,
    reason: Reason,
}

/// Runs the resolver over one [`DeclArena`]. Borrows the declaration and
/// expression arenas mutably/immutably for the duration of a run; a
/// `Library::emit` call owns one of these per invocation.
pub struct Resolver<'a> {
    decls: &'a mut DeclArena,
    exprs: &'a ExprArena,
    namespaces: &'a NamespaceArena,
    options: &'a Options,
    stack: Vec<StackFrame>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        decls: &'a mut DeclArena,
        exprs: &'a ExprArena,
        namespaces: &'a NamespaceArena,
        options: &'a Options,
    ) -> Self {
        Self {
            decls,
            exprs,
            namespaces,
            options,
            stack: Vec::new(),
        }
    }

    /// Resolves every target in order, continuing past a cycle in
    /// `ignore_errors` mode (best-effort partial output, spec.md §9) and
    /// otherwise stopping at the first failure.
    pub fn run(&mut self, targets: &[Target], sink: &mut dyn EmitSink) -> Result<(), EmitError> {
        for target in targets {
            let result = self.resolve_to(target.decl, target.state, Reason::Type, sink);
            match result {
                Ok(()) => {}
                Err(EmitError::Cycle(e)) if self.options.ignore_errors => {
                    tracing::warn!(cycle = %e, "ignoring unresolvable cycle, continuing with partial output");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn resolve_to(
        &mut self,
        id: DeclId,
        needed: State,
        reason: Reason,
        sink: &mut dyn EmitSink,
    ) -> Result<(), EmitError> {
        if self.decls.get(id).common.current_state.satisfies(needed) {
            return Ok(());
        }

        if let Some(pos) = self.stack.iter().position(|f| f.decl == id) {
            let in_flight = self.stack[pos].required;
            if in_flight >= needed {
                // Tolerable back-edge: whatever is already resolving this
                // declaration will discharge our requirement too.
                return Ok(());
            }
            return Err(EmitError::Cycle(self.build_cycle_error(pos, id, needed)));
        }

        self.stack.push(StackFrame {
            decl: id,
            required: needed,
            reason,
        });

        let deps = self.decls.direct_dependencies(id, needed, self.exprs);
        for dep in deps {
            if let Err(e) = self.resolve_to(dep.on, dep.state, dep.reason, sink) {
                // Keep the stack consistent for whatever the caller does
                // next (another top-level target, possibly under
                // `ignore_errors`) even though this branch failed.
                self.stack.pop();
                return Err(e);
            }
        }

        self.stack.pop();

        let prev = self.decls.get(id).common.current_state;
        self.decls.get_mut(id).common.current_state.advance(needed);
        tracing::debug!(?id, %needed, "declaration advanced");

        let namespace = self.decls.namespace_of(id);

        if !prev.satisfies(State::Partial) {
            let ctx = class_planner::DeclCtx {
                decls: self.decls,
                namespaces: self.namespaces,
                fully_qualified: self.options.fully_qualified_paths,
            };
            let text = class_planner::render_forward_decl(self.decls, self.exprs, &ctx, id);
            sink.emit_forward_decl(id, namespace, &text)?;
        }
        if needed == State::Complete && !prev.satisfies(State::Complete) {
            let planner = ClassPlanner::new(self.decls, self.exprs, self.namespaces, self.options);
            let plan = planner.plan(id);
            sink.emit_complete(id, namespace, &plan)?;
        }
        Ok(())
    }

    fn build_cycle_error(&self, from: usize, closing: DeclId, needed: State) -> CycleError {
        let root = self.stack[from].decl;
        let root_path = self.decls.full_path(root, self.namespaces);
        let mut chain: Vec<CycleFrame> = self.stack[from..]
            .iter()
            .map(|f| CycleFrame {
                decl: f.decl,
                decl_path: self.decls.full_path(f.decl, self.namespaces),
                reason: f.reason,
            })
            .collect();
        chain.push(CycleFrame {
            decl: closing,
            decl_path: self.decls.full_path(closing, self.namespaces),
            reason: chain
                .last()
                .map(|f| f.reason)
                .unwrap_or(Reason::Type),
        });
        let _ = needed;
        CycleError {
            root,
            root_path,
            chain,
        }
    }
}
