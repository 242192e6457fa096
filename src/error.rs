//! Error types for the declaration graph and dependency resolver.
//!
//! # Error Categories
//!
//! - [`CycleError`]: a dependency chain where some declaration transitively
//!   requires itself at `Complete` with no pointer/reference edge breaking
//!   the chain.
//! - [`EmitError`]: the top-level error returned by [`crate::writer::library::Library::emit`],
//!   wrapping either a [`CycleError`] or an I/O failure from the [`crate::sink::Writer`] sink.
//!
//! "Inconsistent merge" (spec.md §7.2) is deliberately not represented here:
//! it indicates a programmer bug in a `merge` implementation, not a
//! recoverable condition, and is caught with `debug_assert!` at the merge
//! site instead.

use std::fmt;

use thiserror::Error;

use crate::ids::DeclId;
use crate::reference::Reason;

/// One link in a cycle's causal chain.
///
/// Mirrors the reason-stack frame the resolver pushes while resolving a
/// declaration: `decl` is the declaration being resolved, `required` is the
/// state that resolution needed to reach, and `reason` names the role the
/// edge that pulled `decl` into the chain played (base class, member,
/// return type, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleFrame {
    /// The declaration being resolved at this point in the chain.
    pub decl: DeclId,
    /// Human-readable path of the declaration, for display without
    /// re-walking the declaration arena.
    pub decl_path: String,
    /// The role this declaration plays relative to the frame before it.
    pub reason: Reason,
}

/// A dependency cycle the resolver could not break with a forward
/// declaration.
///
/// Carries the full reason-stack at the point of failure, in the order
/// resolution visited it (outermost target first).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct CycleError {
    /// The declaration whose emission triggered the cycle report.
    pub root: DeclId,
    /// Human-readable path of `root`.
    pub root_path: String,
    /// The causal chain, outermost frame first.
    pub chain: Vec<CycleFrame>,
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "dependency cycle detected while generating [{}]",
            self.root_path
        )?;
        for frame in &self.chain {
            writeln!(
                f,
                "  required [{}] because it is referenced as a {} of the previous frame",
                frame.decl_path, frame.reason
            )?;
        }
        Ok(())
    }
}

/// Top-level error surfaced by [`crate::writer::library::Library::emit`].
#[derive(Debug, Error)]
pub enum EmitError {
    /// An unresolvable dependency cycle (see [`CycleError`]).
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// The output sink failed (propagated unmodified per spec.md §7.3).
    #[error("writer sink I/O error: {0}")]
    Io(#[from] std::io::Error),
}
