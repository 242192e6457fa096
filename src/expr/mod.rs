//! The expression/type algebra (spec.md §4.1).
//!
//! Everything here is immutable once interned: constructing an equivalent
//! expression a second time returns the same [`ExprId`], so equality and
//! hashing of values built through this module are reference-identity on
//! the underlying arena slot.

pub mod arena;

use std::fmt;

use crate::ids::{DeclId, ExprId};
use crate::state::State;

pub use arena::ExprArena;

/// Qualifier bits composable on any expression (spec.md §3 "Qualified").
///
/// Writing order is fixed regardless of composition order: `const`, the
/// base type, `*`, `&`/`&&`, then `...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Qualifier(u8);

impl Qualifier {
    pub const NONE: Qualifier = Qualifier(0);
    pub const CONST: Qualifier = Qualifier(1 << 0);
    pub const POINTER: Qualifier = Qualifier(1 << 1);
    pub const REFERENCE: Qualifier = Qualifier(1 << 2);
    pub const RVALUE_REF: Qualifier = Qualifier(1 << 3);
    pub const VARIADIC: Qualifier = Qualifier(1 << 4);

    pub const fn contains(self, other: Qualifier) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Qualifier) -> Qualifier {
        Qualifier(self.0 | other.0)
    }

    pub const fn remove(self, other: Qualifier) -> Qualifier {
        Qualifier(self.0 & !other.0)
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether this qualifier alone reduces an inner dependency to `Partial`
    /// (spec.md §3: any of Pointer/Reference/RValueRef set → Partial).
    pub const fn reduces_to_partial(self) -> bool {
        self.contains(Qualifier::POINTER)
            || self.contains(Qualifier::REFERENCE)
            || self.contains(Qualifier::RVALUE_REF)
    }

    fn write_prefix(self, out: &mut String) {
        if self.contains(Qualifier::CONST) {
            out.push_str("const ");
        }
    }

    fn write_suffix(self, out: &mut String) {
        if self.contains(Qualifier::POINTER) {
            out.push('*');
        }
        if self.contains(Qualifier::RVALUE_REF) {
            out.push_str("&&");
        } else if self.contains(Qualifier::REFERENCE) {
            out.push('&');
        }
        if self.contains(Qualifier::VARIADIC) {
            out.push_str("...");
        }
    }
}

/// Logical operator for a [`ExprKind::Compound`] boolean expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoolOp {
    And,
    Or,
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolOp::And => write!(f, "&&"),
            BoolOp::Or => write!(f, "||"),
        }
    }
}

/// The interned variants of the expression/type sum (spec.md §3 table).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    /// A bare textual name, e.g. a built-in (`void`, `int`) or a
    /// type-parameter reference.
    LiteralName(String),
    /// A reference to a declared class.
    Declared(DeclId),
    /// `inner` wrapped in qualifier bits. `inner_state`, when set,
    /// overrides the default Partial-via-pointer reduction so the inner
    /// type is required at `Complete` even through a pointer/reference
    /// (used for template parameters of constrained class heads).
    Qualified {
        inner: ExprId,
        quals: Qualifier,
        inner_state: Option<State>,
    },
    /// `inner::member`.
    Member { inner: ExprId, member: String },
    /// `head<args...>`.
    Template { head: ExprId, args: Vec<ExprId> },
    /// A C-style function type, always written wrapped in `_Function<...>`
    /// by [`ExprArena::function_of`].
    Function { ret: ExprId, params: Vec<ExprId> },
    /// `children[0] op children[1] op ...`.
    Compound { op: BoolOp, children: Vec<ExprId> },
    /// `true` or `false`.
    BoolLiteral(bool),
}

impl ExprKind {
    /// The structural key this variant interns under. Two `ExprKind`
    /// values intern to the same [`ExprId`] iff their keys are equal
    /// (spec.md §3 interning invariant).
    pub(crate) fn structural_key(&self) -> String {
        match self {
            ExprKind::LiteralName(n) => format!("N:{n}"),
            ExprKind::Declared(d) => format!("D:{}", d.0),
            ExprKind::Qualified {
                inner,
                quals,
                inner_state,
            } => format!(
                "Q:{}:{}:{:?}",
                inner.0,
                quals.bits(),
                inner_state.map(|s| s as u8)
            ),
            ExprKind::Member { inner, member } => format!("M:{}:{member}", inner.0),
            ExprKind::Template { head, args } => format!(
                "T:{}:{}",
                head.0,
                args.iter().map(|a| a.0.to_string()).collect::<Vec<_>>().join(",")
            ),
            ExprKind::Function { ret, params } => format!(
                "F:{}:{}",
                ret.0,
                params.iter().map(|p| p.0.to_string()).collect::<Vec<_>>().join(",")
            ),
            ExprKind::Compound { op, children } => format!(
                "C:{:?}:{}",
                op,
                children.iter().map(|c| c.0.to_string()).collect::<Vec<_>>().join(",")
            ),
            ExprKind::BoolLiteral(b) => format!("B:{b}"),
        }
    }
}
