//! Stable arena identifiers.
//!
//! The declaration graph is cyclic in two dimensions (parent/child and
//! type-reference pointers), so nodes are addressed by small index
//! handles into an arena rather than by native pointers or `Rc`.

use std::fmt;

macro_rules! arena_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub(crate) u32);

        impl $name {
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

arena_id!(DeclId, "Identity of a declaration in a `Library`'s arena.");
arena_id!(ExprId, "Identity of an interned expression/type in an `ExprArena`.");
arena_id!(NsId, "Identity of a namespace path element.");
arena_id!(FileId, "Identity of an output file owned by a `Library`.");
