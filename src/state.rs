//! The two-value completion lattice declarations and dependencies live in.
//!
//! `State` is the state a *requirement* asks for (§3: "State is a total
//! order Partial < Complete"). `CurrentState` additionally tracks that a
//! declaration may not have been touched by the resolver yet.

use std::cmp::Ordering;
use std::fmt;

/// A state a dependency or target can require a declaration to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum State {
    /// The declaration has been forward-declared: its name exists, its
    /// body is unknown.
    Partial,
    /// The declaration has been fully emitted.
    Complete,
}

impl State {
    pub fn max(self, other: State) -> State {
        if self >= other {
            self
        } else {
            other
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Partial => write!(f, "partial"),
            State::Complete => write!(f, "complete"),
        }
    }
}

/// The resolver's per-declaration progress marker.
///
/// Unlike [`State`], a declaration may not have been emitted at all yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurrentState {
    /// Not yet emitted at any state.
    #[default]
    Unresolved,
    Partial,
    Complete,
}

impl CurrentState {
    /// Whether this progress already satisfies a requirement of `needed`.
    pub fn satisfies(self, needed: State) -> bool {
        match (self, needed) {
            (CurrentState::Complete, _) => true,
            (CurrentState::Partial, State::Partial) => true,
            _ => false,
        }
    }

    pub fn advance(&mut self, to: State) {
        let next = match to {
            State::Partial => CurrentState::Partial,
            State::Complete => CurrentState::Complete,
        };
        if self.rank() < next.rank() {
            *self = next;
        }
    }

    fn rank(self) -> u8 {
        match self {
            CurrentState::Unresolved => 0,
            CurrentState::Partial => 1,
            CurrentState::Complete => 2,
        }
    }
}

impl PartialOrd<State> for CurrentState {
    fn partial_cmp(&self, other: &State) -> Option<Ordering> {
        let other_rank = match other {
            State::Partial => 1,
            State::Complete => 2,
        };
        self.rank().partial_cmp(&other_rank)
    }
}

impl PartialEq<State> for CurrentState {
    fn eq(&self, other: &State) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}
