use bitvec::prelude::BitVec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifier of a state as it appears in an automaton description.
pub type StateId = String;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    Epsilon,
    Char(char),
}

impl Symbol {
    /// Marker used for epsilon in text descriptions and reports.
    pub const EPSILON_MARKER: &'static str = "#";

    /// Read a symbol from its textual form. `#` and the empty string are epsilon, anything else
    /// must be a single character. Longer strings are not symbols.
    pub fn parse(text: &str) -> Option<Symbol> {
        if text.is_empty() || text == Self::EPSILON_MARKER {
            return Some(Symbol::Epsilon);
        }
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(Symbol::Char(ch)),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "{}", Self::EPSILON_MARKER),
            Symbol::Char(ch) => write!(f, "{}", ch),
        }
    }
}

/// A single labelled edge between two states.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition<S = StateId> {
    symbol: Symbol,
    from: S,
    to: S,
}

impl<S> Transition<S> {
    pub fn new(symbol: Symbol, from: S, to: S) -> Self {
        Transition { symbol, from, to }
    }

    pub fn get_symbol(&self) -> Symbol {
        self.symbol
    }

    pub fn get_from(&self) -> &S {
        &self.from
    }

    pub fn get_to(&self) -> &S {
        &self.to
    }
}

/// Canonical identity of a DFA state: the sorted, deduplicated set of NFA states it stands for.
/// Two sets built from the same NFA states in any order compare and hash equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StateSet(BTreeSet<StateId>);

impl StateSet {
    pub fn iter(&self) -> impl Iterator<Item = &StateId> {
        self.0.iter()
    }

    pub fn contains(&self, state: &str) -> bool {
        self.0.contains(state)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn intersects(&self, states: &BTreeSet<StateId>) -> bool {
        self.0.iter().any(|state| states.contains(state))
    }
}

impl<S: Into<StateId>> FromIterator<S> for StateSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        StateSet(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, state) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", state)?;
        }
        write!(f, "}}")
    }
}

/// Read access shared by the NFA and the DFA. States are addressed by their position
/// `0..get_num_states()`, which is what the renderers iterate over.
pub trait FA {
    fn get_num_states(&self) -> usize;
    fn get_start_state(&self) -> usize;
    fn get_alphabet(&self) -> &BTreeSet<char>;
    fn get_acceptor_states(&self) -> &BitVec<u8>;
    fn get_state_label(&self, state_idx: usize) -> String;
    fn get_state_transitions(&self, state_idx: usize) -> Vec<(Symbol, usize)>;
}
