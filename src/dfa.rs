/* Perform subset construction to convert an NFA into a DFA. Each DFA state stands for the
 * epsilon-closed set of NFA states it was discovered from. */

use crate::closure::{to_state_set, EpsilonClosures};
use crate::fa::{StateSet, Symbol, Transition, FA};
use crate::nfa::NFA;
use bitvec::prelude::*;
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::hash::{DefaultHasher, Hash, Hasher};
use tracing::{debug, trace};

/// A bitvec and its hash stored together, so the worklist map does not rehash whole sets on
/// every lookup.
#[derive(Clone)]
struct HashedBitVec {
    bv: BitVec<u8>,
    hash: u64,
}

impl HashedBitVec {
    fn new(bv: BitVec<u8>) -> Self {
        let mut hasher = DefaultHasher::new();
        bv.hash(&mut hasher);
        let hash = hasher.finish();
        Self { bv, hash }
    }
}

impl Hash for HashedBitVec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl PartialEq for HashedBitVec {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.bv == other.bv
    }
}

impl Eq for HashedBitVec {}

#[derive(Debug, Clone)]
pub struct DFA {
    states: Vec<DFAState>,
    index: HashMap<StateSet, usize>,
    start_state: usize,
    accept_states: BitVec<u8>,
    alphabet: BTreeSet<char>,
}

#[derive(Debug, Clone)]
pub struct DFAState {
    id: StateSet,
    transitions: HashMap<Symbol, usize>,
}

impl FA for DFA {
    fn get_num_states(&self) -> usize {
        self.states.len()
    }

    fn get_start_state(&self) -> usize {
        self.start_state
    }

    fn get_alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    fn get_acceptor_states(&self) -> &BitVec<u8> {
        &self.accept_states
    }

    fn get_state_label(&self, state_idx: usize) -> String {
        self.states[state_idx].id.to_string()
    }

    fn get_state_transitions(&self, state_idx: usize) -> Vec<(Symbol, usize)> {
        let mut transition_list: Vec<(Symbol, usize)> = self.states[state_idx]
            .transitions
            .iter()
            .map(|(symbol, target)| (*symbol, *target))
            .collect();
        transition_list.sort();
        transition_list
    }
}

impl DFAState {
    fn new(id: StateSet) -> Self {
        DFAState {
            id,
            transitions: HashMap::new(),
        }
    }

    /// The set of NFA states this DFA state represents.
    pub fn get_id(&self) -> &StateSet {
        &self.id
    }

    /// Get a list of all outgoing transitions for the given state
    pub fn get_transitions(&self) -> &HashMap<Symbol, usize> {
        &self.transitions
    }
}

impl DFA {
    fn new(alphabet: BTreeSet<char>) -> Self {
        DFA {
            states: Vec::new(),
            index: HashMap::new(),
            start_state: 0,
            accept_states: BitVec::new(),
            alphabet,
        }
    }

    fn add_state(&mut self, id: StateSet, accepting: bool) -> usize {
        let state_id = self.states.len();
        self.index.insert(id.clone(), state_id);
        self.states.push(DFAState::new(id));
        self.accept_states.push(accepting);
        state_id
    }

    /// Returns a reference to the DFA state whose position is provided
    pub fn get_state(&self, idx: usize) -> &DFAState {
        &self.states[idx]
    }

    /// Position of the DFA state standing for exactly `id`, if it was discovered.
    pub fn find_state(&self, id: &StateSet) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get_initial_state(&self) -> &StateSet {
        &self.states[self.start_state].id
    }

    pub fn is_accepting(&self, idx: usize) -> bool {
        self.accept_states[idx]
    }

    /// The final states in discovery order.
    pub fn get_final_states(&self) -> Vec<&StateSet> {
        self.accept_states
            .iter_ones()
            .map(|idx| &self.states[idx].id)
            .collect()
    }

    /// The state reached from `state` on `ch`, if that transition exists.
    pub fn next_state(&self, state: usize, ch: char) -> Option<usize> {
        self.states[state]
            .transitions
            .get(&Symbol::Char(ch))
            .copied()
    }

    /// Every transition, ordered by source state (discovery order) then by symbol.
    pub fn get_transitions(&self) -> Vec<Transition<StateSet>> {
        let mut transition_list = Vec::new();
        for state_idx in 0..self.states.len() {
            for (symbol, target) in self.get_state_transitions(state_idx) {
                transition_list.push(Transition::new(
                    symbol,
                    self.states[state_idx].id.clone(),
                    self.states[target].id.clone(),
                ));
            }
        }
        transition_list
    }
}

///  Apply the subset construction algorithm on an NFA to build a DFA. The DFA is partial: a
///  state with no NFA move on a symbol gets no transition on it instead of a trap state.
pub fn construct_dfa(nfa: &NFA) -> DFA {
    let closures = EpsilonClosures::compute(nfa);

    let mut result = DFA::new(nfa.get_alphabet().clone()); // DFA has same alphabet as NFA
    let nfa_accepts = nfa.get_acceptor_states();

    let mut q_list: HashMap<HashedBitVec, usize> = HashMap::new(); // Mapping from nfa state set to DFA state
    let mut work_list: VecDeque<(HashedBitVec, usize)> = VecDeque::new();

    let q0 = HashedBitVec::new(closures.get(nfa.get_start_state()).clone());
    let has_common = (q0.bv.clone() & nfa_accepts.as_bitslice()).any();
    let d0 = result.add_state(to_state_set(nfa, &q0.bv), has_common);
    result.start_state = d0;

    debug!("initial DFA state {}", result.states[d0].id);

    q_list.insert(q0.clone(), d0);
    work_list.push_back((q0, d0));

    while let Some((q, dq)) = work_list.pop_front() {
        for c in nfa.get_alphabet().iter() {
            let t = closures.step(nfa, &q.bv, *c);
            if t.not_any() {
                continue;
            }

            let t = HashedBitVec::new(t);

            let dt = match q_list.entry(t) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    // Finality is decided once, when the set is first seen.
                    let has_common = (entry.key().bv.clone() & nfa_accepts.as_bitslice()).any();
                    let dt = result.add_state(to_state_set(nfa, &entry.key().bv), has_common);

                    debug!(
                        "discovered DFA state {} (final: {})",
                        result.states[dt].id, has_common
                    );

                    work_list.push_back((entry.key().clone(), dt));
                    entry.insert(dt);
                    dt
                }
            };

            trace!("{} --{}--> {}", result.states[dq].id, c, result.states[dt].id);

            result.states[dq].transitions.insert(Symbol::Char(*c), dt);
        }
    }

    debug!(
        "subset construction finished with {} states",
        result.states.len()
    );

    result
}
