use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::fa::{StateId, Symbol, Transition, FA};

/// An automaton as handed over by a loader: string state ids, a flat transition list and the
/// initial and final states. Nothing is validated; an unset initial state is the empty id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Automaton {
    #[serde(default)]
    states: BTreeMap<StateId, String>,
    #[serde(default)]
    transitions: Vec<Transition>,
    #[serde(default)]
    initial_state: StateId,
    #[serde(default)]
    final_states: BTreeSet<StateId>,
}

impl Automaton {
    pub fn new() -> Self {
        Automaton::default()
    }

    pub fn add_state(&mut self, id: &str, label: &str) {
        self.states.insert(id.to_string(), label.to_string());
    }

    pub fn add_transition(&mut self, from: &str, symbol: Symbol, to: &str) {
        self.transitions
            .push(Transition::new(symbol, from.to_string(), to.to_string()));
    }

    pub fn set_initial_state(&mut self, id: &str) {
        self.initial_state = id.to_string();
    }

    pub fn add_final_state(&mut self, id: &str) {
        self.final_states.insert(id.to_string());
    }

    pub fn get_states(&self) -> &BTreeMap<StateId, String> {
        &self.states
    }

    pub fn get_transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn get_initial_state(&self) -> &StateId {
        &self.initial_state
    }

    pub fn get_final_states(&self) -> &BTreeSet<StateId> {
        &self.final_states
    }

    /// Every symbol used by a transition, epsilon excluded.
    pub fn input_alphabet(&self) -> BTreeSet<char> {
        self.transitions
            .iter()
            .filter_map(|transition| match transition.get_symbol() {
                Symbol::Char(ch) => Some(ch),
                Symbol::Epsilon => None,
            })
            .collect()
    }

    /// All state ids mentioned anywhere in the description, sorted.
    fn mentioned_states(&self) -> BTreeSet<&StateId> {
        let mut ids: BTreeSet<&StateId> = self.states.keys().collect();
        for transition in &self.transitions {
            ids.insert(transition.get_from());
            ids.insert(transition.get_to());
        }
        ids.insert(&self.initial_state);
        ids.extend(self.final_states.iter());
        ids
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NFAState {
    id: StateId,
    label: String,
    transitions: HashMap<Symbol, BTreeSet<usize>>,
}

impl NFAState {
    fn new(id: StateId, label: String) -> Self {
        NFAState {
            id,
            label,
            transitions: HashMap::new(),
        }
    }

    fn add_transition(&mut self, symbol: Symbol, to: usize) {
        self.transitions.entry(symbol).or_default().insert(to);
    }

    pub fn get_transitions(&self) -> &HashMap<Symbol, BTreeSet<usize>> {
        &self.transitions
    }

    /// Targets reachable from this state on `symbol`, possibly none.
    pub fn targets(&self, symbol: Symbol) -> impl Iterator<Item = usize> + '_ {
        self.transitions.get(&symbol).into_iter().flatten().copied()
    }

    pub fn get_id(&self) -> &StateId {
        &self.id
    }

    pub fn get_label(&self) -> &String {
        &self.label
    }
}

/// Indexed form of an [`Automaton`]. States are numbered in sorted id order, so iterating a bit
/// set over the indices yields ids already sorted.
#[derive(Debug, Clone)]
pub struct NFA {
    states: Vec<NFAState>,
    index: HashMap<StateId, usize>,
    start_state: usize,
    accept_states: BitVec<u8>,
    alphabet: BTreeSet<char>,
}

impl FA for NFA {
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
        let state = &self.states[state_idx];
        let label = state.get_label();
        if label.is_empty() || label == state.get_id() {
            state.get_id().clone()
        } else {
            format!("{} ({})", state.get_id(), label)
        }
    }

    fn get_state_transitions(&self, state_idx: usize) -> Vec<(Symbol, usize)> {
        let mut transition_list: Vec<(Symbol, usize)> = self.states[state_idx]
            .transitions
            .iter()
            .flat_map(|(symbol, targets)| targets.iter().map(move |target| (*symbol, *target)))
            .collect();
        transition_list.sort();
        transition_list
    }
}

impl NFA {
    pub fn get_state(&self, idx: usize) -> &NFAState {
        &self.states[idx]
    }

    /// Position of the state with the given id, if the automaton mentions it.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn is_accepting(&self, idx: usize) -> bool {
        self.accept_states[idx]
    }
}

/// Number the states of `automaton` and group its transitions per source state.
pub fn construct_nfa(automaton: &Automaton) -> NFA {
    let ids = automaton.mentioned_states();

    let mut states = Vec::with_capacity(ids.len());
    let mut index = HashMap::with_capacity(ids.len());

    for (idx, id) in ids.into_iter().enumerate() {
        let label = automaton.states.get(id).cloned().unwrap_or_default();
        states.push(NFAState::new(id.clone(), label));
        index.insert(id.clone(), idx);
    }

    // Every endpoint was collected above, so the lookups cannot miss.
    for transition in &automaton.transitions {
        let from = index[transition.get_from()];
        let to = index[transition.get_to()];
        states[from].add_transition(transition.get_symbol(), to);
    }

    let mut accept_states: BitVec<u8> = BitVec::repeat(false, states.len());
    for id in &automaton.final_states {
        accept_states.set(index[id], true);
    }

    let start_state = index[&automaton.initial_state];

    if automaton.initial_state.is_empty() {
        tracing::warn!("automaton has no initial state, using the empty state id");
    }

    NFA {
        states,
        index,
        start_state,
        accept_states,
        alphabet: automaton.input_alphabet(),
    }
}
