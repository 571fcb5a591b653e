/* Epsilon closures over the indexed NFA. The traversal is an explicit stack guarded by a visited
 * bit set so cycles of epsilon transitions terminate. */

use bitvec::prelude::*;

use crate::fa::{StateSet, Symbol, FA};
use crate::nfa::NFA;

/// Closure of a single indexed state, as a bit set over the NFA's state indices.
fn closure_bits(nfa: &NFA, state: usize) -> BitVec<u8> {
    let mut visited: BitVec<u8, Lsb0> = BitVec::repeat(false, nfa.get_num_states());
    let mut stack: Vec<usize> = vec![state];

    visited.set(state, true);

    while let Some(current) = stack.pop() {
        for target in nfa.get_state(current).targets(Symbol::Epsilon) {
            if !visited[target] {
                visited.set(target, true);
                stack.push(target);
            }
        }
    }

    visited
}

/// Translate a bit set over state indices back into the original state ids.
pub fn to_state_set(nfa: &NFA, states: &BitVec<u8>) -> StateSet {
    states
        .iter_ones()
        .map(|idx| nfa.get_state(idx).get_id().clone())
        .collect()
}

/// States reachable from `state` through epsilon transitions only, `state` included. An id the
/// automaton never mentions has no transitions, so its closure is just itself.
pub fn epsilon_closure(nfa: &NFA, state: &str) -> StateSet {
    match nfa.index_of(state) {
        Some(idx) => to_state_set(nfa, &closure_bits(nfa, idx)),
        None => [state].into_iter().collect(),
    }
}

/// The epsilon closure of every NFA state, computed once and read many times during subset
/// construction.
#[derive(Debug, Clone)]
pub struct EpsilonClosures {
    closures: Vec<BitVec<u8>>,
}

impl EpsilonClosures {
    pub fn compute(nfa: &NFA) -> Self {
        let closures = (0..nfa.get_num_states())
            .map(|state| closure_bits(nfa, state))
            .collect();
        EpsilonClosures { closures }
    }

    pub fn get(&self, state: usize) -> &BitVec<u8> {
        &self.closures[state]
    }

    /// Union of the closures of every state in `states`.
    pub fn closure_of_set(&self, states: &BitVec<u8>) -> BitVec<u8> {
        let mut result: BitVec<u8> = BitVec::repeat(false, states.len());
        for state in states.iter_ones() {
            result |= self.get(state).as_bitslice();
        }
        result
    }

    /// Union of the closures of every state reachable from a member of `states` on `ch`. Empty
    /// when no member has a transition on `ch`.
    pub fn step(&self, nfa: &NFA, states: &BitVec<u8>, ch: char) -> BitVec<u8> {
        let mut result: BitVec<u8> = BitVec::repeat(false, states.len());
        for state in states.iter_ones() {
            for target in nfa.get_state(state).targets(Symbol::Char(ch)) {
                result |= self.get(target).as_bitslice();
            }
        }
        result
    }
}

#[cfg(test)]
mod closure_tests {
    use super::*;
    use crate::nfa::{construct_nfa, Automaton};

    fn set(ids: &[&str]) -> StateSet {
        ids.iter().copied().collect()
    }

    fn epsilon_chain() -> NFA {
        // 0 -#-> 1 -#-> 2 -#-> 0 is a cycle, 3 hangs off 2 on a letter only.
        let mut automaton = Automaton::new();
        automaton.add_transition("0", Symbol::Epsilon, "1");
        automaton.add_transition("1", Symbol::Epsilon, "2");
        automaton.add_transition("2", Symbol::Epsilon, "0");
        automaton.add_transition("2", Symbol::Char('a'), "3");
        automaton.add_transition("3", Symbol::Epsilon, "3");
        automaton.set_initial_state("0");
        automaton.add_final_state("3");
        construct_nfa(&automaton)
    }

    #[test]
    fn test_closure_terminates_on_cycle() {
        let nfa = epsilon_chain();
        assert_eq!(epsilon_closure(&nfa, "0"), set(&["0", "1", "2"]));
        assert_eq!(epsilon_closure(&nfa, "2"), set(&["0", "1", "2"]));
    }

    #[test]
    fn test_closure_self_loop_and_no_epsilon() {
        let nfa = epsilon_chain();
        assert_eq!(epsilon_closure(&nfa, "3"), set(&["3"]));
    }

    #[test]
    fn test_closure_of_unknown_state_is_singleton() {
        let nfa = epsilon_chain();
        assert_eq!(epsilon_closure(&nfa, "missing"), set(&["missing"]));
    }

    #[test]
    fn test_closures_are_reflexive_and_closed() {
        let nfa = epsilon_chain();
        let closures = EpsilonClosures::compute(&nfa);

        for state in 0..nfa.get_num_states() {
            let closure = closures.get(state);
            assert!(closure[state]);
            assert_eq!(&closures.closure_of_set(closure), closure);
        }
    }

    #[test]
    fn test_step_unions_target_closures() {
        let nfa = epsilon_chain();
        let closures = EpsilonClosures::compute(&nfa);
        let start = closures.get(nfa.get_start_state()).clone();

        let on_a = closures.step(&nfa, &start, 'a');
        assert_eq!(to_state_set(&nfa, &on_a), set(&["3"]));

        let on_b = closures.step(&nfa, &start, 'b');
        assert!(on_b.not_any());
    }
}
