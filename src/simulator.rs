/* Table driven simulation of a DFA. Given a word, the simulator walks the transition table one
 * character at a time and reports whether the word ends in an accept state. A missing
 * transition sends the run to the error state, which rejects without reading further. */

use bitvec::vec::BitVec;
use color_eyre::eyre::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Write};

use crate::dfa::DFA;
use crate::fa::FA;

/// Outcome of classifying one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    word: String,
    accepted: bool,
}

impl Verdict {
    pub fn new(word: String, accepted: bool) -> Self {
        Verdict { word, accepted }
    }

    pub fn get_word(&self) -> &String {
        &self.word
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.accepted {
            write!(f, "{}: accepted", self.word)
        } else {
            write!(f, "{}: rejected", self.word)
        }
    }
}

/// Walk the DFA directly: follow the unique transition for each character, reject as soon as
/// one is missing, accept iff the last state is final.
pub fn simulate(dfa: &DFA, word: &str) -> bool {
    let mut state = dfa.get_start_state();
    for ch in word.chars() {
        match dfa.next_state(state, ch) {
            Some(next_state) => state = next_state,
            None => return false,
        }
    }
    dfa.is_accepting(state)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Simulator {
    transition_table: Vec<Vec<usize>>, // One row per DFA state plus the error row
    alphabet: Vec<char>,               // Sorted, the column of a character is its position
    error_state: usize,
    accept_states: BitVec<u8>,
    start_state: usize,
}

impl Simulator {
    fn init_transition_table(dfa: &DFA) -> Self {
        let alphabet: Vec<char> = dfa.get_alphabet().iter().copied().collect(); // Already sorted
        let num_states = dfa.get_num_states();
        let error_state = num_states;

        let mut transition_table = vec![vec![error_state; alphabet.len()]; num_states + 1];

        for (state_id, row) in transition_table.iter_mut().enumerate().take(num_states) {
            for (col_id, ch) in alphabet.iter().enumerate() {
                if let Some(target) = dfa.next_state(state_id, *ch) {
                    row[col_id] = target;
                }
            }
        }

        let mut accept_states = dfa.get_acceptor_states().clone();
        accept_states.push(false); // The error state never accepts

        Simulator {
            transition_table,
            alphabet,
            error_state,
            accept_states,
            start_state: dfa.get_start_state(),
        }
    }

    /// Decide whether the DFA this simulator was built from accepts `word`. Characters outside
    /// the alphabet reject the word wherever they appear.
    pub fn accepts(&self, word: &str) -> bool {
        let mut state = self.start_state;

        for ch in word.chars() {
            let col_id = match self.alphabet.binary_search(&ch) {
                Ok(col_id) => col_id,
                Err(_) => return false,
            };

            state = self.transition_table[state][col_id];

            if state == self.error_state {
                return false;
            }
        }

        self.accept_states[state]
    }

    /// Classify every word independently, keeping the input order. Duplicates are simulated
    /// again and get identical verdicts.
    pub fn classify<S: AsRef<str>>(&self, words: &[S]) -> Vec<Verdict> {
        words
            .iter()
            .map(|word| {
                let word = word.as_ref();
                Verdict::new(word.to_string(), self.accepts(word))
            })
            .collect()
    }

    pub fn get_num_states(&self) -> usize {
        self.error_state
    }

    pub fn save_simulator(&self, file_name: &str) -> Result<()> {
        let json_string = serde_json::to_string_pretty(self)?;

        let mut file = File::create(file_name)?;

        writeln!(file, "{}", json_string)?;

        tracing::info!("simulator saved to {}", file_name);
        Ok(())
    }
}

/// Build the table driven simulator for a DFA.
pub fn construct_simulator(dfa: &DFA) -> Simulator {
    Simulator::init_transition_table(dfa)
}

/// Classify `words` against `dfa`, one verdict per word in the same order.
pub fn classify_words<S: AsRef<str>>(dfa: &DFA, words: &[S]) -> Vec<Verdict> {
    construct_simulator(dfa).classify(words)
}

/// Load a simulator from a saved json file
pub fn load_simulator(file_name: &str) -> Result<Simulator> {
    let file = File::open(file_name)?;

    let buf_reader = BufReader::new(file);

    let simulator: Simulator = serde_json::from_reader(buf_reader)?;
    Ok(simulator)
}

#[cfg(test)]
mod simulator_tests {
    use super::*;
    use crate::dfa::construct_dfa;
    use crate::fa::Symbol;
    use crate::nfa::{construct_nfa, Automaton};

    fn scenario_a_dfa() -> DFA {
        let mut automaton = Automaton::new();
        automaton.add_transition("0", Symbol::Epsilon, "1");
        automaton.add_transition("1", Symbol::Char('a'), "2");
        automaton.set_initial_state("0");
        automaton.add_final_state("2");
        construct_dfa(&construct_nfa(&automaton))
    }

    /// Words over {a, b} with an even number of a's; the initial state is final.
    fn even_as_dfa() -> DFA {
        let mut automaton = Automaton::new();
        automaton.add_transition("even", Symbol::Char('a'), "odd");
        automaton.add_transition("odd", Symbol::Char('a'), "even");
        automaton.add_transition("even", Symbol::Char('b'), "even");
        automaton.add_transition("odd", Symbol::Char('b'), "odd");
        automaton.set_initial_state("even");
        automaton.add_final_state("even");
        construct_dfa(&construct_nfa(&automaton))
    }

    #[test]
    fn test_scenario_a_words() {
        let dfa = scenario_a_dfa();
        let simulator = construct_simulator(&dfa);

        for (word, expected) in [("a", true), ("", false), ("b", false), ("aa", false)] {
            assert_eq!(simulate(&dfa, word), expected, "word {:?}", word);
            assert_eq!(simulator.accepts(word), expected, "word {:?}", word);
        }
    }

    #[test]
    fn test_unknown_symbol_rejects_anywhere() {
        let simulator = construct_simulator(&even_as_dfa());

        assert!(simulator.accepts("aab"));
        assert!(!simulator.accepts("zaab"));
        assert!(!simulator.accepts("aazb"));
        assert!(!simulator.accepts("aabz"));
        assert!(!simulate(&even_as_dfa(), "aabz"));
    }

    #[test]
    fn test_empty_word_follows_initial_state() {
        assert!(construct_simulator(&even_as_dfa()).accepts(""));
        assert!(!construct_simulator(&scenario_a_dfa()).accepts(""));
    }

    #[test]
    fn test_classify_keeps_order_and_duplicates() {
        let dfa = even_as_dfa();
        let words = ["aa", "a", "aa", "", "ba"];

        let verdicts = classify_words(&dfa, &words);

        let accepted: Vec<bool> = verdicts.iter().map(Verdict::is_accepted).collect();
        assert_eq!(accepted, vec![true, false, true, true, false]);
        assert_eq!(verdicts[0], verdicts[2]);
        assert_eq!(verdicts[1].to_string(), "a: rejected");
        assert_eq!(verdicts[0].to_string(), "aa: accepted");
        assert_eq!(verdicts[4].get_word(), "ba");
    }

    #[test]
    fn test_error_row_is_absorbing() {
        let simulator = construct_simulator(&scenario_a_dfa());
        let error_row = &simulator.transition_table[simulator.error_state];

        assert_eq!(simulator.get_num_states(), 2);
        assert!(error_row.iter().all(|target| *target == simulator.error_state));
        assert!(!simulator.accept_states[simulator.error_state]);
    }

    #[test]
    fn test_simulator_json_round_trip() {
        let simulator = construct_simulator(&even_as_dfa());
        let json = serde_json::to_string(&simulator).unwrap();
        let restored: Simulator = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, simulator);
        assert!(restored.accepts("abab"));
    }
}
