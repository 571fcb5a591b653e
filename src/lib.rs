//! # nfa2dfa
//!
//! Conversion of nondeterministic finite automata into deterministic ones, and classification
//! of words with the result.
//!
//! This library provides functionality to:
//! - Load automata from a line oriented text description or from JSON
//! - Compute epsilon closures over possibly cyclic epsilon transitions
//! - Convert NFAs to DFAs using Subset Construction
//! - Decide whether a DFA accepts words, one word or a whole list at a time
//! - Render the DFA and the per word verdicts as text, or the automata as Graphviz DOT

pub mod closure;
pub mod dfa;
pub mod fa;
pub mod loader;
pub mod nfa;
pub mod report;
pub mod simulator;
pub mod visualizer;

// Re-export commonly used functions for convenience
pub use closure::{epsilon_closure, EpsilonClosures};
pub use dfa::construct_dfa;
pub use fa::{StateId, StateSet, Symbol, Transition};
pub use loader::{read_automaton_file, read_words_file};
pub use nfa::{construct_nfa, Automaton};
pub use report::{render_dfa_report, render_verdicts};
pub use simulator::{classify_words, construct_simulator, simulate, Verdict};
pub use visualizer::{generate_dot, save_dot};
