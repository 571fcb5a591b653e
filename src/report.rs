use color_eyre::eyre::Result;
use std::fs;

use crate::dfa::DFA;
use crate::fa::FA;
use crate::nfa::Automaton;
use crate::simulator::Verdict;

/// Describe a loaded automaton: initial state, final states, states and transitions.
pub fn render_automaton_report(automaton: &Automaton) -> String {
    let mut report = String::new();

    let final_states: Vec<&str> = automaton
        .get_final_states()
        .iter()
        .map(String::as_str)
        .collect();

    report.push_str(&format!("Initial state: {}\n", automaton.get_initial_state()));
    report.push_str(&format!("Final states: {{{}}}\n", final_states.join(", ")));
    report.push_str("\nStates:\n");
    for (id, label) in automaton.get_states() {
        report.push_str(&format!("State {}: {}\n", id, label));
    }
    report.push_str("\nTransitions:\n");
    for transition in automaton.get_transitions() {
        report.push_str(&format!(
            "From state {} to state {} with input {}\n",
            transition.get_from(),
            transition.get_to(),
            transition.get_symbol()
        ));
    }

    report
}

/// Describe a DFA. States are listed in discovery order and named `q0`, `q1`, ... after it.
pub fn render_dfa_report(dfa: &DFA) -> String {
    let mut report = String::new();

    let final_states: Vec<String> = dfa
        .get_final_states()
        .iter()
        .map(|state| state.to_string())
        .collect();

    report.push_str(&format!("Initial state: {}\n", dfa.get_initial_state()));
    report.push_str(&format!("Final states: {{{}}}\n", final_states.join(", ")));
    report.push_str("\nStates:\n");
    for state_idx in 0..dfa.get_num_states() {
        report.push_str(&format!(
            "State {}: q{}\n",
            dfa.get_state_label(state_idx),
            state_idx
        ));
    }
    report.push_str("\nTransitions:\n");
    for transition in dfa.get_transitions() {
        report.push_str(&format!(
            "From state {} to state {} with input {}\n",
            transition.get_from(),
            transition.get_to(),
            transition.get_symbol()
        ));
    }

    report
}

/// One `<word>: accepted` or `<word>: rejected` line per verdict, in order.
pub fn render_verdicts(verdicts: &[Verdict]) -> String {
    let mut report = String::new();
    for verdict in verdicts {
        report.push_str(&format!("{}\n", verdict));
    }
    report
}

pub fn write_report(file_path: &str, report: &str) -> Result<()> {
    fs::write(file_path, report)?;
    tracing::info!("report written to {}", file_path);
    Ok(())
}
