mod integration_tests_helper {

    use nfa2dfa::dfa::DFA;
    use nfa2dfa::{construct_dfa, construct_nfa, read_automaton_file, Automaton, Symbol};
    use std::collections::BTreeSet;

    pub fn test_data(file_name: &str) -> String {
        format!("{}/test_data/{}", env!("CARGO_MANIFEST_DIR"), file_name)
    }

    pub fn get_dfa(file_name: &str) -> DFA {
        let automaton = read_automaton_file(&test_data(file_name));

        // assert that reading the file was successful
        assert!(automaton.is_ok());

        let nfa = construct_nfa(&automaton.unwrap());
        construct_dfa(&nfa)
    }

    /// Epsilon closure of a set of states by fixpoint iteration over the raw transition list.
    fn naive_closure(automaton: &Automaton, mut states: BTreeSet<String>) -> BTreeSet<String> {
        loop {
            let mut grown = states.clone();
            for transition in automaton.get_transitions() {
                if transition.get_symbol() == Symbol::Epsilon
                    && states.contains(transition.get_from())
                {
                    grown.insert(transition.get_to().clone());
                }
            }
            if grown.len() == states.len() {
                return states;
            }
            states = grown;
        }
    }

    /// Decide acceptance on the NFA itself by tracking every reachable state.
    pub fn nfa_accepts(automaton: &Automaton, word: &str) -> bool {
        let start = [automaton.get_initial_state().clone()].into_iter().collect();
        let mut current = naive_closure(automaton, start);

        for ch in word.chars() {
            let moved = automaton
                .get_transitions()
                .iter()
                .filter(|t| t.get_symbol() == Symbol::Char(ch) && current.contains(t.get_from()))
                .map(|t| t.get_to().clone())
                .collect();
            current = naive_closure(automaton, moved);
        }

        current
            .iter()
            .any(|state| automaton.get_final_states().contains(state))
    }
}

mod integration_tests {
    use crate::integration_tests_helper::{get_dfa, nfa_accepts, test_data};

    use nfa2dfa::fa::FA;
    use nfa2dfa::loader::{save_automaton, LoaderError};
    use nfa2dfa::simulator::load_simulator;
    use nfa2dfa::{
        classify_words, construct_dfa, construct_nfa, construct_simulator, epsilon_closure,
        read_automaton_file, read_words_file, render_dfa_report, render_verdicts, simulate,
        Automaton, StateSet, Symbol,
    };
    use quickcheck::QuickCheck;

    #[test_log::test]
    fn test_scenario_a_from_text_file() {
        let dfa = get_dfa("scenario_a.txt");

        let initial: StateSet = ["0", "1"].into_iter().collect();
        assert_eq!(dfa.get_initial_state(), &initial);

        let report = render_dfa_report(&dfa);
        assert!(report.contains("From state {0,1} to state {2} with input a"));

        let verdicts = classify_words(&dfa, &["a", "", "b"]);
        assert_eq!(
            render_verdicts(&verdicts),
            "a: accepted\n: rejected\nb: rejected\n"
        );
    }

    #[test]
    fn test_words_file_against_classic_nfa() {
        let dfa = get_dfa("ends_with_abb.txt");
        assert_eq!(dfa.get_num_states(), 5);

        let words = read_words_file(&test_data("ends_with_abb_words.txt"));
        assert!(words.is_ok());
        let words = words.unwrap();
        assert_eq!(words.len(), 8);

        let accepted: Vec<bool> = classify_words(&dfa, &words)
            .iter()
            .map(|verdict| verdict.is_accepted())
            .collect();
        assert_eq!(
            accepted,
            vec![true, true, true, false, false, false, false, true]
        );
    }

    #[test]
    fn test_json_description_with_epsilon_cycle() {
        let automaton = read_automaton_file(&test_data("epsilon_cycle.json")).unwrap();
        let nfa = construct_nfa(&automaton);

        let closure_p: StateSet = ["p", "q"].into_iter().collect();
        let closure_r: StateSet = ["p", "q", "r"].into_iter().collect();
        assert_eq!(epsilon_closure(&nfa, "p"), closure_p);
        assert_eq!(epsilon_closure(&nfa, "r"), closure_r);

        let dfa = construct_dfa(&nfa);
        assert_eq!(dfa.get_num_states(), 2);
        assert_eq!(dfa.get_final_states(), vec![&closure_r]);

        for (word, expected) in [("", false), ("x", true), ("xxx", true), ("xy", false)] {
            assert_eq!(simulate(&dfa, word), expected, "word {:?}", word);
        }
    }

    #[test]
    fn test_jflap_description() {
        let automaton = read_automaton_file(&test_data("ends_with_ab.jflap")).unwrap();
        assert_eq!(automaton.get_states().len(), 4);
        assert_eq!(automaton.get_initial_state(), "0");

        let nfa = construct_nfa(&automaton);
        let start: StateSet = ["0", "1"].into_iter().collect();
        assert_eq!(epsilon_closure(&nfa, "0"), start);
        assert_eq!(nfa.get_state_label(3), "3 (q3)");

        let dfa = construct_dfa(&nfa);
        assert_eq!(dfa.get_num_states(), 3);

        let words = ["ab", "bab", "aab", "", "a", "abb", "ba"];
        let accepted: Vec<bool> = classify_words(&dfa, &words)
            .iter()
            .map(|verdict| verdict.is_accepted())
            .collect();
        assert_eq!(
            accepted,
            vec![true, true, true, false, false, false, false]
        );
    }

    #[test]
    fn test_jflap_saved_as_json_reads_back() {
        let automaton = read_automaton_file(&test_data("ends_with_ab.jflap")).unwrap();

        let file_name = format!("nfa2dfa_jflap_{}.json", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        let path = path.to_str().unwrap();

        assert!(save_automaton(&automaton, path).is_ok());
        let restored = read_automaton_file(path).unwrap();
        std::fs::remove_file(path).unwrap();

        assert_eq!(restored, automaton);
    }

    #[test]
    fn test_missing_files_are_reported() {
        assert!(read_automaton_file(&test_data("no_such_automaton.txt")).is_err());

        match read_words_file(&test_data("no_such_words.txt")) {
            Err(LoaderError::FileOpenError(_)) => {}
            _ => panic!("expected a missing file error"),
        }
    }

    #[test]
    fn test_saved_simulator_gives_same_verdicts() {
        let dfa = get_dfa("ends_with_abb.txt");
        let simulator = construct_simulator(&dfa);

        let file_name = format!("nfa2dfa_simulator_{}.json", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        let path = path.to_str().unwrap();

        assert!(simulator.save_simulator(path).is_ok());
        let restored = load_simulator(path).unwrap();
        std::fs::remove_file(path).unwrap();

        let words = ["abb", "babb", "ab", "", "abbc"];
        assert_eq!(restored.classify(&words), simulator.classify(&words));
    }

    fn symbol_of(raw: u8) -> Symbol {
        match raw % 3 {
            0 => Symbol::Epsilon,
            1 => Symbol::Char('a'),
            _ => Symbol::Char('b'),
        }
    }

    fn word_of(raw: &[u8]) -> String {
        raw.iter().map(|ch| if ch % 2 == 0 { 'a' } else { 'b' }).collect()
    }

    /// Random NFAs over six states and {a, b}: the DFA accepts exactly what the NFA accepts.
    fn prop_dfa_matches_nfa(edges: Vec<(u8, u8, u8)>, finals: Vec<u8>, word: Vec<u8>) -> bool {
        let mut automaton = Automaton::new();
        for (from, symbol, to) in edges {
            automaton.add_transition(
                &(from % 6).to_string(),
                symbol_of(symbol),
                &(to % 6).to_string(),
            );
        }
        automaton.set_initial_state("0");
        for state in finals {
            automaton.add_final_state(&(state % 6).to_string());
        }

        let dfa = construct_dfa(&construct_nfa(&automaton));
        let simulator = construct_simulator(&dfa);
        let word = word_of(&word);

        let expected = nfa_accepts(&automaton, &word);
        simulate(&dfa, &word) == expected && simulator.accepts(&word) == expected
    }

    #[test]
    fn test_dfa_equivalent_to_nfa() {
        QuickCheck::new()
            .tests(500)
            .quickcheck(prop_dfa_matches_nfa as fn(Vec<(u8, u8, u8)>, Vec<u8>, Vec<u8>) -> bool);
    }

    /// Every DFA state has at most one target per symbol and the DFA never grows past the number
    /// of distinct subsets it could name.
    fn prop_dfa_is_deterministic(edges: Vec<(u8, u8, u8)>) -> bool {
        let mut automaton = Automaton::new();
        for (from, symbol, to) in edges {
            automaton.add_transition(
                &(from % 4).to_string(),
                symbol_of(symbol),
                &(to % 4).to_string(),
            );
        }
        automaton.set_initial_state("0");

        let dfa = construct_dfa(&construct_nfa(&automaton));

        (0..dfa.get_num_states()).all(|state| {
            let transitions = dfa.get_state_transitions(state);
            let mut symbols: Vec<Symbol> = transitions.iter().map(|(symbol, _)| *symbol).collect();
            symbols.dedup();
            symbols.len() == transitions.len() && !symbols.contains(&Symbol::Epsilon)
        }) && dfa.get_num_states() < 16
    }

    #[test]
    fn test_dfa_is_deterministic() {
        QuickCheck::new()
            .tests(300)
            .quickcheck(prop_dfa_is_deterministic as fn(Vec<(u8, u8, u8)>) -> bool);
    }
}
