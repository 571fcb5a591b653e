/* Reading automaton descriptions and word lists from disk.
 *
 * Three description formats are understood: a line oriented text format, JFLAP structure XML and
 * the JSON form of `Automaton`. The text and XML readers are best effort; fields they cannot
 * find come out empty. */

use color_eyre::eyre::{Report, Result};
use std::fs;
use std::path::Path;

use crate::fa::Symbol;
use crate::nfa::Automaton;

/// List of possible errors while loading descriptions
#[derive(Debug)]
pub enum LoaderError {
    FileOpenError(String),
    FileReadError(String),
    MalformedDescription(String),
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::FileOpenError(err_line) => write!(f, "{}", err_line),
            LoaderError::FileReadError(err_line) => write!(f, "{}", err_line),
            LoaderError::MalformedDescription(detail) => {
                write!(f, "Error: Malformed automaton description: {}", detail)
            }
        }
    }
}

impl std::error::Error for LoaderError {}

fn read_to_string(file_path: &str) -> Result<String, LoaderError> {
    if !Path::new(file_path).exists() {
        return Err(LoaderError::FileOpenError(format!(
            "Error: File '{}' not found.",
            file_path
        )));
    }

    fs::read_to_string(file_path).map_err(|error| {
        LoaderError::FileReadError(format!(
            "Error: Failed to read the file {}: {}",
            file_path, error
        ))
    })
}

/// Text after the first `": "` on a header line, or nothing.
fn header_value(line: Option<&str>) -> &str {
    line.and_then(|line| line.split_once(": "))
        .map(|(_, value)| value.trim())
        .unwrap_or("")
}

/// Parse the text description:
///
/// ```text
/// Initial state: 0
/// Final states: {2, 3}
/// Transition: from 0 to 1 on #
/// ```
///
/// Transition lines are split on whitespace and tokens 2, 4 and 6 are the source, the target and
/// the symbol. `#` stands for epsilon.
pub fn parse_automaton_text(text: &str) -> Automaton {
    let mut automaton = Automaton::new();
    let mut lines = text.lines();

    automaton.set_initial_state(header_value(lines.next()));

    let final_states = header_value(lines.next());
    let final_states = final_states
        .trim_start_matches('{')
        .trim_end_matches('}');

    for state in final_states.split(',').map(str::trim) {
        if !state.is_empty() {
            automaton.add_final_state(state);
        }
    }

    for (line_number, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let from = parts.get(2).copied().unwrap_or("");
        let to = parts.get(4).copied().unwrap_or("");
        let symbol = parts.get(6).copied().unwrap_or("");

        // Words are read one character at a time, a longer symbol could never be matched.
        let symbol = match Symbol::parse(symbol) {
            Some(symbol) => symbol,
            None => {
                tracing::warn!(
                    "line {}: dropping transition on multi character symbol {:?}",
                    line_number + 3,
                    symbol
                );
                continue;
            }
        };

        if from.is_empty() || to.is_empty() {
            tracing::warn!("line {}: malformed transition {:?}", line_number + 3, line);
        }

        automaton.add_transition(from, symbol, to);
    }

    automaton
}

/// Trimmed text of the element reached by following `path` down from `node`, one child tag per
/// step.
fn child_text(node: roxmltree::Node, path: &[&str]) -> Option<String> {
    let mut current = node;
    for tag in path {
        current = current.children().find(|child| child.has_tag_name(*tag))?;
    }
    current.text().map(|text| text.trim().to_string())
}

/// `structure` elements carrying the given `type` attribute.
fn structures<'a, 'input>(
    document: &'a roxmltree::Document<'input>,
    kind: &'a str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> + 'a {
    document.descendants().filter(move |node| {
        node.has_tag_name("structure") && node.attribute("type") == Some(kind)
    })
}

/// Parse a JFLAP structure file. `fsa_trans` elements give the transitions (a missing or empty
/// `input` is epsilon), `state` elements the labels, and the `start_state` and `final_states`
/// structures the initial and final states. Missing ids are the empty id.
pub fn parse_automaton_xml(text: &str) -> Result<Automaton, LoaderError> {
    let document = roxmltree::Document::parse(text)
        .map_err(|error| LoaderError::MalformedDescription(error.to_string()))?;

    let mut automaton = Automaton::new();

    for transition in document
        .descendants()
        .filter(|node| node.has_tag_name("fsa_trans"))
    {
        let input = child_text(transition, &["input"]).unwrap_or_default();
        let from = child_text(transition, &["from", "id"]).unwrap_or_default();
        let to = child_text(transition, &["to", "id"]).unwrap_or_default();

        match Symbol::parse(&input) {
            Some(symbol) => automaton.add_transition(&from, symbol, &to),
            None => tracing::warn!(
                "dropping transition {} -> {} on multi character symbol {:?}",
                from,
                to,
                input
            ),
        }
    }

    for state in document.descendants().filter(|node| node.has_tag_name("state")) {
        let id = child_text(state, &["id"]).unwrap_or_default();
        let name = child_text(state, &["name"]).unwrap_or_default();

        // Start and final structures repeat states, sometimes without a name.
        let known = automaton.get_states().get(&id).is_some_and(|label| !label.is_empty());
        if !known {
            automaton.add_state(&id, &name);
        }
    }

    let initial_state = structures(&document, "start_state")
        .find_map(|structure| child_text(structure, &["state", "id"]))
        .unwrap_or_default();
    automaton.set_initial_state(&initial_state);

    for structure in structures(&document, "final_states") {
        for state in structure.children().filter(|node| node.has_tag_name("state")) {
            automaton.add_final_state(&child_text(state, &["id"]).unwrap_or_default());
        }
    }

    Ok(automaton)
}

/// Parse the JSON form of an automaton.
pub fn parse_automaton_json(text: &str) -> Result<Automaton, LoaderError> {
    serde_json::from_str(text).map_err(|error| LoaderError::MalformedDescription(error.to_string()))
}

/// Read an automaton description. Files ending in `.json` are read as JSON, `.jflap` and `.xml`
/// as JFLAP XML, anything else as the text format.
pub fn read_automaton_file(file_path: &str) -> Result<Automaton> {
    let contents = read_to_string(file_path).map_err(Report::new)?;

    let automaton = if file_path.ends_with(".json") {
        parse_automaton_json(&contents).map_err(Report::new)?
    } else if file_path.ends_with(".jflap") || file_path.ends_with(".xml") {
        parse_automaton_xml(&contents).map_err(Report::new)?
    } else {
        parse_automaton_text(&contents)
    };

    tracing::info!(
        "loaded automaton from {} ({} transitions)",
        file_path,
        automaton.get_transitions().len()
    );

    Ok(automaton)
}

/// Save an automaton as JSON so it can be read back with [`read_automaton_file`].
pub fn save_automaton(automaton: &Automaton, file_path: &str) -> Result<()> {
    let json_string = serde_json::to_string_pretty(automaton)?;
    fs::write(file_path, json_string + "\n")?;
    Ok(())
}

/// One word per line, in order. Empty lines are the empty word.
pub fn parse_words(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

pub fn read_words_file(file_path: &str) -> Result<Vec<String>, LoaderError> {
    let contents = read_to_string(file_path)?;
    Ok(parse_words(&contents))
}
