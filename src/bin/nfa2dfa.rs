use clap::{Arg, ArgAction, Command};
use color_eyre::eyre::Result;
use tracing::Level;

use nfa2dfa::loader::{read_automaton_file, read_words_file, save_automaton};
use nfa2dfa::report::{render_automaton_report, render_dfa_report, render_verdicts, write_report};
use nfa2dfa::{construct_dfa, construct_nfa, construct_simulator, save_dot};

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Command::new("nfa2dfa")
        .version("0.1")
        .about("Converts an NFA into a DFA by subset construction and classifies words with it")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .help("The automaton description: text format, JFLAP XML (.jflap, .xml) or JSON (.json)")
                .value_name("AUTOMATON FILE")
                .value_parser(clap::value_parser!(String))
                .required(true),
        )
        .arg(
            Arg::new("words")
                .short('w')
                .long("words")
                .help("A file with one word per line to classify with the constructed DFA")
                .value_name("WORDS FILE")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Write the DFA report to this file instead of standard output")
                .value_name("REPORT FILE")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("verdicts")
                .long("verdicts")
                .help("Write the word verdicts to this file instead of standard output")
                .value_name("VERDICTS FILE")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("save-json")
                .long("save-json")
                .help("Save the loaded automaton as JSON, readable again with --input")
                .value_name("JSON FILE")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("save-nfa")
                .short('n')
                .long("save-nfa")
                .help("Save the input NFA as constructed_nfa.dot")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("save-dfa")
                .short('d')
                .long("save-dfa")
                .help("Save the DFA obtained after Subset Construction as constructed_dfa.dot")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("save-simulator")
                .short('s')
                .long("save-simulator")
                .help("Save the DFA transition table as JSON")
                .value_name("SIMULATOR FILE")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log more, repeat for more detail")
                .action(ArgAction::Count),
        )
        .get_matches();

    init_logging(args.get_count("verbose"));

    // `input` is required, clap refuses to get here without it
    let input = args
        .get_one::<String>("input")
        .map(String::as_str)
        .unwrap_or_default();

    let automaton = read_automaton_file(input)?;
    tracing::info!("input automaton\n{}", render_automaton_report(&automaton));

    if let Some(file_path) = args.get_one::<String>("save-json") {
        save_automaton(&automaton, file_path)?;
    }

    let nfa = construct_nfa(&automaton);
    if args.get_flag("save-nfa") {
        save_dot(&nfa, "constructed_nfa")?;
    }

    let dfa = construct_dfa(&nfa);
    if args.get_flag("save-dfa") {
        save_dot(&dfa, "constructed_dfa")?;
    }

    let dfa_report = render_dfa_report(&dfa);
    match args.get_one::<String>("output") {
        Some(file_path) => write_report(file_path, &dfa_report)?,
        None => print!("{}", dfa_report),
    }

    let simulator = construct_simulator(&dfa);
    if let Some(file_path) = args.get_one::<String>("save-simulator") {
        simulator.save_simulator(file_path)?;
    }

    if let Some(words_path) = args.get_one::<String>("words") {
        let words = read_words_file(words_path)?;
        let verdicts = render_verdicts(&simulator.classify(&words));

        match args.get_one::<String>("verdicts") {
            Some(file_path) => write_report(file_path, &verdicts)?,
            None => print!("\n{}", verdicts),
        }
    }

    Ok(())
}
