use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::{info, Level};

use valifa::{
    definition::{Definition, Field},
    validate_dfa, validate_nfa, AutomatonGraph,
};

/// Runs a DFA over an input string, or computes NFA extended transitions,
/// from a `key: value` automaton definition file.
#[derive(Parser, Debug)]
#[command(name = "valifa", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Write the automaton as Graphviz DOT to this path
    #[arg(long, global = true, value_name = "PATH")]
    dot: Option<PathBuf>,

    /// More logging, repeat for more detail
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether a DFA accepts an input string
    Dfa {
        file: PathBuf,

        /// Input string, replaces the `input` field of the definition
        #[arg(long)]
        input: Option<String>,
    },
    /// Compute the extended transition of a state and of a subset of states
    Nfa {
        file: PathBuf,

        /// Single state, replaces the `single` field of the definition
        #[arg(long)]
        single: Option<String>,

        /// Subset such as `{q0, q1}`, replaces the `subset` field of the definition
        #[arg(long)]
        subset: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, 2) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let graph = match cli.command {
        Command::Dfa { file, input } => {
            let mut definition = read_definition(&file)?;
            if let Some(input) = input {
                definition.set_field(Field::Input, input);
            }

            let request = definition
                .to_dfa_request()
                .with_context(|| format!("invalid DFA definition in {}", file.display()))?;
            let report = validate_dfa(&request);
            println!("{}", report.run);
            report.graph
        }
        Command::Nfa {
            file,
            single,
            subset,
        } => {
            let mut definition = read_definition(&file)?;
            if let Some(single) = single {
                definition.set_field(Field::Single, single);
            }
            if let Some(subset) = subset {
                definition.set_field(Field::Subset, subset);
            }

            let request = definition
                .to_nfa_request()
                .with_context(|| format!("invalid NFA definition in {}", file.display()))?;
            let report = validate_nfa(&request);
            println!("{}", report.outcome);
            report.graph
        }
    };

    if let Some(path) = &cli.dot {
        write_dot(path, graph.as_ref())?;
    }

    Ok(())
}

fn read_definition(path: &Path) -> Result<Definition> {
    let def_string = fs::read_to_string(path)
        .with_context(|| format!("unable to read {}", path.display()))?;
    Definition::parse(&def_string)
        .with_context(|| format!("unable to parse definition {}", path.display()))
}

// nothing is written when the engine produced no drawing
fn write_dot(path: &Path, graph: Option<&AutomatonGraph>) -> Result<()> {
    match graph {
        Some(graph) => {
            fs::write(path, graph.to_dot())
                .with_context(|| format!("unable to write {}", path.display()))?;
            info!(path = %path.display(), "wrote graph");
        }
        None => info!("no graph for this result, skipping DOT export"),
    }
    Ok(())
}
