use std::fmt::{self, Display};

use tracing::{debug, trace};

use crate::{
    graph::AutomatonGraph,
    request::DfaRequest,
    state::{StateIdx, StateName, StateSet, StateTable},
    symbol::Symbol,
    table::DfaTable,
};

/// A required form field that was left empty. The engine refuses to run until it is filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingField {
    States,
    Alphabet,
    InputString,
    AcceptingStates,
    SingleState,
    Subset,
}

impl Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            MissingField::States => "Please enter states",
            MissingField::Alphabet => "Please enter an alphabet",
            MissingField::InputString => "Please enter an input string",
            MissingField::AcceptingStates => "Please specify at least one final state",
            MissingField::SingleState => "Please enter a single state",
            MissingField::Subset => "Please enter a subset of states",
        };
        f.write_str(message)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DfaVerdict {
    Accepted,
    Rejected,
    // `position` counts characters, not bytes
    RejectedInvalidTransition {
        state: StateName,
        symbol: Symbol,
        position: usize,
    },
    MissingInput(MissingField),
}

/// Outcome of one run, together with the input it was given and the states it went through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DfaRun {
    pub input: String,
    pub verdict: DfaVerdict,
    pub trace: Vec<StateName>,
}

impl DfaRun {
    pub fn is_accepted(&self) -> bool {
        self.verdict == DfaVerdict::Accepted
    }

    /// True if the whole input was consumed.
    pub fn completed(&self) -> bool {
        matches!(self.verdict, DfaVerdict::Accepted | DfaVerdict::Rejected)
    }
}

impl Display for DfaRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.verdict {
            DfaVerdict::Accepted => write!(f, "Accepted {}", self.input),
            DfaVerdict::Rejected => write!(f, "Rejected {}", self.input),
            DfaVerdict::RejectedInvalidTransition { .. } => {
                write!(f, "Rejected (invalid transition)")
            }
            DfaVerdict::MissingInput(field) => write!(f, "{}", field),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Dfa {
    states: StateTable,
    alphabet: Vec<Symbol>,
    table: DfaTable,
    accepting: StateSet,
}

impl Dfa {
    pub fn new(
        states: StateTable,
        alphabet: Vec<Symbol>,
        table: DfaTable,
        accepting: StateSet,
    ) -> Dfa {
        Dfa {
            states,
            alphabet,
            table,
            accepting,
        }
    }

    pub fn from_request(request: &DfaRequest) -> Dfa {
        let mut states = StateTable::from_declared(&request.states);
        let table = DfaTable::build(&mut states, &request.alphabet, &request.grid);
        let accepting = request
            .accepting
            .iter()
            .map(|name| states.intern(name))
            .collect();

        Dfa::new(states, request.alphabet.clone(), table, accepting)
    }

    pub fn states(&self) -> &StateTable {
        &self.states
    }

    pub fn alphabet(&self) -> &[Symbol] {
        &self.alphabet
    }

    pub fn table(&self) -> &DfaTable {
        &self.table
    }

    pub fn accepting(&self) -> &StateSet {
        &self.accepting
    }

    pub fn step(&self, state: StateIdx, symbol: Symbol) -> Option<StateIdx> {
        self.table.get(state, symbol)
    }

    // preconditions, checked in the order the form lists the fields
    fn start_state(&self, input: &str) -> Result<StateIdx, MissingField> {
        let start = self.states.start().ok_or(MissingField::States)?;
        if self.alphabet.is_empty() {
            Err(MissingField::Alphabet)
        } else if input.is_empty() {
            Err(MissingField::InputString)
        } else if self.accepting.is_empty() {
            Err(MissingField::AcceptingStates)
        } else {
            Ok(start)
        }
    }

    // walks the input one character at a time from the first declared state;
    // a missing transition stops the run without looking at the rest of the input
    pub fn accepts(&self, input: &str) -> DfaRun {
        let mut run = DfaRun {
            input: input.to_string(),
            verdict: DfaVerdict::Rejected,
            trace: Vec::new(),
        };

        let start = match self.start_state(input) {
            Ok(start) => start,
            Err(field) => {
                run.verdict = DfaVerdict::MissingInput(field);
                debug!(%input, verdict = ?run.verdict, "dfa not run");
                return run;
            }
        };

        let mut state = start;
        run.trace.push(self.states.name(state).clone());

        for (position, c) in input.chars().enumerate() {
            let symbol = Symbol::new(c);
            match self.step(state, symbol) {
                Some(next) => {
                    trace!(
                        from = %self.states.name(state),
                        %symbol,
                        to = %self.states.name(next),
                        "dfa step"
                    );
                    state = next;
                    run.trace.push(self.states.name(state).clone());
                }
                None => {
                    run.verdict = DfaVerdict::RejectedInvalidTransition {
                        state: self.states.name(state).clone(),
                        symbol,
                        position,
                    };
                    debug!(%input, verdict = ?run.verdict, "dfa stuck");
                    return run;
                }
            }
        }

        if self.accepting.contains(state) {
            run.verdict = DfaVerdict::Accepted;
        }
        debug!(%input, verdict = ?run.verdict, "dfa run finished");
        run
    }

    pub fn graph(&self) -> AutomatonGraph {
        AutomatonGraph::build(&self.states, &self.table.edges(), &self.accepting)
    }
}
