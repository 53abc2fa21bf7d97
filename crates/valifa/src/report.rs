use std::{
    collections::BTreeSet,
    fmt::{self, Display},
};

use tracing::warn;

use crate::{
    dfa::{Dfa, DfaRun, DfaVerdict, MissingField},
    graph::AutomatonGraph,
    nfa::Nfa,
    request::{DfaRequest, NfaRequest},
    state::{StateName, StateTable},
};

#[derive(Clone, Debug)]
pub struct DfaReport {
    pub run: DfaRun,
    // only drawn for runs that consumed the whole input
    pub graph: Option<AutomatonGraph>,
}

pub fn validate_dfa(request: &DfaRequest) -> DfaReport {
    let dfa = Dfa::from_request(request);
    let run = dfa.accepts(&request.input);
    if !matches!(run.verdict, DfaVerdict::MissingInput(_)) {
        warn_undeclared(dfa.states());
    }

    let graph = run.completed().then(|| dfa.graph());
    DfaReport { run, graph }
}

/// One δ̂ query and the states it reached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Closure {
    pub query: Vec<StateName>,
    pub reached: Vec<StateName>,
}

impl Closure {
    pub fn reached_set(&self) -> BTreeSet<&str> {
        self.reached.iter().map(StateName::as_str).collect()
    }

    pub fn joined(&self) -> String {
        join(&self.reached)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NfaOutcome {
    MissingInput(MissingField),
    Computed { single: Closure, subset: Closure },
}

impl Display for NfaOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NfaOutcome::MissingInput(field) => write!(f, "{}", field),
            NfaOutcome::Computed { single, subset } => {
                let single_name = join(&single.query);
                writeln!(f, "ETD: Extended Transition Function")?;
                writeln!(f, "Single State: {}", single_name)?;
                writeln!(f, "ETD of {} : {}", single_name, single.joined())?;
                writeln!(f, "Subset: {}", join(&subset.query))?;
                write!(f, "ETD of {{{}}} : {}", join(&subset.query), subset.joined())
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct NfaReport {
    pub outcome: NfaOutcome,
    pub graph: Option<AutomatonGraph>,
}

// preconditions, checked in the order the form lists the fields
fn single_state(request: &NfaRequest) -> Result<&StateName, MissingField> {
    if request.states.is_empty() {
        return Err(MissingField::States);
    }
    let single = request.single.as_ref().ok_or(MissingField::SingleState)?;
    if request.subset.is_empty() {
        return Err(MissingField::Subset);
    }
    Ok(single)
}

pub fn validate_nfa(request: &NfaRequest) -> NfaReport {
    let single = match single_state(request) {
        Ok(single) => single,
        Err(field) => {
            return NfaReport {
                outcome: NfaOutcome::MissingInput(field),
                graph: None,
            }
        }
    };

    let mut nfa = Nfa::from_request(request);
    let single_set = nfa.state_set([single]);
    let subset_set = nfa.state_set(&request.subset);
    warn_undeclared(nfa.states());

    let single = Closure {
        query: vec![single.clone()],
        reached: nfa
            .extended_transition(&single_set)
            .names(nfa.states())
            .cloned()
            .collect(),
    };
    let subset = Closure {
        query: request.subset.clone(),
        reached: nfa
            .extended_transition(&subset_set)
            .names(nfa.states())
            .cloned()
            .collect(),
    };

    NfaReport {
        outcome: NfaOutcome::Computed { single, subset },
        graph: Some(nfa.graph()),
    }
}

fn warn_undeclared(states: &StateTable) {
    for idx in states.undeclared() {
        warn!(state = %states.name(idx), "state is not listed in the states field");
    }
}

fn join(names: &[StateName]) -> String {
    names
        .iter()
        .map(StateName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
