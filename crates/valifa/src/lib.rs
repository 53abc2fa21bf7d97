mod dfa;
mod graph;
mod nfa;
mod report;
mod request;
mod state;
mod symbol;
mod table;

#[cfg(test)]
mod fa_tests;

pub mod definition;

pub use dfa::{Dfa, DfaRun, DfaVerdict, MissingField};
pub use graph::{AutomatonGraph, EdgeLabel, GraphEdge, GraphNode, NodeShape};
pub use nfa::Nfa;
pub use report::{validate_dfa, validate_nfa, Closure, DfaReport, NfaOutcome, NfaReport};
pub use request::{DfaRequest, FieldError, NfaRequest};
pub use state::{StateIdx, StateName, StateSet, StateTable};
pub use symbol::{Symbol, EPSILON, NFA_ALPHABET, NFA_INPUT};
pub use table::{DfaTable, NfaTable, TransitionGrid};
