use thiserror::Error;
use valifa_util::{field_tokens, set_tokens};

use crate::{
    state::StateName,
    symbol::Symbol,
    table::TransitionGrid,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("alphabet symbol `{0}` must be a single character")]
    MultiCharSymbol(String),
    #[error("the epsilon symbol λ cannot be part of a DFA alphabet")]
    EpsilonInDfaAlphabet,
}

/// Everything needed to run one string through a DFA. Built once from the form fields and
/// never mutated by the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DfaRequest {
    pub states: Vec<StateName>,
    pub alphabet: Vec<Symbol>,
    pub grid: TransitionGrid,
    pub accepting: Vec<StateName>,
    pub input: String,
}

impl DfaRequest {
    pub fn from_fields(
        states: &str,
        alphabet: &str,
        grid: TransitionGrid,
        accepting: &str,
        input: &str,
    ) -> Result<DfaRequest, FieldError> {
        let alphabet = field_tokens(alphabet)
            .into_iter()
            .map(|token| match Symbol::from_token(token)? {
                symbol if symbol.is_epsilon() => Err(FieldError::EpsilonInDfaAlphabet),
                symbol => Ok(symbol),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DfaRequest {
            states: state_names(field_tokens(states)),
            alphabet,
            grid,
            accepting: state_names(field_tokens(accepting)),
            input: input.trim().to_string(),
        })
    }
}

/// Everything needed to compute the extended transition of one state and of one subset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NfaRequest {
    pub states: Vec<StateName>,
    pub grid: TransitionGrid,
    pub accepting: Vec<StateName>,
    pub single: Option<StateName>,
    pub subset: Vec<StateName>,
}

impl NfaRequest {
    // the single-state field is taken whole; the subset accepts `{q0, q1}`, `q0,q1` or `q0 q1`
    pub fn from_fields(
        states: &str,
        grid: TransitionGrid,
        accepting: &str,
        single: &str,
        subset: &str,
    ) -> NfaRequest {
        let single = single.trim();

        NfaRequest {
            states: state_names(field_tokens(states)),
            grid,
            accepting: state_names(field_tokens(accepting)),
            single: (!single.is_empty()).then(|| StateName::from(single)),
            subset: state_names(set_tokens(subset)),
        }
    }
}

fn state_names(tokens: Vec<&str>) -> Vec<StateName> {
    tokens.into_iter().map(StateName::from).collect()
}
