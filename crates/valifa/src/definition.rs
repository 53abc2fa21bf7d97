// Automaton definitions as plain text, one `key: value` per line:
//
//     # comments and blank lines are skipped
//     states: q0 q1 q2
//     alphabet: a b
//     final: q2
//     input: abba
//     q0 a: q1
//     q1 λ: q2, q0
//
// Field keys carry the raw text of the matching form field. Every other key names a
// transition cell as `<state> <symbol>`, and its value is the raw cell text.

use std::collections::HashMap;

use thiserror::Error;
use valifa_util::field_tokens;

use crate::{
    request::{DfaRequest, FieldError, NfaRequest},
    symbol::{EPSILON, NFA_INPUT},
    table::TransitionGrid,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    States,
    Alphabet,
    Final,
    Input,
    Single,
    Subset,
}

impl Field {
    pub fn key(self) -> &'static str {
        match self {
            Field::States => "states",
            Field::Alphabet => "alphabet",
            Field::Final => "final",
            Field::Input => "input",
            Field::Single => "single",
            Field::Subset => "subset",
        }
    }

    fn from_key(key: &str) -> Option<Field> {
        [
            Field::States,
            Field::Alphabet,
            Field::Final,
            Field::Input,
            Field::Single,
            Field::Subset,
        ]
        .into_iter()
        .find(|field| field.key() == key)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionErrorKind {
    #[error("expected `key: value`")]
    MissingSeparator,
    #[error("`{0}` is neither a field name nor a `<state> <symbol>` transition key")]
    UnknownKey(String),
    #[error("field `{0}` is given more than once")]
    DuplicateField(&'static str),
    #[error("transition for `{state}` on `{symbol}` is given more than once")]
    DuplicateCell { state: String, symbol: String },
    #[error("`{0}` is not one of the declared states")]
    UnknownState(String),
    #[error("`{0}` is not a symbol of the alphabet")]
    UnknownSymbol(String),
    #[error(transparent)]
    Field(#[from] FieldError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line}: {kind}")]
pub struct DefinitionError {
    pub line: usize,
    pub kind: DefinitionErrorKind,
}

impl DefinitionError {
    fn new(line: usize, kind: impl Into<DefinitionErrorKind>) -> DefinitionError {
        DefinitionError {
            line,
            kind: kind.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct FieldValue {
    line: usize,
    text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct CellEntry {
    line: usize,
    state: String,
    symbol: String,
    text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Definition {
    fields: HashMap<Field, FieldValue>,
    cells: Vec<CellEntry>,
}

impl Definition {
    pub fn parse(def_string: &str) -> Result<Definition, DefinitionError> {
        let mut definition = Definition::default();

        for (i, line) in def_string.lines().enumerate() {
            let line_number = i + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line
                .split_once(':')
                .ok_or(DefinitionError::new(line_number, DefinitionErrorKind::MissingSeparator))?;
            let key = key.trim();
            let value = value.trim().to_string();

            if let Some(field) = Field::from_key(key) {
                if definition.fields.contains_key(&field) {
                    return Err(DefinitionError::new(
                        line_number,
                        DefinitionErrorKind::DuplicateField(field.key()),
                    ));
                }
                definition.fields.insert(
                    field,
                    FieldValue {
                        line: line_number,
                        text: value,
                    },
                );
                continue;
            }

            match field_tokens(key).as_slice() {
                [state, symbol] => definition.cells.push(CellEntry {
                    line: line_number,
                    state: state.to_string(),
                    symbol: symbol.to_string(),
                    text: value,
                }),
                _ => {
                    return Err(DefinitionError::new(
                        line_number,
                        DefinitionErrorKind::UnknownKey(key.to_string()),
                    ))
                }
            }
        }

        Ok(definition)
    }

    /// Raw text of a field, empty if the definition leaves it out.
    pub fn field(&self, field: Field) -> &str {
        self.fields
            .get(&field)
            .map(|value| value.text.as_str())
            .unwrap_or("")
    }

    /// Replaces a field, e.g. with a value given on the command line.
    pub fn set_field(&mut self, field: Field, text: impl Into<String>) {
        let line = self.fields.get(&field).map(|value| value.line).unwrap_or(0);
        self.fields.insert(
            field,
            FieldValue {
                line,
                text: text.into(),
            },
        );
    }

    fn field_line(&self, field: Field) -> usize {
        self.fields.get(&field).map(|value| value.line).unwrap_or(0)
    }

    pub fn to_dfa_request(&self) -> Result<DfaRequest, DefinitionError> {
        let alphabet = field_tokens(self.field(Field::Alphabet));
        let grid = self.grid(alphabet.len(), |symbol| {
            alphabet.iter().position(|token| *token == symbol)
        })?;

        DfaRequest::from_fields(
            self.field(Field::States),
            self.field(Field::Alphabet),
            grid,
            self.field(Field::Final),
            self.field(Field::Input),
        )
        .map_err(|e| DefinitionError::new(self.field_line(Field::Alphabet), e))
    }

    pub fn to_nfa_request(&self) -> Result<NfaRequest, DefinitionError> {
        let grid = self.grid(2, |symbol| match symbol {
            "eps" => Some(1),
            _ if symbol == NFA_INPUT.to_string() => Some(0),
            _ if symbol == EPSILON.to_string() => Some(1),
            _ => None,
        })?;

        Ok(NfaRequest::from_fields(
            self.field(Field::States),
            grid,
            self.field(Field::Final),
            self.field(Field::Single),
            self.field(Field::Subset),
        ))
    }

    // rows follow the first occurrence of each state token in the states field
    fn grid(
        &self,
        columns: usize,
        column_of: impl Fn(&str) -> Option<usize>,
    ) -> Result<TransitionGrid, DefinitionError> {
        let states = field_tokens(self.field(Field::States));
        let mut grid = TransitionGrid::new(states.len(), columns);

        for cell in &self.cells {
            let row = states
                .iter()
                .position(|state| *state == cell.state)
                .ok_or_else(|| {
                    DefinitionError::new(
                        cell.line,
                        DefinitionErrorKind::UnknownState(cell.state.clone()),
                    )
                })?;
            let column = column_of(&cell.symbol).ok_or_else(|| {
                DefinitionError::new(
                    cell.line,
                    DefinitionErrorKind::UnknownSymbol(cell.symbol.clone()),
                )
            })?;

            if grid.get(row, column).is_some() {
                return Err(DefinitionError::new(
                    cell.line,
                    DefinitionErrorKind::DuplicateCell {
                        state: cell.state.clone(),
                        symbol: cell.symbol.clone(),
                    },
                ));
            }
            grid.set(row, column, cell.text.as_str());
        }

        Ok(grid)
    }
}
