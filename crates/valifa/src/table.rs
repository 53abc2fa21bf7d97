use std::collections::HashMap;

use tracing::{debug, trace};
use valifa_util::list_tokens;

use crate::{
    state::{StateIdx, StateName, StateSet, StateTable},
    symbol::{Symbol, NFA_ALPHABET},
};

// rows = declared state tokens, columns = alphabet symbols
// None = the cell was never filled in
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionGrid {
    cells: Vec<Option<String>>,
    rows: usize,
    columns: usize,
}

impl TransitionGrid {
    pub fn new(rows: usize, columns: usize) -> TransitionGrid {
        TransitionGrid {
            cells: vec![None; rows * columns],
            rows,
            columns,
        }
    }

    /// Fills a cell. Returns false, leaving the grid untouched, if the cell is out of range.
    pub fn set(&mut self, row: usize, column: usize, text: impl Into<String>) -> bool {
        if row >= self.rows || column >= self.columns {
            return false;
        }
        self.cells[row * self.columns + column] = Some(text.into());
        true
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&str> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cells[row * self.columns + column].as_deref()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    // trimmed, non-empty cells in row-major order, restricted to the rows and columns given
    fn filled<'a>(
        &'a self,
        rows: &'a [StateIdx],
        columns: &'a [Symbol],
    ) -> impl Iterator<Item = (StateIdx, Symbol, &'a str)> + 'a {
        rows.iter().enumerate().flat_map(move |(row, from)| {
            columns.iter().enumerate().filter_map(move |(column, symbol)| {
                let text = self.get(row, column)?.trim();
                (!text.is_empty()).then_some((*from, *symbol, text))
            })
        })
    }
}

/// (state, symbol) -> exactly one destination.
#[derive(Clone, Debug, Default)]
pub struct DfaTable {
    transitions: HashMap<(StateIdx, Symbol), StateIdx>,
}

impl DfaTable {
    pub fn new() -> DfaTable {
        DfaTable::default()
    }

    // A cell is taken whole as one destination token, so `q1 q2` becomes a single
    // (undeclared) state rather than two.
    pub fn build(states: &mut StateTable, alphabet: &[Symbol], grid: &TransitionGrid) -> DfaTable {
        let rows = states.rows().to_vec();
        let mut table = DfaTable::new();

        for (from, symbol, text) in grid.filled(&rows, alphabet) {
            let destination = StateName::from(text);
            let to = states.intern(&destination);
            trace!(from = %states.name(from), %symbol, to = %destination, "dfa cell");
            table.insert(from, symbol, to);
        }

        debug!(transitions = table.len(), "built dfa transition table");
        table
    }

    /// Later inserts for the same key overwrite earlier ones.
    pub fn insert(&mut self, from: StateIdx, symbol: Symbol, to: StateIdx) {
        self.transitions.insert((from, symbol), to);
    }

    pub fn get(&self, from: StateIdx, symbol: Symbol) -> Option<StateIdx> {
        self.transitions.get(&(from, symbol)).copied()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Every transition, sorted by source, symbol and destination.
    pub fn edges(&self) -> Vec<(StateIdx, Symbol, StateIdx)> {
        let mut edges: Vec<_> = self
            .transitions
            .iter()
            .map(|(&(from, symbol), &to)| (from, symbol, to))
            .collect();
        edges.sort();
        edges
    }
}

/// (state, symbol) -> set of destinations. Only `a` and epsilon columns exist.
#[derive(Clone, Debug, Default)]
pub struct NfaTable {
    transitions: HashMap<(StateIdx, Symbol), StateSet>,
}

impl NfaTable {
    pub fn new() -> NfaTable {
        NfaTable::default()
    }

    // cells hold destination lists separated by commas and/or whitespace
    pub fn build(states: &mut StateTable, grid: &TransitionGrid) -> NfaTable {
        let rows = states.rows().to_vec();
        let mut table = NfaTable::new();

        for (from, symbol, text) in grid.filled(&rows, &NFA_ALPHABET) {
            let destinations: Vec<StateName> =
                list_tokens(text).into_iter().map(StateName::from).collect();
            trace!(from = %states.name(from), %symbol, count = destinations.len(), "nfa cell");
            // a later row for a repeated state name replaces the earlier cell
            table.transitions.remove(&(from, symbol));
            for destination in &destinations {
                let to = states.intern(destination);
                table.insert(from, symbol, to);
            }
        }

        debug!(keys = table.transitions.len(), "built nfa transition table");
        table
    }

    pub fn insert(&mut self, from: StateIdx, symbol: Symbol, to: StateIdx) {
        self.transitions.entry((from, symbol)).or_default().insert(to);
    }

    pub fn get(&self, from: StateIdx, symbol: Symbol) -> Option<&StateSet> {
        self.transitions
            .get(&(from, symbol))
            .filter(|destinations| !destinations.is_empty())
    }

    /// Every (source, symbol, destination) triple, one per destination, sorted.
    pub fn edges(&self) -> Vec<(StateIdx, Symbol, StateIdx)> {
        let mut edges: Vec<_> = self
            .transitions
            .iter()
            .flat_map(|(&(from, symbol), destinations)| {
                destinations.iter().map(move |to| (from, symbol, to))
            })
            .collect();
        edges.sort();
        edges
    }
}
