use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::{
    graph::AutomatonGraph,
    request::NfaRequest,
    state::{StateName, StateSet, StateTable},
    symbol::{Symbol, EPSILON, NFA_INPUT},
    table::NfaTable,
};

/// NFA over the fixed alphabet `a`, λ.
#[derive(Clone, Debug)]
pub struct Nfa {
    states: StateTable,
    table: NfaTable,
    accepting: StateSet,
}

impl Nfa {
    pub fn new(states: StateTable, table: NfaTable, accepting: StateSet) -> Nfa {
        Nfa {
            states,
            table,
            accepting,
        }
    }

    pub fn from_request(request: &NfaRequest) -> Nfa {
        let mut states = StateTable::from_declared(&request.states);
        let table = NfaTable::build(&mut states, &request.grid);
        let accepting = request
            .accepting
            .iter()
            .map(|name| states.intern(name))
            .collect();

        Nfa::new(states, table, accepting)
    }

    pub fn states(&self) -> &StateTable {
        &self.states
    }

    pub fn table(&self) -> &NfaTable {
        &self.table
    }

    pub fn accepting(&self) -> &StateSet {
        &self.accepting
    }

    /// Resolves query names to a set. Names that are not declared are interned as ghost
    /// states and take part in the computation like any other state.
    pub fn state_set<'a>(&mut self, names: impl IntoIterator<Item = &'a StateName>) -> StateSet {
        names
            .into_iter()
            .map(|name| self.states.intern(name))
            .collect()
    }

    // worklist of states whose epsilon moves have not been followed yet;
    // every state enters the queue at most once, when it is first added to the closure
    pub fn epsilon_closure(&self, set: &StateSet) -> StateSet {
        let mut closure = set.clone();
        let mut queue: VecDeque<_> = set.iter().collect();

        while let Some(state) = queue.pop_front() {
            let Some(destinations) = self.table.get(state, EPSILON) else {
                continue;
            };

            for next in destinations.iter() {
                if closure.insert(next) {
                    trace!(
                        from = %self.states.name(state),
                        to = %self.states.name(next),
                        "epsilon move"
                    );
                    queue.push_back(next);
                }
            }
        }

        closure
    }

    /// Union of the destinations of every state in `set` on `symbol`, without any closure.
    pub fn step(&self, set: &StateSet, symbol: Symbol) -> StateSet {
        let mut result = StateSet::new();
        for state in set.iter() {
            if let Some(destinations) = self.table.get(state, symbol) {
                result.union_with(destinations);
            }
        }

        result
    }

    /// δ̂ over the single input symbol: close, step on `a`, close again.
    pub fn extended_transition(&self, subset: &StateSet) -> StateSet {
        let closed = self.epsilon_closure(subset);
        let moved = self.step(&closed, NFA_INPUT);
        let result = self.epsilon_closure(&moved);

        debug!(
            subset = %subset.join(&self.states),
            closure = %closed.join(&self.states),
            result = %result.join(&self.states),
            "extended transition"
        );
        result
    }

    pub fn graph(&self) -> AutomatonGraph {
        AutomatonGraph::build(&self.states, &self.table.edges(), &self.accepting)
    }
}
