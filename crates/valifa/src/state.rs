use std::{
    borrow::Borrow,
    collections::HashMap,
    fmt::{self, Debug, Display},
};

use bit_set::BitSet;
use valifa_util::make_type_idx;

/// A state token as typed by the user. Equality is textual and case-sensitive.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateName(String);

impl StateName {
    pub fn new(name: impl Into<String>) -> StateName {
        StateName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StateName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StateName {
    fn from(name: &str) -> Self {
        StateName(name.to_string())
    }
}

impl Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

make_type_idx!(pub StateIdx, StateName);

// Interns every state name an automaton refers to. The states field is interned first, in
// order, so an index below `declared` is a declared state; anything interned later is a ghost
// that only shows up in a transition cell, the accepting field or a query.
#[derive(Clone, Debug, Default)]
pub struct StateTable {
    names: Vec<StateName>,
    lookup: HashMap<StateName, StateIdx>,
    // one entry per declared token, repeats included, so rows of the transition grid line up
    order: Vec<StateIdx>,
    declared: usize,
}

impl StateTable {
    pub fn from_declared(states: &[StateName]) -> StateTable {
        let mut table = StateTable::default();
        for name in states {
            let idx = table.intern(name);
            table.order.push(idx);
        }
        table.declared = table.names.len();
        table
    }

    /// Index of `name`, interning it as an undeclared state if it has not been seen yet.
    pub fn intern(&mut self, name: &StateName) -> StateIdx {
        if let Some(idx) = self.lookup.get(name) {
            return *idx;
        }

        let idx = StateIdx::from_push(&mut self.names, name.clone());
        self.lookup.insert(name.clone(), idx);
        idx
    }

    pub fn get(&self, name: &str) -> Option<StateIdx> {
        self.lookup.get(name).copied()
    }

    pub fn name(&self, idx: StateIdx) -> &StateName {
        &self.names[idx]
    }

    pub fn is_declared(&self, idx: StateIdx) -> bool {
        idx.index() < self.declared
    }

    /// The state a run starts in: the first declared token.
    pub fn start(&self) -> Option<StateIdx> {
        self.order.first().copied()
    }

    /// Declared tokens in field order, one per grid row.
    pub fn rows(&self) -> &[StateIdx] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = StateIdx> + '_ {
        (0..self.names.len()).map(StateIdx::from_index)
    }

    pub fn undeclared(&self) -> impl Iterator<Item = StateIdx> + '_ {
        (self.declared..self.names.len()).map(StateIdx::from_index)
    }
}

/// A set of interned states.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct StateSet {
    bits: BitSet,
}

impl StateSet {
    pub fn new() -> StateSet {
        StateSet { bits: BitSet::new() }
    }

    pub fn singleton(state: StateIdx) -> StateSet {
        let mut set = StateSet::new();
        set.insert(state);
        set
    }

    /// Returns true if the state was not already present.
    pub fn insert(&mut self, state: StateIdx) -> bool {
        self.bits.insert(state.index())
    }

    pub fn contains(&self, state: StateIdx) -> bool {
        self.bits.contains(state.index())
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn union_with(&mut self, other: &StateSet) {
        self.bits.union_with(&other.bits);
    }

    pub fn is_subset(&self, other: &StateSet) -> bool {
        self.bits.is_subset(&other.bits)
    }

    /// Ascending index order, i.e. the order states were interned in.
    pub fn iter(&self) -> impl Iterator<Item = StateIdx> + '_ {
        self.bits.iter().map(StateIdx::from_index)
    }

    pub fn names<'a>(&'a self, states: &'a StateTable) -> impl Iterator<Item = &'a StateName> + 'a {
        self.iter().map(move |idx| states.name(idx))
    }

    /// Comma-joined names; an empty set joins to an empty string.
    pub fn join(&self, states: &StateTable) -> String {
        self.names(states)
            .map(StateName::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(StateIdx::index)).finish()
    }
}

impl FromIterator<StateIdx> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateIdx>>(iter: I) -> Self {
        let mut set = StateSet::new();
        for state in iter {
            set.insert(state);
        }
        set
    }
}

impl Extend<StateIdx> for StateSet {
    fn extend<I: IntoIterator<Item = StateIdx>>(&mut self, iter: I) {
        for state in iter {
            self.insert(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tokens: &[&str]) -> Vec<StateName> {
        tokens.iter().copied().map(StateName::from).collect()
    }

    #[test]
    fn declared_states_come_first() {
        let mut table = StateTable::from_declared(&names(&["q0", "q1", "q0"]));
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.rows()[0], table.rows()[2]);
        assert_eq!(table.start(), table.get("q0"));

        let ghost = table.intern(&StateName::from("q9"));
        assert!(!table.is_declared(ghost));
        assert!(table.is_declared(table.get("q1").unwrap()));
        assert_eq!(table.undeclared().collect::<Vec<_>>(), vec![ghost]);

        // interning again does not create a second entry
        assert_eq!(table.intern(&StateName::from("q9")), ghost);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn names_are_case_sensitive() {
        let table = StateTable::from_declared(&names(&["q0", "Q0"]));
        assert_ne!(table.get("q0"), table.get("Q0"));
        assert_eq!(table.get("q1"), None);
    }

    #[test]
    fn empty_table_has_no_start() {
        let table = StateTable::from_declared(&[]);
        assert!(table.is_empty());
        assert_eq!(table.start(), None);
    }

    #[test]
    fn state_set_basic() {
        let table = StateTable::from_declared(&names(&["q0", "q1", "q2"]));
        let q0 = table.get("q0").unwrap();
        let q2 = table.get("q2").unwrap();

        let mut set = StateSet::new();
        assert!(set.is_empty());
        assert!(set.insert(q2));
        assert!(set.insert(q0));
        assert!(!set.insert(q0));
        assert_eq!(set.len(), 2);
        assert_eq!(set.join(&table), "q0, q2");

        let single = StateSet::singleton(q0);
        assert!(single.is_subset(&set));
        assert!(!set.is_subset(&single));

        assert_eq!(StateSet::new().join(&table), "");
    }
}
