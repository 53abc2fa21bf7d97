use std::fmt::{self, Display};

use crate::FieldError;

/// One input symbol. DFA alphabets are arbitrary single characters, NFAs only ever see
/// [`NFA_INPUT`] and [`EPSILON`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(char);

/// Consumed without reading input.
pub const EPSILON: Symbol = Symbol('λ');

/// The single real input symbol of an NFA.
pub const NFA_INPUT: Symbol = Symbol('a');

/// Columns of an NFA transition table, in order.
pub const NFA_ALPHABET: [Symbol; 2] = [NFA_INPUT, EPSILON];

impl Symbol {
    pub const fn new(c: char) -> Symbol {
        Symbol(c)
    }

    // alphabet tokens must be exactly one character long
    pub fn from_token(token: &str) -> Result<Symbol, FieldError> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Symbol(c)),
            _ => Err(FieldError::MultiCharSymbol(token.to_string())),
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }

    pub fn is_epsilon(self) -> bool {
        self == EPSILON
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
