//! Clauses, canonically represented as vectors of literals.
//!
//! A clause is anything which has methods for returning its literals, etc.
//! The trait is implemented for a lone [CLiteral] (a unit clause) to ease
//! adding unit clauses to an engine without wrapping the literal in a vector.

use crate::structures::literal::{CLiteral, Literal};

/// The canonical representation of a clause.
pub type CClause = Vec<CLiteral>;

/// Something which has methods for returning its literals, etc.
pub trait Clause {
    /// An iterator over the literals of the clause.
    fn literals(&self) -> impl Iterator<Item = CLiteral> + '_;

    /// The length of the clause.
    fn size(&self) -> usize;

    /// The clause as a canonical [CClause].
    fn canonical(self) -> CClause;

    /// The clause in DIMACS form, with a zero terminator.
    fn as_dimacs(&self) -> String {
        let mut the_string = String::default();
        for literal in self.literals() {
            the_string.push_str(format!("{} ", literal.as_int()).as_str());
        }
        the_string.push('0');
        the_string
    }
}

impl Clause for CClause {
    fn literals(&self) -> impl Iterator<Item = CLiteral> + '_ {
        self.iter().copied()
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn canonical(self) -> CClause {
        self
    }
}

impl Clause for CLiteral {
    fn literals(&self) -> impl Iterator<Item = CLiteral> + '_ {
        std::iter::once(*self)
    }

    fn size(&self) -> usize {
        1
    }

    fn canonical(self) -> CClause {
        vec![self]
    }
}
