/*!
(The internal representation of) an atom (aka. a 'variable').

Broadly, atoms are things to which assigning a (boolean) value is of interest.

Every propositional variable of a formula --- source variable, gate,
rule-chain auxiliary, expansion variable --- is an atom, and each atom is a
positive integer.
Atoms are dense only by construction: the [counter](crate::generic::counter)
hands out each fresh atom exactly once and never renumbers, so an atom may be
used as an index of a structure without further translation.

# Notes
- The atom `0` is reserved, and fixed internally with a value of true.
- In the SAT literature these are often called 'variables' while in the logic
  literature these are often called 'atoms'.
*/

/// An atom, aka. a 'variable'.
pub type Atom = u32;

/// The atom `0` is fixed internally with a value of true.
pub const TOP_ATOM: Atom = 0;

/// The maximum instance of an atom, limited by the signed representation of literals.
pub const ATOM_MAX: Atom = i32::MAX.unsigned_abs();
