/*!
Tools for building a context from a DQCIR formula.

# Overview

The builder parses the line-oriented DQCIR format:

```none
# a comment
forall(u1, u2)
exists(e1)
depend(e2, u1)
g1 = and(u1, -e1)
g2 = or(g1, e2)
output(g2)
```

- `forall(…)` declares universal variables, in order.
- `exists(…)` declares existential variables depending on every universal
  declared so far; `depend(e, u…)` declares an existential with an explicit
  dependency set.
- Gates are `and`, `or`, or `xor` (case-insensitive) over literals, where a
  literal is a name or a `-`-prefixed name.
- `output(g)` names the output gate.
- Lines beginning with `#` and blank lines are skipped.

Parsed gates are converted to clauses by the usual Tseitin encoding, and
[into_parts](DqcirParser::into_parts) surrenders everything a
[context](crate::context) is built from --- including the atom
[Counter](crate::generic::counter::Counter), which the parser owns while
parsing and the context owns afterwards.
*/

mod dqcir;
mod tseitin;

pub use dqcir::DqcirParser;

use std::collections::{BTreeMap, HashMap};

use crate::{generic::counter::Counter, structures::atom::Atom, structures::clause::CClause};

/// The parts of a parsed formula, as consumed by a context.
pub struct FormulaParts {
    /// Mapping from variable names to atoms.
    pub name_to_id: HashMap<String, Atom>,

    /// Mapping from atoms to variable names.
    pub id_to_name: BTreeMap<Atom, String>,

    /// The dependencies of each existential, by name, in declaration order.
    pub dependencies: BTreeMap<String, Vec<String>>,

    /// The matrix, in conjunctive normal form.
    pub matrix: Vec<CClause>,

    /// The universal variables, by name, in declaration order.
    pub universals: Vec<String>,

    /// The output gate.
    pub output_gate: Atom,

    /// The atom allocator, seeded beyond every atom of the formula.
    pub counter: Counter,
}
