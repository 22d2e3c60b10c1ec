/*!
The context --- to which a dependency quantified formula is given and within
which solves take place.

Strictly, a [GenericDqbfContext] and a [DqbfContext].

The generic context is designed to be generic over the propositional engine
used, through the [PropositionalEngine](crate::engine::PropositionalEngine)
trait --- which helps testing against engine oracles --- while the
[DqbfContext] fixes the in-crate [Engine].

# Overview

A dependency quantified boolean formula ∀U₁…Uₘ ∃E₁(D₁)…∃Eₙ(Dₙ). M(U, E)
annotates each existential variable Eᵢ with an explicit dependency set
Dᵢ ⊆ {U₁,…,Uₘ}, and is true exactly when there are functions
fᵢ : {0,1}^{Dᵢ} → {0,1} such that M(U, f(U)) holds for every U.

The context decides this by counterexample guided refinement of a candidate
model held as an *ordered decision list* per existential: a chain of rules
premise₁ ⇒ v₁, premise₂ ⇒ v₂, …, default, where the first premise satisfied
by the universal assignment determines the value of the existential, and the
default applies otherwise.

Two engines are held:

- The *counterexample engine* carries the matrix, the propositional encoding
  of every decision list, and is asked for an assignment which falsifies the
  output gate under the current model.
- The *expansion engine* carries only *expansion variables* --- fresh atoms
  standing for "the value of existential e at a specific assignment of its
  dependencies" --- and blocking clauses over them.
  A satisfying assignment of the expansion engine picks the default values
  the model takes on next.

Each counterexample grows the decision lists monotonically, and the number
of expansion variables is bounded by Σₑ 2^|dep(e)|, so refinement
terminates.

# Example

```rust
# use otter_dqbf::builder::DqcirParser;
# use otter_dqbf::context::DqbfContext;
# use otter_dqbf::config::Config;
# use otter_dqbf::reports::Report;
let mut parser = DqcirParser::default();
parser.parse_str(
    "forall(u)
     exists(e)
     depend(e, u)
     g1 = xor(u, -e)
     output(g1)",
).unwrap();

let mut ctx = DqbfContext::from_parts(parser.into_parts().unwrap(), Config::default()).unwrap();
assert_eq!(ctx.solve(), Ok(Report::Satisfiable));
```
*/

mod counterexample;
mod expansion;
mod model;
mod refine;
mod rules;

pub use counterexample::Counterexample;

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
    builder::FormulaParts,
    config::Config,
    engine::{Engine, PropositionalEngine},
    generic::counter::Counter,
    structures::{
        atom::Atom,
        clause::CClause,
        literal::{CLiteral, Literal},
    },
    types::err::ContextError,
};

/// A record of a rule fire variable, kept for diagnostic output.
pub struct RuleFireRecord {
    /// The existential whose chain the fire variable belongs to.
    pub existential: Atom,

    /// The fire variable.
    pub fire_var: Atom,

    /// A rendering of the premise of the rule, or "default" while the
    /// variable is the yet-unbound tail of the chain.
    pub premise: String,
}

/// A record of a no-rule-fired variable, kept for diagnostic output.
pub struct NoRuleFiredRecord {
    /// The existential whose chain the variable belongs to.
    pub existential: Atom,

    /// The no-rule-fired variable.
    pub no_rule_fired_var: Atom,

    /// The rule index the variable closes: true iff no rule up to the index fired.
    pub rule_index: u32,
}

/// A record of a value variable, kept for diagnostic output.
pub struct ValueRecord {
    /// The existential whose chain the variable belongs to.
    pub existential: Atom,

    /// The value variable.
    pub value_var: Atom,

    /// The rule index whose value slot the variable holds.
    pub rule_index: u32,
}

/// Statistics from a context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    /// A count of refinement iterations made.
    pub iterations: usize,

    /// A count of the existential variables of the formula.
    pub existential_count: usize,

    /// A count of the universal variables of the formula.
    pub universal_count: usize,

    /// A count of expansion variables interned.
    pub expansion_count: usize,
}

/// A generic context, parameterised to a propositional engine.
pub struct GenericDqbfContext<E: PropositionalEngine> {
    /// Mapping from variable names to atoms. Append-only.
    pub name_to_id: HashMap<String, Atom>,

    /// Mapping from atoms to variable names, including a synthetic name for
    /// every auxiliary minted by the context. Append-only.
    pub id_to_name: BTreeMap<Atom, String>,

    /// The matrix, as given.
    matrix: Vec<CClause>,

    /// The universal atoms, in declaration order.
    universal_atoms: Vec<Atom>,

    /// The existential atoms, in dependency-map order.
    existential_atoms: Vec<Atom>,

    /// The existential atoms, as a set.
    existential_set: HashSet<Atom>,

    /// The dependency set of each existential.
    dependency_sets: HashMap<Atom, HashSet<Atom>>,

    /// The dependencies of each existential, in declaration order.
    dependency_lists: HashMap<Atom, Vec<Atom>>,

    /// The output gate of the formula.
    output_gate: Atom,

    /// The allocator of fresh atoms.
    pub counter: Counter,

    // Decision list state, per existential.
    /// The current default-value variable, with polarity carrying the current default.
    value_vars: HashMap<Atom, CLiteral>,

    /// The current no-rule-fired variable.
    no_rule_fired_vars: HashMap<Atom, Atom>,

    /// The next fire variable, assumed true as the tail of the chain.
    rule_fire_vars: HashMap<Atom, Atom>,

    /// The next rule ordinal.
    rule_numbers: HashMap<Atom, u32>,

    /// Every fire variable issued, for diagnostic output.
    pub all_rule_fire_vars: Vec<RuleFireRecord>,

    /// Every no-rule-fired variable issued, for diagnostic output.
    pub all_no_rule_fired_vars: Vec<NoRuleFiredRecord>,

    /// Every value variable issued, for diagnostic output.
    pub all_value_vars: Vec<ValueRecord>,

    /// Literals which must hold in every counterexample query.
    ///
    /// These freeze the conclusion polarities of rules whose conclusion is a
    /// plain boolean constant.
    permanent_assumptions: Vec<CLiteral>,

    /// The expansion cache: (existential, canonical dependency assignment) to expansion atom.
    expansion_vars: HashMap<(Atom, Vec<CLiteral>), Atom>,

    /// Every expansion atom, in order of interning.
    expansion_atoms: Vec<Atom>,

    /// The values of the expansion atoms committed by the last expansion solve.
    expansion_assignment: Vec<CLiteral>,

    /// The engine holding the matrix and the decision list encodings.
    pub counterexample_engine: E,

    /// The engine whose satisfying assignments pick default values.
    pub expansion_engine: E,

    /// A count of refinement iterations made.
    iterations: usize,

    /// The existential core of the previous iteration, for cycle detection.
    last_existential_core: Vec<CLiteral>,

    /// The universal assignment of the previous iteration, for cycle
    /// detection and for phase hints.
    last_universal_assignment: Vec<CLiteral>,
}

/// A context which uses the in-crate [Engine] for both engines.
pub type DqbfContext = GenericDqbfContext<Engine>;

impl DqbfContext {
    /// Creates a context from the parts of a parsed formula.
    pub fn from_parts(parts: FormulaParts, config: Config) -> Result<Self, ContextError> {
        let counterexample_engine = Engine::from_config(config.clone());
        let expansion_engine = Engine::from_config(config);
        Self::with_engines(parts, counterexample_engine, expansion_engine)
    }
}

impl<E: PropositionalEngine> GenericDqbfContext<E> {
    /// Creates a context over the given pair of engines.
    ///
    /// The counterexample engine receives the matrix, and the model of each
    /// existential is initialised.
    pub fn with_engines(
        parts: FormulaParts,
        counterexample_engine: E,
        expansion_engine: E,
    ) -> Result<Self, ContextError> {
        let FormulaParts {
            name_to_id,
            id_to_name,
            dependencies,
            matrix,
            universals,
            output_gate,
            counter,
        } = parts;

        // The allocator must sit above every atom of the input, whether or
        // not the atom is named.
        let mut counter = counter;
        for id in name_to_id.values() {
            counter.raise_to(*id);
        }
        for clause in &matrix {
            for literal in clause {
                counter.raise_to(literal.atom());
            }
        }

        let universal_atoms: Vec<Atom> = universals
            .iter()
            .filter_map(|name| name_to_id.get(name).copied())
            .collect();

        let mut existential_atoms = Vec::default();
        let mut existential_set = HashSet::default();
        let mut dependency_sets = HashMap::default();
        let mut dependency_lists = HashMap::default();

        for (existential_name, dependency_names) in &dependencies {
            let Some(existential) = name_to_id.get(existential_name).copied() else {
                continue;
            };
            existential_atoms.push(existential);
            existential_set.insert(existential);

            let mut dependency_set = HashSet::default();
            let mut dependency_list = Vec::default();
            for name in dependency_names {
                if let Some(dependency) = name_to_id.get(name).copied() {
                    dependency_set.insert(dependency);
                    dependency_list.push(dependency);
                }
            }
            dependency_sets.insert(existential, dependency_set);
            dependency_lists.insert(existential, dependency_list);
        }

        let mut the_context = GenericDqbfContext {
            name_to_id,
            id_to_name,
            matrix,
            universal_atoms,
            existential_atoms,
            existential_set,
            dependency_sets,
            dependency_lists,
            output_gate,
            counter,

            value_vars: HashMap::default(),
            no_rule_fired_vars: HashMap::default(),
            rule_fire_vars: HashMap::default(),
            rule_numbers: HashMap::default(),

            all_rule_fire_vars: Vec::default(),
            all_no_rule_fired_vars: Vec::default(),
            all_value_vars: Vec::default(),

            permanent_assumptions: Vec::default(),

            expansion_vars: HashMap::default(),
            expansion_atoms: Vec::default(),
            expansion_assignment: Vec::default(),

            counterexample_engine,
            expansion_engine,

            iterations: 0,
            last_existential_core: Vec::default(),
            last_universal_assignment: Vec::default(),
        };

        the_context
            .counterexample_engine
            .ensure_atom(the_context.counter.value());

        let matrix = the_context.matrix.clone();
        for clause in matrix {
            the_context
                .counterexample_engine
                .add_clause(clause)
                .map_err(ContextError::Engine)?;
        }

        let existentials = the_context.existential_atoms.clone();
        for existential in existentials {
            the_context.init_model(existential)?;
        }

        Ok(the_context)
    }

    /// The name of `atom`, synthesising one if the atom is unnamed.
    pub fn name_of(&self, atom: Atom) -> String {
        match self.id_to_name.get(&atom) {
            Some(name) => name.clone(),
            None => format!("var{atom}"),
        }
    }

    /// Statistics about the context and any solving performed.
    pub fn statistics(&self) -> Statistics {
        Statistics {
            iterations: self.iterations,
            existential_count: self.existential_atoms.len(),
            universal_count: self.universal_atoms.len(),
            expansion_count: self.expansion_atoms.len(),
        }
    }

    /// Groups existentials into candidate equivalence classes.
    ///
    /// At present grouping is by dependency-set size only, with each
    /// existential in a singleton class --- a complete implementation would
    /// prove pairwise equivalence under the current model by a solve per
    /// pair.
    pub fn equivalent_existentials(&self) -> Vec<Vec<Atom>> {
        let mut groups_by_count: BTreeMap<usize, Vec<Atom>> = BTreeMap::default();

        for existential in &self.existential_atoms {
            let count = match self.dependency_lists.get(existential) {
                Some(list) => list.len(),
                None => 0,
            };
            groups_by_count.entry(count).or_default().push(*existential);
        }

        let mut classes = Vec::default();
        for (_, group) in groups_by_count {
            for existential in group {
                classes.push(vec![existential]);
            }
        }
        classes
    }

    /// A multi-line summary of the formula: quantifiers, matrix size, and
    /// the dependencies of each existential.
    pub fn formula_info(&self) -> String {
        use std::fmt::Write;

        let mut info = String::default();
        let _ = writeln!(info, "DQBF formula information:");
        let _ = writeln!(info, "  Universal variables: {}", self.universal_atoms.len());
        let _ = writeln!(
            info,
            "  Existential variables: {}",
            self.existential_atoms.len()
        );
        let _ = writeln!(info, "  Matrix clauses: {}", self.matrix.len());
        let _ = writeln!(info, "  Output gate: {}", self.name_of(self.output_gate));

        let _ = writeln!(info, "Existential variables and their dependencies:");
        for existential in &self.existential_atoms {
            let dependencies = match self.dependency_lists.get(existential) {
                Some(list) => list
                    .iter()
                    .map(|atom| self.name_of(*atom))
                    .collect::<Vec<_>>()
                    .join(", "),
                None => String::default(),
            };
            let _ = writeln!(
                info,
                "  {} depends on: {dependencies}",
                self.name_of(*existential)
            );
        }
        info
    }

    /// The atoms of the universal variables, in declaration order.
    pub fn universal_atoms(&self) -> &[Atom] {
        &self.universal_atoms
    }

    /// The atoms of the existential variables.
    pub fn existential_atoms(&self) -> &[Atom] {
        &self.existential_atoms
    }

    /// A rendering of `literals` for diagnostic output.
    pub(super) fn format_literals(literals: &[CLiteral]) -> String {
        let mut the_string = String::from("[");
        for (index, literal) in literals.iter().enumerate() {
            if index > 0 {
                the_string.push_str(", ");
            }
            match literal.polarity() {
                true => the_string.push_str(&literal.atom().to_string()),
                false => the_string.push_str(&format!("~{}", literal.atom())),
            }
        }
        the_string.push(']');
        the_string
    }
}
