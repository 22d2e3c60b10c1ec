/*!
Expansion variables, interned against canonical dependency assignments.

An expansion variable stands for the value of the model function of an
existential at one specific assignment of the dependencies of the
existential.
Interning an expansion variable installs, in the same call, the rule
"assignment ⇒ e ≡ x" in the decision list of the existential --- so the
counterexample engine relates the variable to the existential, while the
expansion engine is free to pick the variable's value.

Assignments are canonicalised by sorting literals by atom, so any two
orderings of the same assignment intern the same variable.
*/

use crate::{
    context::GenericDqbfContext,
    engine::PropositionalEngine,
    misc::log::targets::{self},
    structures::{
        atom::Atom,
        literal::{CLiteral, Literal},
    },
    types::err::ContextError,
};

impl<E: PropositionalEngine> GenericDqbfContext<E> {
    /// The canonical form of an assignment: literals sorted by atom, ascending.
    pub fn canonical_assignment(assignment: &[CLiteral]) -> Vec<CLiteral> {
        let mut canonical = assignment.to_vec();
        canonical.sort_unstable_by_key(|literal| literal.atom());
        canonical
    }

    /// The expansion variable of `existential` at `assignment`, interning a
    /// fresh variable (and the paired rule) on first demand.
    ///
    /// `assignment` must assign only variables in the dependency set of
    /// `existential`, though in any order and not necessarily all of them.
    pub fn expansion_variable(
        &mut self,
        existential: Atom,
        assignment: &[CLiteral],
    ) -> Result<Atom, ContextError> {
        if !self.existential_set.contains(&existential) {
            return Err(ContextError::UnknownExistential(existential));
        }

        let dependencies = &self.dependency_sets[&existential];
        for literal in assignment {
            if !dependencies.contains(&literal.atom()) {
                return Err(ContextError::OutsideDependencies {
                    existential,
                    literal: *literal,
                });
            }
        }

        let canonical = Self::canonical_assignment(assignment);
        if let Some(expansion_var) = self.expansion_vars.get(&(existential, canonical.clone())) {
            return Ok(*expansion_var);
        }

        let expansion_var = self.counter.increment();

        let mut name = format!("exp_{}_", self.name_of(existential));
        for (index, literal) in canonical.iter().enumerate() {
            if index > 0 {
                name.push('_');
            }
            name.push_str(&literal.atom().to_string());
            name.push(match literal.polarity() {
                true => 'T',
                false => 'F',
            });
        }
        self.id_to_name.insert(expansion_var, name);

        self.expansion_vars
            .insert((existential, canonical.clone()), expansion_var);

        // The paired rule: on this assignment, e ≡ x.
        self.add_rule(existential, &canonical, true, Some(expansion_var))?;

        self.expansion_engine.ensure_atom(expansion_var);
        self.expansion_atoms.push(expansion_var);

        log::debug!(target: targets::EXPANSION, "Interned expansion variable {expansion_var} for {} at {}", self.name_of(existential), Self::format_literals(&canonical));

        Ok(expansion_var)
    }
}
