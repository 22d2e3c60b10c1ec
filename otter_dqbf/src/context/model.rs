/*!
Reading the model functions of a satisfiable formula.

The candidate model is held inside the counterexample engine, so the value
of each existential at a universal assignment is read by a solve under the
assignment together with the assumptions which select the current chains:
the frozen rule conclusions, the tail fire variables, and the default-value
literals.

An unsatisfiable row for a lone query is the valid outcome "no model for
this input".
An unsatisfiable row *during enumeration after a satisfiable verdict* marks
broken internal consistency, and is an error.
*/

use crate::{
    context::GenericDqbfContext,
    engine::PropositionalEngine,
    misc::log::targets::{self},
    reports::Report,
    structures::literal::{CLiteral, Literal},
    types::err::ContextError,
};

impl<E: PropositionalEngine> GenericDqbfContext<E> {
    /// The existential values induced by `universal_literals` under the
    /// current model, or `None` if the model has no output for the input.
    pub fn compute_model_functions(
        &mut self,
        universal_literals: &[CLiteral],
    ) -> Result<Option<Vec<CLiteral>>, ContextError> {
        self.counterexample_engine
            .assume_all(&self.permanent_assumptions);
        for existential in &self.existential_atoms {
            let fire_var = self.rule_fire_vars[existential];
            self.counterexample_engine
                .assume(CLiteral::new(fire_var, true));
        }
        for existential in &self.existential_atoms {
            let value_literal = self.value_vars[existential];
            self.counterexample_engine.assume(value_literal);
        }
        // The committed expansion values are assumed so outputs at interned
        // points agree with the model the refinement loop verified, rather
        // than drifting with decision heuristics.
        self.counterexample_engine
            .assume_all(&self.expansion_assignment);
        self.counterexample_engine.assume_all(universal_literals);

        match self
            .counterexample_engine
            .solve()
            .map_err(ContextError::Engine)?
        {
            Report::Satisfiable => Ok(Some(
                self.counterexample_engine
                    .values_of(&self.existential_atoms),
            )),
            Report::Unsatisfiable => Ok(None),
            Report::Unknown => Err(ContextError::UnexpectedReport),
        }
    }

    /// Computes the model functions at every universal assignment, erring on
    /// any row without an output.
    pub fn enumerate_model_functions(
        &mut self,
    ) -> Result<Vec<(Vec<CLiteral>, Vec<CLiteral>)>, ContextError> {
        let mut rows = Vec::default();

        if self.universal_atoms.is_empty() {
            match self.compute_model_functions(&[])? {
                Some(existentials) => {
                    log::debug!(target: targets::MODEL, "(no universals) -> {}", Self::format_literals(&existentials));
                    rows.push((Vec::default(), existentials));
                    return Ok(rows);
                }
                None => return Err(ContextError::ModelFunctionGap(Vec::default())),
            }
        }

        let universal_count = self.universal_atoms.len();
        for row in 0..(1_usize << universal_count) {
            let universal_literals: Vec<CLiteral> = (0..universal_count)
                .map(|position| {
                    CLiteral::new(self.universal_atoms[position], ((row >> position) & 1) == 1)
                })
                .collect();

            match self.compute_model_functions(&universal_literals)? {
                Some(existentials) => {
                    log::debug!(target: targets::MODEL, "{} -> {}", Self::format_literals(&universal_literals), Self::format_literals(&existentials));
                    rows.push((universal_literals, existentials));
                }
                None => return Err(ContextError::ModelFunctionGap(universal_literals)),
            }
        }

        Ok(rows)
    }
}
