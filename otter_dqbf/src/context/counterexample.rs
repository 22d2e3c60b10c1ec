/*!
The search for a counterexample to the current candidate model.

# Overview

A counterexample is a universal assignment together with an existential
choice which falsifies the output gate while respecting the current decision
lists.
The search is a pair of solves on the counterexample engine:

1. *Find*: assume the negated output gate, the frozen rule conclusions, the
   tail fire variable and current default-value literal of every chain, and
   the committed expansion-variable values; bias decision phases toward the
   previous universal assignment.
   An unsatisfiable find means no counterexample exists: the model is a
   witness, and the formula is satisfiable.
2. *Minimise*: re-assume the full universal and existential assignments just
   found together with the *positive* output gate.
   This must be unsatisfiable --- the assignment falsified the gate --- and
   the failed assumptions among the existential literals form a core: a
   subset of the existential choice sufficient for the falsification.

The diagnostic snapshot of the chain variables is captured between the two
solves, as the minimise solve invalidates the model of the find solve.
*/

use std::collections::HashSet;

use crate::{
    context::GenericDqbfContext,
    engine::PropositionalEngine,
    misc::log::targets::{self},
    reports::Report,
    structures::literal::{CLiteral, Literal},
    types::err::ContextError,
};

/// A counterexample to a candidate model.
pub struct Counterexample {
    /// A subset of the existential choice sufficient to falsify the output gate.
    pub existential_core: Vec<CLiteral>,

    /// The universal assignment of the counterexample, in declaration order.
    pub universal_assignment: Vec<CLiteral>,

    /// The values of the chain variables at the counterexample, by synthetic
    /// name --- captured only when debug logging is enabled.
    pub snapshot: Vec<(String, CLiteral)>,
}

impl<E: PropositionalEngine> GenericDqbfContext<E> {
    /// Searches for a counterexample to the current candidate model.
    ///
    /// Returns `None` when no counterexample exists.
    pub fn get_counterexample(&mut self) -> Result<Option<Counterexample>, ContextError> {
        // Find.
        self.counterexample_engine
            .assume(CLiteral::new(self.output_gate, false));
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
        self.counterexample_engine
            .assume_all(&self.expansion_assignment);

        for literal in &self.last_universal_assignment {
            self.counterexample_engine.set_phase(*literal);
        }

        match self
            .counterexample_engine
            .solve()
            .map_err(ContextError::Engine)?
        {
            Report::Satisfiable => {}
            Report::Unsatisfiable => return Ok(None),
            Report::Unknown => return Err(ContextError::UnexpectedReport),
        }

        let universal_assignment = self
            .counterexample_engine
            .values_of(&self.universal_atoms);
        let existential_assignment = self
            .counterexample_engine
            .values_of(&self.existential_atoms);

        let snapshot = match log::log_enabled!(log::Level::Debug) {
            true => self.capture_snapshot(),
            false => Vec::default(),
        };

        // Minimise.
        self.counterexample_engine
            .assume_all(&universal_assignment);
        self.counterexample_engine
            .assume_all(&existential_assignment);
        self.counterexample_engine
            .assume(CLiteral::new(self.output_gate, true));

        match self
            .counterexample_engine
            .solve()
            .map_err(ContextError::Engine)?
        {
            Report::Unsatisfiable => {}
            // The assignment was read from a model falsifying the gate, so
            // anything else marks broken internal consistency.
            Report::Satisfiable | Report::Unknown => {
                return Err(ContextError::UnverifiedCounterexample);
            }
        }

        let failed: HashSet<CLiteral> = self
            .counterexample_engine
            .failed_assumptions()
            .into_iter()
            .collect();

        let existential_core: Vec<CLiteral> = existential_assignment
            .iter()
            .filter(|literal| failed.contains(literal))
            .copied()
            .collect();

        log::debug!(target: targets::REFINEMENT, "Counterexample: universals {}, existential core {}",
            Self::format_literals(&universal_assignment),
            Self::format_literals(&existential_core));

        Ok(Some(Counterexample {
            existential_core,
            universal_assignment,
            snapshot,
        }))
    }

    /// The values of every chain variable on the model of the find solve.
    fn capture_snapshot(&self) -> Vec<(String, CLiteral)> {
        let mut snapshot = Vec::default();

        for record in &self.all_rule_fire_vars {
            let value = self.counterexample_engine.values_of(&[record.fire_var]);
            snapshot.push((self.name_of(record.fire_var), value[0]));
        }
        for record in &self.all_no_rule_fired_vars {
            let value = self
                .counterexample_engine
                .values_of(&[record.no_rule_fired_var]);
            snapshot.push((self.name_of(record.no_rule_fired_var), value[0]));
        }
        for record in &self.all_value_vars {
            let value = self.counterexample_engine.values_of(&[record.value_var]);
            snapshot.push((self.name_of(record.value_var), value[0]));
        }

        snapshot
    }
}
