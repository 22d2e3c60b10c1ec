/*!
The refinement loop.

# Overview

Each iteration derives a counterexample against the current model, blocks
the configuration of model-function values witnessed by the counterexample,
and asks the expansion engine for the default values the model takes on
next:

1. If no counterexample exists, the model witnesses satisfiability.
2. Otherwise, for each existential literal of the core the universal
   assignment is restricted to the dependencies of the existential and the
   matching expansion variable is interned --- growing the decision list ---
   and the default of the existential is flipped away from the refuted
   value.
   The negations of the witnessed expansion values form a blocking clause
   for the expansion engine: the next model must disagree somewhere.
3. If the expansion engine is unsatisfiable every configuration of
   model-function values on the interned points is blocked, and the formula
   is unsatisfiable.
   Otherwise the satisfying assignment of the expansion engine is committed,
   to hold in the counterexample queries of the next iteration.

# Termination

The expansion variables range over the finite set of (existential, canonical
dependency sub-assignment) pairs, and each iteration adds one blocking
clause over them, so the loop terminates.
A repeat of the previous counterexample --- compared canonically --- would
mean refinement failed to make progress, and aborts the solve: such a repeat
marks a bug, and is never swallowed.
*/

use crate::{
    context::{Counterexample, GenericDqbfContext},
    engine::PropositionalEngine,
    misc::log::targets::{self},
    reports::Report,
    structures::literal::{CLiteral, Literal},
    types::err::ContextError,
};

impl<E: PropositionalEngine> GenericDqbfContext<E> {
    /// Decides the satisfiability of the formula of the context.
    pub fn solve(&mut self) -> Result<Report, ContextError> {
        loop {
            self.iterations += 1;
            log::info!(target: targets::REFINEMENT, "Iteration {}", self.iterations);

            let Some(counterexample) = self.get_counterexample()? else {
                log::info!(target: targets::REFINEMENT, "No counterexample: satisfiable after {} iterations", self.iterations);

                if log::log_enabled!(log::Level::Debug) {
                    self.enumerate_model_functions()?;
                }

                return Ok(Report::Satisfiable);
            };

            for (name, value) in &counterexample.snapshot {
                log::debug!(target: targets::REFINEMENT, "  {name}: {value}");
            }

            self.check_for_cycle(&counterexample)?;

            self.last_existential_core = counterexample.existential_core.clone();
            self.last_universal_assignment = counterexample.universal_assignment.clone();

            self.analyze_counterexample(
                &counterexample.existential_core,
                &counterexample.universal_assignment,
            )?;

            match self.expansion_engine.solve().map_err(ContextError::Engine)? {
                Report::Unsatisfiable => {
                    log::info!(target: targets::REFINEMENT, "Expansion engine exhausted: unsatisfiable after {} iterations", self.iterations);
                    return Ok(Report::Unsatisfiable);
                }

                Report::Satisfiable => {
                    self.expansion_assignment =
                        self.expansion_engine.values_of(&self.expansion_atoms);
                }

                Report::Unknown => return Err(ContextError::UnexpectedReport),
            }
        }
    }

    /// Builds and installs the blocking clause of a counterexample, flipping
    /// the defaults of the refuted existentials.
    pub fn analyze_counterexample(
        &mut self,
        existential_core: &[CLiteral],
        universal_assignment: &[CLiteral],
    ) -> Result<(), ContextError> {
        let mut blocking: Vec<CLiteral> = Vec::default();

        for literal in existential_core {
            let existential = literal.atom();

            let assignment: Vec<CLiteral> = {
                let dependencies = self
                    .dependency_sets
                    .get(&existential)
                    .ok_or(ContextError::UnknownExistential(existential))?;
                universal_assignment
                    .iter()
                    .filter(|universal| dependencies.contains(&universal.atom()))
                    .copied()
                    .collect()
            };

            let expansion_var = self.expansion_variable(existential, &assignment)?;

            // The counterexample witnesses the current value is wrong on the
            // assignment, so block the value and move the default away.
            match literal.polarity() {
                true => {
                    blocking.push(CLiteral::new(expansion_var, false));
                    self.set_default_value(existential, false)?;
                }
                false => {
                    blocking.push(CLiteral::new(expansion_var, true));
                    self.set_default_value(existential, true)?;
                }
            }
        }

        log::debug!(target: targets::EXPANSION, "Blocking clause: {}", Self::format_literals(&blocking));

        self.expansion_engine
            .add_clause(blocking)
            .map_err(ContextError::Engine)?;

        Ok(())
    }

    /// Errors if `counterexample` repeats the counterexample of the previous
    /// iteration, comparing canonically.
    fn check_for_cycle(&self, counterexample: &Counterexample) -> Result<(), ContextError> {
        if self.last_existential_core.is_empty() && self.last_universal_assignment.is_empty() {
            return Ok(());
        }

        let this_core = Self::canonical_assignment(&counterexample.existential_core);
        let last_core = Self::canonical_assignment(&self.last_existential_core);
        let this_universals = Self::canonical_assignment(&counterexample.universal_assignment);
        let last_universals = Self::canonical_assignment(&self.last_universal_assignment);

        if this_core == last_core && this_universals == last_universals {
            log::error!(target: targets::REFINEMENT, "Cycle detected on iteration {}", self.iterations);
            return Err(ContextError::CycleDetected {
                iteration: self.iterations,
            });
        }

        Ok(())
    }
}
