/*!
Assumptions, and the extraction of failed assumptions.

# Overview

Assumptions for a solve are asserted together, on a single decision level
directly above the root, before any free decision is made.
As the level rests below every decision it survives restarts, and conflict
analysis never backjumps through it.

After an unsatisfiable solve, [failed_assumptions](crate::engine::GenericEngine::failed_assumptions)
identifies a subset of the assumptions from which the conflict was derived,
by the method of MiniSAT's analyzeFinal:

The conflict, if it exists, is due to some chain of BCP.
And, so long as an assumption was used in some part of the chain, it was
used to derive the conflict.
Each part of the chain can be examined by walking the trail backwards, so a
literal is examined before the literals it was derived from.
By keeping a note of the atoms seen, then, use of an assumption is noted
before the assumption itself is reached on the walk.
*/

use std::collections::HashSet;

use crate::{
    engine::{trail::AssignmentSource, ConflictSource, EngineState, GenericEngine},
    misc::log::targets::{self},
    structures::{
        atom::Atom,
        literal::{CLiteral, Literal},
    },
};

impl<R: rand::Rng + std::default::Default> GenericEngine<R> {
    /// Asserts `assumptions` on a fresh level above the root.
    ///
    /// Returns an error with the conflict if some assumption conflicts with
    /// the root valuation or with an earlier assumption of the collection.
    /// Propagation of the asserted assumptions is left to the solve loop.
    pub(super) fn assert_assumptions(
        &mut self,
        assumptions: Vec<CLiteral>,
    ) -> Result<(), ConflictSource> {
        self.trail.fresh_level();
        self.trail.lowest_decision_level = self.trail.current_level();

        for assumption in assumptions {
            match self.atom_db.value_of(assumption.atom()) {
                None => {
                    self.trail.assign(
                        &mut self.atom_db,
                        assumption,
                        AssignmentSource::Assumption,
                    );
                }

                Some(value) if value == assumption.polarity() => {
                    log::trace!(target: targets::VALUATION, "Assumption {assumption} already entailed");
                }

                Some(_) => {
                    log::debug!(target: targets::VALUATION, "Assumption {assumption} conflicts with the valuation");
                    return Err(ConflictSource::Assumption(assumption));
                }
            }
        }

        Ok(())
    }

    /// Identifies the assumptions used to derive the conflict of the last solve.
    ///
    /// # Panics
    /// If the engine is not unsatisfiable.
    pub(super) fn failed_assumptions_internal(&self) -> Vec<CLiteral> {
        let EngineState::Unsatisfiable(source) = self.state else {
            panic!("! Unsatisfiability required to determine failed assumptions");
        };

        let mut assumptions: Vec<CLiteral> = Vec::default();

        // Atoms are used in place of literals, as a literal and its negation
        // will not both appear on the trail.
        let mut seen_atoms: HashSet<Atom> = HashSet::default();

        match source {
            ConflictSource::Clause(key) => {
                seen_atoms.extend(self.clause_db.get(key).atoms());
            }

            ConflictSource::Unit(literal) => {
                seen_atoms.insert(literal.atom());
            }

            ConflictSource::Assumption(literal) => {
                // The assumption itself never reached the trail.
                seen_atoms.insert(literal.atom());
                assumptions.push(literal);
            }

            ConflictSource::EmptyClause => {}
        }

        for assignment in self.trail.assignments.iter().rev() {
            if !seen_atoms.contains(&assignment.literal.atom()) {
                continue;
            }

            match assignment.source {
                AssignmentSource::Assumption => {
                    assumptions.push(assignment.literal);
                }

                AssignmentSource::BCP(key) => {
                    seen_atoms.extend(self.clause_db.get(key).atoms());
                }

                AssignmentSource::Unit | AssignmentSource::Decision => {}
            }
        }

        assumptions
    }
}
