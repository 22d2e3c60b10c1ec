/*!
Boolean constraint propagation.

# Overview

Propagation examines, for each queued assignment, the clauses watching the
literal the assignment made false, and for each such clause either:
- Moves the watch to some other literal of the clause without a conflicting
  value, or:
- Queues the remaining watched literal as a consequence of the clause, or:
- Identifies that the clause conflicts with the current valuation.

# Complications

The watch list under examination is [taken](crate::engine::AtomDB::take_watches)
from the atom database for the duration of the examination, and restored
afterwards --- including on a conflict.
This avoids a borrow of the watch list conflicting with mutation of clauses
and of *other* watch lists as watches move.
The taken list itself never gains an entry while taken: a watch only moves to
a literal without a conflicting value, and the list taken is for a literal
made false by the assignment under examination.
*/

use crate::{
    engine::{trail::AssignmentSource, ConflictSource, GenericEngine},
    misc::log::targets::{self},
    structures::literal::{CLiteral, Literal},
};

impl<R: rand::Rng + std::default::Default> GenericEngine<R> {
    /// Propagates all queued assignments, in order.
    ///
    /// On a conflict the queue is left unsettled --- the caller is expected
    /// to backjump (which resets the queue) or conclude the solve.
    pub fn propagate(&mut self) -> Result<(), ConflictSource> {
        'propagation: while let Some(literal) = self.trail.next_to_propagate() {
            // The literal made false by the assignment, whose watchers are examined.
            let false_literal = literal.negate();

            let mut watches = self
                .atom_db
                .take_watches(false_literal.atom(), false_literal.polarity());

            let mut index = 0;
            'watch_examination: while index < watches.len() {
                let key = watches[index];
                let clause = self.clause_db.get_mut(key);

                // Shuffle the false literal to index 1, to fix the other watch at index 0.
                if clause.literals()[0] == false_literal {
                    clause.swap(0, 1);
                }
                debug_assert!(clause.literals()[1] == false_literal);
                let the_watch = clause.literals()[0];

                if self.atom_db.value_of(the_watch.atom()) == Some(the_watch.polarity()) {
                    // The clause is satisfied by the other watch.
                    index += 1;
                    continue 'watch_examination;
                }

                // Search for a replacement watch without a conflicting value.
                for candidate_index in 2..clause.size() {
                    let candidate = clause.literals()[candidate_index];
                    if self.atom_db.value_of(candidate.atom()) != Some(!candidate.polarity()) {
                        clause.swap(1, candidate_index);
                        watches.swap_remove(index);
                        self.atom_db
                            .watch(candidate.atom(), candidate.polarity(), key);
                        continue 'watch_examination;
                    }
                }

                // No replacement, so the clause is asserting or conflicting.
                match self.atom_db.value_of(the_watch.atom()) {
                    None => {
                        log::trace!(target: targets::PROPAGATION, "Consequence of {key}: {the_watch}");
                        self.trail
                            .assign(&mut self.atom_db, the_watch, AssignmentSource::BCP(key));
                        index += 1;
                        continue 'watch_examination;
                    }

                    Some(_) => {
                        // A conflicting value, given the satisfaction check above.
                        log::trace!(target: targets::PROPAGATION, "Conflict from {key} and {literal}");
                        self.atom_db.restore_watches(
                            false_literal.atom(),
                            false_literal.polarity(),
                            watches,
                        );
                        return Err(ConflictSource::Clause(key));
                    }
                }
            }

            self.atom_db
                .restore_watches(false_literal.atom(), false_literal.polarity(), watches);
            continue 'propagation;
        }

        Ok(())
    }

    /// Registers watches on the first two literals of the stored clause at `key`.
    pub(super) fn watch_stored_clause(&mut self, key: crate::engine::ClauseKey) {
        let (a, b) = {
            let clause = self.clause_db.get(key);
            (clause.literals()[0], clause.literals()[1])
        };
        self.watch_literal(a, key);
        self.watch_literal(b, key);
    }

    fn watch_literal(&mut self, literal: CLiteral, key: crate::engine::ClauseKey) {
        self.atom_db.watch(literal.atom(), literal.polarity(), key);
    }
}
