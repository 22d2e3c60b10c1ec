/*!
Determines the satisfiability of the formula in an engine.

# Overview

The solve loop interleaves propagation, decision, and recovery from
conflicts:

```none
          +---------------+
  +-------| make_decision |
  |       +---------------+
  |               ⌃
  |               |
  |               | if propagation is exhausted and the valuation is partial
  |               |
  |               |        +-----> satisfiable, if the valuation is complete
  ⌄       +-----------+    |
--+------>| propagate |----+
  ⌃       +-----------+    |
  |               |        +-----> unsatisfiable, if a conflict is found at
  |               |                the lowest decision level
  |               |
  |               | if a conflict is found above the lowest decision level
  |               ⌄
  |    +----------------------+
  +----| analyse and backjump |
       +----------------------+
```

Restarts are scheduled on the luby sequence, and return the engine to the
lowest decision level --- so assumptions, which rest on their own level,
survive a restart.

# Incrementality

Each solve begins by returning the trail to the root level, so values from
a previous solve do not constrain the search --- though, through phase
saving, they do bias it.
Clauses learnt during previous solves are kept: each is entailed by the
formula alone, as analysis never resolves against an assumption.
*/

use rand::seq::IteratorRandom;

use crate::{
    engine::{
        trail::AssignmentSource, ClauseOk, ConflictSource, EngineState, GenericEngine, LevelIndex,
    },
    misc::log::targets::{self},
    reports::Report,
    structures::{
        clause::CClause,
        literal::{CLiteral, Literal},
    },
    types::err::EngineError,
};

impl<R: rand::Rng + std::default::Default> GenericEngine<R> {
    /// Determines the satisfiability of the formula under `assumptions`.
    pub fn solve_given(&mut self, assumptions: Vec<CLiteral>) -> Result<Report, EngineError> {
        self.counters.solves += 1;

        if self.fundamental_conflict {
            return Ok(Report::Unsatisfiable);
        }

        // Return to the root, dropping any valuation or assumptions of a previous solve.
        self.trail.lowest_decision_level = 0;
        self.trail.backjump(&mut self.atom_db, 0);
        self.state = EngineState::Input;

        if !assumptions.is_empty() {
            match self.assert_assumptions(assumptions) {
                Ok(()) => {}
                Err(source) => {
                    self.state = EngineState::Unsatisfiable(source);
                    return Ok(Report::Unsatisfiable);
                }
            }
        }

        'solve_loop: loop {
            match self.propagate() {
                Err(conflict) => {
                    self.counters.total_conflicts += 1;
                    self.counters.fresh_conflicts += 1;

                    if self.trail.current_level() <= self.trail.lowest_decision_level {
                        self.note_final_conflict(conflict);
                        break 'solve_loop;
                    }

                    let analysis = self.analyse_conflict(conflict)?;
                    self.atom_db.decay_activity(self.config.atom_decay.value);
                    self.apply_learnt_clause(analysis.clause, analysis.backjump_level);
                }

                Ok(()) => {
                    if self.restart_scheduled() {
                        self.trail
                            .backjump(&mut self.atom_db, self.trail.lowest_decision_level);
                        self.counters.fresh_conflicts = 0;
                        self.counters.restarts += 1;
                        self.luby.next();
                        log::trace!(target: targets::BACKJUMP, "Restart {}", self.counters.restarts);
                    }

                    match self.make_decision() {
                        Some(decision) => {
                            self.counters.total_decisions += 1;
                            self.trail.fresh_level();
                            self.trail
                                .assign(&mut self.atom_db, decision, AssignmentSource::Decision);
                            log::trace!(target: targets::VALUATION, "Decided {decision} at level {}", self.trail.current_level());
                        }

                        None => {
                            self.state = EngineState::Satisfiable;
                            break 'solve_loop;
                        }
                    }
                }
            }
        }

        Ok(self.report())
    }

    /// Installs a clause, in canonical form.
    ///
    /// The clause is simplified against the root valuation: root-false
    /// literals are not watched, and a clause with a single root-undetermined
    /// literal is applied as an assignment.
    /// A conflict with the root valuation is recorded as fundamental
    /// unsatisfiability, to be reported by the next solve.
    pub(super) fn add_clause_internal(
        &mut self,
        mut clause: CClause,
    ) -> Result<ClauseOk, EngineError> {
        // Additions happen at the root, below any valuation of a previous solve.
        self.trail.lowest_decision_level = 0;
        self.trail.backjump(&mut self.atom_db, 0);
        if !self.fundamental_conflict {
            self.state = EngineState::Input;
        }

        for literal in &clause {
            self.ensure_atom_internal(literal.atom());
        }

        // Remove duplicate literals, and skip tautologies.
        clause.sort_unstable();
        clause.dedup();
        for pair in clause.windows(2) {
            if pair[0].atom() == pair[1].atom() {
                return Ok(ClauseOk::Tautology);
            }
        }

        if clause.is_empty() {
            // As in other incremental solvers, an empty clause is accepted
            // and the formula is noted as unsatisfiable.
            self.note_fundamental_conflict(ConflictSource::EmptyClause);
            return Ok(ClauseOk::Added);
        }

        if self.fundamental_conflict {
            // The formula is already unsatisfiable, so the clause is moot.
            return Ok(ClauseOk::Added);
        }

        if let [literal] = clause.as_slice() {
            return self.add_unit_clause(*literal);
        }

        // Prefer watches on literals without a (root) value.
        let mut watchable = 0;
        for index in 0..clause.len() {
            if self.atom_db.value_of(clause[index].atom()) != Some(!clause[index].polarity()) {
                clause.swap(watchable, index);
                watchable += 1;
                if watchable == 2 {
                    break;
                }
            }
        }

        match watchable {
            2.. => {
                let key = self.clause_db.store(clause, false);
                self.watch_stored_clause(key);
                Ok(ClauseOk::Added)
            }

            1 => {
                // Unit under the root valuation.
                let key = self.clause_db.store(clause, false);
                self.watch_stored_clause(key);
                let asserted = self.clause_db.get(key).literals()[0];
                match self.atom_db.value_of(asserted.atom()) {
                    None => {
                        self.trail
                            .assign(&mut self.atom_db, asserted, AssignmentSource::BCP(key));
                        self.settle_root();
                    }
                    Some(value) if value == asserted.polarity() => {}
                    Some(_) => self.note_fundamental_conflict(ConflictSource::Clause(key)),
                }
                Ok(ClauseOk::Added)
            }

            _ => {
                // False under the root valuation.
                let key = self.clause_db.store(clause, false);
                self.watch_stored_clause(key);
                self.note_fundamental_conflict(ConflictSource::Clause(key));
                Ok(ClauseOk::Added)
            }
        }
    }

    fn add_unit_clause(&mut self, literal: CLiteral) -> Result<ClauseOk, EngineError> {
        match self.atom_db.value_of(literal.atom()) {
            None => {
                self.trail
                    .assign(&mut self.atom_db, literal, AssignmentSource::Unit);
                self.settle_root();
            }
            Some(value) if value == literal.polarity() => {}
            Some(_) => self.note_fundamental_conflict(ConflictSource::Unit(literal)),
        }
        Ok(ClauseOk::Added)
    }

    /// Propagates the root level after an addition, recording any conflict as fundamental.
    fn settle_root(&mut self) {
        if let Err(conflict) = self.propagate() {
            self.note_fundamental_conflict(conflict);
        }
    }

    fn note_fundamental_conflict(&mut self, source: ConflictSource) {
        log::debug!(target: targets::PROPAGATION, "Fundamental conflict noted: {source:?}");
        self.fundamental_conflict = true;
        self.state = EngineState::Unsatisfiable(source);
    }

    /// Notes a conflict at the lowest decision level of the current solve.
    ///
    /// With no assumptions in play the conflict is fundamental.
    fn note_final_conflict(&mut self, source: ConflictSource) {
        if self.trail.lowest_decision_level == 0 {
            self.note_fundamental_conflict(source);
        } else {
            self.state = EngineState::Unsatisfiable(source);
        }
    }

    /// Stores the learnt clause, backjumps, and queues the asserted literal.
    fn apply_learnt_clause(&mut self, clause: CClause, backjump_level: LevelIndex) {
        let target = std::cmp::max(backjump_level, self.trail.lowest_decision_level);
        self.trail.backjump(&mut self.atom_db, target);

        match clause.len() {
            0 => panic!("! An empty learnt clause"),

            1 => {
                // Entailed by the formula alone, though asserted at the
                // lowest level of the solve to keep the trail ordered when
                // assumptions are in play.
                let literal = clause[0];
                self.trail
                    .assign(&mut self.atom_db, literal, AssignmentSource::Unit);
            }

            _ => {
                let literal = clause[0];
                let key = self.clause_db.store(clause, true);
                self.watch_stored_clause(key);
                self.trail
                    .assign(&mut self.atom_db, literal, AssignmentSource::BCP(key));
            }
        }
    }

    /// Chooses a literal to value an atom without a value, if one exists.
    ///
    /// The atom is the most active atom without a value, or a uniformly
    /// random atom without a value with the configured bias.
    /// The polarity is the saved phase of the atom, or random with the
    /// configured lean when phase saving is disabled.
    fn make_decision(&mut self) -> Option<CLiteral> {
        let chosen_atom = match self
            .rng
            .random_bool(self.config.random_decision_bias.value)
        {
            true => self.atom_db.atoms_without_value().choose(&mut self.rng),
            false => self.atom_db.pop_most_active_without_value(),
        }?;

        let polarity = match self.config.phase_saving.value {
            true => self.atom_db.previous_value_of(chosen_atom),
            false => self.rng.random_bool(self.config.polarity_lean.value),
        };

        Some(CLiteral::new(chosen_atom, polarity))
    }

    fn restart_scheduled(&self) -> bool {
        self.config.restarts.value
            && self.trail.current_level() > self.trail.lowest_decision_level
            && self.counters.fresh_conflicts >= self.config.luby_u.value * self.luby.current()
    }

    pub(super) fn ensure_atom_internal(&mut self, atom: crate::structures::atom::Atom) {
        while self.atom_db.count() <= atom as usize {
            self.atom_db.fresh_atom(false);
        }
    }
}
