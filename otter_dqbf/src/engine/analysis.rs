/*!
Conflict analysis, by resolution to the first unique implication point.

# Overview

A conflict at some level above the lowest decision level is analysed by
walking the trail backwards from the conflict, resolving the conflicting
clause against the reason clause of each examined assignment, until exactly
one literal from the conflict level remains --- the first unique implication
point.

The learnt clause is the negation of the UIP together with every other
literal seen, and asserts the negation of the UIP at the second-highest
level among its literals.

Literals valued at the root level are omitted from the learnt clause, as
such literals are false on every valuation the engine will consider.
Literals valued at the assumption level are kept: assumptions do not hold
across solves.

# Literature

The procedure is the standard 1-UIP scheme, as presented in the Handbook of
Satisfiability chapters on CDCL and in MiniSAT.
*/

use crate::{
    engine::{ConflictSource, GenericEngine, LevelIndex},
    misc::log::targets::{self},
    structures::{
        clause::CClause,
        literal::{CLiteral, Literal},
    },
    types::err::EngineError,
};

/// The result of conflict analysis: a learnt clause and the level to backjump to.
pub struct AnalysisOk {
    /// The learnt clause, with the asserted literal at index 0.
    pub clause: CClause,

    /// The level at which the learnt clause asserts its first literal.
    pub backjump_level: LevelIndex,
}

impl<R: rand::Rng + std::default::Default> GenericEngine<R> {
    /// Analyses the conflict noted in `source`, at the current level.
    ///
    /// The caller upholds: the current level is above the lowest decision
    /// level, so a decision (or assumption) is on the trail to resolve
    /// towards.
    pub fn analyse_conflict(&mut self, source: ConflictSource) -> Result<AnalysisOk, EngineError> {
        let current_level = self.trail.current_level();
        let level_start = self.trail.level_start(current_level);

        let mut seen = vec![false; self.atom_db.count()];
        let mut tail: CClause = Vec::default();
        let mut unresolved: usize = 0;

        // Seed with the literals of the conflicting clause.
        let conflict_literals: Vec<CLiteral> = match source {
            ConflictSource::Clause(key) => self.clause_db.get(key).literals().to_vec(),
            ConflictSource::Unit(literal) | ConflictSource::Assumption(literal) => vec![literal],
            ConflictSource::EmptyClause => Vec::default(),
        };

        for literal in conflict_literals {
            self.note_literal(literal, current_level, &mut seen, &mut tail, &mut unresolved);
        }

        let mut trail_index = self.trail.assignments.len();

        let uip = 'resolution: loop {
            if trail_index == level_start {
                log::error!(target: targets::ANALYSIS, "Trail exhausted without a unique implication point");
                return Err(EngineError::NoUniqueImplicationPoint);
            }

            trail_index -= 1;
            let assignment = self.trail.assignments[trail_index];
            let atom = assignment.literal.atom();

            if !seen[atom as usize] {
                continue 'resolution;
            }

            unresolved -= 1;
            if unresolved == 0 {
                break 'resolution assignment.literal;
            }

            // Resolve against the reason of the assignment.
            let crate::engine::AssignmentSource::BCP(key) = assignment.source else {
                panic!("! A seen non-UIP assignment at the conflict level without a reason");
            };

            let reason_literals = self.clause_db.get(key).literals().to_vec();
            for literal in reason_literals {
                if literal.atom() == atom {
                    continue;
                }
                self.note_literal(literal, current_level, &mut seen, &mut tail, &mut unresolved);
            }
        };

        let mut clause = Vec::with_capacity(tail.len() + 1);
        clause.push(uip.negate());
        clause.append(&mut tail);

        // The second-highest level of the clause, with the asserted literal at the highest.
        let mut backjump_level = self.trail.lowest_decision_level;
        let mut position = 1;
        for index in 1..clause.len() {
            let level = self
                .atom_db
                .level_of(clause[index].atom())
                .expect("! An unvalued literal in a learnt clause");
            if level > backjump_level {
                backjump_level = level;
                position = index;
            }
        }
        // Fix a literal from the backjump level at index 1, for the watch invariant.
        if clause.len() > 1 {
            clause.swap(1, position);
        }

        log::debug!(target: targets::ANALYSIS, "Learnt clause of size {} asserting at level {backjump_level}", clause.len());

        Ok(AnalysisOk {
            clause,
            backjump_level,
        })
    }

    /// Notes `literal` during analysis, bumping the activity of its atom.
    fn note_literal(
        &mut self,
        literal: CLiteral,
        current_level: LevelIndex,
        seen: &mut [bool],
        tail: &mut CClause,
        unresolved: &mut usize,
    ) {
        let atom = literal.atom();
        let level = self
            .atom_db
            .level_of(atom)
            .expect("! An unvalued literal in a conflict");

        if level == 0 || seen[atom as usize] {
            return;
        }

        seen[atom as usize] = true;
        self.atom_db.bump_activity(atom);

        if level == current_level {
            *unresolved += 1;
        } else {
            tail.push(literal);
        }
    }
}
