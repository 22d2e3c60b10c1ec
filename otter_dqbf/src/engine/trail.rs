/*!
The trail of assignments, doubling as the propagation queue.

Each assignment pairs a literal with the source of the assignment, and
assignments are pushed in the order they are made.
Decision levels are marked by indicies into the trail, so a backjump is a
truncation of the trail together with a drop of the value of each truncated
atom.

The propagation head points to the first assignment whose consequences have
not been examined, merging the consequence queue of a solve into the trail.
*/

use crate::{
    engine::{atom_db::AtomDB, ClauseKey, LevelIndex},
    structures::literal::{CLiteral, Literal},
};

/// The source of an assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignmentSource {
    /// A unit clause (original or learnt).
    Unit,

    /// An assumption of the current solve.
    Assumption,

    /// A free decision.
    Decision,

    /// Propagation of the noted clause.
    BCP(ClauseKey),
}

/// A literal, paired with the source of the assignment of the literal.
#[derive(Clone, Copy, Debug)]
pub struct Assignment {
    /// The literal assigned.
    pub literal: CLiteral,

    /// The source of the assignment.
    pub source: AssignmentSource,
}

/// The trail.
pub struct Trail {
    /// All assignments, in the order they were made.
    pub assignments: Vec<Assignment>,

    /// The index into `assignments` at which each level begins.
    ///
    /// The root level (0) always begins at 0.
    level_starts: Vec<usize>,

    /// The index of the first assignment whose consequences have not been examined.
    propagation_head: usize,

    /// The lowest level a backjump may target: 0, or 1 when assumptions are asserted.
    pub lowest_decision_level: LevelIndex,
}

impl Default for Trail {
    fn default() -> Self {
        Trail {
            assignments: Vec::default(),
            level_starts: vec![0],
            propagation_head: 0,
            lowest_decision_level: 0,
        }
    }
}

impl Trail {
    /// The current decision level.
    pub fn current_level(&self) -> LevelIndex {
        (self.level_starts.len() - 1) as LevelIndex
    }

    /// Opens a fresh decision level.
    pub fn fresh_level(&mut self) -> LevelIndex {
        self.level_starts.push(self.assignments.len());
        self.current_level()
    }

    /// The index into the trail at which `level` begins.
    pub fn level_start(&self, level: LevelIndex) -> usize {
        self.level_starts[level as usize]
    }

    /// Assigns `literal` at the current level, recording `source` and queuing
    /// the assignment for propagation.
    ///
    /// The caller upholds: the atom of `literal` has no value.
    pub fn assign(&mut self, atom_db: &mut AtomDB, literal: CLiteral, source: AssignmentSource) {
        atom_db.set_value(literal.atom(), literal.polarity(), self.current_level());
        self.assignments.push(Assignment { literal, source });
    }

    /// The next assignment to propagate, if any, advancing the propagation head.
    pub fn next_to_propagate(&mut self) -> Option<CLiteral> {
        match self.assignments.get(self.propagation_head) {
            None => None,
            Some(assignment) => {
                self.propagation_head += 1;
                Some(assignment.literal)
            }
        }
    }

    /// Marks every queued assignment as propagated.
    pub fn settle(&mut self) {
        self.propagation_head = self.assignments.len();
    }

    /// Removes every level above `target`, dropping the value of each removed
    /// atom via `atom_db`.
    pub fn backjump(&mut self, atom_db: &mut AtomDB, target: LevelIndex) {
        while self.current_level() > target {
            let start = self.level_starts.pop().expect("! Backjump past the root");
            for assignment in self.assignments.drain(start..) {
                atom_db.drop_value(assignment.literal.atom());
            }
        }
        self.propagation_head = self.assignments.len();
    }
}
