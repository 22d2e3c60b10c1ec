/*!
An incremental propositional engine, to which clauses are added and within
which solves take place.

Strictly, a [GenericEngine] and an [Engine].

The generic engine is designed to be generic over various parameters, though
for the moment this is limited to the source of randomness --- and the
[Engine] type fixes [MinimalPCG32] as the source, with a constant seed.

The engine is a conflict-driven clause-learning solver with support for
incremental use:

- Clauses may be added between solves, and are never retracted.
- A solve may be made under a collection of assumptions, which hold for that
  solve only.
- After an unsatisfiable solve under assumptions, the subset of assumptions
  used to derive the conflict may be read with
  [failed_assumptions](GenericEngine::failed_assumptions).
- Decision-polarity hints may be set with [set_phase](GenericEngine::set_phase),
  and persist until overridden by a later hint or by phase saving.

A [context](crate::context) owns two engines, and interacts with each through
the [PropositionalEngine] trait so tests may substitute an oracle.

# Example

```rust
# use otter_dqbf::config::Config;
# use otter_dqbf::engine::{Engine, PropositionalEngine};
# use otter_dqbf::reports::Report;
# use otter_dqbf::structures::literal::{CLiteral, Literal};
let mut engine = Engine::from_config(Config::default());

let p = engine.fresh_atom();
let q = engine.fresh_atom();

engine.add_clause(vec![CLiteral::new(p, false), CLiteral::new(q, true)]);
engine.add_clause(CLiteral::new(q, false));

engine.assume(CLiteral::new(p, true));
assert_eq!(engine.solve(), Ok(Report::Unsatisfiable));
assert!(engine
    .failed_assumptions()
    .contains(&CLiteral::new(p, true)));

assert_eq!(engine.solve(), Ok(Report::Satisfiable));
assert_eq!(engine.value_of(p), Some(false));
```
*/

mod analysis;
mod assumptions;
mod atom_db;
mod bcp;
mod clause_db;
mod solve;
mod trail;

pub use atom_db::AtomDB;
pub use clause_db::{ClauseDB, ClauseKey};
pub use trail::{Assignment, AssignmentSource, Trail};

use rand::SeedableRng;

use crate::{
    config::Config,
    generic::{luby::Luby, minimal_pcg::MinimalPCG32},
    reports::Report,
    structures::{
        atom::Atom,
        clause::Clause,
        literal::{CLiteral, Literal},
    },
    types::err::EngineError,
};

/// An index to a decision level.
pub type LevelIndex = u32;

/// The origin of a conflict, kept as proof of unsatisfiability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictSource {
    /// A clause, unsatisfiable on the valuation at the time of the conflict.
    Clause(ClauseKey),

    /// A unit clause, conflicting with the valuation at the time of the conflict.
    Unit(CLiteral),

    /// An assumption, conflicting with the valuation at the time the assumption was asserted.
    Assumption(CLiteral),

    /// An empty clause was added.
    EmptyClause,
}

/// The state of an engine.
///
/// The state records the outcome of the most recent solve, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Input may be added, and no solve has concluded since the last addition.
    Input,

    /// The formula is satisfiable, with a complete valuation held.
    Satisfiable,

    /// The formula is unsatisfiable, perhaps relative to the assumptions of the last solve.
    Unsatisfiable(ConflictSource),
}

/// Ok results when adding a clause to an engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClauseOk {
    /// The clause was added to the engine.
    Added,

    /// The clause was a tautology (and so was not added to the engine).
    Tautology,
}

/// Counts for various things which count, roughly.
#[derive(Default)]
pub struct Counters {
    /// A count of every conflict seen across all solves.
    pub total_conflicts: usize,

    /// A count of conflicts seen since the last restart.
    pub fresh_conflicts: u32,

    /// A count of all decisions made.
    pub total_decisions: usize,

    /// The number of restarts made.
    pub restarts: usize,

    /// The number of solves made.
    pub solves: usize,
}

/// The contract between a [context](crate::context) and a propositional engine.
///
/// Semantics are as in standard incremental SAT:
/// - [add_clause](PropositionalEngine::add_clause) installs a permanent clause.
/// - [assume](PropositionalEngine::assume) queues a literal to hold for the
///   *next* solve only.
/// - [set_phase](PropositionalEngine::set_phase) is a purely advisory
///   decision-polarity hint which persists until overridden.
/// - [value_of](PropositionalEngine::value_of) and
///   [values_of](PropositionalEngine::values_of) read a model after a
///   satisfiable solve.
/// - [failed_assumptions](PropositionalEngine::failed_assumptions) returns,
///   after an unsatisfiable solve, some subset of the assumptions from which
///   the conflict was derived.
pub trait PropositionalEngine {
    /// Ensures `atom` (and every smaller atom) is part of the language of the engine.
    fn ensure_atom(&mut self, atom: Atom);

    /// Installs a permanent clause.
    fn add_clause(&mut self, clause: impl Clause) -> Result<ClauseOk, EngineError>;

    /// Queues a literal to be assumed on the next solve.
    fn assume(&mut self, literal: CLiteral);

    /// Queues each literal to be assumed on the next solve.
    fn assume_all(&mut self, literals: &[CLiteral]) {
        for literal in literals {
            self.assume(*literal);
        }
    }

    /// Hints the decision polarity of the atom of `literal`.
    fn set_phase(&mut self, literal: CLiteral);

    /// Determines the satisfiability of the formula under the queued assumptions.
    fn solve(&mut self) -> Result<Report, EngineError>;

    /// The value of `atom` on the model of the last solve, if the last solve was satisfiable.
    fn value_of(&self, atom: Atom) -> Option<bool>;

    /// The values of `atoms` on the model of the last solve, as literals.
    ///
    /// # Panics
    /// If some atom has no value, e.g. as the last solve was not satisfiable.
    fn values_of(&self, atoms: &[Atom]) -> Vec<CLiteral> {
        atoms
            .iter()
            .map(|atom| {
                let value = self
                    .value_of(*atom)
                    .expect("! Value of an atom requested without a model");
                CLiteral::new(*atom, value)
            })
            .collect()
    }

    /// The subset of the last solve's assumptions used to derive unsatisfiability.
    fn failed_assumptions(&self) -> Vec<CLiteral>;
}

/// A generic engine, parameterised to a source of randomness.
pub struct GenericEngine<R: rand::Rng + std::default::Default> {
    /// The configuration of the engine.
    pub config: Config,

    /// Counters related to the engine.
    pub counters: Counters,

    /// The atom database: valuation, phases, levels, watches, activity.
    pub atom_db: AtomDB,

    /// The clause database: non-unit clauses, original and learnt.
    pub clause_db: ClauseDB,

    /// The trail of assignments, doubling as the propagation queue.
    pub trail: Trail,

    /// The state of the engine.
    state: EngineState,

    /// True only if unsatisfiability was established independent of any assumption.
    fundamental_conflict: bool,

    /// Assumptions queued for the next solve.
    queued_assumptions: Vec<CLiteral>,

    /// The current element of the luby sequence, for scheduling restarts.
    luby: Luby,

    /// The source of rng.
    rng: R,
}

/// An engine which uses [MinimalPCG32] as a source of randomness.
pub type Engine = GenericEngine<MinimalPCG32>;

impl Engine {
    /// Creates an engine from some given configuration.
    pub fn from_config(config: Config) -> Self {
        let mut engine = GenericEngine {
            config,
            counters: Counters::default(),
            atom_db: AtomDB::default(),
            clause_db: ClauseDB::default(),
            trail: Trail::default(),
            state: EngineState::Input,
            fundamental_conflict: false,
            queued_assumptions: Vec::default(),
            luby: Luby::default(),
            rng: MinimalPCG32::from_seed(0_u64.to_le_bytes()),
        };

        // The reserved atom, fixed true at the root level.
        let top = engine.atom_db.fresh_atom(true);
        engine.trail.assign(
            &mut engine.atom_db,
            CLiteral::new(top, true),
            AssignmentSource::Unit,
        );
        engine.trail.settle();
        engine
    }
}

impl<R: rand::Rng + std::default::Default> GenericEngine<R> {
    /// The state of the engine.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// A report on the last solve.
    pub fn report(&self) -> Report {
        match self.state {
            EngineState::Input => Report::Unknown,
            EngineState::Satisfiable => Report::Satisfiable,
            EngineState::Unsatisfiable(_) => Report::Unsatisfiable,
        }
    }

    /// A fresh atom, not present in any clause of the engine.
    pub fn fresh_atom(&mut self) -> Atom {
        self.atom_db.fresh_atom(false)
    }
}

impl<R: rand::Rng + std::default::Default> PropositionalEngine for GenericEngine<R> {
    fn ensure_atom(&mut self, atom: Atom) {
        self.ensure_atom_internal(atom);
    }

    fn add_clause(&mut self, clause: impl Clause) -> Result<ClauseOk, EngineError> {
        self.add_clause_internal(clause.canonical())
    }

    fn assume(&mut self, literal: CLiteral) {
        self.ensure_atom(literal.atom());
        self.queued_assumptions.push(literal);
    }

    fn set_phase(&mut self, literal: CLiteral) {
        self.ensure_atom(literal.atom());
        self.atom_db
            .set_previous_value(literal.atom(), literal.polarity());
    }

    fn solve(&mut self) -> Result<Report, EngineError> {
        let assumptions = std::mem::take(&mut self.queued_assumptions);
        self.solve_given(assumptions)
    }

    fn value_of(&self, atom: Atom) -> Option<bool> {
        self.atom_db.value_of(atom)
    }

    fn failed_assumptions(&self) -> Vec<CLiteral> {
        self.failed_assumptions_internal()
    }
}
