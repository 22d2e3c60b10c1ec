//! A library for determining the satisfiability of dependency quantified boolean formulas.
//!
//! otter_dqbf decides formulas of the shape ∀U₁…Uₘ ∃E₁(D₁)…∃Eₙ(Dₙ). M(U, E),
//! where each existential variable carries an explicit dependency set over
//! the universals, by counterexample guided refinement of candidate Skolem
//! models held as ordered decision lists.
//!
//! # Orientation
//!
//! The library is designed around the core structure of a
//! [context](crate::context), which owns a pair of incremental
//! conflict-driven clause-learning [engines](crate::engine):
//!
//! - The *counterexample engine* holds the matrix of the formula and the
//!   propositional encoding of the candidate model, and searches for
//!   assignments falsifying the output gate.
//! - The *expansion engine* holds blocking clauses over *expansion
//!   variables*, and its satisfying assignments steer the candidate model.
//!
//! Formulas are provided in the DQCIR format through the
//! [builder](crate::builder), which also performs the Tseitin conversion of
//! gates to clauses.
//!
//! Useful starting points:
//! - The [refinement loop](crate::context::GenericDqbfContext::solve) to
//!   inspect the dynamics of a solve.
//! - The [engine](crate::engine) to inspect the underlying propositional
//!   solving.
//! - The [structures] to familiarise yourself with the representation of
//!   atoms, literals, and clauses.
//! - The [configuration](crate::config) to see what heuristics are
//!   supported.
//!
//! # Example
//!
//! ```rust
//! # use otter_dqbf::builder::DqcirParser;
//! # use otter_dqbf::config::Config;
//! # use otter_dqbf::context::DqbfContext;
//! # use otter_dqbf::reports::Report;
//! // A Henkin-style formula: neither existential can see the other's universal,
//! // though agreement on u1 ⊕ u2 is demanded.
//! let mut parser = DqcirParser::default();
//! parser.parse_str(
//!     "forall(u1, u2)
//!      depend(e1, u1)
//!      depend(e2, u2)
//!      g1 = xor(u1, u2)
//!      g2 = xor(e1, -g1)
//!      g3 = xor(e1, -e2)
//!      go = and(g2, g3)
//!      output(go)",
//! ).unwrap();
//!
//! let parts = parser.into_parts().unwrap();
//! let mut ctx = DqbfContext::from_parts(parts, Config::default()).unwrap();
//!
//! assert_eq!(ctx.solve(), Ok(Report::Unsatisfiable));
//! ```
//!
//! # Logs
//!
//! To help diagnose issues (somewhat) detailed calls to [log!](log) are
//! made, and a variety of targets are defined in order to help narrow output
//! to relevant parts of the library.
//! The targets are listed in [misc::log].
//! No log implementation is installed by the library.

#![allow(mixed_script_confusables)]
#![allow(unused_must_use)]
#![allow(clippy::single_match)]
#![allow(clippy::collapsible_else_if)]

pub mod builder;
pub mod config;
pub mod context;
pub mod engine;
pub mod generic;
pub mod misc;
pub mod reports;
pub mod structures;
pub mod types;
