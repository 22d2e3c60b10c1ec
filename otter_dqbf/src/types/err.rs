/*!
Error types used in the library.

- Most of these are very unlikely to occur during use.
- Some are internally expected --- e.g. BCP conflicts are used to control the
  flow of a solve within an engine.
- Others mark precondition violations on the part of a caller --- e.g. a rule
  added for an uninitialised existential.
- A few mark internal consistency failures which indicate a bug and must not
  be swallowed --- e.g. a counterexample which fails verification.

Names of the error enums --- for the most part --- overlap with
corresponding structs, and so `err::{self}` is often used to prefix use of
the types with `err::`.
*/

use crate::structures::{atom::Atom, literal::CLiteral};

/// A union of varied error kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    /// An error in the engine.
    Engine(EngineError),

    /// An error in a context.
    Context(ContextError),

    /// An error related to parsing.
    Parse(ParseError),
}

/// Errors from an engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// There are no more fresh atoms.
    AtomsExhausted,

    /// A value was requested while the engine does not hold a satisfying valuation.
    NoValuation,

    /// Conflict analysis exhausted the trail without finding a unique implication point.
    NoUniqueImplicationPoint,

    /// Failed assumptions were requested while the engine is not unsatisfiable.
    NotUnsatisfiable,
}

impl From<EngineError> for ErrorKind {
    fn from(e: EngineError) -> Self {
        ErrorKind::Engine(e)
    }
}

/// Errors from a context.
#[derive(Clone, Debug, PartialEq)]
pub enum ContextError {
    /// The noted atom is not an existential of the context.
    UnknownExistential(Atom),

    /// A rule chain operation was called on an existential whose model has not been initialised.
    UninitialisedExistential(Atom),

    /// An assignment contains a variable outside the dependency set of the noted existential.
    OutsideDependencies {
        existential: Atom,
        literal: CLiteral,
    },

    /// The verification solve of a counterexample failed to return unsatisfiable.
    ///
    /// The internal consistency of the candidate model is broken: a bug.
    UnverifiedCounterexample,

    /// A model function row was unsatisfiable after an overall satisfiable verdict.
    ///
    /// The internal consistency of the candidate model is broken: a bug.
    ModelFunctionGap(Vec<CLiteral>),

    /// The same counterexample was derived in consecutive iterations.
    ///
    /// Refinement made no progress: a bug, surfaced with the iteration on
    /// which the repeat was observed.
    CycleDetected { iteration: usize },

    /// An engine returned a report other than satisfiable or unsatisfiable from a solve.
    UnexpectedReport,

    /// An engine error, raised through the context.
    Engine(EngineError),
}

impl From<ContextError> for ErrorKind {
    fn from(e: ContextError) -> Self {
        ErrorKind::Context(e)
    }
}

impl From<EngineError> for ContextError {
    fn from(e: EngineError) -> Self {
        ContextError::Engine(e)
    }
}

/// Errors during parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// No file was found.
    NoFile,

    /// An empty string, where some non-empty string was required.
    Empty,

    /// A required delimiter was not found, at the noted line.
    MissingDelimiter(usize),

    /// A gate of some unrecognised kind, at the noted line.
    UnknownGate(usize),

    /// No output gate was declared.
    NoOutputGate,

    /// A negation character was read, but no candidate for negation was found.
    Negation,
}

impl From<ParseError> for ErrorKind {
    fn from(e: ParseError) -> Self {
        ErrorKind::Parse(e)
    }
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownExistential(atom) => {
                write!(f, "{atom} is not an existential variable")
            }
            Self::UninitialisedExistential(atom) => {
                write!(f, "the model of existential {atom} has not been initialised")
            }
            Self::OutsideDependencies {
                existential,
                literal,
            } => {
                write!(
                    f,
                    "{literal} is outside the dependencies of existential {existential}"
                )
            }
            Self::UnverifiedCounterexample => {
                write!(f, "a counterexample failed the verification solve")
            }
            Self::ModelFunctionGap(universals) => {
                write!(f, "no model function output for universal assignment [")?;
                for (index, literal) in universals.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{literal}")?;
                }
                write!(f, "]")
            }
            Self::CycleDetected { iteration } => {
                write!(
                    f,
                    "cycle detected: the counterexample of iteration {iteration} repeats the previous counterexample"
                )
            }
            Self::UnexpectedReport => {
                write!(f, "an engine returned neither satisfiable nor unsatisfiable")
            }
            Self::Engine(e) => write!(f, "engine error: {e:?}"),
        }
    }
}
