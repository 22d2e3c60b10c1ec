/*!
Reports from an engine or a context.
*/

/// High-level reports regarding a solve.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Report {
    /// The formula is satisfiable.
    Satisfiable,

    /// The formula is unsatisfiable.
    Unsatisfiable,

    /// Satisfiability of the formula is unknown, for some reason.
    Unknown,
}

impl Report {
    /// The conventional incremental-solver exit code of the report.
    ///
    /// 10 for satisfiable and 20 for unsatisfiable, as used by the
    /// SAT competition, DIMACS tooling, and so on.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Satisfiable => 10,
            Self::Unsatisfiable => 20,
            Self::Unknown => 0,
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "Satisfiable"),
            Self::Unsatisfiable => write!(f, "Unsatisfiable"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}
