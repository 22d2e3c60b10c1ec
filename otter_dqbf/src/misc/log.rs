/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide useful information for extending the library
and/or fixing issues.

Note, no log implementation is provided by the library, though the CLI
installs a minimal stdout logger when asked for verbose output.
For more details, see [log].
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    pub const PROPAGATION: &str = "propagation";
    pub const ANALYSIS: &str = "analysis";
    pub const BACKJUMP: &str = "backjump";
    pub const VALUATION: &str = "valuation";
    pub const RULES: &str = "rules";
    pub const EXPANSION: &str = "expansion";
    pub const REFINEMENT: &str = "refinement";
    pub const MODEL: &str = "model";
}
