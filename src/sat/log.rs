/*!
Targets for the [log] macros used across the solver.

No logger is installed by the library. The `propsat` binary installs
`env_logger`, so `RUST_LOG=propagation=trace` narrows output to one subsystem.
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Watch moves and watch initialisation, see [`Theory`](crate::sat::theory::Theory).
    pub const WATCH: &str = "watch";

    /// Assignments and the units they produce.
    pub const PROPAGATION: &str = "propagation";

    /// Decisions and search results, see [`dpll`](crate::sat::dpll).
    pub const SEARCH: &str = "search";

    /// Undoing the trail and flipping decisions.
    pub const BACKTRACK: &str = "backtrack";

    /// Tseitin encoding, see [`tseitin`](crate::sat::tseitin).
    pub const ENCODING: &str = "encoding";

    /// Textual clause notation and DIMACS input.
    pub const PARSE: &str = "parse";
}
