//! Ambient emission configuration (SPEC_FULL.md §4.8).
//!
//! The CLI flag surface (spec.md §6) belongs to an external collaborator,
//! but the core still needs a typed, constructible-without-a-CLI carrier
//! for the knobs that change emission behavior, since that collaborator
//! has to set something.

/// Emission knobs. `verbose logging` and `file-list dump` are CLI-only
/// concerns with no core-side state — logging is ambient via `tracing`
/// regardless of this struct — and are deliberately not fields here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Emit human-formatted, indented output rather than a compact form.
    pub pretty: bool,
    /// Whether SFINAE template constraints are written out at all.
    pub emit_constraints: bool,
    /// Always write fully qualified (`::a::b::C`) names instead of
    /// shortening relative to the current namespace.
    pub fully_qualified_paths: bool,
    /// Wrap every emitted declaration in an extra namespace.
    pub wrapping_namespace: Option<String>,
    /// Downgrade unresolvable cycles to a logged warning and best-effort
    /// partial output instead of failing the run (spec.md §7.2, §9).
    pub ignore_errors: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            pretty: true,
            emit_constraints: true,
            fully_qualified_paths: false,
            wrapping_namespace: None,
            ignore_errors: false,
        }
    }
}
