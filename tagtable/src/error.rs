use strum::EnumIs;
use thiserror::Error;

/// Failures raised while building or invoking a handler table.
#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum Error {
    /// A tagged value carried a discriminant with no handler in the table.
    ///
    /// A table built under the compiler's exhaustiveness check is total, so this
    /// only happens for values that bypassed it (deserialized input, a producer
    /// built against a newer set of variants, a partially registered table).
    #[error("Non-exhaustive switch. Unhandled case: {discriminant}")]
    Unhandled { discriminant: String },

    /// A gated handler was invoked while the state was not in its allow-list.
    #[error(
        "Action called from state {state}. Allowed states: {}",
        allowed.join(", ")
    )]
    IllegalTransition {
        state: String,
        allowed: Vec<&'static str>,
    },

    /// The run-time checked builder was finalized with tags left unregistered.
    #[error(
        "Handler table for `{table}` is missing handlers for: {}",
        missing.join(", ")
    )]
    IncompleteTable {
        table: &'static str,
        missing: Vec<&'static str>,
    },

    /// The same tag was registered twice in a run-time checked builder.
    #[error("Handler table for `{table}` registers `{tag}` more than once")]
    DuplicateHandler {
        table: &'static str,
        tag: &'static str,
    },
}

impl Error {
    /// The discriminant the error is about: the unhandled value, the offending
    /// state, or the duplicated tag. Missing-handler errors report the first gap.
    pub fn discriminant(&self) -> &str {
        match self {
            Error::Unhandled { discriminant } => discriminant,
            Error::IllegalTransition { state, .. } => state,
            Error::IncompleteTable { missing, .. } => missing.first().copied().unwrap_or_default(),
            Error::DuplicateHandler { tag, .. } => tag,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
