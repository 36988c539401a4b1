//! Specification and scan errors.

/// Defines the possible errors that may occur while compiling an option
/// specification or scanning a token sequence.
///
/// Every variant carries a stable machine-readable code, available through
/// [`Error::code`], next to its human-readable message. Specification errors
/// (`ARG_CONFIG_*`) are caller bugs and are raised before any token is read;
/// the remaining variants are input errors raised during the scan.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No option specification was supplied.
    ///
    /// Unreachable through [`parse`](crate::parse), which requires a
    /// [`Spec`](crate::Spec); kept so the published code set is complete.
    #[error("argument specification is required")]
    NoSpec,

    /// A specification key is the empty string.
    #[error("argument key cannot be an empty string")]
    EmptyKey,

    /// A specification key does not start with the option marker.
    #[error("argument key must start with '-' but found: '{0}'")]
    NonOptionKey(String),

    /// A specification key is the bare option marker, with no name.
    #[error("argument key must have a name; singular '-' keys are not allowed: {0}")]
    NoNameKey(String),

    /// A specification entry is neither an alias nor a handler.
    ///
    /// Unreachable through the typed [`Spec`](crate::Spec) builder; kept so
    /// the published code set is complete.
    #[error("entry is missing or not a handler or alias: {0}")]
    InvalidEntryType(String),

    /// A short (single-marker) handler key has more than one name character.
    #[error("short argument keys (with a single hyphen) must have only one character: {0}")]
    ShortKeyTooLong(String),

    /// An option token does not resolve to any handler.
    #[error("unknown or unexpected option: {0}")]
    UnknownOption(String),

    /// A value-taking option was packed before the end of a short cluster.
    #[error("option requires argument (but was followed by another short argument): {0}")]
    MissingShortArg(String),

    /// A value-taking option has no usable following value token.
    #[error("option requires argument: {key}{}", alias_note(.canonical))]
    MissingLongArg {
        /// The option name as written, before alias resolution.
        key: String,
        /// The canonical name, when `key` was an alias.
        canonical: Option<String>,
    },

    /// A coercion could not turn the raw token into a value.
    #[error("invalid value for option {name}: '{raw}'")]
    InvalidValue {
        /// The canonical option name.
        name: String,
        /// The raw token that failed to coerce.
        raw: String,
    },
}

impl Error {
    /// The stable machine-readable code for this error condition.
    pub const fn code(&self) -> &'static str {
        match self {
            Error::NoSpec => "ARG_CONFIG_NO_SPEC",
            Error::EmptyKey => "ARG_CONFIG_EMPTY_KEY",
            Error::NonOptionKey(_) => "ARG_CONFIG_NONOPT_KEY",
            Error::NoNameKey(_) => "ARG_CONFIG_NONAME_KEY",
            Error::InvalidEntryType(_) => "ARG_CONFIG_VAD_TYPE",
            Error::ShortKeyTooLong(_) => "ARG_CONFIG_SHORTOPT_TOOLONG",
            Error::UnknownOption(_) => "ARG_UNKNOWN_OPTION",
            Error::MissingShortArg(_) => "ARG_MISSING_REQUIRED_SHORTARG",
            Error::MissingLongArg { .. } => "ARG_MISSING_REQUIRED_LONGARG",
            Error::InvalidValue { .. } => "ARG_INVALID_VALUE",
        }
    }
}

fn alias_note(canonical: &Option<String>) -> String {
    match canonical {
        Some(name) => format!(" (alias for {name})"),
        None => String::new(),
    }
}
