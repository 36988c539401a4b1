//! Option specifications and their compiled lookup tables.

use std::collections::HashMap;

use crate::Error;
use crate::coerce::{self, CoerceFn};

/// Storage discipline of a [`Handler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Each occurrence overwrites the previous value.
    Scalar,

    /// Each occurrence appends to a growing [`Value::List`](crate::Value).
    Repeatable,

    /// Each occurrence increments a [`Value::Count`](crate::Value) tally.
    Counting,
}

/// Defines a `Handler` that turns option occurrences into values.
///
/// A handler pairs a coercion function with its storage discipline and two
/// capability markers: whether it is a flag (consumes no following token;
/// its coercion runs against a fixed truthy marker) and whether it is
/// numeric (a following token that looks like a negative number is accepted
/// as its value rather than mistaken for an option).
#[derive(Clone, Copy, Debug)]
pub struct Handler {
    kind: Kind,
    coerce: CoerceFn,
    is_flag: bool,
    numeric: bool,
}

impl Handler {
    /// A boolean flag. Stores `true`, consumes no following token.
    pub fn flag() -> Self {
        Handler {
            kind: Kind::Scalar,
            coerce: coerce::boolean,
            is_flag: true,
            numeric: false,
        }
    }

    /// A counting flag. Each occurrence increments the tally, starting at 1.
    pub fn count() -> Self {
        Handler {
            kind: Kind::Counting,
            coerce: coerce::boolean,
            is_flag: true,
            numeric: false,
        }
    }

    /// A value-taking option kept as a string.
    pub fn string() -> Self {
        Self::of(coerce::string)
    }

    /// A value-taking option parsed as a signed integer. Accepts a
    /// negative-number-shaped next token as its value.
    pub fn int() -> Self {
        Handler {
            numeric: true,
            ..Self::of(coerce::int)
        }
    }

    /// A value-taking option parsed as a float. Accepts a
    /// negative-number-shaped next token as its value.
    pub fn float() -> Self {
        Handler {
            numeric: true,
            ..Self::of(coerce::float)
        }
    }

    /// A value-taking option with a custom coercion.
    pub fn of(coerce: CoerceFn) -> Self {
        Handler {
            kind: Kind::Scalar,
            coerce,
            is_flag: false,
            numeric: false,
        }
    }

    /// Rewrite this handler to accumulate: each occurrence appends its
    /// coerced output to a growing list instead of overwriting.
    ///
    /// The flag and numeric markers carry over, so a repeated numeric
    /// option still accepts a negative-number-shaped next token.
    pub fn repeated(mut self) -> Self {
        self.kind = Kind::Repeatable;
        self
    }

    /// Mark this handler as a flag: the scanner feeds its coercion the fixed
    /// truthy marker and never consumes a following token.
    pub fn as_flag(mut self) -> Self {
        self.is_flag = true;
        self
    }

    /// The storage discipline.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Whether this handler consumes no following token.
    pub fn is_flag(&self) -> bool {
        self.is_flag
    }

    pub(crate) fn coerce(&self) -> CoerceFn {
        self.coerce
    }

    pub(crate) fn numeric(&self) -> bool {
        self.numeric
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Entry {
    Alias(String),
    Handler(Handler),
}

/// Defines a `Spec` mapping option keys to aliases and [`Handler`]s.
///
/// Keys are option strings as written on the command line (`"-v"`,
/// `"--tag"`). Entries keep their insertion order; a duplicated key keeps
/// the last entry. Validation happens when a parse call compiles the
/// specification, before any token is read.
#[derive(Clone, Debug, Default)]
pub struct Spec {
    entries: Vec<(String, Entry)>,
}

impl Spec {
    /// Create an empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to a handler.
    pub fn arg(mut self, key: impl Into<String>, handler: Handler) -> Self {
        self.entries.push((key.into(), Entry::Handler(handler)));
        self
    }

    /// Record `key` as an alias of `target`. Aliases may chain; resolution
    /// is lazy and transitive. A cycle or a dangling target is a
    /// specification bug and is not guarded.
    pub fn alias(mut self, key: impl Into<String>, target: impl Into<String>) -> Self {
        self.entries.push((key.into(), Entry::Alias(target.into())));
        self
    }

    /// Validate the entries in insertion order and build the alias and
    /// handler tables.
    pub(crate) fn compile(&self) -> Result<Compiled<'_>, Error> {
        let mut aliases = HashMap::new();
        let mut handlers = HashMap::new();

        for (key, entry) in &self.entries {
            if key.is_empty() {
                return Err(Error::EmptyKey);
            }

            if !key.starts_with('-') {
                return Err(Error::NonOptionKey(key.clone()));
            }

            if key.chars().count() == 1 {
                return Err(Error::NoNameKey(key.clone()));
            }

            // A key may be redefined with a different entry kind; the last
            // entry wins, so evict it from the sibling table.
            match entry {
                Entry::Alias(target) => {
                    handlers.remove(key.as_str());
                    aliases.insert(key.as_str(), target.as_str());
                }

                Entry::Handler(handler) => {
                    // Short handler keys hold exactly one name character.
                    // Alias keys are exempt.
                    if !key.starts_with("--") && key.chars().count() > 2 {
                        return Err(Error::ShortKeyTooLong(key.clone()));
                    }

                    aliases.remove(key.as_str());
                    handlers.insert(key.as_str(), *handler);
                }
            }
        }

        Ok(Compiled { aliases, handlers })
    }
}

/// Defines the lookup tables compiled from a [`Spec`], rebuilt for every
/// parse call.
#[derive(Debug)]
pub(crate) struct Compiled<'s> {
    aliases: HashMap<&'s str, &'s str>,
    handlers: HashMap<&'s str, Handler>,
}

impl<'s> Compiled<'s> {
    /// Follow alias chains until a non-alias key is reached.
    pub(crate) fn resolve<'k>(&'k self, key: &'k str) -> &'k str
    where
        's: 'k,
    {
        let mut name = key;

        while let Some(&target) = self.aliases.get(name) {
            name = target;
        }

        name
    }

    /// Look up the handler bound to a canonical key.
    pub(crate) fn handler(&self, key: &str) -> Option<&Handler> {
        self.handlers.get(key)
    }
}
