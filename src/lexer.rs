//! Token classification and decomposition for the scanner.

use std::borrow::Cow;

/// Defines a `Unit`, one option occurrence carved out of a whole token.
///
/// A long-form token yields a single unit; a short cluster (`-abc`) yields
/// one synthesized single-character unit per name character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Unit<'a> {
    /// The unit exactly as written, inline value included. This is what
    /// permissive mode pushes back into the positionals.
    pub raw: Cow<'a, str>,

    /// The option name before alias resolution, inline value stripped.
    pub key: Cow<'a, str>,

    /// The `=`-delimited inline value. Long form only.
    pub inline: Option<&'a str>,
}

/// Evaluate if the token is shaped like an option: more than one character,
/// starting with the marker.
#[inline(always)]
pub(crate) fn is_option_like(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// Evaluate if the token is lexically a signed decimal or floating literal:
/// an optional leading `-`, digits, and at most one `.` that must be
/// immediately followed by a digit. No exponents, no `+` sign.
pub(crate) fn looks_numeric(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token).as_bytes();

    let mut i = 0;
    while i < digits.len() && digits[i].is_ascii_digit() {
        i += 1;
    }

    if i < digits.len() && digits[i] == b'.' {
        if !digits.get(i + 1).is_some_and(u8::is_ascii_digit) {
            return false;
        }
        i += 1;
        while i < digits.len() && digits[i].is_ascii_digit() {
            i += 1;
        }
    }

    i == digits.len()
}

/// Decompose one option token into its ordered units.
///
/// Double-marker tokens and single-character short options are one unit, with
/// an inline value split off at the first `=` for the double-marker form.
/// Anything else is a cluster: each character after the marker becomes a
/// synthesized `-c` unit with no inline value.
pub(crate) fn split_units(whole: &str) -> Vec<Unit<'_>> {
    debug_assert!(is_option_like(whole));

    if whole.starts_with("--") || whole.chars().count() == 2 {
        let (key, inline) = if whole.starts_with("--") {
            match whole.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (whole, None),
            }
        } else {
            (whole, None)
        };

        return vec![Unit {
            raw: Cow::Borrowed(whole),
            key: Cow::Borrowed(key),
            inline,
        }];
    }

    whole
        .chars()
        .skip(1)
        .map(|c| {
            let key = format!("-{c}");
            Unit {
                raw: Cow::Owned(key.clone()),
                key: Cow::Owned(key),
                inline: None,
            }
        })
        .collect()
}
