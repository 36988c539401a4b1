//! Coerced values and the built-in coercion helpers.

use crate::Error;

/// Defines a `Value` produced by a coercion handler.
///
/// Scalar handlers store one of the plain variants under their canonical
/// name, overwriting on repetition. Repeatable handlers accumulate into
/// [`Value::List`] and counting handlers into [`Value::Count`]; the scanner
/// owns that accumulation.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A boolean, from a flag handler.
    Bool(bool),

    /// A signed integer, from [`int`].
    Int(i64),

    /// A floating-point number, from [`float`].
    Float(f64),

    /// A string, from [`string`] or a custom coercion.
    Str(String),

    /// A counting handler's tally.
    Count(u64),

    /// A repeatable handler's accumulated outputs, in call order.
    List(Vec<Value>),
}

impl Value {
    /// The boolean payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(x) => Some(*x),
            _ => None,
        }
    }

    /// The integer payload, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(x) => Some(*x),
            _ => None,
        }
    }

    /// The float payload, if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// The string payload, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(x) => Some(x),
            _ => None,
        }
    }

    /// The tally, if this is a `Count`.
    pub fn as_count(&self) -> Option<u64> {
        match self {
            Value::Count(x) => Some(*x),
            _ => None,
        }
    }

    /// The accumulated values, if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(x) => Some(x),
            _ => None,
        }
    }
}

/// A coercion function, mapping a raw token and the canonical option name to
/// a [`Value`].
///
/// The raw token is the literal text the scanner picked for the option: an
/// inline `=` value, the next whole token, or the fixed truthy marker for
/// flag handlers. Coercions are stateless; repetition semantics live in the
/// handler kind, not here.
pub type CoerceFn = fn(&str, &str) -> Result<Value, Error>;

/// Ignore the raw token and yield `true`.
///
/// The coercion behind [`Handler::flag`](crate::Handler::flag); it never
/// consumes a following token.
pub fn boolean(_raw: &str, _name: &str) -> Result<Value, Error> {
    Ok(Value::Bool(true))
}

/// Keep the raw token as-is. Infallible.
pub fn string(raw: &str, _name: &str) -> Result<Value, Error> {
    Ok(Value::Str(raw.to_owned()))
}

/// Parse the raw token as a signed decimal integer.
pub fn int(raw: &str, name: &str) -> Result<Value, Error> {
    raw.parse::<i64>()
        .map(Value::Int)
        .map_err(|_| Error::InvalidValue {
            name: name.to_owned(),
            raw: raw.to_owned(),
        })
}

/// Parse the raw token as a floating-point number.
pub fn float(raw: &str, name: &str) -> Result<Value, Error> {
    raw.parse::<f64>()
        .map(Value::Float)
        .map_err(|_| Error::InvalidValue {
            name: name.to_owned(),
            raw: raw.to_owned(),
        })
}
