//! argcom, a declarative command-line argument parser.
//!
//! A [`Spec`] maps option keys to aliases and coercion [`Handler`]s.
//! [`parse`] compiles the specification into its alias and handler tables,
//! then performs a single left-to-right scan over the token sequence,
//! producing a [`ParsedArgs`] record of canonical option names to coerced
//! [`Value`]s plus the positional arguments in input order.
//!
//! ```
//! use argcom::{Config, Handler, Spec, parse};
//!
//! let spec = Spec::new()
//!     .arg("--verbose", Handler::flag())
//!     .alias("-v", "--verbose")
//!     .arg("--threads", Handler::int());
//!
//! let config = Config::new().tokens(["-v", "--threads", "4", "in.txt"]);
//! let args = parse(&spec, config)?;
//!
//! assert!(args.contains("--verbose"));
//! assert_eq!(args.get("--threads").and_then(|v| v.as_int()), Some(4));
//! assert_eq!(args.positionals().len(), 1);
//! assert_eq!(args.positionals()[0], "in.txt");
//! # Ok::<(), argcom::Error>(())
//! ```
#![deny(missing_docs)]

pub mod coerce;
mod error;
mod lexer;
pub mod parser;
pub mod spec;

pub use coerce::{CoerceFn, Value};
pub use error::Error;
pub use parser::{Config, ParsedArgs, host_args, parse};
pub use spec::{Handler, Kind, Spec};
