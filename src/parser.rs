//! A scanner for collecting coerced options from a token sequence.

use std::collections::HashMap;

use crate::Error;
use crate::coerce::Value;
use crate::lexer;
use crate::spec::{Compiled, Handler, Kind, Spec};

/// The raw token fed to a flag handler's coercion in place of a consumed
/// value.
const TRUTHY_MARKER: &str = "true";

/// Scanner configuration.
///
/// Without an explicit token sequence, [`parse`] reads the host-process
/// argument list through [`host_args`].
#[derive(Clone, Debug, Default)]
pub struct Config {
    tokens: Option<Vec<String>>,
    permissive: bool,
    stop_at_positional: bool,
}

impl Config {
    /// The default configuration: host-process tokens, strict, full scan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan an explicit token sequence instead of the host argument list.
    pub fn tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Degrade unknown option tokens to positionals instead of failing.
    pub fn permissive(mut self, yes: bool) -> Self {
        self.permissive = yes;
        self
    }

    /// Treat every token after the first positional as a positional.
    pub fn stop_at_positional(mut self, yes: bool) -> Self {
        self.stop_at_positional = yes;
        self
    }
}

/// The host-process argument list, minus the program name.
pub fn host_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

/// Defines the result of a scan: coerced values keyed by canonical option
/// name, plus the positional arguments in input order.
///
/// Only canonical keys appear here; occurrences given through an alias are
/// stored under the key the alias chain resolves to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedArgs {
    values: HashMap<String, Value>,
    positionals: Vec<String>,
}

impl ParsedArgs {
    /// Look up the value stored under a canonical option key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Check if an option was seen at least once.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// The positional arguments, in input order.
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    /// The number of distinct options stored.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no option was stored. Positionals may still be present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fold one occurrence into the accumulator under the handler's storage
    /// discipline.
    fn store(&mut self, name: &str, handler: &Handler, raw: &str) -> Result<(), Error> {
        match handler.kind() {
            Kind::Scalar => {
                let coerced = (handler.coerce())(raw, name)?;
                self.values.insert(name.to_owned(), coerced);
            }

            Kind::Repeatable => {
                let coerced = (handler.coerce())(raw, name)?;
                match self.values.get_mut(name) {
                    Some(Value::List(items)) => items.push(coerced),
                    _ => {
                        self.values
                            .insert(name.to_owned(), Value::List(vec![coerced]));
                    }
                }
            }

            Kind::Counting => {
                let tally = match self.values.get(name) {
                    Some(Value::Count(n)) => n + 1,
                    _ => 1,
                };
                self.values.insert(name.to_owned(), Value::Count(tally));
            }
        }

        Ok(())
    }
}

/// Compile the specification, then scan the configured token sequence.
///
/// Specification errors surface before any token is read; scanning is a
/// single forward pass with no state shared across calls.
pub fn parse(spec: &Spec, config: Config) -> Result<ParsedArgs, Error> {
    let compiled = spec.compile()?;
    let argv = config.tokens.unwrap_or_else(host_args);

    scan(&compiled, &argv, config.permissive, config.stop_at_positional)
}

fn scan(
    compiled: &Compiled<'_>,
    argv: &[String],
    permissive: bool,
    stop_at_positional: bool,
) -> Result<ParsedArgs, Error> {
    let mut out = ParsedArgs::default();

    let mut i = 0;
    while i < argv.len() {
        let whole = argv[i].as_str();

        if stop_at_positional && !out.positionals.is_empty() {
            out.positionals.extend(argv[i..].iter().cloned());
            break;
        }

        if whole == "--" {
            out.positionals.extend(argv[i + 1..].iter().cloned());
            break;
        }

        if !lexer::is_option_like(whole) {
            out.positionals.push(whole.to_owned());
            i += 1;
            continue;
        }

        let units = lexer::split_units(whole);

        for (j, unit) in units.iter().enumerate() {
            let key = unit.key.as_ref();
            let canonical = compiled.resolve(key);

            let Some(handler) = compiled.handler(canonical) else {
                if permissive {
                    out.positionals.push(unit.raw.clone().into_owned());
                    continue;
                }

                return Err(Error::UnknownOption(key.to_owned()));
            };

            // A value-taking option cannot be packed before the end of its
            // cluster.
            if !handler.is_flag() && j + 1 < units.len() {
                return Err(Error::MissingShortArg(key.to_owned()));
            }

            if handler.is_flag() {
                out.store(canonical, handler, TRUTHY_MARKER)?;
            } else if let Some(value) = unit.inline {
                out.store(canonical, handler, value)?;
            } else {
                match argv.get(i + 1).map(String::as_str) {
                    Some(next)
                        if !lexer::is_option_like(next)
                            || (handler.numeric() && lexer::looks_numeric(next)) =>
                    {
                        out.store(canonical, handler, next)?;
                        i += 1;
                    }

                    _ => {
                        let target = (key != canonical).then(|| canonical.to_owned());

                        return Err(Error::MissingLongArg {
                            key: key.to_owned(),
                            canonical: target,
                        });
                    }
                }
            }
        }

        i += 1;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    fn run(spec: &Spec, tokens: &[&str]) -> std::result::Result<ParsedArgs, Error> {
        parse(spec, Config::new().tokens(tokens.iter().copied()))
    }

    #[test]
    fn it_should_yield_an_empty_result_for_no_tokens() {
        let spec = Spec::new()
            .arg("-a", Handler::flag())
            .arg("--tag", Handler::string().repeated());

        let args = run(&spec, &[]).unwrap();

        assert_that!(args.is_empty(), eq(true));
        assert_that!(args.positionals().is_empty(), eq(true));
        assert_that!(args.contains("-a"), eq(false));
        assert_that!(args.contains("--tag"), eq(false));
    }

    #[test]
    fn it_should_collect_positionals_in_order() {
        let spec = Spec::new().arg("-a", Handler::flag());

        let args = run(&spec, &["one", "-a", "two", "three"]).unwrap();

        assert_that!(args.get("-a"), eq(Some(&Value::Bool(true))));
        assert_that!(
            args.positionals(),
            eq(&["one".to_owned(), "two".to_owned(), "three".to_owned()][..])
        );
    }

    #[test]
    fn it_should_store_values_under_the_canonical_key() {
        let spec = Spec::new()
            .alias("-x", "-y")
            .alias("-y", "--zed")
            .arg("--zed", Handler::string());

        let args = run(&spec, &["-x", "value"]).unwrap();

        assert_that!(
            args.get("--zed"),
            eq(Some(&Value::Str("value".to_owned())))
        );
        assert_that!(args.contains("-x"), eq(false));
        assert_that!(args.contains("-y"), eq(false));
    }

    #[test]
    fn it_should_explode_short_clusters_with_a_trailing_value_taker() {
        let spec = Spec::new()
            .arg("-a", Handler::flag())
            .arg("-b", Handler::flag())
            .arg("-c", Handler::string());

        let args = run(&spec, &["-abc", "val"]).unwrap();

        assert_that!(args.get("-a"), eq(Some(&Value::Bool(true))));
        assert_that!(args.get("-b"), eq(Some(&Value::Bool(true))));
        assert_that!(args.get("-c"), eq(Some(&Value::Str("val".to_owned()))));
        assert_that!(args.positionals().is_empty(), eq(true));
    }

    #[test]
    fn it_should_reject_a_value_taker_packed_before_the_cluster_end() {
        let spec = Spec::new()
            .arg("-a", Handler::flag())
            .arg("-c", Handler::string());

        let err = run(&spec, &["-ca", "val"]).unwrap_err();

        assert_that!(err, eq(&Error::MissingShortArg("-c".to_owned())));
        assert_that!(err.code(), eq("ARG_MISSING_REQUIRED_SHORTARG"));
    }

    #[test]
    fn it_should_accumulate_repeatable_handlers_in_call_order() {
        let spec = Spec::new().arg("--tag", Handler::string().repeated());

        let args = run(&spec, &["--tag", "foo", "--tag", "bar"]).unwrap();

        assert_that!(
            args.get("--tag"),
            eq(Some(&Value::List(vec![
                Value::Str("foo".to_owned()),
                Value::Str("bar".to_owned())
            ])))
        );
    }

    #[test]
    fn it_should_tally_counting_handlers() {
        let spec = Spec::new()
            .alias("-v", "--verbose")
            .arg("--verbose", Handler::count());

        let args = run(&spec, &["-v", "-v", "-v"]).unwrap();

        assert_that!(args.get("--verbose"), eq(Some(&Value::Count(3))));
    }

    #[test]
    fn it_should_accept_a_negative_number_after_a_numeric_handler() {
        let spec = Spec::new().arg("-n", Handler::int());

        let args = run(&spec, &["-n", "-5"]).unwrap();

        assert_that!(args.get("-n"), eq(Some(&Value::Int(-5))));
        assert_that!(args.positionals().is_empty(), eq(true));
    }

    #[test]
    fn it_should_reject_a_non_numeric_next_token_for_a_numeric_handler() {
        let spec = Spec::new().arg("-n", Handler::int());

        let err = run(&spec, &["-n", "-x"]).unwrap_err();

        assert_that!(err.code(), eq("ARG_MISSING_REQUIRED_LONGARG"));
    }

    #[test]
    fn it_should_keep_the_numeric_carve_out_for_repeated_handlers() {
        let spec = Spec::new().arg("-n", Handler::int().repeated());

        let args = run(&spec, &["-n", "-1", "-n", "2"]).unwrap();

        assert_that!(
            args.get("-n"),
            eq(Some(&Value::List(vec![Value::Int(-1), Value::Int(2)])))
        );
    }

    #[test]
    fn it_should_not_extend_the_numeric_carve_out_to_string_handlers() {
        let spec = Spec::new().arg("-s", Handler::string());

        let err = run(&spec, &["-s", "-5"]).unwrap_err();

        assert_that!(err.code(), eq("ARG_MISSING_REQUIRED_LONGARG"));
    }

    #[test]
    fn it_should_treat_everything_after_the_separator_as_positional() {
        let spec = Spec::new().arg("-a", Handler::flag());

        let args = run(&spec, &["-a", "--", "-b", "c"]).unwrap();

        assert_that!(args.get("-a"), eq(Some(&Value::Bool(true))));
        assert_that!(
            args.positionals(),
            eq(&["-b".to_owned(), "c".to_owned()][..])
        );
    }

    #[test]
    fn it_should_stop_at_the_first_positional_when_configured() {
        let spec = Spec::new().arg("-a", Handler::flag());
        let config = Config::new()
            .tokens(["pos1", "-a"])
            .stop_at_positional(true);

        let args = parse(&spec, config).unwrap();

        assert_that!(args.contains("-a"), eq(false));
        assert_that!(
            args.positionals(),
            eq(&["pos1".to_owned(), "-a".to_owned()][..])
        );
    }

    #[test]
    fn it_should_degrade_unknown_options_in_permissive_mode() {
        let spec = Spec::new().arg("-a", Handler::flag());
        let config = Config::new()
            .tokens(["one", "--bogus=x", "-a", "two"])
            .permissive(true);

        let args = parse(&spec, config).unwrap();

        assert_that!(args.get("-a"), eq(Some(&Value::Bool(true))));
        assert_that!(
            args.positionals(),
            eq(&["one".to_owned(), "--bogus=x".to_owned(), "two".to_owned()][..])
        );
    }

    #[test]
    fn it_should_honor_the_last_entry_when_a_key_is_redefined() {
        let spec = Spec::new()
            .alias("-v", "--other")
            .arg("-v", Handler::flag());

        let args = run(&spec, &["-v"]).unwrap();

        assert_that!(args.get("-v"), eq(Some(&Value::Bool(true))));
    }

    #[test]
    fn it_should_name_the_pre_alias_key_for_unknown_options() {
        let spec = Spec::new().alias("-b", "--missing");

        let err = run(&spec, &["-b"]).unwrap_err();

        assert_that!(err, eq(&Error::UnknownOption("-b".to_owned())));
    }

    #[test]
    fn it_should_take_inline_values_after_the_first_equals() {
        let spec = Spec::new().arg("--key", Handler::string());

        let args = run(&spec, &["--key=a=b"]).unwrap();

        assert_that!(args.get("--key"), eq(Some(&Value::Str("a=b".to_owned()))));
    }

    #[test]
    fn it_should_report_missing_values_for_trailing_options() {
        let spec = Spec::new().arg("--port", Handler::int());

        let err = run(&spec, &["--port"]).unwrap_err();

        assert_that!(
            err,
            eq(&Error::MissingLongArg {
                key: "--port".to_owned(),
                canonical: None
            })
        );
    }

    #[test]
    fn it_should_note_the_canonical_key_when_an_alias_misses_its_value() {
        let spec = Spec::new()
            .alias("-p", "--port")
            .arg("--port", Handler::int());

        let err = run(&spec, &["-p"]).unwrap_err();

        assert_that!(
            err,
            eq(&Error::MissingLongArg {
                key: "-p".to_owned(),
                canonical: Some("--port".to_owned())
            })
        );
    }

    #[test]
    fn it_should_run_flag_marked_coercions_on_the_truthy_marker() {
        fn shout(raw: &str, _name: &str) -> std::result::Result<Value, Error> {
            Ok(Value::Str(raw.to_uppercase()))
        }

        let spec = Spec::new().arg("--loud", Handler::of(shout).as_flag());

        let args = run(&spec, &["--loud", "next"]).unwrap();

        assert_that!(args.get("--loud"), eq(Some(&Value::Str("TRUE".to_owned()))));
        assert_that!(args.positionals(), eq(&["next".to_owned()][..]));
    }

    #[test]
    fn it_should_accumulate_repeatable_flags() {
        let spec = Spec::new().arg("-a", Handler::flag().repeated());

        let args = run(&spec, &["-a", "-a"]).unwrap();

        assert_that!(
            args.get("-a"),
            eq(Some(&Value::List(vec![
                Value::Bool(true),
                Value::Bool(true)
            ])))
        );
    }

    #[test]
    fn it_should_overwrite_scalar_handlers_on_repetition() {
        let spec = Spec::new().arg("--mode", Handler::string());

        let args = run(&spec, &["--mode", "fast", "--mode", "slow"]).unwrap();

        assert_that!(args.get("--mode"), eq(Some(&Value::Str("slow".to_owned()))));
        assert_that!(args.len(), eq(1));
    }

    #[test]
    fn it_should_fail_on_spec_errors_before_reading_any_token() {
        let spec = Spec::new().arg("-toolong", Handler::flag());

        // The token list alone would also fail, but with a scan error; the
        // specification error must win.
        let err = run(&spec, &["--nope"]).unwrap_err();

        assert_that!(err, eq(&Error::ShortKeyTooLong("-toolong".to_owned())));
    }

    #[test]
    fn it_should_surface_coercion_failures() {
        let spec = Spec::new().arg("--port", Handler::int());

        let err = run(&spec, &["--port", "http"]).unwrap_err();

        assert_that!(
            err,
            eq(&Error::InvalidValue {
                name: "--port".to_owned(),
                raw: "http".to_owned()
            })
        );
    }

    #[test]
    fn it_should_allow_value_takers_at_the_end_of_separate_clusters() {
        // Two clusters, each ending in a value taker, are both accepted.
        let spec = Spec::new()
            .arg("-a", Handler::flag())
            .arg("-c", Handler::string())
            .arg("-d", Handler::string());

        let args = run(&spec, &["-ac", "one", "-ad", "two"]).unwrap();

        assert_that!(args.get("-c"), eq(Some(&Value::Str("one".to_owned()))));
        assert_that!(args.get("-d"), eq(Some(&Value::Str("two".to_owned()))));
    }

    #[test]
    fn it_should_keep_permissive_unknowns_from_clusters_in_scan_order() {
        let spec = Spec::new().arg("-a", Handler::flag());
        let config = Config::new().tokens(["pre", "-ax", "post"]).permissive(true);

        let args = parse(&spec, config).unwrap();

        assert_that!(args.get("-a"), eq(Some(&Value::Bool(true))));
        assert_that!(
            args.positionals(),
            eq(&["pre".to_owned(), "-x".to_owned(), "post".to_owned()][..])
        );
    }
}
