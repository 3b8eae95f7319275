//! [`Program`]: the compiled entry point tying the whole pipeline together (spec 4, 6, 7).
//!
//! `compile` runs the Definition Parser once; `try_parse` is the pure, testable core of
//! the Normalizer → Indexer → Bind engine → Residual Collector chain (spec 4.3-4.6);
//! `parse` layers the host-facing CLI contract on top (subcommand/help/completion
//! dispatch, the error-hook, and the process exit codes of spec 6/7).
//!
//! Grounded on the teacher's `GeneralParser::parse`: a thin process-exiting shell around
//! a result-returning core, so the core stays unit-testable without tests killing their
//! own process.

use crate::bind;
use crate::completion;
use crate::constant::{NUCOMP_COMPLETION_TOKEN, TSV_COMPLETION_TOKEN};
use crate::dsl;
use crate::error::{BindError, DslError, Error, ErrorContext};
use crate::help;
use crate::host::HostEnvironment;
use crate::index;
use crate::model::Model;
use crate::normalize;
use crate::output::ParseOutcome;
use crate::palette::{Palette, Role};
use crate::residual;

/// A compiled DSL program, ready to bind argv or render help/completion against.
///
/// Cheap to keep around and reuse across many [`Program::parse`] calls: compiling is the
/// expensive, fallible step, binding a concrete argv is not.
pub struct Program {
    model: Model,
    palette: Palette,
}

/// Which subcommand (if any) `argv`'s leading token selects, and how many leading tokens
/// that consumed (`0` or `1`).
fn detect_subcommand(model: &Model, argv: &[String]) -> (Option<String>, usize) {
    if model.subcommands.is_empty() {
        return (None, 0);
    }
    match argv.first().and_then(|first| model.subcommand(first)) {
        Some(sub) => (Some(sub.name.clone()), 1),
        None => (None, 0),
    }
}

/// Whether `argv` invokes the reserved completion protocol (spec 4.8, 6), and if so
/// whether it asks for the `nucomp` JSON shape (`true`) or raw TSV (`false`).
fn completion_invocation(argv: &[String]) -> Option<bool> {
    match argv.first().map(String::as_str) {
        Some(NUCOMP_COMPLETION_TOKEN) => Some(true),
        Some(TSV_COMPLETION_TOKEN) => Some(false),
        _ => None,
    }
}

/// Whether `-h`/`--help` appears in `argv` before any `--` escape (spec 6).
fn help_invocation(argv: &[String]) -> bool {
    argv.iter()
        .take_while(|t| t.as_str() != "--")
        .any(|t| t == "-h" || t == "--help")
}

impl Program {
    /// Compiles `source` into a [`Program`]. This is the only fallible step; binding a
    /// concrete argv against the result never fails to compile, only to bind.
    pub fn compile(source: &str) -> Result<Program, DslError> {
        let model = dsl::compile(source)?;
        let palette = Palette::resolve_process(model.configuration.color_palette.as_deref());
        Ok(Program { model, palette })
    }

    fn program_name(&self) -> String {
        self.model
            .configuration
            .program_name
            .clone()
            .unwrap_or_else(|| std::env::args().next().unwrap_or_else(|| "program".to_string()))
    }

    /// Runs the Normalizer, Indexer, Bind engine and Residual Collector over `argv` (spec
    /// 4.3-4.6), without any of `argv`'s host-contract leading tokens (no subcommand
    /// dispatch outside the DSL's own `commands` block, no `@nucomp`/`-h` handling).
    ///
    /// This is the pure core behind [`Program::parse`]: it returns a `Result` instead of
    /// exiting the process, so callers can test bind outcomes directly.
    pub fn try_parse(&self, argv: &[String]) -> Result<ParseOutcome, Error> {
        let (selected, consumed) = detect_subcommand(&self.model, argv);

        if selected.is_none() && !self.model.subcommands.is_empty() && self.model.configuration.subcommand_required {
            return Err(Error::bind(
                BindError::MissingSubcommand {
                    available: self.model.subcommand_names().iter().map(|s| s.to_string()).collect(),
                },
                ErrorContext::new(0, argv),
            ));
        }

        let rest = &argv[consumed..];
        let normalized = normalize::normalize(rest);
        let flag_index = index::build(&normalized);
        let bound = bind::bind(&self.model, &normalized, &flag_index, selected.as_deref())?;

        let spare = residual::collect(&normalized, &bound.taken)
            .map_err(|(offset, e)| Error::bind(e, ErrorContext::new(offset, &normalized)))?;

        let needs_spare = match &selected {
            Some(name) => self.model.subcommand(name).map(|s| s.needs_spare).unwrap_or(false),
            None => self.model.configuration.spare_args_required,
        };
        if spare.is_empty() && needs_spare {
            return Err(Error::bind(BindError::MissingSpare, ErrorContext::new(normalized.len(), &normalized)));
        }

        Ok(ParseOutcome {
            bindings: bound.bindings,
            was_set: bound.was_set,
            subcommand: selected,
            spare_args: spare,
        })
    }

    /// Renders help text for `argv`'s current scope (whichever subcommand, if any, its
    /// leading token selects).
    fn render_help(&self, argv: &[String], host: &HostEnvironment) -> String {
        let (selected, _) = detect_subcommand(&self.model, argv);
        help::render(&self.model, selected.as_deref(), &self.palette, &self.program_name(), host)
    }

    fn emit(&self, text: &str) {
        if self.model.configuration.use_stderr {
            eprintln!("{text}");
        } else {
            println!("{text}");
        }
    }

    /// Binds `argv` against this program and returns its outcome, dispatching the full
    /// host-facing CLI contract along the way (spec 6, 7):
    ///
    /// - `@nucomp`/`@tsvcomp` as the leading token (when `completion_enabled`) prints the
    ///   completion stream and exits `0`.
    /// - `-h`/`--help` anywhere before a `--` (when `help_enabled`) prints help and exits
    ///   `0`.
    /// - An empty `argv` without the `#[always]` directive exits `1`.
    /// - A bind error is routed to `host`'s error hook if one is registered; otherwise it
    ///   is rendered (unless `quiet_exit`) and the process exits `1`. If the hook returns
    ///   `0` the error is suppressed and an empty [`ParseOutcome`] is returned so the
    ///   caller can continue; any other return value exits with that code.
    pub fn parse(&self, argv: &[String], host: &HostEnvironment) -> ParseOutcome {
        if self.model.configuration.completion_enabled {
            if let Some(json) = completion_invocation(argv) {
                let user_argv = argv.get(2..).unwrap_or(&[]);
                let text = completion::render(&self.model, user_argv, json);
                println!("{text}");
                std::process::exit(0);
            }
        }

        if self.model.configuration.help_enabled && help_invocation(argv) {
            let text = self.render_help(argv, host);
            self.emit(&text);
            std::process::exit(0);
        }

        if argv.is_empty() && !self.model.always {
            std::process::exit(1);
        }

        match self.try_parse(argv) {
            Ok(outcome) => outcome,
            Err(err) => {
                if let Some(hook) = host.error_hook() {
                    let code = hook(err.label(), &err.to_string());
                    if code == 0 {
                        return ParseOutcome::default();
                    }
                    std::process::exit(code);
                }
                if !self.model.configuration.quiet_exit {
                    self.emit(&self.palette.paint(Role::Error, &err.to_string()));
                }
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn compiles_and_binds_a_minimal_program() {
        let program = Program::compile(r#"a/alpha :flag => A"#).unwrap();
        let outcome = program.try_parse(&v(&["-a"])).unwrap();
        assert_eq!(outcome.get("A"), Some(&crate::output::Value::Bool(true)));
    }

    #[test]
    fn subcommand_routing_scenario_five() {
        let source = "commands { install: \"i\" *remove: \"r\" }\n\
             @install u/update :flag => U\n\
             @remove k/keep :flag => K";
        let program = Program::compile(source).unwrap();

        let err = program.try_parse(&v(&["remove", "-k"])).unwrap_err();
        assert_matches::assert_matches!(err, Error::Bind { source: BindError::MissingSpare, .. });
    }

    #[test]
    fn subcommand_routing_succeeds_with_spare() {
        let source = "commands { install: \"i\" *remove: \"r\" }\n\
             @install u/update :flag => U\n\
             @remove k/keep :flag => K";
        let program = Program::compile(source).unwrap();

        let outcome = program.try_parse(&v(&["remove", "-k", "pkg"])).unwrap();
        assert_eq!(outcome.subcommand(), Some("remove"));
        assert_eq!(outcome.get("K"), Some(&crate::output::Value::Bool(true)));
        assert_eq!(outcome.get("U"), Some(&crate::output::Value::Bool(false)));
        assert_eq!(outcome.spare_args(), &["pkg".to_string()]);
    }

    #[test]
    fn missing_subcommand_when_required_and_absent() {
        let source = "meta { subcommand_required: true }\ncommands { install: \"i\" }\n@install u/update :flag => U";
        let program = Program::compile(source).unwrap();
        let err = program.try_parse(&v(&[])).unwrap_err();
        assert_matches::assert_matches!(err, Error::Bind { source: BindError::MissingSubcommand { .. }, .. });
    }

    #[test]
    fn detects_completion_invocation() {
        assert_eq!(completion_invocation(&v(&["@nucomp", "demo", "--a"])), Some(true));
        assert_eq!(completion_invocation(&v(&["@tsvcomp", "demo", "--a"])), Some(false));
        assert_eq!(completion_invocation(&v(&["--a"])), None);
    }

    #[test]
    fn detects_help_invocation_before_escape() {
        assert!(help_invocation(&v(&["-a", "-h"])));
        assert!(help_invocation(&v(&["--help"])));
        assert!(!help_invocation(&v(&["-a", "--", "-h"])));
    }

    #[test]
    fn detect_subcommand_matches_leading_token() {
        let source = "commands { install: \"i\" }\n@install u/update :flag => U";
        let model = dsl::compile(source).unwrap();
        assert_eq!(detect_subcommand(&model, &v(&["install", "-u"])), (Some("install".to_string()), 1));
        assert_eq!(detect_subcommand(&model, &v(&["-u"])), (None, 0));
    }
}
