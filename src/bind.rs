//! Bind & Validate Engine (spec 4.5): applies each active [`Declaration`] against the
//! [`FlagIndex`] built over normalized argv, producing typed [`Value`]s and the set of
//! argv slots each successful bind consumed.

use std::collections::{HashMap, HashSet};

use crate::error::{BindError, Error, ErrorContext};
use crate::index::FlagIndex;
use crate::model::{Declaration, Kind, Literal, Model, Pattern, ScalarType, SwitchArm};
use crate::numeric::{self, NumLiteral, NumericError};
use crate::output::Value;

/// Everything the rest of the pipeline needs out of a successful bind pass.
pub(crate) struct BindResult {
    pub(crate) bindings: HashMap<String, Value>,
    pub(crate) was_set: HashMap<String, bool>,
    pub(crate) taken: HashSet<usize>,
}

/// Runs the Bind & Validate Engine over every declaration active in `selected`'s scope.
pub(crate) fn bind(
    model: &Model,
    argv: &[String],
    index: &FlagIndex,
    selected: Option<&str>,
) -> Result<BindResult, Error> {
    let mut bindings = HashMap::new();
    let mut was_set = HashMap::new();
    let mut taken = HashSet::new();

    for decl in model.active_declarations(selected) {
        let (value, set, mut decl_taken) =
            bind_one(decl, argv, index, model.configuration.allow_empty_values)
                .map_err(|e| Error::bind(e, end_context(argv)))?;
        taken.append(&mut decl_taken);
        was_set.insert(decl.binding.clone(), set);
        bindings.insert(decl.binding.clone(), value);
    }

    Ok(BindResult { bindings, was_set, taken })
}

fn end_context(argv: &[String]) -> ErrorContext {
    ErrorContext::new(argv.len(), argv)
}

fn slot_context(argv: &[String], slot: usize) -> ErrorContext {
    ErrorContext::new(slot.min(argv.len()), argv)
}

fn merged_occurrences(index: &FlagIndex, tokens: &[String]) -> Vec<usize> {
    let mut slots: Vec<usize> = tokens
        .iter()
        .flat_map(|t| index.slots_for(t).iter().copied())
        .collect();
    slots.sort_unstable();
    slots
}

/// The value-slot's content, plus every argv index the extraction consumed (the flag
/// slot itself is NOT included here - callers add it separately).
fn take_value<'a>(argv: &'a [String], slot: usize, flag: &str) -> Result<(&'a str, Vec<usize>), (BindError, usize)> {
    if slot >= argv.len() {
        return Err((BindError::MissingValue { flag: flag.to_string() }, slot));
    }
    let tok = &argv[slot];
    if tok == "--" {
        if slot + 1 >= argv.len() {
            return Err((BindError::MissingValue { flag: flag.to_string() }, slot));
        }
        return Ok((&argv[slot + 1], vec![slot, slot + 1]));
    }
    if tok.starts_with('-') && tok != "-" {
        return Err((
            BindError::ParamLikeValue { flag: flag.to_string(), value: tok.clone() },
            slot,
        ));
    }
    Ok((tok.as_str(), vec![slot]))
}

fn coerce(raw: &str, ty: ScalarType, binding: &str) -> Result<Value, BindError> {
    match ty {
        ScalarType::Str => Ok(Value::Str(raw.to_string())),
        ScalarType::Int => numeric::parse_int(raw).map(Value::Int).map_err(|e| numeric_error(e, raw, binding, "int")),
        ScalarType::Float => numeric::parse_float(raw)
            .map(Value::Float)
            .map_err(|e| numeric_error(e, raw, binding, "float")),
        ScalarType::Num => numeric::parse_num(raw)
            .map(|n| match n {
                NumLiteral::Int(i) => Value::Int(i),
                NumLiteral::Float(f) => Value::Float(f),
            })
            .map_err(|e| numeric_error(e, raw, binding, "num")),
    }
}

fn numeric_error(e: NumericError, value: &str, binding: &str, ty: &str) -> BindError {
    match e {
        NumericError::TypeMismatch => BindError::TypeMismatch {
            binding: binding.to_string(),
            value: value.to_string(),
            ty: ty.to_string(),
        },
        NumericError::UnknownFormat => BindError::UnknownFormat {
            binding: binding.to_string(),
            value: value.to_string(),
            ty: ty.to_string(),
        },
    }
}

fn literal_to_value(lit: &Literal) -> Value {
    match lit {
        Literal::Str(s) => Value::Str(s.clone()),
        Literal::Int(i) => Value::Int(*i),
        Literal::Float(f) => Value::Float(*f),
        Literal::Bool(b) => Value::Bool(*b),
    }
}

fn scalar_default(decl: &Declaration, ty: ScalarType) -> Value {
    match &decl.default {
        Some(lit) => literal_to_value(lit),
        None => match ty {
            ScalarType::Str => Value::Str(String::new()),
            ScalarType::Int | ScalarType::Num => Value::Int(0),
            ScalarType::Float => Value::Float(0.0),
        },
    }
}

/// Binds a single declaration, returning its value, whether argv actually set it, and
/// the argv indices it consumed. The caller maps errors into an [`ErrorContext`]-wrapped
/// `Error::Bind` pointing at the offending argv slot.
fn bind_one(
    decl: &Declaration,
    argv: &[String],
    index: &FlagIndex,
    allow_empty_values: bool,
) -> Result<(Value, bool, HashSet<usize>), (BindError, usize)> {
    let mut taken = HashSet::new();

    let (value, set) = match &decl.kind {
        Kind::Flag { default } => {
            let tokens = decl.pattern.as_ref().map(Pattern::flag_tokens).unwrap_or_default();
            let occurrences = merged_occurrences(index, &tokens);
            for slot in &occurrences {
                taken.insert(slot - 1);
            }
            if occurrences.is_empty() {
                (Value::Bool(*default), false)
            } else {
                (Value::Bool(!*default), true)
            }
        }

        Kind::Scalar { ty } => {
            let tokens = decl.pattern.as_ref().map(Pattern::flag_tokens).unwrap_or_default();
            let flag_label = tokens.last().cloned().unwrap_or_default();
            let occurrences = merged_occurrences(index, &tokens);

            if occurrences.is_empty() {
                if decl.required {
                    return Err((BindError::MissingRequired { binding: decl.binding.clone() }, argv.len()));
                }
                (scalar_default(decl, *ty), false)
            } else {
                let slot = *occurrences.last().unwrap();
                taken.insert(slot - 1);
                let (raw, extra) = take_value(argv, slot, &flag_label)?;
                let value = coerce(raw, *ty, &decl.binding).map_err(|e| (e, slot))?;
                taken.extend(extra);
                (value, true)
            }
        }

        Kind::Vector { ty } => {
            let tokens = decl.pattern.as_ref().map(Pattern::flag_tokens).unwrap_or_default();
            let flag_label = tokens.last().cloned().unwrap_or_default();
            let occurrences = merged_occurrences(index, &tokens);

            if occurrences.is_empty() {
                if decl.required {
                    return Err((BindError::MissingRequired { binding: decl.binding.clone() }, argv.len()));
                }
                (Value::List(Vec::new()), false)
            } else {
                let mut items = Vec::with_capacity(occurrences.len());
                for slot in &occurrences {
                    taken.insert(slot - 1);
                    let (raw, extra) = take_value(argv, *slot, &flag_label)?;
                    let value = coerce(raw, *ty, &decl.binding).map_err(|e| (e, *slot))?;
                    taken.extend(extra);
                    items.push(value);
                }
                (Value::List(items), true)
            }
        }

        Kind::Enum { choices } => {
            let tokens = decl.pattern.as_ref().map(Pattern::flag_tokens).unwrap_or_default();
            let flag_label = tokens.last().cloned().unwrap_or_default();
            let occurrences = merged_occurrences(index, &tokens);

            if occurrences.is_empty() {
                if decl.required {
                    return Err((BindError::MissingRequired { binding: decl.binding.clone() }, argv.len()));
                }
                let default = match &decl.default {
                    Some(Literal::Str(s)) => s.clone(),
                    _ => choices[0].clone(),
                };
                (Value::Str(default), false)
            } else {
                let slot = *occurrences.last().unwrap();
                taken.insert(slot - 1);
                let (raw, extra) = take_value(argv, slot, &flag_label)?;
                if !choices.iter().any(|c| c == raw) {
                    return Err((
                        BindError::InvalidChoice {
                            binding: decl.binding.clone(),
                            value: raw.to_string(),
                            choices: choices.clone(),
                        },
                        slot,
                    ));
                }
                taken.extend(extra);
                (Value::Str(raw.to_string()), true)
            }
        }

        Kind::Switch { arms, .. } => {
            let mut picked: Option<(&SwitchArm, Vec<usize>)> = None;
            for arm in arms {
                let tokens = arm_tokens(arm);
                let occurrences = merged_occurrences(index, &tokens);
                if !occurrences.is_empty() {
                    let flag_indices: Vec<usize> = occurrences.iter().map(|s| s - 1).collect();
                    picked = Some((arm, flag_indices));
                    break;
                }
            }

            match picked {
                Some((arm, flag_indices)) => {
                    taken.extend(flag_indices);
                    (Value::Str(arm.value.clone()), true)
                }
                None => {
                    if decl.required {
                        return Err((BindError::MissingRequired { binding: decl.binding.clone() }, argv.len()));
                    }
                    let default = match &decl.default {
                        Some(Literal::Str(s)) => s.clone(),
                        _ => "0".to_string(),
                    };
                    (Value::Str(default), false)
                }
            }
        }
    };

    if decl.required && !allow_empty_values && value.is_empty_string() {
        return Err((BindError::MissingRequired { binding: decl.binding.clone() }, argv.len()));
    }

    Ok((value, set, taken))
}

fn arm_tokens(arm: &SwitchArm) -> Vec<String> {
    let mut v = Vec::new();
    if let Some(c) = arm.short {
        v.push(format!("-{c}"));
    }
    v.push(format!("--{}", arm.long));
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Configuration, Scope};
    use assert_matches::assert_matches;

    fn v(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    fn model_of(declarations: Vec<Declaration>) -> Model {
        Model {
            always: false,
            configuration: Configuration::default(),
            subcommands: Vec::new(),
            declarations,
        }
    }

    fn flag(binding: &str, pattern: Pattern, default: bool) -> Declaration {
        Declaration {
            scope: Scope::GlobalAlways,
            required: false,
            kind: Kind::Flag { default },
            pattern: Some(pattern),
            default: None,
            binding: binding.to_string(),
            description: None,
        }
    }

    fn scalar(binding: &str, pattern: Pattern, ty: ScalarType, required: bool) -> Declaration {
        Declaration {
            scope: Scope::GlobalAlways,
            required,
            kind: Kind::Scalar { ty },
            pattern: Some(pattern),
            default: None,
            binding: binding.to_string(),
            description: None,
        }
    }

    #[test]
    fn bundling_scenario_one() {
        let model = model_of(vec![
            flag("A", Pattern::Both('a', "alpha".to_string()), false),
            flag("B", Pattern::Both('b', "beta".to_string()), false),
            scalar("C", Pattern::Both('c', "cat".to_string()), ScalarType::Str, false),
        ]);
        let argv = v(&["-a", "-b", "-c", "value"]);
        let index = crate::index::build(&argv);
        let result = bind(&model, &argv, &index, None).unwrap();
        assert_eq!(result.bindings["A"], Value::Bool(true));
        assert_eq!(result.bindings["B"], Value::Bool(true));
        assert_eq!(result.bindings["C"], Value::Str("value".to_string()));
        assert_eq!(result.taken, HashSet::from([0, 1, 2, 3]));
    }

    #[test]
    fn attached_numeric_scenario_two() {
        let model = model_of(vec![scalar(
            "T",
            Pattern::Both('t', "times".to_string()),
            ScalarType::Int,
            false,
        )]);
        let argv = v(&["-t", "2"]);
        let index = crate::index::build(&argv);
        let result = bind(&model, &argv, &index, None).unwrap();
        assert_eq!(result.bindings["T"], Value::Int(2));
        assert!(result.was_set["T"]);
    }

    #[test]
    fn last_occurrence_wins_for_scalars() {
        let model = model_of(vec![scalar(
            "C",
            Pattern::Both('c', "cat".to_string()),
            ScalarType::Str,
            false,
        )]);
        let argv = v(&["-c", "first", "-c", "second"]);
        let index = crate::index::build(&argv);
        let result = bind(&model, &argv, &index, None).unwrap();
        assert_eq!(result.bindings["C"], Value::Str("second".to_string()));
    }

    #[test]
    fn escape_scenario_six() {
        let model = model_of(vec![scalar(
            "O",
            Pattern::Both('o', "out".to_string()),
            ScalarType::Str,
            false,
        )]);
        let argv = v(&["-o", "--", "--weird"]);
        let index = crate::index::build(&argv);
        let result = bind(&model, &argv, &index, None).unwrap();
        assert_eq!(result.bindings["O"], Value::Str("--weird".to_string()));
        assert_eq!(result.taken, HashSet::from([0, 1, 2]));
    }

    #[test]
    fn param_like_value_without_escape_is_an_error() {
        let model = model_of(vec![scalar(
            "O",
            Pattern::Both('o', "out".to_string()),
            ScalarType::Str,
            false,
        )]);
        let argv = v(&["-o", "--weird"]);
        let index = crate::index::build(&argv);
        let err = bind(&model, &argv, &index, None).unwrap_err();
        assert_matches!(err, Error::Bind { source: BindError::ParamLikeValue { .. }, .. });
    }

    #[test]
    fn missing_required_scalar_errors() {
        let model = model_of(vec![scalar(
            "O",
            Pattern::Both('o', "out".to_string()),
            ScalarType::Str,
            true,
        )]);
        let argv = v(&[]);
        let index = crate::index::build(&argv);
        let err = bind(&model, &argv, &index, None).unwrap_err();
        assert_matches!(err, Error::Bind { source: BindError::MissingRequired { .. }, .. });
    }

    #[test]
    fn enum_validation_scenario_three() {
        let decl = Declaration {
            scope: Scope::GlobalAlways,
            required: false,
            kind: Kind::Enum {
                choices: vec!["debug", "info", "warn", "error"].into_iter().map(String::from).collect(),
            },
            pattern: Some(Pattern::Long("level".to_string())),
            default: None,
            binding: "L".to_string(),
            description: None,
        };
        let model = model_of(vec![decl]);

        let argv = v(&["--level", "warn"]);
        let index = crate::index::build(&argv);
        let result = bind(&model, &argv, &index, None).unwrap();
        assert_eq!(result.bindings["L"], Value::Str("warn".to_string()));

        let argv = v(&["--level", "nope"]);
        let index = crate::index::build(&argv);
        let err = bind(&model, &argv, &index, None).unwrap_err();
        assert_matches!(err, Error::Bind { source: BindError::InvalidChoice { .. }, .. });
    }

    #[test]
    fn switch_scenario_four() {
        let decl = Declaration {
            scope: Scope::GlobalAlways,
            required: true,
            kind: Kind::Switch {
                name: None,
                arms: vec![
                    SwitchArm { short: Some('l'), long: "list".to_string(), value: "list".to_string(), help: None },
                    SwitchArm { short: Some('g'), long: "get".to_string(), value: "download".to_string(), help: None },
                    SwitchArm { short: Some('r'), long: "remove".to_string(), value: "remove".to_string(), help: None },
                ],
            },
            pattern: None,
            default: None,
            binding: "MODE".to_string(),
            description: None,
        };
        let model = model_of(vec![decl]);

        let argv = v(&["-g"]);
        let index = crate::index::build(&argv);
        let result = bind(&model, &argv, &index, None).unwrap();
        assert_eq!(result.bindings["MODE"], Value::Str("download".to_string()));

        let argv = v(&[]);
        let index = crate::index::build(&argv);
        let err = bind(&model, &argv, &index, None).unwrap_err();
        assert_matches!(err, Error::Bind { source: BindError::MissingRequired { .. }, .. });
    }

    #[test]
    fn enum_uses_explicit_default_when_absent() {
        let decl = Declaration {
            scope: Scope::GlobalAlways,
            required: false,
            kind: Kind::Enum {
                choices: vec!["debug", "info", "warn", "error"].into_iter().map(String::from).collect(),
            },
            pattern: Some(Pattern::Long("level".to_string())),
            default: Some(Literal::Str("warn".to_string())),
            binding: "L".to_string(),
            description: None,
        };
        let model = model_of(vec![decl]);
        let argv = v(&[]);
        let index = crate::index::build(&argv);
        let result = bind(&model, &argv, &index, None).unwrap();
        assert_eq!(result.bindings["L"], Value::Str("warn".to_string()));
        assert!(!result.was_set["L"]);
    }

    #[test]
    fn switch_uses_explicit_default_when_absent_and_not_required() {
        let decl = Declaration {
            scope: Scope::GlobalAlways,
            required: false,
            kind: Kind::Switch {
                name: None,
                arms: vec![
                    SwitchArm { short: Some('l'), long: "list".to_string(), value: "list".to_string(), help: None },
                    SwitchArm { short: Some('g'), long: "get".to_string(), value: "download".to_string(), help: None },
                ],
            },
            pattern: None,
            default: Some(Literal::Str("download".to_string())),
            binding: "MODE".to_string(),
            description: None,
        };
        let model = model_of(vec![decl]);
        let argv = v(&[]);
        let index = crate::index::build(&argv);
        let result = bind(&model, &argv, &index, None).unwrap();
        assert_eq!(result.bindings["MODE"], Value::Str("download".to_string()));
        assert!(!result.was_set["MODE"]);
    }

    #[test]
    fn vector_preserves_argv_order() {
        let decl = Declaration {
            scope: Scope::GlobalAlways,
            required: false,
            kind: Kind::Vector { ty: ScalarType::Str },
            pattern: Some(Pattern::Both('n', "name".to_string())),
            default: None,
            binding: "N".to_string(),
            description: None,
        };
        let model = model_of(vec![decl]);
        let argv = v(&["-n", "first", "-n", "second", "--name", "third"]);
        let index = crate::index::build(&argv);
        let result = bind(&model, &argv, &index, None).unwrap();
        assert_eq!(
            result.bindings["N"],
            Value::List(vec![
                Value::Str("first".to_string()),
                Value::Str("second".to_string()),
                Value::Str("third".to_string()),
            ])
        );
    }

    #[test]
    fn trailing_flag_with_no_value_is_missing_value() {
        let model = model_of(vec![scalar(
            "O",
            Pattern::Both('o', "out".to_string()),
            ScalarType::Str,
            false,
        )]);
        let argv = v(&["-o"]);
        let index = crate::index::build(&argv);
        let err = bind(&model, &argv, &index, None).unwrap_err();
        assert_matches!(err, Error::Bind { source: BindError::MissingValue { .. }, .. });
    }
}
