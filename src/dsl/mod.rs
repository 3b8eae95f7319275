//! Definition Parser (spec 4.1): turns DSL text into a validated [`crate::model::Model`].
//!
//! [`mod@lexer`] tokenizes, [`parser`] recognizes the grammar, and [`compile`] layers the
//! invariant checks from spec 3 (unique bindings/patterns per scope, reserved binding
//! names, non-empty enum choices) on top of what the grammar alone can't express.

pub(crate) mod lexer;
mod parser;

use std::collections::HashSet;

use crate::error::DslError;
use crate::model::{reserved_or_dynamic, Kind, Model, Scope};

/// Compiles `source` into a fully validated [`Model`].
pub(crate) fn compile(source: &str) -> Result<Model, DslError> {
    let (always, stripped) = lexer::strip_directive_and_comments(source);
    let tokens = lexer::lex(&stripped).map_err(|e| DslError::DslSyntax {
        line: e.line,
        detail: e.detail,
        last_matched: None,
    })?;

    let mut model = parser::Parser::new(tokens).parse_file()?;
    model.always = always;

    validate(&model)?;
    Ok(model)
}

fn is_valid_binding_syntax(binding: &str) -> bool {
    let mut chars = binding.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate(model: &Model) -> Result<(), DslError> {
    for decl in &model.declarations {
        if !is_valid_binding_syntax(&decl.binding) {
            return Err(DslError::DslSyntax {
                line: 0,
                detail: format!(
                    "binding `{}` must match [A-Za-z][A-Za-z0-9_]*",
                    decl.binding
                ),
                last_matched: Some(decl.binding.clone()),
            });
        }
        if reserved_or_dynamic(&decl.binding, &model.configuration) {
            return Err(DslError::IllegalBinding { binding: decl.binding.clone() });
        }
        if let Kind::Enum { choices } = &decl.kind {
            if choices.is_empty() {
                return Err(DslError::DslSyntax {
                    line: 0,
                    detail: format!("enum declaration `{}` has no choices", decl.binding),
                    last_matched: Some(decl.binding.clone()),
                });
            }
            if let Some(default) = &decl.default {
                let is_valid = matches!(default, crate::model::Literal::Str(s) if choices.contains(s));
                if !is_valid {
                    return Err(DslError::DslSyntax {
                        line: 0,
                        detail: format!(
                            "default for enum declaration `{}` must be one of its choices",
                            decl.binding
                        ),
                        last_matched: Some(decl.binding.clone()),
                    });
                }
            }
        }
        if let Kind::Switch { arms, .. } = &decl.kind {
            let mut shorts = HashSet::new();
            let mut longs = HashSet::new();
            for arm in arms {
                if let Some(c) = arm.short {
                    if !shorts.insert(c) {
                        return Err(DslError::DuplicatePattern {
                            pattern: format!("-{c}"),
                            scope: scope_label(&decl.scope),
                        });
                    }
                }
                if !longs.insert(arm.long.clone()) {
                    return Err(DslError::DuplicatePattern {
                        pattern: format!("--{}", arm.long),
                        scope: scope_label(&decl.scope),
                    });
                }
            }
            if let Some(default) = &decl.default {
                if !matches!(default, crate::model::Literal::Str(_)) {
                    return Err(DslError::DslSyntax {
                        line: 0,
                        detail: format!("default for switch declaration `{}` must be a string", decl.binding),
                        last_matched: Some(decl.binding.clone()),
                    });
                }
            }
        }
    }

    let mut scopes: Vec<Option<&str>> = vec![None];
    scopes.extend(model.subcommands.iter().map(|s| Some(s.name.as_str())));

    for scope in scopes {
        let active = model.active_declarations(scope);

        let mut bindings = HashSet::new();
        for decl in &active {
            if !bindings.insert(decl.binding.as_str()) {
                return Err(DslError::DuplicateBinding {
                    binding: decl.binding.clone(),
                    scope: scope.map(str::to_string).unwrap_or_else(|| "global".to_string()),
                });
            }
        }

        let mut shorts = HashSet::new();
        let mut longs = HashSet::new();
        for decl in active.iter().filter(|d| !matches!(d.kind, Kind::Switch { .. })) {
            let Some(pattern) = &decl.pattern else { continue };
            if let Some(c) = pattern.short() {
                if !shorts.insert(c) {
                    return Err(DslError::DuplicatePattern {
                        pattern: format!("-{c}"),
                        scope: scope.map(str::to_string).unwrap_or_else(|| "global".to_string()),
                    });
                }
            }
            if let Some(name) = pattern.long() {
                if !longs.insert(name.to_string()) {
                    return Err(DslError::DuplicatePattern {
                        pattern: format!("--{name}"),
                        scope: scope.map(str::to_string).unwrap_or_else(|| "global".to_string()),
                    });
                }
            }
        }
    }

    Ok(())
}

fn scope_label(scope: &Scope) -> String {
    match scope {
        Scope::GlobalAlways => "global".to_string(),
        Scope::GlobalOnly => "global-only".to_string(),
        Scope::Subcommand(name) => name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn compiles_minimal_program() {
        let model = compile(r#"meta { program_name: "demo" } a/alpha :flag => A"#).unwrap();
        assert_eq!(model.declarations.len(), 1);
        assert_eq!(model.configuration.program_name, Some("demo".to_string()));
    }

    #[test]
    fn always_directive_is_recorded() {
        let model = compile("#[always]\na/alpha :flag => A").unwrap();
        assert!(model.always);
    }

    #[test]
    fn rejects_reserved_binding_name() {
        let err = compile("a/alpha :flag => PATH").unwrap_err();
        assert_matches!(err, DslError::IllegalBinding { binding } if binding == "PATH");
    }

    #[test]
    fn rejects_duplicate_binding_in_same_scope() {
        let err = compile("a/alpha :flag => A\nb/beta :str => A").unwrap_err();
        assert_matches!(err, DslError::DuplicateBinding { .. });
    }

    #[test]
    fn rejects_duplicate_short_pattern_in_same_scope() {
        let err = compile("a/alpha :flag => A\na/apple :str => B").unwrap_err();
        assert_matches!(err, DslError::DuplicatePattern { .. });
    }

    #[test]
    fn allows_same_short_pattern_across_disjoint_subcommand_scopes() {
        let model = compile(
            "commands { install: \"i\" remove: \"r\" }\n@install u/update :flag => U\n@remove u/undo :flag => X",
        )
        .unwrap();
        assert_eq!(model.declarations.len(), 2);
    }

    #[test]
    fn rejects_empty_enum_choices() {
        let err = compile("l/level [] => L").unwrap_err();
        assert_matches!(err, DslError::DslSyntax { .. });
    }

    #[test]
    fn accepts_enum_default_among_choices() {
        let model = compile(r#"l/level ["debug" "info" "warn"] "warn" => L"#).unwrap();
        assert_eq!(
            model.declarations[0].default,
            Some(crate::model::Literal::Str("warn".to_string()))
        );
    }

    #[test]
    fn rejects_enum_default_not_among_choices() {
        let err = compile(r#"l/level ["debug" "info" "warn"] "nope" => L"#).unwrap_err();
        assert_matches!(err, DslError::DslSyntax { .. });
    }

    #[test]
    fn rejects_non_string_switch_default() {
        let err = compile(r#"{l/list:"list" g/get:"download"} 7 => MODE"#).unwrap_err();
        assert_matches!(err, DslError::DslSyntax { .. });
    }
}
