//! Completion Generator (spec 4.8): the TSV and `nucomp`-JSON shell-completion streams,
//! both built from the same suggestion list over the declaration set.

use crate::constant::HELP_MESSAGE;
use crate::model::{Declaration, Kind, Model, Pattern};

/// `color_code` per spec 4.8: `0` subcommand, `1` optional flag, `2` required flag,
/// `3` enum value.
struct Suggestion {
    value: String,
    color: u8,
    description: String,
}

/// The `fg` name the `nucomp` JSON adapter assigns each `color_code`. The spec leaves the
/// concrete name unspecified ("fg names chosen by color_code"); this crate picks one
/// fixed mapping (see DESIGN.md).
fn fg_name(color: u8) -> &'static str {
    match color {
        0 => "green",
        1 => "blue",
        2 => "yellow",
        _ => "magenta",
    }
}

fn candidates_for(decl: &Declaration) -> Vec<(String, String)> {
    match &decl.kind {
        Kind::Switch { arms, .. } => arms
            .iter()
            .flat_map(|arm| {
                let desc = arm.help.clone().unwrap_or_default();
                let mut v = Vec::new();
                if let Some(c) = arm.short {
                    v.push((format!("-{c}"), desc.clone()));
                }
                v.push((format!("--{}", arm.long), desc));
                v
            })
            .collect(),
        _ => {
            let desc = decl.description.clone().unwrap_or_default();
            decl.pattern
                .as_ref()
                .map(Pattern::flag_tokens)
                .unwrap_or_default()
                .into_iter()
                .map(|t| (t, desc.clone()))
                .collect()
        }
    }
}

fn declaration_is_used(decl: &Declaration, prior: &[String]) -> bool {
    decl.flag_tokens().iter().any(|t| prior.iter().any(|p| p == t))
}

/// Whether `token`'s shape (short `-x` vs long `--xyz`) is still a candidate given what
/// the user has typed so far of `current` (spec 4.8: "`--` suppresses short, a lone `-`
/// suppresses long").
fn shape_ok(token: &str, current: &str) -> bool {
    let is_long = token.starts_with("--");
    if current.starts_with("--") {
        is_long
    } else if current.starts_with('-') {
        !is_long
    } else {
        true
    }
}

fn enum_choice_suggestions(model: &Model, selected: Option<&str>, previous: &str, current: &str) -> Vec<Suggestion> {
    for decl in model.active_declarations(selected) {
        let Kind::Enum { choices } = &decl.kind else { continue };
        let tokens = decl.pattern.as_ref().map(Pattern::flag_tokens).unwrap_or_default();
        if tokens.iter().any(|t| t == previous) {
            return choices
                .iter()
                .filter(|c| c.starts_with(current))
                .map(|c| Suggestion { value: c.clone(), color: 3, description: String::new() })
                .collect();
        }
    }
    Vec::new()
}

fn build_suggestions(model: &Model, user_argv: &[String]) -> Vec<Suggestion> {
    let n = user_argv.len();
    let current = user_argv.last().cloned().unwrap_or_default();
    let prior: &[String] = if n == 0 { &[] } else { &user_argv[..n - 1] };

    let mut out = Vec::new();

    if !model.subcommands.is_empty() && n == 1 {
        for sub in &model.subcommands {
            if sub.name.starts_with(&current) {
                out.push(Suggestion { value: sub.name.clone(), color: 0, description: sub.description.clone() });
            }
        }
        if model.configuration.subcommand_required && current.starts_with('-') && model.configuration.help_enabled {
            out.push(Suggestion { value: "-h".to_string(), color: 1, description: HELP_MESSAGE.to_string() });
            out.push(Suggestion { value: "--help".to_string(), color: 1, description: HELP_MESSAGE.to_string() });
        }
        return out;
    }

    let selected = if model.subcommands.is_empty() {
        None
    } else {
        prior.first().and_then(|t| model.subcommand(t)).map(|s| s.name.clone())
    };

    for decl in model.active_declarations(selected.as_deref()) {
        if declaration_is_used(decl, prior) {
            continue;
        }
        for (token, description) in candidates_for(decl) {
            if token.starts_with(&current) && shape_ok(&token, &current) {
                let color = if decl.required { 2 } else { 1 };
                out.push(Suggestion { value: token, color, description: description.clone() });
            }
        }
    }

    if let Some(previous) = prior.last() {
        out.extend(enum_choice_suggestions(model, selected.as_deref(), previous, &current));
    }

    out
}

fn render_tsv(suggestions: &[Suggestion]) -> String {
    suggestions
        .iter()
        .map(|s| format!("{}\t{}\t{}", s.value, s.color, s.description))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_nucomp(suggestions: &[Suggestion]) -> String {
    let items: Vec<serde_json::Value> = suggestions
        .iter()
        .map(|s| {
            serde_json::json!({
                "value": s.value,
                "display": s.value,
                "description": s.description,
                "style": { "fg": fg_name(s.color) },
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}

/// Renders the completion stream for `user_argv` (the caller's in-progress tokens, not
/// including the `@nucomp`/`@tsvcomp` marker or the program name). `json` selects the
/// `nucomp`-shaped adapter; otherwise the raw TSV form is produced.
pub(crate) fn render(model: &Model, user_argv: &[String], json: bool) -> String {
    let suggestions = build_suggestions(model, user_argv);
    if json {
        render_nucomp(&suggestions)
    } else {
        render_tsv(&suggestions)
    }
}
