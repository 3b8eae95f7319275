//! Help Generator (spec 4.7): renders the three-region help text from the same
//! [`Declaration`] list the Bind engine consumes, without running it.
//!
//! Grounded on the teacher's `Printer` (`parser/printer.rs`): a column-width computed
//! over every line before any of them are emitted, then each row padded to it with
//! `format!("{:width$}", ...)`.

use crate::constant::{HELP_MESSAGE, HELP_NAME, HELP_SHORT, MAX_DESCRIPTION_LEN};
use crate::host::HostEnvironment;
use crate::model::{Declaration, Kind, Literal, Model, Pattern};
use crate::palette::{Palette, Role};

struct Row {
    left: String,
    middle: String,
    right: String,
}

fn truncate(s: &str) -> String {
    let count = s.chars().count();
    if count <= MAX_DESCRIPTION_LEN {
        s.to_string()
    } else {
        let head: String = s.chars().take(MAX_DESCRIPTION_LEN.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

fn left_column(pattern: Option<&Pattern>) -> String {
    match pattern {
        Some(Pattern::Both(c, long)) => format!("-{c}, --{long}"),
        Some(Pattern::Long(long)) => format!("    --{long}"),
        Some(Pattern::Short(c)) => format!("-{c}"),
        None => String::new(),
    }
}

fn literal_display(lit: &Literal) -> String {
    match lit {
        Literal::Str(s) => s.clone(),
        Literal::Int(i) => i.to_string(),
        Literal::Float(f) => f.to_string(),
        Literal::Bool(b) => b.to_string(),
    }
}

fn rows_for(decl: &Declaration, show_defaults: bool) -> Vec<Row> {
    let middle = match &decl.kind {
        Kind::Flag { .. } => "flag".to_string(),
        Kind::Scalar { ty } if decl.required => format!("<{ty}>"),
        Kind::Scalar { ty } => ty.to_string(),
        Kind::Vector { ty } => format!("[{ty}]"),
        Kind::Enum { .. } => "enum".to_string(),
        Kind::Switch { name, .. } => name.clone().unwrap_or_else(|| "switch".to_string()),
    };

    let suffix = if show_defaults {
        decl.default.as_ref().map(|lit| format!(" (def: {})", literal_display(lit)))
    } else {
        None
    };

    match &decl.kind {
        Kind::Switch { arms, .. } => arms
            .iter()
            .map(|arm| {
                let left = match arm.short {
                    Some(c) => format!("-{c}, --{}", arm.long),
                    None => format!("    --{}", arm.long),
                };
                let right = truncate(arm.help.as_deref().unwrap_or(""));
                Row { left, middle: middle.clone(), right }
            })
            .collect(),
        _ => {
            let mut right = truncate(decl.description.as_deref().unwrap_or(""));
            if let Some(s) = suffix {
                right.push_str(&s);
            }
            vec![Row { left: left_column(decl.pattern.as_ref()), middle, right }]
        }
    }
}

fn title_line(program: &str, selected: Option<&str>, model: &Model, palette: &Palette) -> String {
    let title = match selected {
        Some(name) => {
            let description = model.subcommand(name).map(|s| s.description.as_str()).unwrap_or("");
            if description.is_empty() {
                format!("{program} {name}")
            } else {
                format!("{program} {name}: {description}")
            }
        }
        None => match &model.configuration.summary {
            Some(summary) => format!("{program}: {summary}"),
            None => program.to_string(),
        },
    };
    palette.paint(Role::Accent, &title)
}

fn usage_line(program: &str, selected: Option<&str>, model: &Model, has_spare_marker: bool) -> String {
    let middle = match selected {
        Some(name) => name.to_string(),
        None if !model.subcommands.is_empty() => "COMMAND".to_string(),
        None => String::new(),
    };
    let mut line = format!("Usage: {program}");
    if !middle.is_empty() {
        line.push(' ');
        line.push_str(&middle);
    }
    line.push_str(" [OPTIONS]");
    if has_spare_marker {
        line.push_str(" [...]");
    }
    line
}

fn needs_spare(model: &Model, selected: Option<&str>) -> bool {
    match selected {
        Some(name) => model.subcommand(name).map(|s| s.needs_spare).unwrap_or(false),
        None => model.configuration.spare_args_required,
    }
}

/// Renders the help text for `model`, either the top-level view (`selected == None`) or
/// a subcommand's view.
pub(crate) fn render(
    model: &Model,
    selected: Option<&str>,
    palette: &Palette,
    program: &str,
    host: &HostEnvironment,
) -> String {
    let configuration = &model.configuration;
    let mut lines = Vec::new();

    lines.push(title_line(program, selected, model, palette));
    lines.push(usage_line(program, selected, model, needs_spare(model, selected)));

    if selected.is_none() && !model.subcommands.is_empty() {
        lines.push(String::new());
        lines.push("Available subcommands:".to_string());
        let width = model.subcommands.iter().map(|s| s.name.len()).max().unwrap_or(0);
        for sub in &model.subcommands {
            let name = palette.paint(Role::Command, &sub.name);
            lines.push(format!("  {:width$}  {}", name, sub.description, width = width));
        }
    }

    let mut rows: Vec<Row> = model
        .active_declarations(selected)
        .into_iter()
        .flat_map(|decl| rows_for(decl, configuration.show_defaults))
        .collect();

    if configuration.help_enabled {
        rows.push(Row {
            left: format!("-{HELP_SHORT}, --{HELP_NAME}"),
            middle: "flag".to_string(),
            right: HELP_MESSAGE.to_string(),
        });
    }

    if !rows.is_empty() {
        lines.push(String::new());
        lines.push("Options:".to_string());
        let left_width = rows.iter().map(|r| r.left.chars().count()).max().unwrap_or(0);
        let middle_width = rows.iter().map(|r| r.middle.chars().count()).max().unwrap_or(0);
        for row in &rows {
            let padded_left = format!("{:width$}", row.left, width = left_width);
            let left = palette.paint(Role::Required, &padded_left);
            lines.push(format!(
                "  {left}  {:mw$}  {}",
                row.middle,
                row.right,
                mw = middle_width,
            ));
        }
    }

    if selected.is_none() {
        if let Some(source) = &configuration.epilog_source {
            if let Some(epilog) = host.epilog(source) {
                lines.push(String::new());
                let accent = palette.paint(Role::Accent, "");
                let accent_code = accent.trim_end_matches("\x1b[0m");
                for line in epilog {
                    lines.push(line.replace("{acc}", accent_code));
                }
            }
        }
    }

    lines.join("\n")
}
