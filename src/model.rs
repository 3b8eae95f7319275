//! The normalized form of a parsed DSL: [`Declaration`], [`Configuration`] and [`Subcommand`].
//!
//! Nothing in this module reads DSL text or argv - it is the data produced by
//! `crate::dsl` and consumed by `crate::bind`, `crate::help` and `crate::completion`.

use std::collections::HashMap;

/// The base numeric/string type carried by a `Scalar` or `Vector` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Str,
    Int,
    Float,
    /// `num`: accepts either an [`ScalarType::Int`] or [`ScalarType::Float`] literal.
    Num,
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScalarType::Str => "str",
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::Num => "num",
        };
        write!(f, "{s}")
    }
}

/// One arm of a [`Kind::Switch`] declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchArm {
    pub short: Option<char>,
    pub long: String,
    pub value: String,
    pub help: Option<String>,
}

/// The tagged variant of a declaration's value shape (spec 3).
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Flag { default: bool },
    Scalar { ty: ScalarType },
    Vector { ty: ScalarType },
    /// Invariant: `choices` is never empty. The first choice is the implicit default.
    Enum { choices: Vec<String> },
    /// Invariant: arms have pairwise distinct short chars and pairwise distinct long names.
    Switch { name: Option<String>, arms: Vec<SwitchArm> },
}

impl Kind {
    /// Whether this kind accumulates 0..N occurrences (vs. a single last-write-wins value).
    pub(crate) fn is_vector(&self) -> bool {
        matches!(self, Kind::Vector { .. })
    }

    /// The type annotation word shown in help's middle column (spec 4.7).
    pub(crate) fn type_annotation(&self) -> String {
        match self {
            Kind::Flag { .. } => "flag".to_string(),
            Kind::Scalar { ty } => ty.to_string(),
            Kind::Vector { ty } => format!("[{ty}]"),
            Kind::Enum { .. } => "enum".to_string(),
            Kind::Switch { name, .. } => name.clone().unwrap_or_else(|| "switch".to_string()),
        }
    }
}

/// The pattern by which a non-switch declaration, or a switch arm, is matched on argv.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    Short(char),
    Long(String),
    Both(char, String),
}

impl Pattern {
    pub(crate) fn short(&self) -> Option<char> {
        match self {
            Pattern::Short(c) | Pattern::Both(c, _) => Some(*c),
            Pattern::Long(_) => None,
        }
    }

    pub(crate) fn long(&self) -> Option<&str> {
        match self {
            Pattern::Long(name) | Pattern::Both(_, name) => Some(name.as_str()),
            Pattern::Short(_) => None,
        }
    }

    /// The canonical `--long`/`-s` flag tokens this pattern answers to on argv.
    pub(crate) fn flag_tokens(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(c) = self.short() {
            out.push(format!("-{c}"));
        }
        if let Some(name) = self.long() {
            out.push(format!("--{name}"));
        }
        out
    }
}

/// A literal default value, typed by its origin in the DSL (spec 3: "optional literal").
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// Where a declaration applies (spec 3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// DSL `@` with no name: applies only when no subcommand was selected.
    GlobalOnly,
    /// DSL: no scope prefix at all: applies whether or not a subcommand was selected.
    GlobalAlways,
    /// DSL `@name`: applies only under the named subcommand.
    Subcommand(String),
}

/// The normalized form of one DSL option declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub scope: Scope,
    pub required: bool,
    pub kind: Kind,
    /// `None` for switch declarations (the pattern lives inside each arm).
    pub pattern: Option<Pattern>,
    pub default: Option<Literal>,
    pub binding: String,
    pub description: Option<String>,
}

impl Declaration {
    /// Whether `scope` is active given the currently selected subcommand (or none).
    pub(crate) fn active_in(&self, selected: Option<&str>) -> bool {
        match (&self.scope, selected) {
            (Scope::GlobalAlways, _) => true,
            (Scope::GlobalOnly, None) => true,
            (Scope::GlobalOnly, Some(_)) => false,
            (Scope::Subcommand(name), Some(selected)) => name == selected,
            (Scope::Subcommand(_), None) => false,
        }
    }

    /// All flag tokens (`-s`/`--long`) this declaration answers to, across all its
    /// patterns (a switch contributes one set of tokens per arm).
    pub(crate) fn flag_tokens(&self) -> Vec<String> {
        match &self.kind {
            Kind::Switch { arms, .. } => arms
                .iter()
                .flat_map(|arm| {
                    let mut v = Vec::new();
                    if let Some(c) = arm.short {
                        v.push(format!("-{c}"));
                    }
                    v.push(format!("--{}", arm.long));
                    v
                })
                .collect(),
            _ => self
                .pattern
                .as_ref()
                .map(Pattern::flag_tokens)
                .unwrap_or_default(),
        }
    }
}

/// A subcommand entry from the DSL `commands { ... }` block (spec 3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcommand {
    pub name: String,
    pub description: String,
    /// DSL `*` prefix: this subcommand requires at least one spare argument.
    pub needs_spare: bool,
}

/// The resolved `meta { ... }` block, with every recognized key defaulted (spec 3).
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub program_name: Option<String>,
    pub summary: Option<String>,
    pub color_palette: Option<String>,
    pub on_error_hook: Option<String>,
    pub epilog_source: Option<String>,
    pub spare_args_binding: String,
    pub spare_args_required: bool,
    pub subcommand_required: bool,
    pub allow_empty_values: bool,
    pub show_defaults: bool,
    pub help_enabled: bool,
    pub completion_enabled: bool,
    pub quiet_exit: bool,
    pub use_stderr: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            program_name: None,
            summary: None,
            color_palette: None,
            on_error_hook: None,
            epilog_source: None,
            spare_args_binding: crate::constant::DEFAULT_SPARE_ARGS_BINDING.to_string(),
            spare_args_required: false,
            subcommand_required: false,
            allow_empty_values: false,
            show_defaults: false,
            help_enabled: false,
            completion_enabled: true,
            quiet_exit: false,
            use_stderr: true,
        }
    }
}

/// The fully assembled model produced by [`crate::dsl::compile`]: configuration,
/// subcommands (in declaration order) and declarations (in declaration order).
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub always: bool,
    pub configuration: Configuration,
    pub subcommands: Vec<Subcommand>,
    pub declarations: Vec<Declaration>,
}

impl Model {
    pub(crate) fn subcommand_names(&self) -> Vec<&str> {
        self.subcommands.iter().map(|s| s.name.as_str()).collect()
    }

    pub(crate) fn subcommand(&self, name: &str) -> Option<&Subcommand> {
        self.subcommands.iter().find(|s| s.name == name)
    }

    /// Declarations active for the given subcommand selection, in declaration order.
    pub(crate) fn active_declarations(&self, selected: Option<&str>) -> Vec<&Declaration> {
        self.declarations
            .iter()
            .filter(|d| d.active_in(selected))
            .collect()
    }
}

/// Whether `binding` collides with a name the host environment already owns: the fixed
/// reserved-shell-names set (spec 3, glossary), or one of this DSL's own synthetic
/// output bindings (`BARG_SUBCOMMAND`, `BARG_ARGV_TABLE`, the configured spare-args
/// binding and its `_COUNT` companion).
pub(crate) fn reserved_or_dynamic(binding: &str, configuration: &Configuration) -> bool {
    use crate::constant::{ARGV_TABLE_BINDING, RESERVED_SHELL_NAMES, SUBCOMMAND_BINDING};
    HashMap::<&str, ()>::from_iter(RESERVED_SHELL_NAMES.iter().map(|n| (*n, ())))
        .contains_key(binding)
        || binding == SUBCOMMAND_BINDING
        || binding == ARGV_TABLE_BINDING
        || binding == configuration.spare_args_binding
        || binding == format!("{}_COUNT", configuration.spare_args_binding)
}
