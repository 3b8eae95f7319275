//! The caller-facing result of [`crate::program::Program::parse`]: [`Value`] and
//! [`ParseOutcome`] (spec 3, 6).
//!
//! The teacher exposes captured values by writing into caller-owned Rust bindings chosen
//! at build time (`Parameter<T>`). That shape isn't available here: a binding name is a
//! DSL string picked at runtime, not a Rust variable, so values are collected into one
//! map instead and handed back as a single record.

use std::collections::HashMap;

/// A bound value, tagged by the [`crate::model::Kind`] that produced it (spec 6: "Scalars
/// are strings or numbers per type; vectors are ordered sequences; flags are booleans;
/// switches are strings").
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<Value>),
}

impl Value {
    /// The value as a string slice, if it is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The value as an `i64`, if it is a [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The value as an `f64`, if it is a [`Value::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The value as a `bool`, if it is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as a list slice, if it is a [`Value::List`].
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Whether this value is the empty string - the case `allow_empty_values` and
    /// `MissingRequired` (spec 4.5) care about.
    pub(crate) fn is_empty_string(&self) -> bool {
        matches!(self, Value::Str(s) if s.is_empty())
    }
}

/// The bundled result described piecemeal across spec 3 and 6: every binding's value,
/// the subcommand selection, the residual positional arguments, and the was-set map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseOutcome {
    pub(crate) bindings: HashMap<String, Value>,
    pub(crate) was_set: HashMap<String, bool>,
    pub(crate) subcommand: Option<String>,
    pub(crate) spare_args: Vec<String>,
}

impl ParseOutcome {
    /// The value bound to `binding`, or `None` if no declaration produced that name.
    pub fn get(&self, binding: &str) -> Option<&Value> {
        self.bindings.get(binding)
    }

    /// Whether `binding` was populated from argv rather than left at its declared
    /// default (spec 8: "Defaults vs set").
    pub fn was_set(&self, binding: &str) -> bool {
        self.was_set.get(binding).copied().unwrap_or(false)
    }

    /// The selected subcommand name, mirroring the `BARG_SUBCOMMAND` output binding.
    pub fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    /// The residual positional arguments, mirroring `<spare_args_binding>`.
    pub fn spare_args(&self) -> &[String] {
        &self.spare_args
    }

    /// The residual argument count, mirroring `<spare_args_binding>_COUNT`.
    pub fn spare_args_count(&self) -> usize {
        self.spare_args.len()
    }

    /// Iterates over every populated binding name and value.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The host-visible form of the was-set map (spec 6: `BARG_ARGV_TABLE`): keyed by
    /// binding name, valued at [`crate::constant::SET_MARKER`] for exactly the bindings
    /// that were populated from argv. Bindings left at their declared default are absent,
    /// matching the glossary's "non-empty exactly when argv supplied the value".
    pub fn argv_table(&self) -> HashMap<String, &'static str> {
        self.was_set
            .iter()
            .filter(|(_, set)| **set)
            .map(|(binding, _)| (binding.clone(), crate::constant::SET_MARKER))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_accessors() {
        assert_eq!(Value::Str("a".to_string()).as_str(), Some("a"));
        assert_eq!(Value::Int(3).as_int(), Some(3));
        assert_eq!(Value::Float(1.5).as_float(), Some(1.5));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(3).as_str(), None);
    }

    #[test]
    fn argv_table_lists_only_bindings_set_from_argv() {
        let mut outcome = ParseOutcome::default();
        outcome.was_set.insert("A".to_string(), true);
        outcome.was_set.insert("B".to_string(), false);

        let table = outcome.argv_table();
        assert_eq!(table.get("A"), Some(&crate::constant::SET_MARKER));
        assert_eq!(table.get("B"), None);
    }

    #[test]
    fn outcome_was_set_defaults_false() {
        let outcome = ParseOutcome::default();
        assert!(!outcome.was_set("MISSING"));
        assert_eq!(outcome.get("MISSING"), None);
        assert_eq!(outcome.spare_args_count(), 0);
    }
}
