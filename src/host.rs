//! The embedding boundary between the parsing core and its caller (spec 3, 6): the
//! `on_error_hook` and `epilog_source` configuration keys name callbacks/arrays that only
//! the host program can supply. [`HostEnvironment`] carries them in.
//!
//! Analogous to the teacher's `Box<dyn UserInterface>` boundary between `GeneralParser`
//! and the terminal it prints to - here the boundary is a struct rather than a trait,
//! since there are two independent capabilities (an error hook, and named epilog arrays)
//! rather than one cohesive interface.

use std::collections::HashMap;

/// Supplies the handler and data the DSL only refers to by name.
///
/// An empty `HostEnvironment` (`HostEnvironment::new()`) is a valid, fully usable default:
/// errors render to the terminal and exit as spec 7 describes, and epilogs are simply
/// omitted when no array is registered under the configured name.
#[derive(Default)]
pub struct HostEnvironment {
    error_hook: Option<Box<dyn Fn(&str, &str) -> i32>>,
    epilogs: HashMap<String, Vec<String>>,
}

impl HostEnvironment {
    /// An environment with no error hook and no epilogs registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the error hook called as `hook(error_kind_label, description_string)`
    /// (spec 6). Returning `0` suppresses the error and continues; any non-zero return
    /// terminates with that code.
    pub fn with_error_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str, &str) -> i32 + 'static,
    {
        self.error_hook = Some(Box::new(hook));
        self
    }

    /// Registers a string array under `name`, retrievable by a `meta.epilog_source` of
    /// the same name.
    pub fn with_epilog<S: Into<String>>(mut self, name: S, lines: Vec<String>) -> Self {
        self.epilogs.insert(name.into(), lines);
        self
    }

    pub(crate) fn error_hook(&self) -> Option<&(dyn Fn(&str, &str) -> i32)> {
        self.error_hook.as_deref()
    }

    pub(crate) fn epilog(&self, name: &str) -> Option<&[String]> {
        self.epilogs.get(name).map(Vec::as_slice)
    }
}

impl std::fmt::Debug for HostEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostEnvironment")
            .field("error_hook", &self.error_hook.is_some())
            .field("epilogs", &self.epilogs.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_has_nothing_registered() {
        let env = HostEnvironment::new();
        assert!(env.error_hook().is_none());
        assert_eq!(env.epilog("missing"), None);
    }

    #[test]
    fn registered_hook_and_epilog_are_retrievable() {
        let env = HostEnvironment::new()
            .with_error_hook(|_kind, _msg| 0)
            .with_epilog("footer", vec!["line one".to_string()]);

        assert_eq!(env.error_hook().unwrap()("MissingRequired", "x"), 0);
        assert_eq!(env.epilog("footer"), Some(&["line one".to_string()][..]));
    }
}
