//! Resolves the six named color roles (spec 4.2) into ready-to-use ANSI SGR fragments.
//!
//! Grounded on the teacher's string-formatting approach to terminal output (no color
//! crate: the teacher renders help as plain formatted strings). The SGR wrapping
//! mechanism is hand-rolled rather than pulled from a crate like `colored` because the
//! palette is an arbitrary caller-supplied list of SGR parameters, not a fixed enum of
//! named colors that such a crate would model.

use crate::constant::PALETTE_ENV_VAR;

/// The six roles a palette assigns color codes to, in the fixed DSL order (spec 4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Accent,
    Command,
    Required,
    Error,
    StringDefault,
    OtherDefault,
}

/// Six optional ANSI SGR parameter strings, one per [`Role`]. A `None` role renders
/// unstyled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Palette {
    accent: Option<String>,
    command: Option<String>,
    required: Option<String>,
    error: Option<String>,
    string_default: Option<String>,
    other_default: Option<String>,
}

impl Palette {
    /// No roles set: [`Palette::paint`] is the identity function.
    pub(crate) fn none() -> Self {
        Self::default()
    }

    fn code_for(&self, role: Role) -> Option<&str> {
        match role {
            Role::Accent => self.accent.as_deref(),
            Role::Command => self.command.as_deref(),
            Role::Required => self.required.as_deref(),
            Role::Error => self.error.as_deref(),
            Role::StringDefault => self.string_default.as_deref(),
            Role::OtherDefault => self.other_default.as_deref(),
        }
    }

    /// Wraps `text` in the role's SGR code, or returns it unchanged when the role has no
    /// assigned code.
    pub(crate) fn paint(&self, role: Role, text: &str) -> String {
        match self.code_for(role) {
            Some(code) => format!("\x1b[{code}m{text}\x1b[0m"),
            None => text.to_string(),
        }
    }

    fn from_colon_separated(s: &str) -> Self {
        let parts: Vec<&str> = s.split(':').collect();
        let slot = |i: usize| {
            parts
                .get(i)
                .filter(|p| !p.is_empty())
                .map(|p| p.to_string())
        };
        Self {
            accent: slot(0),
            command: slot(1),
            required: slot(2),
            error: slot(3),
            string_default: slot(4),
            other_default: slot(5),
        }
    }

    /// Resolves the palette per spec 4.2: `configured` wins when non-empty; otherwise
    /// `env_value` (the process's `BARG_COLOR_PALETTE`) is used; otherwise no color.
    pub(crate) fn resolve(configured: Option<&str>, env_value: Option<&str>) -> Self {
        let chosen = configured
            .filter(|s| !s.is_empty())
            .or_else(|| env_value.filter(|s| !s.is_empty()));
        match chosen {
            Some(s) => Self::from_colon_separated(s),
            None => Self::none(),
        }
    }

    /// Resolves against the real process environment (`BARG_COLOR_PALETTE`).
    pub(crate) fn resolve_process(configured: Option<&str>) -> Self {
        let env_value = std::env::var(PALETTE_ENV_VAR).ok();
        Self::resolve(configured, env_value.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_role_passes_through() {
        let p = Palette::none();
        assert_eq!(p.paint(Role::Accent, "hi"), "hi");
    }

    #[test]
    fn configured_wins_over_env() {
        let p = Palette::resolve(Some("1:2:3:4:5:6"), Some("9:9:9:9:9:9"));
        assert_eq!(p.paint(Role::Accent, "x"), "\x1b[1mx\x1b[0m");
        assert_eq!(p.paint(Role::OtherDefault, "y"), "\x1b[6my\x1b[0m");
    }

    #[test]
    fn falls_back_to_env_when_unconfigured() {
        let p = Palette::resolve(None, Some("31::::::"));
        assert_eq!(p.paint(Role::Accent, "x"), "\x1b[31mx\x1b[0m");
        assert_eq!(p.paint(Role::Command, "y"), "y");
    }

    #[test]
    fn literal_colon_disables_color() {
        let p = Palette::resolve(Some(":"), None);
        assert_eq!(p.paint(Role::Accent, "x"), "x");
        assert_eq!(p.paint(Role::Error, "x"), "x");
    }

    #[test]
    fn no_configuration_at_all_disables_color() {
        let p = Palette::resolve(None, None);
        assert_eq!(p.paint(Role::Required, "x"), "x");
    }
}
