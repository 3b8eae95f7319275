//! Fixed strings and literals shared across the pipeline.

/// Long form of the synthetic help option.
pub(crate) const HELP_NAME: &str = "help";
/// Short form of the synthetic help option.
pub(crate) const HELP_SHORT: char = 'h';
/// Description rendered next to the synthetic help option.
pub(crate) const HELP_MESSAGE: &str = "Show this help message and exit";

/// Default value of `meta.spare_args_binding`.
pub(crate) const DEFAULT_SPARE_ARGS_BINDING: &str = "BARG_SPARE_ARGS";
/// Fixed output binding carrying the selected subcommand name.
pub(crate) const SUBCOMMAND_BINDING: &str = "BARG_SUBCOMMAND";
/// Fixed output binding carrying the was-set map.
pub(crate) const ARGV_TABLE_BINDING: &str = "BARG_ARGV_TABLE";

/// Name of the environment variable read when `meta.color_palette` is empty.
pub(crate) const PALETTE_ENV_VAR: &str = "BARG_COLOR_PALETTE";

/// Reserved first argv token selecting the raw TSV completion stream.
pub(crate) const TSV_COMPLETION_TOKEN: &str = "@tsvcomp";
/// Reserved first argv token selecting the `nucomp`-shaped JSON completion stream.
pub(crate) const NUCOMP_COMPLETION_TOKEN: &str = "@nucomp";

/// First line directive that suppresses the empty-argv exit(1) shortcut.
pub(crate) const ALWAYS_DIRECTIVE: &str = "#[always]";

/// Help/description strings longer than this are truncated with an ellipsis (spec 4.7).
pub(crate) const MAX_DESCRIPTION_LEN: usize = 45;

/// Marker value used in the was-set map (spec glossary: "any non-empty marker").
pub(crate) const SET_MARKER: &str = "!";

/// Portability courtesy: binding names that would collide with a shell-style embedding
/// environment. See design notes in spec.md 9 - in a pure library rewrite this list is
/// validation only, there is no shell namespace to actually collide with.
pub(crate) const RESERVED_SHELL_NAMES: &[&str] = &[
    "PATH", "IFS", "HOME", "UID", "PWD", "OLDPWD", "PPID", "SHELL", "RANDOM", "SECONDS", "BASH",
    "BASH_VERSION", "HOSTNAME", "USER", "LANG", "TERM",
];
