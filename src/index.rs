//! Indexing Phase (spec 4.4): a flag-occurrence index over normalized argv, consumed by
//! the Bind engine and then discarded.

use std::collections::HashMap;

/// Maps each flag token (`-s` or `--long`) encountered in argv to the ordered list of
/// value-slot indices that immediately follow its occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FlagIndex {
    slots: HashMap<String, Vec<usize>>,
}

impl FlagIndex {
    /// The value-slot indices recorded for `flag`, in argv order.
    pub(crate) fn slots_for(&self, flag: &str) -> &[usize] {
        self.slots.get(flag).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn looks_like_flag(tok: &str) -> bool {
    tok.starts_with('-') && tok != "-"
}

/// Builds a [`FlagIndex`] over already-normalized argv. `--`-escaped tokens (the marker
/// and the single token it escapes) are skipped entirely.
pub(crate) fn build(argv: &[String]) -> FlagIndex {
    let mut slots: HashMap<String, Vec<usize>> = HashMap::new();
    let mut i = 0;

    while i < argv.len() {
        if argv[i] == "--" {
            i += 2;
            continue;
        }
        if looks_like_flag(&argv[i]) {
            slots.entry(argv[i].clone()).or_default().push(i + 1);
        }
        i += 1;
    }

    #[cfg(feature = "trace")]
    tracing::debug!(?slots, "index: built flag-occurrence map");

    FlagIndex { slots }
}
