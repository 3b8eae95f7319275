//! Argv Normalizer (spec 4.3): expands bundled short flags and attached numeric values,
//! while `--` escapes exactly the one token that follows it.

/// Rewrites `argv` per spec 4.3. Idempotent on already-normalized input.
pub(crate) fn normalize(argv: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(argv.len());
    let mut escape_next = false;

    for tok in argv {
        if escape_next {
            out.push(tok.clone());
            escape_next = false;
            continue;
        }

        if tok == "--" {
            out.push(tok.clone());
            escape_next = true;
            continue;
        }

        if let Some((flag, value)) = split_attached_numeric(tok) {
            #[cfg(feature = "trace")]
            tracing::debug!(token = %tok, flag = %flag, value = %value, "normalize: split attached numeric");
            out.push(flag);
            out.push(value);
            continue;
        }

        if let Some(chars) = bundled_chars(tok) {
            #[cfg(feature = "trace")]
            tracing::debug!(token = %tok, count = chars.len(), "normalize: expand bundle");
            out.extend(chars.into_iter().map(|c| format!("-{c}")));
            continue;
        }

        out.push(tok.clone());
    }

    out
}

/// `^-[A-Za-z][0-9_.]*$`, length >= 3: a short flag with a numeric-looking suffix glued on.
fn split_attached_numeric(tok: &str) -> Option<(String, String)> {
    if tok.len() < 3 || !tok.starts_with('-') || tok.starts_with("--") {
        return None;
    }
    let rest = &tok[1..];
    let mut chars = rest.chars();
    let flag_char = chars.next()?;
    if !flag_char.is_ascii_alphabetic() {
        return None;
    }
    let suffix: String = chars.collect();
    if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit() || c == '_' || c == '.') {
        return None;
    }
    Some((format!("-{flag_char}"), suffix))
}

/// `-XYZ…`, length >= 3, all alphabetic: a run of bundled short flags.
fn bundled_chars(tok: &str) -> Option<Vec<char>> {
    if tok.len() < 3 || !tok.starts_with('-') || tok.starts_with("--") {
        return None;
    }
    let rest = &tok[1..];
    if rest.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(rest.chars().collect())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bundles_short_flags() {
        assert_eq!(normalize(&v(&["-abc", "value"])), v(&["-a", "-b", "-c", "value"]));
    }

    #[test]
    fn splits_attached_numeric() {
        assert_eq!(normalize(&v(&["-t2"])), v(&["-t", "2"]));
        assert_eq!(normalize(&v(&["-t2.5"])), v(&["-t", "2.5"]));
        assert_eq!(normalize(&v(&["-t2_000"])), v(&["-t", "2_000"]));
    }

    #[test]
    fn escape_covers_only_the_next_token() {
        assert_eq!(
            normalize(&v(&["-o", "--", "--weird", "-abc"])),
            v(&["-o", "--", "--weird", "-a", "-b", "-c"])
        );
    }

    #[test]
    fn passes_through_long_flags_and_bare_dash() {
        assert_eq!(normalize(&v(&["--foo", "-", "bar"])), v(&["--foo", "-", "bar"]));
    }

    #[test]
    fn idempotent_on_normalized_input() {
        let once = normalize(&v(&["-abc", "-t2", "--", "-x"]));
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn short_flags_shorter_than_three_pass_through() {
        assert_eq!(normalize(&v(&["-a", "-1"])), v(&["-a", "-1"]));
    }
}
