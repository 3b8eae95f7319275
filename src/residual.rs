//! Residual Collector (spec 4.6): walks normalized argv once, gathering every slot the
//! Bind engine didn't consume into the spare-arguments vector.

use std::collections::HashSet;

use crate::error::BindError;

/// `Ok` on a clean walk; `Err((offset, error))` on the first unrecognized flag-looking
/// token, `offset` being its index in `argv` for [`crate::error::ErrorContext`].
pub(crate) fn collect(argv: &[String], taken: &HashSet<usize>) -> Result<Vec<String>, (usize, BindError)> {
    let mut spare = Vec::new();
    let mut i = 0;

    while i < argv.len() {
        if taken.contains(&i) {
            i += 1;
            continue;
        }

        if argv[i] == "--" {
            i += 1;
            if i < argv.len() {
                spare.push(argv[i].clone());
                i += 1;
            }
            continue;
        }

        if argv[i].starts_with('-') && argv[i] != "-" {
            return Err((i, BindError::UnknownFlag { token: argv[i].clone() }));
        }

        spare.push(argv[i].clone());
        i += 1;
    }

    Ok(spare)
}
