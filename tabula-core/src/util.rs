use regex::Regex;
use std::{cmp::min, sync::LazyLock};
use syn::Path;

pub fn matches_path(path: &Path, expect: &[&str]) -> bool {
    let len = min(path.segments.len(), expect.len());
    path.segments
        .iter()
        .rev()
        .take(len)
        .map(|v| &v.ident)
        .eq(expect.iter().rev().take(len))
}

pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

pub fn consume_while<'s>(input: &mut &'s str, predicate: impl FnMut(&char) -> bool) -> &'s str {
    let len: usize = input
        .chars()
        .take_while(predicate)
        .map(char::len_utf8)
        .sum();
    if len == 0 {
        return "";
    }
    let result = &input[..len];
    *input = &input[len..];
    result
}

static WORD_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(.)([A-Z][a-z]+)").expect("valid word boundary regex"));
static LOWER_UPPER_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([a-z0-9])([A-Z])").expect("valid case boundary regex"));

/// Translate a declared identifier to its storage name.
///
/// A capital followed by lowercase letters starts a new word, and so does a
/// capital right after a lowercase letter or digit. Acronym runs stay together:
///
/// ```rust
/// use tabula_core::storage_name;
/// assert_eq!(storage_name("IBMPowerEdge"), "ibm_power_edge");
/// assert_eq!(storage_name("IOneTwo"), "i_one_two");
/// assert_eq!(storage_name("depot_num"), "depot_num");
/// ```
pub fn storage_name(name: &str) -> String {
    let name = WORD_BOUNDARY.replace_all(name, "${1}_${2}");
    LOWER_UPPER_BOUNDARY
        .replace_all(&name, "${1}_${2}")
        .to_lowercase()
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            &$query[..::std::cmp::min($query.len(), 497)].trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}
