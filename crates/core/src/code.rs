use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

/// Family assigned to codes without a leading uppercase run.
pub const OTHER_FAMILY: &str = "Other";

static FAMILY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+").expect("static regex"));

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]+)(\d+)$").expect("static regex"));

/// Leading run of uppercase letters, e.g. `"A"` for `"A5"`, `"ZG"` for `"ZG12"`.
pub fn family_of(code: &str) -> &str {
    FAMILY_RE
        .find(code)
        .map(|m| m.as_str())
        .unwrap_or(OTHER_FAMILY)
}

fn split_code(code: &str) -> Option<(&str, &str)> {
    let caps = CODE_RE.captures(code)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Compares two unsigned decimal strings by value without parsing, so
/// arbitrarily long suffixes cannot overflow.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Natural ordering for manufacturer codes: `A9 < A10 < B1`, and anything not
/// shaped like `LETTERS DIGITS` after every code that is.
pub fn compare_codes(a: &str, b: &str) -> Ordering {
    match (split_code(a), split_code(b)) {
        (Some((pa, na)), Some((pb, nb))) => pa
            .cmp(pb)
            .then_with(|| compare_digits(na, nb))
            .then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_is_leading_uppercase_run() {
        assert_eq!(family_of("A5"), "A");
        assert_eq!(family_of("ZG12"), "ZG");
        assert_eq!(family_of("H"), "H");
        assert_eq!(family_of("12"), OTHER_FAMILY);
        assert_eq!(family_of("a5"), OTHER_FAMILY);
        assert_eq!(family_of(""), OTHER_FAMILY);
    }

    #[test]
    fn numeric_suffix_is_compared_as_integer() {
        assert_eq!(compare_codes("A9", "A10"), Ordering::Less);
        assert_eq!(compare_codes("A10", "A9"), Ordering::Greater);
        assert_eq!(compare_codes("A10", "B1"), Ordering::Less);
        assert_eq!(compare_codes("A2", "A2"), Ordering::Equal);
    }

    #[test]
    fn unparseable_codes_sort_last() {
        assert_eq!(compare_codes("Z99", "custom"), Ordering::Less);
        assert_eq!(compare_codes("12", "A1"), Ordering::Greater);
        assert_eq!(compare_codes("A-1", "A1"), Ordering::Greater);
        assert_eq!(compare_codes("apple", "banana"), Ordering::Less);
    }

    #[test]
    fn long_suffixes_do_not_overflow() {
        let big = format!("A{}", "9".repeat(40));
        let bigger = format!("A1{}", "0".repeat(40));
        assert_eq!(compare_codes(&big, &bigger), Ordering::Less);
    }

    #[test]
    fn zero_padding_is_total() {
        assert_eq!(compare_codes("A01", "A1"), Ordering::Less);
        assert_eq!(compare_codes("A01", "A2"), Ordering::Less);
    }

    #[test]
    fn sorting_a_mixed_list() {
        let mut codes = vec!["B2", "A10", "x", "A9", "C1", "A1", "10"];
        codes.sort_by(|a, b| compare_codes(a, b));
        assert_eq!(codes, vec!["A1", "A9", "A10", "B2", "C1", "10", "x"]);
    }
}
