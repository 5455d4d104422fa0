// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! English singularization for loop and closure variable names.
//!
//! Only the handful of suffix rules needed to turn `orders` into `order` or
//! `categories` into `category`. Rules are tried in order and the first
//! matching suffix wins.

const RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("ves", "f"),
    ("oes", "o"),
    ("ses", "s"),
    ("xes", "x"),
    ("s", "")
];

/// Singular form of `plural`, or `None` if no rule applies.
///
/// Suffixes are matched case-insensitively.
#[must_use]
pub fn to_singular(plural: &str) -> Option<String> {
    RULES.iter().find_map(|(suffix, replacement)| {
        let split = plural.len().checked_sub(suffix.len())?;
        let tail = plural.get(split..)?;
        tail.eq_ignore_ascii_case(suffix)
            .then(|| format!("{}{}", &plural[..split], replacement))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singularizes_known_suffixes() {
        assert_eq!(to_singular("buses").as_deref(), Some("bus"));
        assert_eq!(to_singular("boxes").as_deref(), Some("box"));
        assert_eq!(to_singular("leaves").as_deref(), Some("leaf"));
        assert_eq!(to_singular("potatoes").as_deref(), Some("potato"));
        assert_eq!(to_singular("categories").as_deref(), Some("category"));
    }

    #[test]
    fn strips_plain_s() {
        assert_eq!(to_singular("cats").as_deref(), Some("cat"));
        assert_eq!(to_singular("dogs").as_deref(), Some("dog"));
    }

    #[test]
    fn case_insensitive_suffix() {
        assert_eq!(to_singular("ORDERS").as_deref(), Some("ORDER"));
    }

    #[test]
    fn no_rule_applies() {
        assert_eq!(to_singular("sheep"), None);
        assert_eq!(to_singular(""), None);
    }

    #[test]
    fn multibyte_input_does_not_panic() {
        assert_eq!(to_singular("é"), None);
        assert_eq!(to_singular("cafés").as_deref(), Some("café"));
    }
}
