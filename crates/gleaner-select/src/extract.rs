//! Regex extraction shared by selectors and loaders.

use regex::Regex;

use crate::error::{Result, SelectError};

/// Name of the capture group that, when present, selects the extracted text.
pub const EXTRACT_GROUP: &str = "extract";

/// Compile a pattern, mapping failures into [`SelectError::InvalidPattern`].
pub fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|err| SelectError::InvalidPattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    })
}

/// Extract strings from `text` with `re`.
///
/// - a group named `extract` yields that group of the first match only,
/// - otherwise, for every match, each participating capture group in order,
/// - or the whole match when the pattern has no groups.
pub fn extract_regex(re: &Regex, text: &str) -> Vec<String> {
    if re.capture_names().flatten().any(|name| name == EXTRACT_GROUP) {
        return re
            .captures(text)
            .and_then(|caps| caps.name(EXTRACT_GROUP))
            .map(|m| vec![m.as_str().to_string()])
            .unwrap_or_default();
    }

    if re.captures_len() > 1 {
        re.captures_iter(text)
            .flat_map(|caps| {
                caps.iter()
                    .skip(1)
                    .flatten()
                    .map(|m| m.as_str().to_string())
                    .collect::<Vec<_>>()
            })
            .collect()
    } else {
        re.find_iter(text).map(|m| m.as_str().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_matches_without_groups() {
        let re = compile(r"\d+").unwrap();
        assert_eq!(extract_regex(&re, "a1 b22 c333"), vec!["1", "22", "333"]);
    }

    #[test]
    fn groups_of_every_match() {
        let re = compile(r"(\w)=(\d)").unwrap();
        assert_eq!(extract_regex(&re, "a=1, b=2"), vec!["a", "1", "b", "2"]);
    }

    #[test]
    fn named_extract_group_uses_first_match() {
        let re = compile(r"price: (?P<extract>\d+)").unwrap();
        assert_eq!(extract_regex(&re, "price: 10, price: 20"), vec!["10"]);
        assert!(extract_regex(&re, "no price").is_empty());
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = compile("(").unwrap_err();
        assert!(matches!(err, SelectError::InvalidPattern { pattern, .. } if pattern == "("));
    }
}
