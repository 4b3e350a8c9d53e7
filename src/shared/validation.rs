use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating category slugs
    /// Must be lowercase alphanumeric with hyphens
    /// - Valid: "organic-produce", "seafood", "art2"
    /// - Invalid: "-spices", "spices-", "organic--produce", "Spices", "organic_produce"
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_regex_valid() {
        assert!(SLUG_REGEX.is_match("seafood"));
        assert!(SLUG_REGEX.is_match("organic-produce"));
        assert!(SLUG_REGEX.is_match("art2"));
        assert!(SLUG_REGEX.is_match("a"));
        assert!(SLUG_REGEX.is_match("a-b-c"));
    }

    #[test]
    fn test_slug_regex_invalid() {
        assert!(!SLUG_REGEX.is_match("-spices")); // starts with hyphen
        assert!(!SLUG_REGEX.is_match("spices-")); // ends with hyphen
        assert!(!SLUG_REGEX.is_match("organic--produce")); // double hyphen
        assert!(!SLUG_REGEX.is_match("Spices")); // uppercase
        assert!(!SLUG_REGEX.is_match("organic_produce")); // underscore
        assert!(!SLUG_REGEX.is_match("")); // empty
        assert!(!SLUG_REGEX.is_match("organic produce")); // space
    }
}
