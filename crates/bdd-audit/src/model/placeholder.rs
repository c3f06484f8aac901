//! Scenario outline placeholder extraction and substitution.
//!
//! Placeholders use the angle-bracket syntax (`<name>`). A name must not
//! begin with whitespace and must not contain `>`. Usage counting keeps
//! first-seen order so downstream column operations stay deterministic.

use std::sync::LazyLock;

use regex::Regex;

/// Regex for extracting `<placeholder>` tokens from outline text.
///
/// Captures the placeholder name without the angle brackets.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([^>\s][^>]*)>").unwrap_or_else(|_| unreachable!("placeholder regex is valid"))
});

/// Parameter-name to occurrence-count map, ordered by first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamUsage {
    entries: Vec<(String, usize)>,
}

impl ParamUsage {
    /// Create an empty usage map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `name`, inserting it when unseen.
    pub fn record(&mut self, name: &str, count: usize) {
        if let Some(entry) = self.entries.iter_mut().find(|(seen, _)| seen == name) {
            entry.1 += count;
            return;
        }
        self.entries.push((name.to_owned(), count));
    }

    /// Fold another usage map into this one.
    pub fn merge(&mut self, other: &Self) {
        for (name, count) in &other.entries {
            self.record(name, *count);
        }
    }

    /// Occurrence count for `name`, or `None` when never seen.
    #[must_use]
    pub fn count(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(seen, _)| seen == name)
            .map(|(_, count)| *count)
    }

    /// Whether `name` was seen at least once.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.count(name).is_some()
    }

    /// Whether no parameter was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Iterate parameter names in first-seen order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

/// Count every `<name>` placeholder occurrence in one text fragment.
///
/// # Examples
///
/// ```
/// use bdd_audit::model::parameter_usage;
///
/// let usage = parameter_usage("I move <count> items to <bin>, then <count> more");
/// assert_eq!(usage.count("count"), Some(2));
/// assert_eq!(usage.count("bin"), Some(1));
/// ```
#[must_use]
pub fn parameter_usage(text: &str) -> ParamUsage {
    let mut usage = ParamUsage::new();
    for captures in PLACEHOLDER_RE.captures_iter(text) {
        if let Some(name) = captures.get(1) {
            usage.record(name.as_str(), 1);
        }
    }
    usage
}

/// Literally replace every `<name>` occurrence in `text` with `value`.
#[must_use]
pub fn substitute(text: &str, name: &str, value: &str) -> String {
    text.replace(&format!("<{name}>"), value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("no placeholders here", &[])]
    #[case("I log in as <user>", &[("user", 1)])]
    #[case("<a> then <b> then <a>", &[("a", 2), ("b", 1)])]
    #[case("unclosed <oops", &[])]
    fn counts_in_first_seen_order(#[case] text: &str, #[case] expected: &[(&str, usize)]) {
        let usage = parameter_usage(text);
        let collected: Vec<(&str, usize)> = usage.iter().collect();
        assert_eq!(collected, expected);
    }

    #[test]
    fn merge_accumulates_counts() {
        let mut usage = parameter_usage("<id> and <name>");
        usage.merge(&parameter_usage("<name> twice <name>"));
        assert_eq!(usage.count("id"), Some(1));
        assert_eq!(usage.count("name"), Some(3));
    }

    #[test]
    fn substitute_is_literal() {
        assert_eq!(substitute("go to <env> (<env>)", "env", "prod"), "go to prod (prod)");
        assert_eq!(substitute("no match", "env", "prod"), "no match");
    }
}
