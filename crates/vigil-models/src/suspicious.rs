//! The alert-triggering class set.

use std::collections::HashSet;

/// Labels that trigger an alert when detected, matched case-insensitively.
pub const DEFAULT_SUSPICIOUS_CLASSES: &[&str] =
    &["knife", "fork", "scissors", "baseball bat", "cell phone"];

/// Fixed set of suspicious object labels, configured once at process start.
///
/// Membership is the sole gate for alerting. Labels are stored lowercased so
/// lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspiciousSet {
    labels: HashSet<String>,
}

impl SuspiciousSet {
    /// Build a set from an iterator of labels. Labels are trimmed and
    /// lowercased; empty entries are ignored.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels = labels
            .into_iter()
            .map(|l| l.as_ref().trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();
        Self { labels }
    }

    /// Parse a comma-separated label list, e.g. `"knife, scissors"`.
    pub fn from_csv(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(&label.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate the (lowercased) labels.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl Default for SuspiciousSet {
    fn default() -> Self {
        Self::new(DEFAULT_SUSPICIOUS_CLASSES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_contents() {
        let set = SuspiciousSet::default();
        assert_eq!(set.len(), 5);
        assert!(set.contains("knife"));
        assert!(set.contains("baseball bat"));
        assert!(!set.contains("person"));
    }

    #[test]
    fn membership_is_case_insensitive() {
        let set = SuspiciousSet::default();
        assert!(set.contains("Knife"));
        assert!(set.contains("CELL PHONE"));
    }

    #[test]
    fn csv_parsing_trims_and_skips_empty() {
        let set = SuspiciousSet::from_csv(" Knife , scissors,, crowbar ");
        assert_eq!(set.len(), 3);
        assert!(set.contains("knife"));
        assert!(set.contains("crowbar"));
    }

    #[test]
    fn empty_csv_yields_empty_set() {
        let set = SuspiciousSet::from_csv("");
        assert!(set.is_empty());
    }
}
