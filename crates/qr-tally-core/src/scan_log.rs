use crate::model::ScanEntry;
use ahash::AHashMap;

/// Ordered, append-only record of committed scans.
///
/// The seen set is kept as a code → occurrence count map that is updated on
/// every mutation, so a code stays "seen" until its last entry is removed.
#[derive(Debug, Clone, Default)]
pub struct ScanLog {
    entries: Vec<ScanEntry>,
    seen: AHashMap<String, usize>,
}

impl ScanLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<ScanEntry>) -> Self {
        let mut seen: AHashMap<String, usize> = AHashMap::with_capacity(entries.len());
        for entry in &entries {
            *seen.entry(entry.code.clone()).or_default() += 1;
        }
        Self { entries, seen }
    }

    pub fn entries(&self) -> &[ScanEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.seen.contains_key(code)
    }

    /// Number of distinct codes in the log.
    pub fn distinct_codes(&self) -> usize {
        self.seen.len()
    }

    pub fn seen_codes(&self) -> impl Iterator<Item = &str> {
        self.seen.keys().map(String::as_str)
    }

    pub fn push(&mut self, entry: ScanEntry) {
        *self.seen.entry(entry.code.clone()).or_default() += 1;
        self.entries.push(entry);
    }

    /// Remove and return the most recent entry.
    pub fn undo_last(&mut self) -> Option<ScanEntry> {
        let entry = self.entries.pop()?;
        if let Some(count) = self.seen.get_mut(&entry.code) {
            *count -= 1;
            if *count == 0 {
                self.seen.remove(&entry.code);
            }
        }
        Some(entry)
    }

    /// Remove every entry, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.seen.clear();
        removed
    }

    /// Entries whose code contains the trimmed query, newest first.
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&ScanEntry> {
        let query = query.trim();
        self.entries
            .iter()
            .rev()
            .filter(|e| query.is_empty() || e.code.contains(query))
            .collect()
    }

    pub fn snapshot(&self) -> Vec<ScanEntry> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn entry(code: &str, ts: i64) -> ScanEntry {
        ScanEntry {
            code: code.to_string(),
            timestamp: ts,
        }
    }

    fn assert_seen_matches_entries(log: &ScanLog) {
        let rebuilt: HashSet<&str> = log.entries().iter().map(|e| e.code.as_str()).collect();
        let seen: HashSet<&str> = log.seen_codes().collect();
        assert_eq!(rebuilt, seen);
    }

    #[test]
    fn test_push_and_contains() {
        let mut log = ScanLog::new();
        log.push(entry("A", 1));
        log.push(entry("B", 2));
        assert_eq!(log.len(), 2);
        assert!(log.contains("A"));
        assert!(!log.contains("C"));
        assert_seen_matches_entries(&log);
    }

    #[test]
    fn test_undo_keeps_code_seen_while_other_entries_remain() {
        let mut log = ScanLog::new();
        log.push(entry("A", 1));
        log.push(entry("A", 2));
        assert_eq!(log.distinct_codes(), 1);

        let removed = log.undo_last().unwrap();
        assert_eq!(removed.timestamp, 2);
        assert!(log.contains("A"));
        assert_seen_matches_entries(&log);

        log.undo_last();
        assert!(!log.contains("A"));
        assert!(log.is_empty());
        assert_seen_matches_entries(&log);
    }

    #[test]
    fn test_undo_on_empty_log_is_noop() {
        let mut log = ScanLog::new();
        assert!(log.undo_last().is_none());
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn test_clear() {
        let mut log = ScanLog::from_entries(vec![entry("A", 1), entry("B", 2)]);
        assert_eq!(log.clear(), 2);
        assert!(log.is_empty());
        assert_eq!(log.distinct_codes(), 0);
        assert_seen_matches_entries(&log);
    }

    #[test]
    fn test_from_entries_builds_seen_set() {
        let log = ScanLog::from_entries(vec![entry("A", 1), entry("B", 2), entry("A", 3)]);
        assert_eq!(log.len(), 3);
        assert_eq!(log.distinct_codes(), 2);
        assert_seen_matches_entries(&log);
    }

    #[test]
    fn test_search_newest_first() {
        let log = ScanLog::from_entries(vec![
            entry("SKU-100", 1),
            entry("SKU-200", 2),
            entry("LOT-100", 3),
        ]);
        let hits: Vec<i64> = log.search(" 100 ").iter().map(|e| e.timestamp).collect();
        assert_eq!(hits, vec![3, 1]);
        assert_eq!(log.search("").len(), 3);
        assert!(log.search("nope").is_empty());
    }
}
