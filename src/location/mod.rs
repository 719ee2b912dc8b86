use reqwest::Url;

/// How a URL change lands in the session history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryMode {
    /// Adds a new entry; back returns to the previous URL.
    Push,
    /// Overwrites the current entry.
    Replace,
}

/// The shared location both controllers read from and write to.
///
/// Implementors only provide the current URL and a way to commit a new one;
/// hash and query helpers are built on top of those two.
pub trait NavigationStore {
    fn current(&self) -> &Url;

    fn commit(&mut self, url: Url, mode: HistoryMode);

    /// The fragment without its leading `#`, trimmed. Empty reads as `None`.
    fn hash(&self) -> Option<String> {
        let raw = self.current().fragment().unwrap_or_default().trim();
        if raw.is_empty() {
            None
        } else {
            Some(raw.to_string())
        }
    }

    fn set_hash(&mut self, page_id: &str, mode: HistoryMode) {
        let mut next = self.current().clone();
        next.set_fragment(Some(page_id));
        self.commit(next, mode);
    }

    /// First value of `key`, URL-decoded and trimmed. Empty reads as `None`.
    fn query_param(&self, key: &str) -> Option<String> {
        self.current()
            .query_pairs()
            .find(|(k, _)| &**k == key)
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn set_query_param(&mut self, key: &str, value: Option<&str>, mode: HistoryMode) {
        let next = with_query_param(self.current(), key, value);
        self.commit(next, mode);
    }
}

/// Returns a copy of `url` with every `key` pair removed and, when `value` is
/// set, a single `key=value` pair appended. Other pairs keep their order.
pub fn with_query_param(url: &Url, key: &str, value: Option<&str>) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .filter(|(k, _)| k != key)
        .collect();

    let mut next = url.clone();
    if kept.is_empty() && value.is_none() {
        next.set_query(None);
        return next;
    }

    {
        let mut pairs = next.query_pairs_mut();
        pairs.clear();
        for (k, v) in kept.iter() {
            pairs.append_pair(k, v);
        }
        if let Some(value) = value {
            pairs.append_pair(key, value);
        }
    }
    next
}

/// Result of moving through the history with back/forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Traversal {
    pub hash_changed: bool,
}

/// Session history kept in memory: a list of entries and a cursor.
#[derive(Clone, Debug)]
pub struct MemoryHistory {
    entries: Vec<Url>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: Url) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entries(&self) -> &[Url] {
        &self.entries
    }

    pub fn back(&mut self) -> Option<Traversal> {
        self.go(-1)
    }

    pub fn forward(&mut self) -> Option<Traversal> {
        self.go(1)
    }

    /// Moves the cursor by `delta`. Out-of-range moves do nothing.
    pub fn go(&mut self, delta: isize) -> Option<Traversal> {
        if delta == 0 {
            return None;
        }
        let target = self.index as isize + delta;
        if target < 0 || target as usize >= self.entries.len() {
            return None;
        }
        let before = self.entries[self.index].fragment().map(str::to_string);
        self.index = target as usize;
        let after = self.entries[self.index].fragment().map(str::to_string);
        Some(Traversal {
            hash_changed: before != after,
        })
    }
}

impl NavigationStore for MemoryHistory {
    fn current(&self) -> &Url {
        &self.entries[self.index]
    }

    fn commit(&mut self, url: Url, mode: HistoryMode) {
        match mode {
            HistoryMode::Push => {
                self.entries.truncate(self.index + 1);
                self.entries.push(url);
                self.index = self.entries.len() - 1;
            }
            HistoryMode::Replace => {
                self.entries[self.index] = url;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(url: &str) -> MemoryHistory {
        MemoryHistory::new(Url::parse(url).unwrap())
    }

    #[test]
    fn hash_is_trimmed_and_empty_reads_as_none() {
        let h = history("https://example.com/#people");
        assert_eq!(h.hash().as_deref(), Some("people"));
        let h = history("https://example.com/#");
        assert_eq!(h.hash(), None);
        let h = history("https://example.com/");
        assert_eq!(h.hash(), None);
    }

    #[test]
    fn set_hash_replace_keeps_a_single_entry() {
        let mut h = history("https://example.com/");
        h.set_hash("home", HistoryMode::Replace);
        assert_eq!(h.len(), 1);
        assert_eq!(h.current().as_str(), "https://example.com/#home");
    }

    #[test]
    fn query_param_is_decoded_and_trimmed() {
        let h = history("https://example.com/?person=Ada%20Lovelace%20&x=1");
        assert_eq!(h.query_param("person").as_deref(), Some("Ada Lovelace"));
        assert_eq!(h.query_param("missing"), None);
        let h = history("https://example.com/?person=%20");
        assert_eq!(h.query_param("person"), None);
    }

    #[test]
    fn set_query_param_preserves_other_pairs_and_hash() {
        let mut h = history("https://example.com/?x=1&person=Bo#people");
        h.set_query_param("person", Some("Cy"), HistoryMode::Push);
        assert_eq!(
            h.current().as_str(),
            "https://example.com/?x=1&person=Cy#people"
        );
        h.set_query_param("person", None, HistoryMode::Push);
        assert_eq!(h.current().as_str(), "https://example.com/?x=1#people");
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn clearing_the_last_param_drops_the_query() {
        let mut h = history("https://example.com/?person=Bo");
        h.set_query_param("person", None, HistoryMode::Replace);
        assert_eq!(h.current().as_str(), "https://example.com/");
    }

    #[test]
    fn push_after_back_discards_forward_entries() {
        let mut h = history("https://example.com/");
        h.set_query_param("person", Some("A"), HistoryMode::Push);
        h.set_query_param("person", Some("B"), HistoryMode::Push);
        assert!(h.back().is_some());
        h.set_query_param("person", Some("C"), HistoryMode::Push);
        assert_eq!(h.len(), 3);
        assert!(h.forward().is_none());
        assert_eq!(h.query_param("person").as_deref(), Some("C"));
    }

    #[test]
    fn traversal_reports_hash_changes() {
        let mut h = history("https://example.com/#home");
        h.set_hash("people", HistoryMode::Push);
        h.set_query_param("person", Some("Ada"), HistoryMode::Push);
        assert_eq!(h.back(), Some(Traversal { hash_changed: false }));
        assert_eq!(h.back(), Some(Traversal { hash_changed: true }));
        assert_eq!(h.back(), None);
        assert_eq!(h.index(), 0);
    }
}
