use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Most-recent-first list of distinct words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordHistory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for WordHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl WordHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepends `word` unless it is already present. An existing entry keeps
    /// its position. Returns whether the history changed.
    pub fn record(&mut self, word: &str) -> bool {
        if self.capacity == 0 || self.contains(word) {
            return false;
        }
        self.entries.push_front(word.to_string());
        self.entries.truncate(self.capacity);
        true
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.iter().any(|entry| entry == word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}
