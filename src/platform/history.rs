use super::HistoryStore;

/// One visited location.
///
/// `category` is the id the location was reached with. Absent means the
/// root; the literal "All" is treated the same way by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub path: String,
    pub category: Option<String>,
}

impl HistoryEntry {
    pub fn new(path: &str, category: Option<&str>) -> Self {
        Self {
            path: path.to_string(),
            category: category.map(str::to_string),
        }
    }

    pub fn root() -> Self {
        Self::new("/", None)
    }
}

/// In-memory history stack with a cursor.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self {
            entries: vec![HistoryEntry::root()],
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for SessionHistory {
    fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;
    }

    fn replace(&mut self, entry: HistoryEntry) {
        self.entries[self.cursor] = entry;
    }

    fn back(&mut self) -> Option<&HistoryEntry> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    fn forward(&mut self) -> Option<&HistoryEntry> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }
}
