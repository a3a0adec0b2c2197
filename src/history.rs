//! In-memory command history.
use std::collections::VecDeque;

/// A fixed-capacity ring of entered lines; the oldest entries are dropped
/// first.
#[derive(Debug, Clone)]
pub struct History {
    capacity: usize,
    /// The 1-based number of the oldest entry kept.
    first: usize,
    entries: VecDeque<String>,
}

impl History {
    pub fn new(capacity: usize) -> History {
        History {
            capacity,
            first: 1,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `nth` most recent entry (0 is the last one).
    pub fn nth_last(&self, nth: usize) -> Option<&str> {
        let len = self.entries.len();
        if nth >= len {
            return None;
        }

        self.entries.get(len - nth - 1).map(String::as_str)
    }

    /// Records `line`, unless it is blank or the same as the previous entry.
    pub fn append(&mut self, line: &str) {
        let line = line.trim_end();
        if line.trim().is_empty() || self.capacity == 0 {
            return;
        }

        // Ignore if `line` is same as the last command.
        if self.nth_last(0) == Some(line) {
            return;
        }

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.first += 1;
        }

        self.entries.push_back(line.to_owned());
    }

    /// Entries from the oldest to the newest along with their numbers.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        let first = self.first;
        self.entries
            .iter()
            .enumerate()
            .map(move |(i, line)| (first + i, line.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ring() {
        let mut history = History::new(2);
        history.append("echo 1");
        history.append("echo 1");
        history.append("  ");
        assert_eq!(history.len(), 1);

        history.append("echo 2");
        history.append("echo 3\n");
        assert_eq!(history.nth_last(0), Some("echo 3"));
        assert_eq!(history.nth_last(1), Some("echo 2"));
        assert_eq!(history.nth_last(2), None);
        assert_eq!(
            history.iter().collect::<Vec<_>>(),
            vec![(2, "echo 2"), (3, "echo 3")]
        );
    }

    #[test]
    fn zero_capacity() {
        let mut history = History::new(0);
        history.append("echo");
        assert!(history.is_empty());
    }
}
