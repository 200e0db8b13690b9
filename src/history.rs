use chrono::{ DateTime, Local };
use std::collections::VecDeque;

pub const DEFAULT_MAX_HISTORY: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEntry {
    query: String,
    response: String,
    timestamp: DateTime<Local>,
}

impl ConversationEntry {
    pub fn new(query: String, response: String, timestamp: DateTime<Local>) -> Self {
        Self { query, response, timestamp }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    fn matches(&self, needle_lower: &str) -> bool {
        self.query.to_lowercase().contains(needle_lower) ||
            self.response.to_lowercase().contains(needle_lower)
    }
}

/// One page of history, newest first. `number` is the 1-based position of
/// the entry in the session, oldest = 1.
#[derive(Debug)]
pub struct HistoryPage<'a> {
    pub entries: Vec<(usize, &'a ConversationEntry)>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

#[derive(Debug)]
pub struct ConversationHistory {
    entries: VecDeque<ConversationEntry>,
    max_history: usize,
    // entries trimmed off the front, so numbering stays stable
    dropped: usize,
}

impl ConversationHistory {
    pub fn new(max_history: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_history: max_history.max(1),
            dropped: 0,
        }
    }

    pub fn push(&mut self, query: String, response: String) -> &ConversationEntry {
        self.push_entry(ConversationEntry::new(query, response, Local::now()))
    }

    pub fn push_entry(&mut self, entry: ConversationEntry) -> &ConversationEntry {
        self.entries.push_back(entry);
        while self.entries.len() > self.max_history {
            self.entries.pop_front();
            self.dropped += 1;
        }
        &self.entries[self.entries.len() - 1]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.dropped = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationEntry> {
        self.entries.back()
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &ConversationEntry> {
        self.entries.iter().rev()
    }

    pub fn search(&self, term: &str) -> Vec<&ConversationEntry> {
        let needle = term.to_lowercase();
        self.newest_first()
            .filter(|e| e.matches(&needle))
            .collect()
    }

    /// `page` is 1-based and clamped into range. A blank filter matches everything.
    pub fn page(&self, filter: Option<&str>, page: usize, page_size: usize) -> HistoryPage<'_> {
        let page_size = page_size.max(1);
        let needle = filter
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase);

        let matching: Vec<(usize, &ConversationEntry)> = self.entries
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, e)| needle.as_deref().map_or(true, |n| e.matches(n)))
            .map(|(idx, e)| (self.dropped + idx + 1, e))
            .collect();

        let total_matches = matching.len();
        let total_pages = total_matches.div_ceil(page_size).max(1);
        let page = page.clamp(1, total_pages);

        let entries = matching
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect();

        HistoryPage { entries, page, total_pages, total_matches }
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format("%b %d, %Y %I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn filled(n: usize, max: usize) -> ConversationHistory {
        let mut history = ConversationHistory::new(max);
        for i in 0..n {
            history.push(format!("question {}", i), format!("answer {}", i));
        }
        history
    }

    #[test]
    fn push_appends_in_order() {
        let history = filled(3, 10);
        assert_eq!(history.len(), 3);
        assert_eq!(history.last().map(|e| e.query()), Some("question 2"));
        let newest: Vec<&str> = history.newest_first().map(|e| e.query()).collect();
        assert_eq!(newest, vec!["question 2", "question 1", "question 0"]);
    }

    #[test]
    fn trims_oldest_beyond_max() {
        let history = filled(8, 5);
        assert_eq!(history.len(), 5);
        assert_eq!(history.newest_first().last().map(|e| e.query()), Some("question 3"));

        // numbering keeps counting from the start of the session
        let page = history.page(None, 1, 10);
        assert_eq!(page.entries.first().map(|(n, _)| *n), Some(8));
        assert_eq!(page.entries.last().map(|(n, _)| *n), Some(4));
    }

    #[test]
    fn clear_empties_regardless_of_length() {
        for n in [0, 1, 7, 50, 120] {
            let mut history = filled(n, 50);
            history.clear();
            assert!(history.is_empty());
            assert_eq!(history.newest_first().count(), 0);
        }
    }

    #[test]
    fn search_is_case_insensitive_over_both_fields() {
        let mut history = ConversationHistory::new(10);
        history.push("What is Rust?".into(), "A systems language".into());
        history.push("weather".into(), "Sunny".into());
        history.push("tell me more".into(), "RUST has ownership".into());

        let hits: Vec<&str> = history.search("rust").iter().map(|e| e.query()).collect();
        assert_eq!(hits, vec!["tell me more", "What is Rust?"]);
        assert!(history.search("snow").is_empty());
    }

    #[test]
    fn pages_newest_first_and_clamps() {
        let history = filled(12, 50);
        let first = history.page(None, 1, 5);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_matches, 12);
        assert_eq!(first.entries.len(), 5);
        assert_eq!(first.entries[0].1.query(), "question 11");
        assert_eq!(first.entries[0].0, 12);

        let last = history.page(None, 3, 5);
        assert_eq!(last.entries.len(), 2);
        assert_eq!(last.entries[1].1.query(), "question 0");

        let beyond = history.page(None, 99, 5);
        assert_eq!(beyond.page, 3);

        let zero = history.page(None, 0, 5);
        assert_eq!(zero.page, 1);
    }

    #[test]
    fn page_with_filter() {
        let history = filled(12, 50);
        let page = history.page(Some("answer 1"), 1, 5);
        // "answer 1", "answer 10", "answer 11"
        assert_eq!(page.total_matches, 3);
        assert_eq!(page.entries[0].0, 12);

        let blank = history.page(Some("   "), 1, 5);
        assert_eq!(blank.total_matches, 12);
    }

    #[test]
    fn empty_history_has_one_empty_page() {
        let history = ConversationHistory::default();
        let page = history.page(None, 1, 5);
        assert_eq!(page.total_pages, 1);
        assert!(page.entries.is_empty());
    }

    #[test]
    fn formats_timestamp() {
        let ts = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
        assert_eq!(format_timestamp(&ts), "Mar 05, 2024 02:07 PM");
    }
}
