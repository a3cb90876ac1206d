/// Case-insensitive substring match on names.
///
/// Matching happens in memory because SQLite's `LIKE` only folds ASCII case
/// and treats `%` and `_` in the term as wildcards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearch {
    needle: String,
}

impl TextSearch {
    pub fn new(term: &str) -> Self {
        Self {
            needle: term.trim().to_lowercase(),
        }
    }

    /// A blank term matches everything.
    pub fn matches(&self, haystack: &str) -> bool {
        self.needle.is_empty() || haystack.to_lowercase().contains(&self.needle)
    }
}
