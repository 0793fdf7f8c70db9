use std::collections::HashSet;

/// Codenames handled during one run.
///
/// Owned by a single run and passed down the walk by `&mut`, so concurrent
/// runs never see each other's entries.
#[derive(Debug, Default)]
pub struct ProcessedSet {
    codenames: HashSet<String>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, codename: &str) -> bool {
        self.codenames.contains(codename)
    }

    /// Mark `codename` as handled. Returns `false` if it already was.
    pub fn insert(&mut self, codename: &str) -> bool {
        self.codenames.insert(codename.to_string())
    }

    pub fn reset(&mut self) {
        self.codenames.clear();
    }

    pub fn len(&self) -> usize {
        self.codenames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codenames.is_empty()
    }
}
