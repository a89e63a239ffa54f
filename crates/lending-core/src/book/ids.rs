use std::collections::HashMap;

/// Source of record identifiers for the loan book.
pub trait IdGenerator {
    /// Next identifier for the record family named by `prefix`.
    fn next_id(&mut self, prefix: &str) -> String;
}

/// Per-prefix counters: `c1`, `c2`, `l1`, `col1`, ...
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    counters: HashMap<String, u64>,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        let n = self.counters.entry(prefix.to_string()).or_insert(0);
        *n += 1;
        format!("{prefix}{n}")
    }
}
