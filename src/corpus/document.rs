//! Documents as word-presence sets.

use std::collections::HashSet;

/// A named document reduced to the set of distinct words it contains.
///
/// Only presence is modeled: a word appearing ten times counts the same as
/// a word appearing once. The word set may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    words: HashSet<String>,
}

impl Document {
    /// Create a document; duplicate words collapse to one.
    pub fn new<N, I, W>(name: N, words: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        Self {
            name: name.into(),
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Document name (also its key in the corpus).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `word` occurs in the document.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Distinct words, in no particular order.
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(String::as_str)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when the document has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_collapse() {
        let doc = Document::new("a.txt", ["cat", "dog", "cat", "cat"]);
        assert_eq!(doc.len(), 2);
        assert!(doc.contains("cat"));
        assert!(doc.contains("dog"));
        assert!(!doc.contains("bird"));
    }

    #[test]
    fn empty_document_is_legal() {
        let doc = Document::new("empty.txt", Vec::<String>::new());
        assert!(doc.is_empty());
        assert_eq!(doc.name(), "empty.txt");
        assert!(!doc.contains(""));
    }

    #[test]
    fn membership_is_case_sensitive() {
        let doc = Document::new("d", ["Rust"]);
        assert!(doc.contains("Rust"));
        assert!(!doc.contains("rust"));
    }
}
