//! Prefix trie used to find the nearest ancestor of each route id.

use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    /// An id ends here and has not been claimed by a parent yet.
    end: bool,
}

/// Character trie over route ids with destructive prefix queries.
///
/// Ids are inserted longest-first; each shorter id then claims, and
/// removes, the longer ids it prefixes, so every id is returned at most
/// once and always to its nearest ancestor.
#[derive(Debug, Default)]
pub struct PrefixLookupTrie {
    root: TrieNode,
    len: usize,
}

impl PrefixLookupTrie {
    /// Creates an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value. Empty strings are ignored.
    pub fn add(&mut self, value: &str) {
        if value.is_empty() {
            return;
        }
        let mut node = &mut self.root;
        for ch in value.chars() {
            node = node.children.entry(ch).or_default();
        }
        if !node.end {
            node.end = true;
            self.len += 1;
        }
    }

    /// Number of values still active in the trie.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no active values remain.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if `value` was added and not yet removed.
    pub fn contains(&self, value: &str) -> bool {
        let mut node = &self.root;
        for ch in value.chars() {
            match node.children.get(&ch) {
                Some(next) => node = next,
                None => return false,
            }
        }
        node.end
    }

    /// Removes and returns every active value starting with `prefix` that
    /// satisfies `filter`, in lexicographic order.
    pub fn find_and_remove<F>(&mut self, prefix: &str, filter: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        let mut node = &mut self.root;
        for ch in prefix.chars() {
            match node.children.get_mut(&ch) {
                Some(next) => node = next,
                None => return Vec::new(),
            }
        }

        let mut found = Vec::new();
        let mut current = prefix.to_string();
        collect_and_remove(node, &mut current, &filter, &mut found);
        self.len -= found.len();
        found
    }
}

fn collect_and_remove<F>(
    node: &mut TrieNode,
    current: &mut String,
    filter: &F,
    found: &mut Vec<String>,
) where
    F: Fn(&str) -> bool,
{
    if node.end && filter(current) {
        node.end = false;
        found.push(current.clone());
    }
    for (ch, child) in node.children.iter_mut() {
        current.push(*ch);
        collect_and_remove(child, current, filter, found);
        current.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_under(prefix: &str) -> impl Fn(&str) -> bool + '_ {
        move |candidate| matches!(candidate[prefix.len()..].chars().next(), Some('.' | '/'))
    }

    #[test]
    fn finds_only_separator_bounded_extensions() {
        let mut trie = PrefixLookupTrie::new();
        trie.add("about.team");
        trie.add("about-us");
        trie.add("about/contact");

        let found = trie.find_and_remove("about", nested_under("about"));
        assert_eq!(found, ["about.team", "about/contact"]);
        assert!(trie.contains("about-us"));
        assert!(!trie.contains("about.team"));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn removed_values_are_not_returned_again() {
        let mut trie = PrefixLookupTrie::new();
        trie.add("posts.$id.edit");
        let first = trie.find_and_remove("posts.$id", nested_under("posts.$id"));
        assert_eq!(first, ["posts.$id.edit"]);
        trie.add("posts.$id");

        let second = trie.find_and_remove("posts", nested_under("posts"));
        assert_eq!(second, ["posts.$id"]);
        assert!(trie.is_empty());
    }

    #[test]
    fn missing_prefix_returns_nothing() {
        let mut trie = PrefixLookupTrie::new();
        trie.add("blog");
        assert!(trie.find_and_remove("docs", |_| true).is_empty());
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn prefix_itself_is_a_candidate() {
        let mut trie = PrefixLookupTrie::new();
        trie.add("blog");
        assert!(trie.find_and_remove("blog", nested_under("blog")).is_empty());
        assert_eq!(trie.find_and_remove("blog", |_| true), ["blog"]);
    }

    #[test]
    fn empty_and_duplicate_adds() {
        let mut trie = PrefixLookupTrie::new();
        trie.add("");
        assert!(trie.is_empty());
        trie.add("x");
        trie.add("x");
        assert_eq!(trie.len(), 1);
    }
}
