//! TagCollector - stock tag processor

use contracts::{FragmentMetadata, MkvTag, TagProcessor};
use tracing::trace;

/// Keeps the tags of the current cluster in arrival order
#[derive(Debug, Clone, Default)]
pub struct TagCollector {
    tags: Vec<MkvTag>,
}

impl TagCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded tags in arrival order
    pub fn tags(&self) -> &[MkvTag] {
        &self.tags
    }
}

impl TagProcessor for TagCollector {
    fn process(&mut self, tag: &MkvTag, fragment: Option<&FragmentMetadata>) {
        trace!(
            name = %tag.name,
            fragment = ?fragment.map(|f| f.fragment_number.as_str()),
            "tag recorded"
        );
        self.tags.push(tag.clone());
    }

    fn clear(&mut self) {
        self.tags.clear();
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .rev()
            .find(|tag| tag.name == name)
            .map(|tag| tag.value.as_str())
    }

    fn len(&self) -> usize {
        self.tags.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_value_wins() {
        let mut collector = TagCollector::new();
        collector.process(&MkvTag::new("k", "v1"), None);
        collector.process(&MkvTag::new("k", "v2"), None);

        assert_eq!(collector.len(), 2);
        assert_eq!(collector.get("k"), Some("v2"));
        assert_eq!(collector.get("missing"), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut collector = TagCollector::new();
        collector.process(&MkvTag::new("k", "v"), None);

        collector.clear();
        assert!(collector.is_empty());

        collector.clear();
        assert!(collector.is_empty());
        assert!(collector.tags().is_empty());
    }
}
