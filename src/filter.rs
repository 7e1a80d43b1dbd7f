use crate::types::CatalogItem;

/// Current search text. Empty means no filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    query: String,
}

impl FilterState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn push(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn pop(&mut self) {
        self.query.pop();
    }

    pub fn clear(&mut self) {
        self.query.clear();
    }

    pub fn apply<'a, T: CatalogItem>(&self, items: &'a [T]) -> Vec<&'a T> {
        filter_items(items, &self.query)
    }
}

/// Items whose title contains `query` (case-insensitive), in catalog order.
/// An empty query passes everything through.
pub fn filter_items<'a, T: CatalogItem>(items: &'a [T], query: &str) -> Vec<&'a T> {
    if query.is_empty() {
        return items.iter().collect();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.title().to_lowercase().contains(&needle))
        .collect()
}
