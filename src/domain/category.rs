//! Categories are derived from the names restaurants carry. A category exists
//! while at least one restaurant is filed under it.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub slug: String,
    pub restaurant_count: usize,
}

/// Trimmed, lowercased category name. Blank names file a restaurant under no category.
pub fn normalize_category(name: &str) -> Option<String> {
    let name = name.trim().to_lowercase();
    (!name.is_empty()).then_some(name)
}

/// URL form of a normalized name: spaces become dashes.
pub fn category_slug(name: &str) -> String {
    name.replace(' ', "-")
}
