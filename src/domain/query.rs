//! Search query composition.
//!
//! The presenter records the user's program scope, per-attribute filter
//! values, and global query text, then snapshots them into a [`SearchQuery`]
//! for each dispatch. The storage layer executes the query; nothing in this
//! module touches the store.

use serde::{Deserialize, Serialize};

/// One per-attribute filter: the attribute to match and the entered value.
///
/// How the value matches depends on the attribute's value type: text and
/// number values match case-insensitively by substring, date values match the
/// exact ISO day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeFilter {
    pub attribute_id: String,
    pub value: String,
}

impl AttributeFilter {
    /// Creates a filter for the given attribute and entered value.
    #[must_use]
    pub fn new(attribute_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute_id: attribute_id.into(),
            value: value.into(),
        }
    }
}

/// A snapshot of everything that narrows one search execution.
///
/// # Fields
///
/// - `program`: Program id scope; `None` searches across all programs
/// - `attribute_filters`: Non-empty entered form values
/// - `query`: Global free-text query, tokenized and fuzzy-matched
/// - `page`: 1-based page to return
/// - `page_size`: Maximum instances per page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub program: Option<String>,
    pub attribute_filters: Vec<AttributeFilter>,
    pub query: String,
    pub page: usize,
    pub page_size: usize,
}

impl SearchQuery {
    /// Creates an unfiltered first-page query.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            program: None,
            attribute_filters: Vec::new(),
            query: String::new(),
            page: 1,
            page_size,
        }
    }

    /// Builder-style program scope, used mostly by tests.
    #[must_use]
    pub fn in_program(mut self, program_id: impl Into<String>) -> Self {
        self.program = Some(program_id.into());
        self
    }

    /// Builder-style attribute filter, used mostly by tests.
    #[must_use]
    pub fn filter(mut self, attribute_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.attribute_filters
            .push(AttributeFilter::new(attribute_id, value));
        self
    }

    /// Returns `true` when nothing narrows the search.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.program.is_none() && self.attribute_filters.is_empty() && self.query.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_query_is_unfiltered() {
        assert!(SearchQuery::new(50).is_unfiltered());
    }

    #[test]
    fn scope_and_filters_mark_query_filtered() {
        assert!(!SearchQuery::new(50).in_program("prog-mch").is_unfiltered());
        assert!(!SearchQuery::new(50).filter("first", "Aw").is_unfiltered());

        let mut query = SearchQuery::new(50);
        query.query = "awino".to_string();
        assert!(!query.is_unfiltered());
    }
}
