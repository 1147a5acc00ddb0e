//! Search query execution over the in-memory catalog.
//!
//! Implements the narrowing pipeline every search runs through: program scope,
//! per-attribute filters, then a tokenized fuzzy pass over each instance's
//! display values. Surviving matches are ordered by last update (most recent
//! first) and paginated into a result envelope whose pager counts all matches.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::domain::entity::{
    Pager, SearchResults, TrackedEntityAttribute, TrackedEntityInstance, ValueType,
};
use crate::domain::query::SearchQuery;

/// Executes a query against the given catalog.
///
/// The attribute slice supplies value types for filter matching and the
/// display ordering the fuzzy haystack is built from. Instances failing any
/// narrowing step are excluded; the rest are sorted by `last_updated`
/// descending (ties by id) and cut to the requested page.
///
/// # Parameters
///
/// * `attributes` - Full attribute catalog in form order
/// * `instances` - Instances to search
/// * `query` - Scope, filters, global query, and page window
#[must_use]
pub fn execute(
    attributes: &[TrackedEntityAttribute],
    instances: &[TrackedEntityInstance],
    query: &SearchQuery,
) -> SearchResults {
    let _span = tracing::debug_span!(
        "execute_query",
        instance_count = instances.len(),
        filter_count = query.attribute_filters.len(),
        query_len = query.query.len()
    )
    .entered();

    let tokens: Vec<String> = if query.query.trim().is_empty() {
        vec![]
    } else {
        query
            .query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect()
    };

    let matcher = if tokens.is_empty() {
        None
    } else {
        Some(SkimMatcherV2::default())
    };

    let mut matched: Vec<&TrackedEntityInstance> = instances
        .iter()
        .filter(|instance| {
            let in_scope = query
                .program
                .as_ref()
                .map_or(true, |program_id| instance.enrolled_in(program_id));

            if !in_scope {
                return false;
            }

            if !passes_attribute_filters(attributes, instance, query) {
                return false;
            }

            matcher.as_ref().map_or(true, |m| {
                let haystack = fuzzy_haystack(attributes, instance);
                tokens.iter().all(|token| m.fuzzy_match(&haystack, token).is_some())
            })
        })
        .collect();

    matched.sort_by(|a, b| {
        b.last_updated
            .cmp(&a.last_updated)
            .then_with(|| a.id.cmp(&b.id))
    });

    let total = matched.len();
    let pager = Pager::for_total(query.page, query.page_size, total);

    let start = query.page.saturating_sub(1).saturating_mul(query.page_size);
    let page: Vec<TrackedEntityInstance> = matched
        .into_iter()
        .skip(start)
        .take(query.page_size)
        .cloned()
        .collect();

    tracing::debug!(total = total, page_len = page.len(), "query executed");

    SearchResults {
        pager,
        instances: page,
    }
}

/// Checks every non-empty attribute filter against one instance.
///
/// Text and number values match case-insensitively by substring; date values
/// match the exact ISO day. An instance with no value for a filtered attribute
/// fails that filter. Filters naming unknown attributes match as text.
fn passes_attribute_filters(
    attributes: &[TrackedEntityAttribute],
    instance: &TrackedEntityInstance,
    query: &SearchQuery,
) -> bool {
    query.attribute_filters.iter().all(|filter| {
        let wanted = filter.value.trim();
        if wanted.is_empty() {
            return true;
        }

        let Some(actual) = instance.value_of(&filter.attribute_id) else {
            return false;
        };

        let value_type = attributes
            .iter()
            .find(|a| a.id == filter.attribute_id)
            .map_or(ValueType::Text, |a| a.value_type);

        match value_type {
            ValueType::Date => actual.trim() == wanted,
            ValueType::Text | ValueType::Number => {
                actual.to_lowercase().contains(&wanted.to_lowercase())
            }
        }
    })
}

/// Builds the lowercased haystack the global query tokens match against:
/// the instance's display values in attribute order plus its org unit.
fn fuzzy_haystack(attributes: &[TrackedEntityAttribute], instance: &TrackedEntityInstance) -> String {
    let mut parts = instance.display_values(attributes);
    parts.push(instance.org_unit.clone());
    parts.join(" ").to_lowercase()
}
