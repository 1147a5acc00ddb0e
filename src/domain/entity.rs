//! Tracked-entity domain models.
//!
//! This module defines the read-only view-model types that flow from the data
//! layer through the presenter into the view: searchable attribute definitions,
//! programs, matched entity instances, and the paged result envelope produced
//! by each search execution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Number of seconds in one minute.
const SECONDS_PER_MINUTE: i64 = 60;

/// Number of seconds in one hour.
const SECONDS_PER_HOUR: i64 = 3600;

/// Number of seconds in one day.
const SECONDS_PER_DAY: i64 = 86400;

/// The kind of value a tracked-entity attribute holds.
///
/// The value type decides how the form renders and edits a field: text and
/// number fields take free input, date fields open the modal date picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    /// Free-form text, matched case-insensitively by substring.
    Text,
    /// Numeric text, matched like text but edited with digit input only.
    Number,
    /// An ISO calendar date (`YYYY-MM-DD`), matched exactly.
    Date,
}

/// A searchable field definition.
///
/// Attributes are created by the data layer and passed into the view for each
/// form render. An attribute with a non-empty option list constrains entered
/// values to that fixed choice list.
///
/// # Fields
///
/// - `id`: Stable identifier used to key filter values and instance values
/// - `label`: Human-readable name shown next to the form field
/// - `value_type`: How the field is edited and matched
/// - `options`: Fixed choice list; empty for free-input attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEntityAttribute {
    pub id: String,
    pub label: String,
    pub value_type: ValueType,
    #[serde(default)]
    pub options: Vec<String>,
}

impl TrackedEntityAttribute {
    /// Creates a free-input attribute with no option list.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value_type,
            options: Vec::new(),
        }
    }

    /// Creates an option-set attribute constrained to the given choices.
    #[must_use]
    pub fn with_options(
        id: impl Into<String>,
        label: impl Into<String>,
        options: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value_type: ValueType::Text,
            options,
        }
    }

    /// Returns `true` when entered values are constrained to a choice list.
    #[must_use]
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

/// A single row of the dynamic search form: an attribute definition plus the
/// value currently entered for it (possibly empty).
///
/// The presenter builds these from the attribute scope and its recorded filter
/// values; the view renders them without mutating the definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeField {
    pub attribute: TrackedEntityAttribute,
    pub value: String,
}

impl AttributeField {
    /// Creates an empty form field for the given attribute.
    #[must_use]
    pub fn new(attribute: TrackedEntityAttribute) -> Self {
        Self {
            attribute,
            value: String::new(),
        }
    }

    /// Creates a form field carrying an already-entered value.
    #[must_use]
    pub fn with_value(attribute: TrackedEntityAttribute, value: impl Into<String>) -> Self {
        Self {
            attribute,
            value: value.into(),
        }
    }

    /// Returns `true` when no value has been entered for this field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Whether typed input is accepted by this field.
    ///
    /// Option and date values are picked rather than typed, and number
    /// fields accept only ASCII digits.
    #[must_use]
    pub fn accepts_char(&self, c: char) -> bool {
        if self.attribute.has_options() {
            return false;
        }
        match self.attribute.value_type {
            ValueType::Date => false,
            ValueType::Number => c.is_ascii_digit(),
            ValueType::Text => !c.is_control(),
        }
    }

    /// Whether the value is picked from a closed set or calendar.
    ///
    /// Picked values are cleared whole instead of character by character.
    #[must_use]
    pub fn is_picked(&self) -> bool {
        self.attribute.has_options() || self.attribute.value_type == ValueType::Date
    }

    /// Whether confirming this field opens the date picker.
    #[must_use]
    pub fn opens_picker(&self) -> bool {
        self.attribute.value_type == ValueType::Date && !self.attribute.has_options()
    }
}

/// A selectable program.
///
/// Selecting a program narrows the search to instances enrolled in it and
/// restricts the form to the attributes searchable within it.
///
/// # Fields
///
/// - `id`: Stable program identifier
/// - `name`: Display name shown in the selector
/// - `attribute_ids`: Ids of the attributes searchable within this program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: String,
    pub name: String,
    pub attribute_ids: Vec<String>,
}

impl Program {
    /// Creates a program with the given searchable attribute scope.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, attribute_ids: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attribute_ids,
        }
    }
}

/// A single matched entity.
///
/// Instances are opaque to the view layer beyond rendering in a result row.
/// Attribute values are keyed by attribute id; `programs` lists the program
/// ids the instance is enrolled in.
///
/// # Fields
///
/// - `id`: Stable instance identifier
/// - `org_unit`: Organisation unit the instance is registered under
/// - `programs`: Program ids the instance is enrolled in
/// - `values`: Attribute values keyed by attribute id
/// - `last_updated`: Unix timestamp of the most recent change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEntityInstance {
    pub id: String,
    pub org_unit: String,
    pub programs: Vec<String>,
    pub values: BTreeMap<String, String>,
    pub last_updated: i64,
}

impl TrackedEntityInstance {
    /// Creates an instance with no attribute values, stamped with the current time.
    #[must_use]
    pub fn new(id: impl Into<String>, org_unit: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            org_unit: org_unit.into(),
            programs: Vec::new(),
            values: BTreeMap::new(),
            last_updated: chrono::Utc::now().timestamp(),
        }
    }

    /// Returns the value recorded for the given attribute, if any.
    #[must_use]
    pub fn value_of(&self, attribute_id: &str) -> Option<&str> {
        self.values.get(attribute_id).map(String::as_str)
    }

    /// Returns `true` when the instance is enrolled in the given program.
    #[must_use]
    pub fn enrolled_in(&self, program_id: &str) -> bool {
        self.programs.iter().any(|p| p == program_id)
    }

    /// Returns the instance's values in the order of the given attributes,
    /// substituting an empty string for attributes without a value.
    ///
    /// Result rows and the fuzzy-search haystack are built from this ordering
    /// so both stay consistent with the rendered form.
    #[must_use]
    pub fn display_values(&self, attributes: &[TrackedEntityAttribute]) -> Vec<String> {
        attributes
            .iter()
            .map(|a| self.value_of(&a.id).unwrap_or_default().to_string())
            .collect()
    }

    /// Returns a human-readable string describing how long ago the instance
    /// was last updated.
    ///
    /// The format varies based on the time elapsed:
    /// - Less than 1 minute: "just now"
    /// - Less than 1 hour: "Xm ago" (e.g., "5m ago")
    /// - Less than 1 day: "Xh ago" (e.g., "3h ago")
    /// - 1 day or more: "Xd ago" (e.g., "7d ago")
    #[must_use]
    pub fn updated_ago(&self) -> String {
        let now = chrono::Utc::now().timestamp();
        let diff = now - self.last_updated;

        if diff < SECONDS_PER_MINUTE {
            "just now".to_string()
        } else if diff < SECONDS_PER_HOUR {
            let mins = diff / SECONDS_PER_MINUTE;
            format!("{mins}m ago")
        } else if diff < SECONDS_PER_DAY {
            let hours = diff / SECONDS_PER_HOUR;
            format!("{hours}h ago")
        } else {
            let days = diff / SECONDS_PER_DAY;
            format!("{days}d ago")
        }
    }
}

/// Pagination metadata for one search execution.
///
/// `total` is the full match count across all pages; the envelope's instance
/// list holds only the requested page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pager {
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

impl Pager {
    /// Computes pagination metadata for a match count.
    ///
    /// `page_count` is the number of pages needed to hold `total` matches at
    /// `page_size` per page, which is zero when there are no matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use teisearch::domain::Pager;
    ///
    /// let pager = Pager::for_total(1, 50, 120);
    /// assert_eq!(pager.page_count, 3);
    /// assert_eq!(pager.total, 120);
    ///
    /// assert_eq!(Pager::for_total(1, 50, 0).page_count, 0);
    /// ```
    #[must_use]
    pub fn for_total(page: usize, page_size: usize, total: usize) -> Self {
        let page_count = if page_size == 0 {
            0
        } else {
            total.div_ceil(page_size)
        };
        Self {
            page,
            page_count,
            total,
        }
    }
}

/// The result envelope produced by one search execution.
///
/// Replaces the prior envelope entirely on arrival; no incremental merge
/// happens anywhere downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub pager: Pager,
    pub instances: Vec<TrackedEntityInstance>,
}

impl SearchResults {
    /// Creates an envelope with no matches.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            pager: Pager::for_total(1, 0, 0),
            instances: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute(id: &str, label: &str) -> TrackedEntityAttribute {
        TrackedEntityAttribute::new(id, label, ValueType::Text)
    }

    #[test]
    fn pager_rounds_page_count_up() {
        assert_eq!(Pager::for_total(1, 50, 120).page_count, 3);
        assert_eq!(Pager::for_total(1, 50, 100).page_count, 2);
        assert_eq!(Pager::for_total(1, 50, 1).page_count, 1);
    }

    #[test]
    fn pager_is_empty_for_no_matches() {
        let pager = Pager::for_total(1, 50, 0);
        assert_eq!(pager.page_count, 0);
        assert_eq!(pager.total, 0);
    }

    #[test]
    fn option_attributes_report_options() {
        let gender = TrackedEntityAttribute::with_options(
            "gender",
            "Gender",
            vec!["Female".to_string(), "Male".to_string()],
        );
        assert!(gender.has_options());
        assert!(!attribute("name", "Name").has_options());
    }

    #[test]
    fn display_values_follow_attribute_order() {
        let mut instance = TrackedEntityInstance::new("tei-1", "Clinic A");
        instance
            .values
            .insert("last".to_string(), "Okoth".to_string());
        instance
            .values
            .insert("first".to_string(), "Awino".to_string());

        let ordered = instance.display_values(&[
            attribute("first", "First name"),
            attribute("last", "Last name"),
            attribute("dob", "Date of birth"),
        ]);
        assert_eq!(ordered, vec!["Awino", "Okoth", ""]);
    }

    #[test]
    fn updated_ago_formats_by_magnitude() {
        let mut instance = TrackedEntityInstance::new("tei-1", "Clinic A");
        assert_eq!(instance.updated_ago(), "just now");

        instance.last_updated = chrono::Utc::now().timestamp() - 300;
        assert_eq!(instance.updated_ago(), "5m ago");

        instance.last_updated = chrono::Utc::now().timestamp() - 2 * SECONDS_PER_HOUR;
        assert_eq!(instance.updated_ago(), "2h ago");

        instance.last_updated = chrono::Utc::now().timestamp() - 3 * SECONDS_PER_DAY;
        assert_eq!(instance.updated_ago(), "3d ago");
    }

    #[test]
    fn empty_envelope_has_zero_total() {
        let results = SearchResults::empty();
        assert_eq!(results.pager.total, 0);
        assert!(results.instances.is_empty());
    }
}
