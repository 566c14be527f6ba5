//! Search, status, date-range filtering and sorting over record collections.
//!
//! A [`FilterView`] owns a collection plus a [`FilterState`] and derives the
//! visible, ordered subset on demand. The owned collection is never reordered
//! or mutated by filtering; every call to [`FilterView::filtered_data`] recomputes
//! from the current state, so a state change is visible immediately.
//!
//! Filters are applied in a fixed order and AND-combined:
//!
//! 1. search text, matched case-insensitively as a substring of any search field
//! 2. status, compared exactly unless it is the [`ALL_STATUSES`] sentinel
//! 3. inclusive date range on the date field (default `created_at`)
//!
//! The surviving records are then stably sorted by the optional [`SortDirective`].
//!
//! # Example
//!
//! ```rust
//! use dashkit::filter::FilterView;
//! use serde_json::json;
//!
//! let listings = vec![
//!     json!({ "name": "Harbor Loft", "status": "active", "price": 640000 }),
//!     json!({ "name": "Maple House", "status": "pending", "price": 410000 }),
//!     json!({ "name": "Harbor View", "status": "active", "price": 520000 }),
//! ];
//!
//! let mut view = FilterView::new(listings, ["name"]);
//! view.set_search_value("harbor");
//! view.set_sort_by_str("price-asc").unwrap();
//!
//! let names: Vec<_> = view.filtered_data().iter().map(|l| l["name"].clone()).collect();
//! assert_eq!(names, vec![json!("Harbor View"), json!("Harbor Loft")]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::{Record, compare_fields};

/// Status value meaning "no status filter".
pub const ALL_STATUSES: &str = "all";

/// Field compared against the status filter.
pub const STATUS_FIELD: &str = "status";

/// Field tested by the date-range filter unless overridden.
pub const DEFAULT_DATE_FIELD: &str = "created_at";

/// Bucket used by [`status_counts`] for records without a status.
pub const UNKNOWN_STATUS: &str = "unknown";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// Returns the direction's suffix form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// A field name plus direction, written `"<field>-asc"` or `"<field>-desc"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortDirective {
    /// Field to order by.
    pub field: String,
    /// Ordering direction.
    pub direction: SortDirection,
}

impl SortDirective {
    /// Creates an ascending directive.
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Creates a descending directive.
    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Compares two records by this directive.
    ///
    /// Equal values compare `Equal` so a stable sort keeps their input order.
    pub fn compare<R: Record>(&self, a: &R, b: &R) -> Ordering {
        let left = a.field(&self.field);
        let right = b.field(&self.field);
        let ord = compare_fields(left.as_ref(), right.as_ref());
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

impl fmt::Display for SortDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.field, self.direction.as_str())
    }
}

/// Error returned when parsing a malformed sort directive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseSortError {
    /// The directive has no `-` separator.
    #[error("sort directive {0:?} must look like \"<field>-asc\" or \"<field>-desc\"")]
    MissingDirection(String),
    /// Nothing precedes the direction.
    #[error("sort directive {0:?} has no field name")]
    MissingField(String),
    /// The suffix is neither `asc` nor `desc`.
    #[error("unknown sort direction {0:?} (expected \"asc\" or \"desc\")")]
    UnknownDirection(String),
}

impl FromStr for SortDirective {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = s
            .rsplit_once('-')
            .ok_or_else(|| ParseSortError::MissingDirection(s.to_string()))?;
        if field.is_empty() {
            return Err(ParseSortError::MissingField(s.to_string()));
        }
        let direction = match direction.to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return Err(ParseSortError::UnknownDirection(direction.to_string())),
        };
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// User-controlled filter inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Free-text search; empty means no search.
    pub search_text: String,
    /// Status to match exactly, or [`ALL_STATUSES`].
    pub status: String,
    /// Optional ordering.
    pub sort: Option<SortDirective>,
    /// Inclusive lower bound on the date field.
    pub range_start: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the date field.
    pub range_end: Option<DateTime<Utc>>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            status: ALL_STATUSES.to_string(),
            sort: None,
            range_start: None,
            range_end: None,
        }
    }
}

impl FilterState {
    /// Creates the default, inactive state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether any filter or sort is applied.
    #[must_use]
    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }

    /// Resets every field to its default in one step.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns true if `record` passes every active filter.
    pub fn matches<R: Record>(
        &self,
        record: &R,
        search_fields: &[String],
        date_field: &str,
    ) -> bool {
        self.matches_search(record, search_fields)
            && self.matches_status(record)
            && self.matches_range(record, date_field)
    }

    fn matches_search<R: Record>(&self, record: &R, search_fields: &[String]) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        let needle = self.search_text.to_lowercase();
        search_fields.iter().any(|name| {
            record
                .field(name)
                .is_some_and(|value| value.to_text().to_lowercase().contains(&needle))
        })
    }

    fn matches_status<R: Record>(&self, record: &R) -> bool {
        if self.status == ALL_STATUSES {
            return true;
        }
        record
            .field(STATUS_FIELD)
            .is_some_and(|value| value.to_text() == self.status.as_str())
    }

    fn matches_range<R: Record>(&self, record: &R, date_field: &str) -> bool {
        if self.range_start.is_none() && self.range_end.is_none() {
            return true;
        }
        let Some(at) = record.field(date_field).and_then(|v| v.as_timestamp()) else {
            return false;
        };
        self.range_start.is_none_or(|start| at >= start)
            && self.range_end.is_none_or(|end| at <= end)
    }

    /// Returns indices into `data` of the matching records, in display order.
    pub fn apply_indices<R: Record>(
        &self,
        data: &[R],
        search_fields: &[String],
        date_field: &str,
    ) -> Vec<usize> {
        let mut indices: Vec<usize> = data
            .iter()
            .enumerate()
            .filter(|(_, record)| self.matches(*record, search_fields, date_field))
            .map(|(index, _)| index)
            .collect();

        if let Some(sort) = &self.sort {
            // `sort_by` is stable: ties keep their relative input order.
            indices.sort_by(|&a, &b| sort.compare(&data[a], &data[b]));
        }

        tracing::trace!(
            total = data.len(),
            matched = indices.len(),
            sorted = self.sort.is_some(),
            "filter applied"
        );
        indices
    }

    /// Returns the matching records, in display order.
    pub fn apply<'a, R: Record>(
        &self,
        data: &'a [R],
        search_fields: &[String],
        date_field: &str,
    ) -> Vec<&'a R> {
        self.apply_indices(data, search_fields, date_field)
            .into_iter()
            .map(|i| &data[i])
            .collect()
    }
}

/// A collection plus the filter state that derives its visible view.
#[derive(Debug, Clone)]
pub struct FilterView<R> {
    data: Vec<R>,
    search_fields: Vec<String>,
    date_field: String,
    state: FilterState,
}

impl<R: Record> FilterView<R> {
    /// Creates a view over `data`, searching the given fields in order.
    pub fn new<I, S>(data: Vec<R>, search_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            data,
            search_fields: search_fields.into_iter().map(Into::into).collect(),
            date_field: DEFAULT_DATE_FIELD.to_string(),
            state: FilterState::default(),
        }
    }

    /// Sets the field tested by the date-range filter.
    #[must_use]
    pub fn date_field(mut self, field: impl Into<String>) -> Self {
        self.date_field = field.into();
        self
    }

    /// Replaces the underlying collection, keeping the filter state.
    pub fn set_data(&mut self, data: Vec<R>) {
        self.data = data;
    }

    /// Returns the unfiltered collection.
    #[must_use]
    pub fn data(&self) -> &[R] {
        &self.data
    }

    /// Returns the search fields.
    #[must_use]
    pub fn search_fields(&self) -> &[String] {
        &self.search_fields
    }

    /// Returns the date field name.
    #[must_use]
    pub fn get_date_field(&self) -> &str {
        &self.date_field
    }

    /// Returns the current filter state.
    #[must_use]
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Replaces the whole filter state.
    pub fn set_state(&mut self, state: FilterState) {
        self.state = state;
    }

    /// Returns the search text.
    #[must_use]
    pub fn search_value(&self) -> &str {
        &self.state.search_text
    }

    /// Sets the search text.
    pub fn set_search_value(&mut self, value: impl Into<String>) {
        self.state.search_text = value.into();
    }

    /// Returns the selected status.
    #[must_use]
    pub fn selected_status(&self) -> &str {
        &self.state.status
    }

    /// Sets the selected status; [`ALL_STATUSES`] disables the filter.
    pub fn set_selected_status(&mut self, status: impl Into<String>) {
        self.state.status = status.into();
    }

    /// Returns the sort directive.
    #[must_use]
    pub fn sort_by(&self) -> Option<&SortDirective> {
        self.state.sort.as_ref()
    }

    /// Sets or clears the sort directive.
    pub fn set_sort_by(&mut self, sort: Option<SortDirective>) {
        self.state.sort = sort;
    }

    /// Sets the sort directive from its text form; an empty string clears it.
    ///
    /// # Errors
    ///
    /// Returns [`ParseSortError`] and leaves the current directive untouched if
    /// `value` is malformed.
    pub fn set_sort_by_str(&mut self, value: &str) -> Result<(), ParseSortError> {
        self.state.sort = if value.is_empty() {
            None
        } else {
            Some(value.parse()?)
        };
        Ok(())
    }

    /// Returns the inclusive lower date bound.
    #[must_use]
    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.state.range_start
    }

    /// Sets the inclusive lower date bound.
    pub fn set_start_date(&mut self, start: Option<DateTime<Utc>>) {
        self.state.range_start = start;
    }

    /// Returns the inclusive upper date bound.
    #[must_use]
    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.state.range_end
    }

    /// Sets the inclusive upper date bound.
    pub fn set_end_date(&mut self, end: Option<DateTime<Utc>>) {
        self.state.range_end = end;
    }

    /// Resets search, status, sort and date range to their defaults.
    pub fn clear_filters(&mut self) {
        self.state.clear();
    }

    /// Indices into [`data`](Self::data) of the visible records, in order.
    #[must_use]
    pub fn filtered_indices(&self) -> Vec<usize> {
        self.state
            .apply_indices(&self.data, &self.search_fields, &self.date_field)
    }

    /// The visible records, in order.
    #[must_use]
    pub fn filtered_data(&self) -> Vec<&R> {
        self.state
            .apply(&self.data, &self.search_fields, &self.date_field)
    }
}

/// Counts records per status, in first-seen order.
///
/// Records without a status are counted under [`UNKNOWN_STATUS`].
pub fn status_counts<R: Record>(records: &[R]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in records {
        let status = record
            .field(STATUS_FIELD)
            .map_or_else(|| UNKNOWN_STATUS.to_string(), |v| v.to_text().into_owned());
        match counts.iter_mut().find(|(s, _)| *s == status) {
            Some((_, n)) => *n += 1,
            None => counts.push((status, 1)),
        }
    }
    counts
}
