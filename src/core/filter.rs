// Sayaç CRM - core/filter.rs
//
// Filter engine for the record list.
// All active filters are AND-combined; output keeps input order.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{Pipeline, Record, Segment};
use crate::util::constants::ALL_FILTER_LABEL;

/// Complete filter state. All fields are AND-combined when applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Substring text search (case-insensitive). Empty = no filter.
    pub query: String,

    /// Segment to include. None = "Hepsi" (all segments).
    pub segment: Option<Segment>,

    /// Pipeline stage to include. None = "Hepsi" (all stages).
    pub pipeline: Option<Pipeline>,
}

impl FilterState {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.segment.is_none() && self.pipeline.is_none()
    }

    /// Build a filter from the raw menu strings a UI holds.
    ///
    /// Unrecognised segment/pipeline labels return `None` so the caller can
    /// report them rather than silently matching nothing.
    pub fn from_choices(query: &str, segment: &str, pipeline: &str) -> Option<Self> {
        Some(Self {
            query: query.to_string(),
            segment: parse_segment_choice(segment)?,
            pipeline: parse_pipeline_choice(pipeline)?,
        })
    }
}

/// Parse a segment menu choice. `Some(None)` is "Hepsi".
pub fn parse_segment_choice(choice: &str) -> Option<Option<Segment>> {
    if choice == ALL_FILTER_LABEL {
        Some(None)
    } else {
        Segment::from_label(choice).map(Some)
    }
}

/// Parse a pipeline menu choice. `Some(None)` is "Hepsi".
pub fn parse_pipeline_choice(choice: &str) -> Option<Option<Pipeline>> {
    if choice == ALL_FILTER_LABEL {
        Some(None)
    } else {
        Pipeline::from_label(choice).map(Some)
    }
}

/// Apply filters to a slice of records, returning indices of matching records.
///
/// Indices refer to the original slice so a caller can map a selected row
/// back to the stored record without copying.
pub fn apply_filters(records: &[Record], filter: &FilterState) -> Vec<usize> {
    if filter.is_empty() {
        return (0..records.len()).collect();
    }

    let query_lower = filter.query.to_lowercase();

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_all(record, filter, &query_lower))
        .map(|(idx, _)| idx)
        .collect()
}

/// Apply filters and return the matching records themselves, in input order.
pub fn filter_records<'a>(records: &'a [Record], filter: &FilterState) -> Vec<&'a Record> {
    apply_filters(records, filter)
        .into_iter()
        .map(|idx| &records[idx])
        .collect()
}

/// The text the free-text query is matched against: contact and business
/// fields plus the segment label, space-joined. Absent fields join as empty.
pub fn search_text(record: &Record) -> String {
    let a = &record.answers;
    [
        a.instagram.as_deref().unwrap_or(""),
        a.contact_name.as_deref().unwrap_or(""),
        a.phone.as_deref().unwrap_or(""),
        a.business_name.as_deref().unwrap_or(""),
        a.business_type.as_deref().unwrap_or(""),
        record.segment.label(),
    ]
    .join(" ")
}

/// Check if a single record matches all active filters.
fn matches_all(record: &Record, filter: &FilterState, query_lower: &str) -> bool {
    if let Some(segment) = filter.segment {
        if record.segment != segment {
            return false;
        }
    }

    if let Some(pipeline) = filter.pipeline {
        if record.pipeline != pipeline {
            return false;
        }
    }

    if !query_lower.is_empty() && !search_text(record).to_lowercase().contains(query_lower) {
        return false;
    }

    true
}
