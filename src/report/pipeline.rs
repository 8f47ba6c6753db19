//! Search, filter, sort and paginate, always in that order.
//!
//! Stages work on borrowed rows and never reorder unless sorting, so the
//! backend's order survives everything but an explicit sort.

use crate::report::record::{Column, Tabular};
use crate::report::view_state::{Direction, StatusFilter, ViewState};

/// One slot of a rendered page.
#[derive(Debug, PartialEq)]
pub enum Row<'a, T> {
    Record(&'a T),
    /// Blank filler keeping the page at a fixed height. Never a search,
    /// filter or sort candidate.
    Placeholder,
}

impl<'a, T> Row<'a, T> {
    pub fn record(&self) -> Option<&'a T> {
        match self {
            Row::Record(record) => Some(record),
            Row::Placeholder => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Row::Placeholder)
    }
}

/// A page of rows, always exactly `page_size` long.
#[derive(Debug, PartialEq)]
pub struct Page<'a, T> {
    pub rows: Vec<Row<'a, T>>,
    /// `ceil(matching / page_size)`. Zero means "show the empty state".
    pub total_pages: usize,
    /// Rows that survived search and filter.
    pub total_records: usize,
    pub page: usize,
}

impl<'a, T> Page<'a, T> {
    /// The real records on this page, in display order.
    pub fn records(&self) -> Vec<&'a T> {
        self.rows.iter().filter_map(Row::record).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.total_pages == 0
    }
}

/// Keeps records where any field contains `query`, ignoring case.
///
/// An empty query keeps everything.
pub fn apply_search<'a, T: Tabular>(records: Vec<&'a T>, query: &str) -> Vec<&'a T> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return records;
    }

    records
        .into_iter()
        .filter(|record| record.matches(&needle))
        .collect()
}

/// Keeps records whose status equals the filter value exactly.
pub fn apply_status_filter<'a, T: Tabular>(records: Vec<&'a T>, filter: &StatusFilter) -> Vec<&'a T> {
    match filter {
        StatusFilter::All => records,
        StatusFilter::Only(wanted) => records
            .into_iter()
            .filter(|record| record.status().as_deref() == Some(wanted.as_str()))
            .collect(),
    }
}

/// Stable sort on `column`; `None` keeps the incoming order.
///
/// Equal values keep their relative order in both directions.
pub fn apply_sort<'a, T: Tabular>(
    mut records: Vec<&'a T>,
    column: Option<T::Column>,
    direction: Direction,
) -> Vec<&'a T> {
    let Some(column) = column else {
        return records;
    };

    let kind = column.kind();
    records.sort_by(|a, b| {
        let ordering = kind.compare(&a.value(column), &b.value(column));
        match direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    });
    records
}

/// Cuts page `page` (1-based) out of `records` and pads it with placeholders.
///
/// # Arguments
///
/// * `records` - The already searched, filtered and sorted rows.
/// * `page` - The page to show; values below 1 are treated as 1.
/// * `page_size` - Rows per page; values below 1 are treated as 1.
pub fn paginate<'a, T>(records: &[&'a T], page: usize, page_size: usize) -> Page<'a, T> {
    let page_size = page_size.max(1);
    let page = page.max(1);
    let total_pages = records.len().div_ceil(page_size);

    let start = (page - 1).saturating_mul(page_size).min(records.len());
    let end = start.saturating_add(page_size).min(records.len());

    let mut rows: Vec<Row<'a, T>> = records[start..end].iter().map(|r| Row::Record(*r)).collect();
    rows.resize_with(page_size, || Row::Placeholder);

    Page {
        rows,
        total_pages,
        total_records: records.len(),
        page,
    }
}

/// Runs the whole pipeline for a screen's view state.
pub fn run<'a, T: Tabular>(records: &'a [T], view: &ViewState<T::Column>, page_size: usize) -> Page<'a, T> {
    let rows: Vec<&T> = records.iter().collect();
    let rows = apply_search(rows, view.search_query());
    let rows = apply_status_filter(rows, view.status_filter());
    let rows = match view.sort() {
        Some(spec) => apply_sort(rows, Some(spec.column), spec.direction),
        None => rows,
    };
    paginate(&rows, view.current_page(), page_size)
}
