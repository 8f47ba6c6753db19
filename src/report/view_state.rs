use crate::report::record::Column;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

/// The status filter of a screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    /// Exact, case-sensitive match against the record's status display string.
    Only(String),
}

impl StatusFilter {
    /// Parses the select-box value, where `"all"` means no filter.
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            StatusFilter::All
        } else {
            StatusFilter::Only(value.to_string())
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec<C> {
    pub column: C,
    pub direction: Direction,
}

/// Per-screen search, filter, sort and page state.
///
/// `current_page` goes back to 1 whenever the search text or the status
/// filter changes. The date/month parameter lives on the screen controller,
/// which resets the page when it changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<C> {
    search_query: String,
    status_filter: StatusFilter,
    sort: Option<SortSpec<C>>,
    current_page: usize,
}

impl<C> Default for ViewState<C> {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            status_filter: StatusFilter::All,
            sort: None,
            current_page: 1,
        }
    }
}

impl<C: Column> ViewState<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn status_filter(&self) -> &StatusFilter {
        &self.status_filter
    }

    pub fn sort(&self) -> Option<SortSpec<C>> {
        self.sort
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.search_query {
            self.search_query = query;
            self.current_page = 1;
        }
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        if filter != self.status_filter {
            self.status_filter = filter;
            self.current_page = 1;
        }
    }

    /// Header click: the active column flips direction, another column
    /// starts ascending.
    pub fn toggle_sort(&mut self, column: C) {
        self.sort = Some(match self.sort {
            Some(active) if active.column == column => SortSpec {
                column,
                direction: active.direction.flipped(),
            },
            _ => SortSpec {
                column,
                direction: Direction::Ascending,
            },
        });
    }

    /// Header click by label; unknown labels are ignored.
    pub fn toggle_sort_by_label(&mut self, label: &str) -> bool {
        match C::from_label(label) {
            Some(column) => {
                self.toggle_sort(column);
                true
            }
            None => {
                tracing::debug!("Ignoring sort on unknown column: {}", label);
                false
            }
        }
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Moves to `page`; pages start at 1.
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }
}
