use std::borrow::Cow;
use std::fmt::Debug;

use crate::report::value::SortKind;

/// A table column of one screen.
///
/// The display label can differ from the backend field the column reads.
pub trait Column: Copy + Eq + Debug + 'static {
    /// Every column, in display order.
    fn all() -> &'static [Self];

    /// The header shown to the user.
    fn label(self) -> &'static str;

    /// How values of this column sort.
    fn kind(self) -> SortKind;

    /// Resolves a clicked header back to its column.
    fn from_label(label: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.label() == label)
    }
}

/// A row type with an explicit schema.
///
/// Search, filter and sort read records only through this trait.
pub trait Tabular {
    type Column: Column;

    /// String form of the field behind `column`.
    fn value(&self, column: Self::Column) -> Cow<'_, str>;

    /// The status-like field the screen's filter matches against, if any.
    fn status(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// Every field value the search looks at.
    ///
    /// Defaults to the column values. Records holding fields that have no
    /// column (ids, raw codes) extend this so search still sees them.
    fn search_values(&self) -> Vec<Cow<'_, str>> {
        Self::Column::all()
            .iter()
            .map(|&column| self.value(column))
            .collect()
    }

    /// Whether any field contains `needle`, which must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.search_values()
            .iter()
            .any(|value| value.to_lowercase().contains(needle))
    }
}
