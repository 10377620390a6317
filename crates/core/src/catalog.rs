//! Catalog helpers: classifier kinds and title ratings.

use std::fmt;

/// Categories and genres share one shape (`name` + unique `slug`) and one
/// set of rules, so they are modelled as a single parameterized entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassifierKind {
    Category,
    Genre,
}

impl ClassifierKind {
    /// Entity label used in error messages and logs.
    pub const fn label(self) -> &'static str {
        match self {
            ClassifierKind::Category => "Category",
            ClassifierKind::Genre => "Genre",
        }
    }

    /// Field name of the reference on a title's write payload.
    pub const fn title_field(self) -> &'static str {
        match self {
            ClassifierKind::Category => "category",
            ClassifierKind::Genre => "genre",
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Integer rating of a title from the average of its review scores.
///
/// The average is truncated toward zero; a title without reviews has no rating.
pub fn rating_from_average(average: Option<f64>) -> Option<i32> {
    average.filter(|a| a.is_finite()).map(|a| a.trunc() as i32)
}
