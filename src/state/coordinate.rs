//! Coordinates and jobs flowing through the pipeline

use crate::XvError;
use std::fmt;

/// Position of one item in the overall ordered stream
///
/// Ordering is lexicographic: page first, then position within the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemCoordinate {
    pub page_index: usize,
    pub item_index: usize,
}

impl ItemCoordinate {
    pub fn new(page_index: usize, item_index: usize) -> Self {
        Self {
            page_index,
            item_index,
        }
    }
}

impl fmt::Display for ItemCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.page_index, self.item_index)
    }
}

/// One listing page waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageJob {
    pub page_index: usize,
    pub url: String,
}

/// One item URL discovered on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemJob {
    pub coordinate: ItemCoordinate,
    pub url: String,
}

/// Outcome delivered for every coordinate the extractor produced
#[derive(Debug)]
pub enum ItemResult<T> {
    /// The item builder produced a value
    Built { coordinate: ItemCoordinate, item: T },

    /// The item builder failed; the failure keeps the item's place in the stream
    Placeholder {
        coordinate: ItemCoordinate,
        url: String,
        error: XvError,
    },
}

impl<T> ItemResult<T> {
    /// Returns the coordinate this result was produced for
    pub fn coordinate(&self) -> ItemCoordinate {
        match self {
            Self::Built { coordinate, .. } | Self::Placeholder { coordinate, .. } => *coordinate,
        }
    }

    /// Returns true if this is an error placeholder
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }

    /// Borrows the built item, if any
    pub fn item(&self) -> Option<&T> {
        match self {
            Self::Built { item, .. } => Some(item),
            Self::Placeholder { .. } => None,
        }
    }

    /// Converts into a plain `Result`, dropping the coordinate
    pub fn into_result(self) -> crate::Result<T> {
        match self {
            Self::Built { item, .. } => Ok(item),
            Self::Placeholder { error, .. } => Err(error),
        }
    }
}
