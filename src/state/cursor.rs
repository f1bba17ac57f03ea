//! Delivery cursor state machine
//!
//! The cursor names the next coordinate the caller is owed. It only moves
//! forward: item by item within a page, then to item 0 of the next page.
use crate::state::ItemCoordinate;
use std::fmt;

/// Where the cursor stands relative to the bookkeeping it depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorState {
    /// The item count of this page is not known yet
    AwaitingCount(usize),

    /// The count is known but this coordinate's result has not arrived
    AwaitingResult(ItemCoordinate),

    /// The result for the current coordinate (or an empty page) can be released now
    Advancing,

    /// Every page has been drained
    Done,
}

impl CursorState {
    /// Returns true if the cursor has passed the last page
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if the cursor is waiting on outstanding work
    pub fn is_stalled(&self) -> bool {
        matches!(self, Self::AwaitingCount(_) | Self::AwaitingResult(_))
    }
}

impl fmt::Display for CursorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingCount(page) => write!(f, "awaiting item count of page {}", page),
            Self::AwaitingResult(coord) => write!(f, "awaiting result {}", coord),
            Self::Advancing => write!(f, "advancing"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Monotonic position of the next item to deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryCursor {
    current_page: usize,
    current_item: usize,
    total_pages: usize,
}

impl DeliveryCursor {
    /// Creates a cursor over `total_pages` listing pages, positioned at (0, 0)
    pub fn new(total_pages: usize) -> Self {
        Self {
            current_page: 0,
            current_item: 0,
            total_pages,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn current_item(&self) -> usize {
        self.current_item
    }

    /// The coordinate the caller is owed next
    pub fn position(&self) -> ItemCoordinate {
        ItemCoordinate::new(self.current_page, self.current_item)
    }

    /// Returns true once the cursor has moved past the last page
    pub fn is_done(&self) -> bool {
        self.current_page >= self.total_pages
    }

    /// Returns true if `coordinate` lies strictly behind the cursor
    pub fn has_passed(&self, coordinate: ItemCoordinate) -> bool {
        coordinate < self.position()
    }

    /// Moves to the next item on the current page
    pub fn advance_item(&mut self) {
        self.current_item += 1;
    }

    /// Moves to the first item of the next page
    pub fn advance_page(&mut self) {
        self.current_page += 1;
        self.current_item = 0;
    }
}
