//! Ordering ledger: per-page counts, buffered results, and the delivery cursor
//!
//! The ledger is owned by a single coordinating task. It never blocks; callers
//! record page counts and item results as they complete and then ask for the
//! run of results that has become deliverable.

use crate::state::{CursorState, DeliveryCursor, ItemCoordinate, ItemResult};
use std::collections::BTreeMap;

/// Bookkeeping that turns out-of-order completions into in-order delivery
#[derive(Debug)]
pub struct OrderLedger<T> {
    /// Item count per page, set once the page has been extracted
    page_counts: Vec<Option<usize>>,

    /// Results that arrived before the cursor reached them
    buffer: BTreeMap<ItemCoordinate, ItemResult<T>>,

    cursor: DeliveryCursor,
}

impl<T> OrderLedger<T> {
    /// Creates a ledger for `total_pages` listing pages
    pub fn new(total_pages: usize) -> Self {
        Self {
            page_counts: vec![None; total_pages],
            buffer: BTreeMap::new(),
            cursor: DeliveryCursor::new(total_pages),
        }
    }

    /// Records how many items a page produced
    ///
    /// Returns false if the page index is out of range or its count was
    /// already recorded; the existing count is kept in that case.
    pub fn record_page_count(&mut self, page_index: usize, count: usize) -> bool {
        let Some(slot) = self.page_counts.get_mut(page_index) else {
            tracing::warn!("Ignoring item count for unknown page {}", page_index);
            return false;
        };

        if let Some(existing) = *slot {
            tracing::warn!(
                "Ignoring second item count {} for page {} (already {})",
                count,
                page_index,
                existing
            );
            return false;
        }

        *slot = Some(count);
        true
    }

    /// Stores a completed item result until the cursor reaches it
    ///
    /// Returns false for coordinates that are already buffered, already
    /// delivered, or outside their page's known count.
    pub fn record_result(&mut self, result: ItemResult<T>) -> bool {
        let coordinate = result.coordinate();

        if self.cursor.has_passed(coordinate) {
            tracing::warn!("Dropping result for already delivered {}", coordinate);
            return false;
        }

        match self.page_count(coordinate.page_index) {
            Some(count) if coordinate.item_index < count => {}
            _ => {
                tracing::warn!("Dropping result for unscheduled {}", coordinate);
                return false;
            }
        }

        if self.buffer.contains_key(&coordinate) {
            tracing::warn!("Dropping duplicate result for {}", coordinate);
            return false;
        }

        self.buffer.insert(coordinate, result);
        true
    }

    /// Releases every result that is now deliverable, in coordinate order
    ///
    /// Stops at the first page whose count is unknown or the first coordinate
    /// whose result has not arrived.
    pub fn drain_ready(&mut self) -> Vec<ItemResult<T>> {
        let mut ready = Vec::new();

        while !self.cursor.is_done() {
            let Some(count) = self.page_count(self.cursor.current_page()) else {
                break;
            };

            if self.cursor.current_item() >= count {
                self.cursor.advance_page();
                continue;
            }

            match self.buffer.remove(&self.cursor.position()) {
                Some(result) => {
                    ready.push(result);
                    self.cursor.advance_item();
                }
                None => break,
            }
        }

        ready
    }

    /// Describes what the cursor is currently waiting for
    pub fn cursor_state(&self) -> CursorState {
        if self.cursor.is_done() {
            return CursorState::Done;
        }

        let page = self.cursor.current_page();
        match self.page_count(page) {
            None => CursorState::AwaitingCount(page),
            Some(count) if self.cursor.current_item() >= count => CursorState::Advancing,
            Some(_) if self.buffer.contains_key(&self.cursor.position()) => {
                CursorState::Advancing
            }
            Some(_) => CursorState::AwaitingResult(self.cursor.position()),
        }
    }

    /// Item count of a page, if known
    pub fn page_count(&self, page_index: usize) -> Option<usize> {
        self.page_counts.get(page_index).copied().flatten()
    }

    /// Number of results held back waiting for earlier coordinates
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn cursor(&self) -> &DeliveryCursor {
        &self.cursor
    }

    pub fn is_done(&self) -> bool {
        self.cursor.is_done()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built(page: usize, item: usize) -> ItemResult<String> {
        ItemResult::Built {
            coordinate: ItemCoordinate::new(page, item),
            item: format!("{}-{}", page, item),
        }
    }

    fn coords(results: &[ItemResult<String>]) -> Vec<(usize, usize)> {
        results
            .iter()
            .map(|r| {
                let c = r.coordinate();
                (c.page_index, c.item_index)
            })
            .collect()
    }

    #[test]
    fn test_empty_ledger_is_done() {
        let ledger: OrderLedger<String> = OrderLedger::new(0);
        assert!(ledger.is_done());
        assert_eq!(ledger.cursor_state(), CursorState::Done);
    }

    #[test]
    fn test_awaits_count_before_delivering() {
        let mut ledger = OrderLedger::new(1);
        assert_eq!(ledger.cursor_state(), CursorState::AwaitingCount(0));
        assert!(ledger.drain_ready().is_empty());

        ledger.record_page_count(0, 1);
        assert_eq!(
            ledger.cursor_state(),
            CursorState::AwaitingResult(ItemCoordinate::new(0, 0))
        );

        assert!(ledger.record_result(built(0, 0)));
        assert_eq!(ledger.cursor_state(), CursorState::Advancing);

        assert_eq!(coords(&ledger.drain_ready()), vec![(0, 0)]);
        assert_eq!(ledger.cursor_state(), CursorState::Done);
    }

    #[test]
    fn test_out_of_order_results_are_held_back() {
        let mut ledger = OrderLedger::new(2);
        ledger.record_page_count(0, 2);
        ledger.record_page_count(1, 1);

        ledger.record_result(built(1, 0));
        ledger.record_result(built(0, 1));
        assert!(ledger.drain_ready().is_empty());
        assert_eq!(ledger.buffered(), 2);

        ledger.record_result(built(0, 0));
        assert_eq!(coords(&ledger.drain_ready()), vec![(0, 0), (0, 1), (1, 0)]);
        assert!(ledger.is_done());
    }

    #[test]
    fn test_empty_pages_are_skipped() {
        let mut ledger = OrderLedger::new(3);
        ledger.record_page_count(1, 0);
        ledger.record_page_count(2, 1);
        ledger.record_result(built(2, 0));

        // Page 0 is still unknown, nothing moves
        assert!(ledger.drain_ready().is_empty());

        ledger.record_page_count(0, 0);
        assert_eq!(coords(&ledger.drain_ready()), vec![(2, 0)]);
        assert!(ledger.is_done());
    }

    #[test]
    fn test_later_page_waits_for_earlier_count() {
        let mut ledger = OrderLedger::new(2);
        ledger.record_page_count(1, 1);
        ledger.record_result(built(1, 0));

        assert!(ledger.drain_ready().is_empty());
        assert_eq!(ledger.cursor_state(), CursorState::AwaitingCount(0));
    }

    #[test]
    fn test_rejects_duplicates_and_unscheduled() {
        let mut ledger = OrderLedger::new(2);
        ledger.record_page_count(0, 1);

        assert!(ledger.record_result(built(0, 0)));
        assert!(!ledger.record_result(built(0, 0)));
        // Beyond the page's count
        assert!(!ledger.record_result(built(0, 1)));
        // Page count not yet known
        assert!(!ledger.record_result(built(1, 0)));

        assert_eq!(ledger.drain_ready().len(), 1);
        // Already delivered
        assert!(!ledger.record_result(built(0, 0)));
    }

    #[test]
    fn test_page_count_recorded_once() {
        let mut ledger: OrderLedger<String> = OrderLedger::new(1);
        assert!(ledger.record_page_count(0, 2));
        assert!(!ledger.record_page_count(0, 5));
        assert_eq!(ledger.page_count(0), Some(2));
        assert!(!ledger.record_page_count(4, 1));
    }
}
