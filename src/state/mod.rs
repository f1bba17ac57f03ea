//! State module for ordered delivery bookkeeping
//!
//! This module holds everything the scheduler needs to hand results back in
//! listing order while jobs finish in arbitrary order.
//!
//! # Components
//!
//! - `ItemCoordinate`, `PageJob`, `ItemJob`: identify pages and items in the stream
//! - `ItemResult`: a built item or an error placeholder at its coordinate
//! - `DeliveryCursor` / `CursorState`: the "next item owed to the caller" state machine
//! - `OrderLedger`: per-page item counts plus the out-of-order result buffer

mod coordinate;
mod cursor;
mod ledger;

// Re-export main types
pub use coordinate::{ItemCoordinate, ItemJob, ItemResult, PageJob};
pub use cursor::{CursorState, DeliveryCursor};
pub use ledger::OrderLedger;
