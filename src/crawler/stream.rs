//! Consumer side of a pipeline run

use crate::state::ItemResult;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Lazily produced, ordered results of one pipeline run
///
/// Results arrive in coordinate order. Dropping the stream (or calling
/// [`ItemStream::close`]) tells the scheduler to stop submitting work; jobs
/// already running are abandoned.
#[derive(Debug)]
pub struct ItemStream<T> {
    receiver: mpsc::Receiver<ItemResult<T>>,
}

impl<T> ItemStream<T> {
    pub(crate) fn new(receiver: mpsc::Receiver<ItemResult<T>>) -> Self {
        Self { receiver }
    }

    /// Waits for the next result, or `None` once the run has finished
    pub async fn next_item(&mut self) -> Option<ItemResult<T>> {
        self.receiver.recv().await
    }

    /// Stops the run early
    ///
    /// Results that were already handed over can still be read with
    /// [`ItemStream::next_item`]; nothing new is produced.
    pub fn close(&mut self) {
        self.receiver.close();
    }

    /// Drains the whole run into a vector
    pub async fn collect_all(mut self) -> Vec<ItemResult<T>> {
        let mut results = Vec::new();
        while let Some(result) = self.receiver.recv().await {
            results.push(result);
        }
        results
    }
}

impl<T> Stream for ItemStream<T> {
    type Item = ItemResult<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
