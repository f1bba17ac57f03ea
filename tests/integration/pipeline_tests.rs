//! Scheduler behavior under concurrency
//!
//! Listing pages are encoded in their URL: `page:<n>` yields `n` items,
//! `page:fail` cannot be fetched. Every collaborator sleeps for a short,
//! URL-dependent time so completions arrive out of order.

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use xvideos_api::crawler::{run_pipeline, ItemBuilder, PageFetcher, Scheduler};
use xvideos_api::{ItemCoordinate, ItemResult, Result, XvError};

/// Tracks how many calls are in flight and the highest value seen
#[derive(Default)]
struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
    started: AtomicUsize,
}

impl InFlight {
    /// Counts a call until the returned guard is dropped (aborted tasks included)
    fn enter(&self) -> InFlightGuard<'_> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        InFlightGuard(self)
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

struct InFlightGuard<'a>(&'a InFlight);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.current.fetch_sub(1, Ordering::SeqCst);
    }
}

fn jitter(key: &str, max_ms: u64) -> Duration {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    Duration::from_millis(hasher.finish() % max_ms)
}

#[derive(Default)]
struct CountingFetcher {
    in_flight: InFlight,
}

#[async_trait]
impl PageFetcher for CountingFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        {
            let _guard = self.in_flight.enter();
            tokio::time::sleep(jitter(url, 15)).await;
        }

        let count = url.trim_start_matches("page:");
        if count == "fail" {
            return Err(XvError::HttpStatus {
                url: url.to_string(),
                status: 503,
            });
        }
        Ok(format!("{}|{}", url, count))
    }
}

/// Turns `page:<n>|<n>` into `n` item URLs
fn counted_items(content: &str) -> Result<Vec<String>> {
    let (page, count) = content
        .split_once('|')
        .ok_or_else(|| XvError::Extraction("missing count".to_string()))?;
    let count: usize = count
        .parse()
        .map_err(|_| XvError::Extraction(format!("bad count {}", count)))?;
    Ok((0..count).map(|i| format!("{}/item{}", page, i)).collect())
}

#[derive(Default)]
struct CountingBuilder {
    in_flight: InFlight,
}

#[async_trait]
impl ItemBuilder for CountingBuilder {
    type Item = String;

    async fn build(&self, url: &str) -> Result<String> {
        {
            let _guard = self.in_flight.enter();
            tokio::time::sleep(jitter(url, 10)).await;
        }

        if url.ends_with("item13") {
            return Err(XvError::BuilderPanicked {
                url: url.to_string(),
            });
        }
        Ok(url.to_uppercase())
    }
}

fn pages(counts: &[&str]) -> Vec<String> {
    counts.iter().map(|c| format!("page:{}", c)).collect()
}

/// Flattens results into comparable values
fn summarize(results: &[ItemResult<String>]) -> Vec<(ItemCoordinate, String)> {
    results
        .iter()
        .map(|result| match result {
            ItemResult::Built { coordinate, item } => (*coordinate, item.clone()),
            ItemResult::Placeholder {
                coordinate, url, ..
            } => (*coordinate, format!("failed:{}", url)),
        })
        .collect()
}

#[tokio::test]
async fn test_pools_never_exceed_their_limits() {
    let fetcher = Arc::new(CountingFetcher::default());
    let builder = Arc::new(CountingBuilder::default());

    let results = Scheduler::new(
        Arc::clone(&fetcher),
        Arc::new(counted_items),
        Arc::clone(&builder),
    )
    .with_limits(2, 3)
    .run(pages(&["5", "5", "5", "5", "5", "5"]))
    .unwrap()
    .collect_all()
    .await;

    assert_eq!(results.len(), 30);
    assert!(fetcher.in_flight.peak() <= 2, "page peak {}", fetcher.in_flight.peak());
    assert!(builder.in_flight.peak() <= 3, "item peak {}", builder.in_flight.peak());
    assert!(builder.in_flight.peak() >= 2);
}

#[tokio::test]
async fn test_results_do_not_depend_on_concurrency() {
    let page_list = pages(&["3", "0", "fail", "20", "1", "7"]);

    let sequential = run_pipeline(
        page_list.clone(),
        Arc::new(CountingFetcher::default()),
        Arc::new(counted_items),
        Arc::new(CountingBuilder::default()),
        1,
        1,
    )
    .unwrap()
    .collect_all()
    .await;

    let concurrent = run_pipeline(
        page_list,
        Arc::new(CountingFetcher::default()),
        Arc::new(counted_items),
        Arc::new(CountingBuilder::default()),
        50,
        50,
    )
    .unwrap()
    .collect_all()
    .await;

    assert_eq!(summarize(&sequential), summarize(&concurrent));
}

#[tokio::test]
async fn test_delivery_is_strictly_ordered() {
    let results = run_pipeline(
        pages(&["4", "9", "2", "16"]),
        Arc::new(CountingFetcher::default()),
        Arc::new(counted_items),
        Arc::new(CountingBuilder::default()),
        4,
        16,
    )
    .unwrap()
    .collect_all()
    .await;

    let coordinates: Vec<ItemCoordinate> = results.iter().map(|r| r.coordinate()).collect();
    let mut sorted = coordinates.clone();
    sorted.sort();
    sorted.dedup();

    assert_eq!(coordinates, sorted);
    assert_eq!(coordinates.first(), Some(&ItemCoordinate::new(0, 0)));
    assert_eq!(coordinates.last(), Some(&ItemCoordinate::new(3, 15)));
}

#[tokio::test]
async fn test_result_count_is_sum_of_page_counts() {
    let results = run_pipeline(
        pages(&["2", "fail", "0", "14", "fail", "3"]),
        Arc::new(CountingFetcher::default()),
        Arc::new(counted_items),
        Arc::new(CountingBuilder::default()),
        3,
        5,
    )
    .unwrap()
    .collect_all()
    .await;

    assert_eq!(results.len(), 2 + 14 + 3);

    // item13 of page 3 fails to build and keeps its place
    let failed: Vec<ItemCoordinate> = results
        .iter()
        .filter(|r| r.is_placeholder())
        .map(|r| r.coordinate())
        .collect();
    assert_eq!(failed, vec![ItemCoordinate::new(3, 13)]);
}

#[tokio::test]
async fn test_consumer_can_stop_early() {
    let builder = Arc::new(CountingBuilder::default());

    let mut stream = run_pipeline(
        pages(&["10", "10", "10", "10", "10", "10", "10", "10"]),
        Arc::new(CountingFetcher::default()),
        Arc::new(counted_items),
        Arc::clone(&builder),
        1,
        1,
    )
    .unwrap();

    let first = stream.next_item().await.unwrap();
    assert_eq!(first.coordinate(), ItemCoordinate::new(0, 0));
    drop(stream);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(builder.in_flight.current.load(Ordering::SeqCst), 0);

    let started = builder.in_flight.started();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(builder.in_flight.started(), started);
    assert!(started < 80, "{} builds started after the consumer left", started);
}
