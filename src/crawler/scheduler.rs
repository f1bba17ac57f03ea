//! Ordered concurrent fetch-expand scheduler
//!
//! This module handles:
//! - Two bounded worker pools: listing pages and items
//! - Expanding each fetched page into item jobs, in extractor order
//! - Buffering out-of-order item results and releasing them in
//!   (page, position) order
//! - Isolating failures: a bad page becomes an empty page, a bad item becomes
//!   an error placeholder at its position
//!
//! All bookkeeping lives in one coordinating task. Fetches and builds run as
//! spawned tasks; their completions are the only events the coordinator
//! reacts to.

use crate::config::PipelineConfig;
use crate::crawler::stream::ItemStream;
use crate::crawler::traits::{Extractor, ItemBuilder, PageFetcher};
use crate::state::{ItemCoordinate, ItemJob, ItemResult, OrderLedger, PageJob};
use crate::{Result, XvError};
use futures::FutureExt;
use std::collections::{HashMap, VecDeque};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::{self, JoinError, JoinSet};

/// What a page job reports back: the item URLs found, or why there are none
struct PageOutcome {
    page_index: usize,
    url: String,
    items: Result<Vec<String>>,
}

/// Completion events the coordinator reacts to
enum Event<T> {
    PageCompleted(task::Id, PageOutcome),
    ItemCompleted(task::Id, ItemResult<T>),
    PageLost(JoinError),
    ItemLost(JoinError),
    Delivered,
    ConsumerGone,
}

/// Totals logged when a run ends
#[derive(Debug, Default, Clone, Copy)]
struct RunCounters {
    pages_fetched: usize,
    pages_failed: usize,
    items_built: usize,
    items_failed: usize,
}

/// Runs listing pages through a fetcher, an extractor, and an item builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use xvideos_api::config::HttpConfig;
/// use xvideos_api::crawler::{HttpFetcher, Scheduler, ThumbnailGridExtractor};
/// use xvideos_api::video::VideoBuilder;
///
/// # async fn example() -> xvideos_api::Result<()> {
/// let http = HttpConfig::default();
/// let fetcher = Arc::new(HttpFetcher::new(&http)?);
/// let extractor = Arc::new(ThumbnailGridExtractor::new(&http.base_url)?);
/// let builder = Arc::new(VideoBuilder::new(Arc::clone(&fetcher), &http.base_url)?);
///
/// let scheduler = Scheduler::new(fetcher, extractor, builder).with_limits(2, 8);
/// let mut videos = scheduler.run(vec!["https://www.xvideos.com/?k=test&p=0".to_string()])?;
/// while let Some(result) = videos.next_item().await {
///     println!("{:?}", result.coordinate());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Scheduler<F, X, B> {
    fetcher: Arc<F>,
    extractor: Arc<X>,
    builder: Arc<B>,
    page_concurrency: usize,
    item_concurrency: usize,
    channel_capacity: usize,
}

impl<F, X, B> Scheduler<F, X, B>
where
    F: PageFetcher,
    X: Extractor,
    B: ItemBuilder,
{
    /// Creates a scheduler with the default pipeline limits
    pub fn new(fetcher: Arc<F>, extractor: Arc<X>, builder: Arc<B>) -> Self {
        let defaults = PipelineConfig::default();
        Self {
            fetcher,
            extractor,
            builder,
            page_concurrency: defaults.page_concurrency,
            item_concurrency: defaults.item_concurrency,
            channel_capacity: defaults.channel_capacity,
        }
    }

    /// Sets the number of concurrent page fetches and item builds
    pub fn with_limits(mut self, page_concurrency: usize, item_concurrency: usize) -> Self {
        self.page_concurrency = page_concurrency;
        self.item_concurrency = item_concurrency;
        self
    }

    /// Applies limits and channel capacity from the pipeline configuration
    pub fn with_config(mut self, config: &PipelineConfig) -> Self {
        self.page_concurrency = config.page_concurrency;
        self.item_concurrency = config.item_concurrency;
        self.channel_capacity = config.channel_capacity;
        self
    }

    /// Sets how many delivered results may wait for a slow consumer
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Starts a run over `page_urls` and returns its ordered result stream
    ///
    /// Must be called from within a tokio runtime. Fails before doing any
    /// work if either concurrency limit is zero.
    pub fn run(&self, page_urls: Vec<String>) -> Result<ItemStream<B::Item>> {
        if self.page_concurrency == 0 {
            return Err(XvError::InvalidConcurrency {
                pool: "page",
                value: self.page_concurrency,
            });
        }
        if self.item_concurrency == 0 {
            return Err(XvError::InvalidConcurrency {
                pool: "item",
                value: self.item_concurrency,
            });
        }

        let (tx, rx) = mpsc::channel(self.channel_capacity.max(1));

        let pages: VecDeque<PageJob> = page_urls
            .into_iter()
            .enumerate()
            .map(|(page_index, url)| PageJob { page_index, url })
            .collect();

        tracing::debug!(
            "Starting pipeline over {} listing pages (pages: {}, items: {})",
            pages.len(),
            self.page_concurrency,
            self.item_concurrency
        );

        let run = PipelineRun {
            fetcher: Arc::clone(&self.fetcher),
            extractor: Arc::clone(&self.extractor),
            builder: Arc::clone(&self.builder),
            page_concurrency: self.page_concurrency,
            item_concurrency: self.item_concurrency,
            ledger: OrderLedger::new(pages.len()),
            page_queue: pages,
            item_queue: VecDeque::new(),
            page_tasks: JoinSet::new(),
            item_tasks: JoinSet::new(),
            page_ids: HashMap::new(),
            item_ids: HashMap::new(),
            counters: RunCounters::default(),
        };

        tokio::spawn(run.drive(tx));

        Ok(ItemStream::new(rx))
    }
}

/// Runs a pipeline with explicit limits
///
/// Convenience wrapper around [`Scheduler`] for one-off runs.
pub fn run_pipeline<F, X, B>(
    page_urls: Vec<String>,
    fetcher: Arc<F>,
    extractor: Arc<X>,
    builder: Arc<B>,
    page_concurrency: usize,
    item_concurrency: usize,
) -> Result<ItemStream<B::Item>>
where
    F: PageFetcher,
    X: Extractor,
    B: ItemBuilder,
{
    Scheduler::new(fetcher, extractor, builder)
        .with_limits(page_concurrency, item_concurrency)
        .run(page_urls)
}

/// State of one run, owned by its coordinating task
struct PipelineRun<F, X, B: ItemBuilder> {
    fetcher: Arc<F>,
    extractor: Arc<X>,
    builder: Arc<B>,
    page_concurrency: usize,
    item_concurrency: usize,
    ledger: OrderLedger<B::Item>,
    page_queue: VecDeque<PageJob>,
    item_queue: VecDeque<ItemJob>,
    page_tasks: JoinSet<PageOutcome>,
    item_tasks: JoinSet<ItemResult<B::Item>>,
    /// Jobs behind the tasks still in flight, so a task that dies without an
    /// outcome can still be accounted for
    page_ids: HashMap<task::Id, PageJob>,
    item_ids: HashMap<task::Id, ItemJob>,
    counters: RunCounters,
}

impl<F, X, B> PipelineRun<F, X, B>
where
    F: PageFetcher,
    X: Extractor,
    B: ItemBuilder,
{
    /// Event loop: refill both pools, then wait for a completion or for room
    /// in the channel, whichever comes first
    ///
    /// Deliverable results queue up in `ready` so a slow consumer never holds
    /// back collection or refill.
    async fn drive(mut self, tx: mpsc::Sender<ItemResult<B::Item>>) {
        let started = Instant::now();
        let mut ready: VecDeque<ItemResult<B::Item>> = VecDeque::new();
        let mut cancelled = false;

        loop {
            self.submit_pages();
            self.submit_items();

            if self.page_tasks.is_empty() && self.item_tasks.is_empty() && ready.is_empty() {
                break;
            }

            let event = tokio::select! {
                Some(joined) = self.page_tasks.join_next_with_id(), if !self.page_tasks.is_empty() => {
                    match joined {
                        Ok((id, outcome)) => Event::PageCompleted(id, outcome),
                        Err(e) => Event::PageLost(e),
                    }
                }
                Some(joined) = self.item_tasks.join_next_with_id(), if !self.item_tasks.is_empty() => {
                    match joined {
                        Ok((id, result)) => Event::ItemCompleted(id, result),
                        Err(e) => Event::ItemLost(e),
                    }
                }
                permit = tx.reserve(), if !ready.is_empty() => {
                    match (permit, ready.pop_front()) {
                        (Ok(permit), Some(result)) => {
                            permit.send(result);
                            Event::Delivered
                        }
                        (Ok(_), None) => Event::Delivered,
                        (Err(_), _) => Event::ConsumerGone,
                    }
                }
                _ = tx.closed() => Event::ConsumerGone,
            };

            match event {
                Event::PageCompleted(id, outcome) => {
                    self.page_ids.remove(&id);
                    self.on_page_completed(outcome);
                }
                Event::ItemCompleted(id, result) => {
                    self.item_ids.remove(&id);
                    self.on_item_completed(result);
                }
                Event::PageLost(e) => self.on_page_lost(e),
                Event::ItemLost(e) => self.on_item_lost(e),
                Event::Delivered => continue,
                Event::ConsumerGone => {
                    cancelled = true;
                    break;
                }
            }

            ready.extend(self.ledger.drain_ready());
        }

        if cancelled {
            tracing::debug!(
                "Consumer dropped the stream; abandoning {} page and {} item jobs",
                self.page_tasks.len() + self.page_queue.len(),
                self.item_tasks.len() + self.item_queue.len()
            );
            self.page_tasks.abort_all();
            self.item_tasks.abort_all();
            return;
        }

        if !self.ledger.is_done() {
            tracing::error!(
                "Pipeline finished with undelivered work ({})",
                self.ledger.cursor_state()
            );
        }

        let c = self.counters;
        tracing::info!(
            "Pipeline complete: {} pages ({} failed), {} items ({} failed) in {:?}",
            c.pages_fetched,
            c.pages_failed,
            c.items_built + c.items_failed,
            c.items_failed,
            started.elapsed()
        );
    }

    /// Starts page fetches until the page pool is full or no pages remain
    fn submit_pages(&mut self) {
        while self.page_tasks.len() < self.page_concurrency {
            let Some(job) = self.page_queue.pop_front() else {
                break;
            };

            let fetcher = Arc::clone(&self.fetcher);
            let extractor = Arc::clone(&self.extractor);

            tracing::debug!("Fetching listing page {}: {}", job.page_index, job.url);

            let tracked = job.clone();
            let handle = self.page_tasks.spawn(async move {
                let PageJob { page_index, url } = job;

                let items = AssertUnwindSafe(async {
                    let content = fetcher.fetch(&url).await?;
                    extractor.extract(&content)
                })
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    Err(XvError::Extraction(format!(
                        "page task panicked while processing {}",
                        url
                    )))
                });

                PageOutcome {
                    page_index,
                    url,
                    items,
                }
            });
            self.page_ids.insert(handle.id(), tracked);
        }
    }

    /// Starts item builds until the item pool is full or the queue is empty
    fn submit_items(&mut self) {
        while self.item_tasks.len() < self.item_concurrency {
            let Some(job) = self.item_queue.pop_front() else {
                break;
            };

            let builder = Arc::clone(&self.builder);

            let tracked = job.clone();
            let handle = self.item_tasks.spawn(async move {
                let ItemJob { coordinate, url } = job;

                let built = AssertUnwindSafe(builder.build(&url)).catch_unwind().await;

                match built {
                    Ok(Ok(item)) => ItemResult::Built { coordinate, item },
                    Ok(Err(error)) => ItemResult::Placeholder {
                        coordinate,
                        url,
                        error,
                    },
                    Err(_) => ItemResult::Placeholder {
                        coordinate,
                        error: XvError::BuilderPanicked { url: url.clone() },
                        url,
                    },
                }
            });
            self.item_ids.insert(handle.id(), tracked);
        }
    }

    /// Records a page's item count and queues one job per extracted URL
    fn on_page_completed(&mut self, outcome: PageOutcome) {
        let PageOutcome {
            page_index,
            url,
            items,
        } = outcome;

        self.counters.pages_fetched += 1;

        let item_urls = match items {
            Ok(item_urls) => item_urls,
            Err(e) => {
                tracing::warn!(
                    "Listing page {} ({}) treated as empty: {}",
                    page_index,
                    url,
                    e
                );
                self.counters.pages_failed += 1;
                Vec::new()
            }
        };

        tracing::debug!("Listing page {} yielded {} items", page_index, item_urls.len());

        if !self.ledger.record_page_count(page_index, item_urls.len()) {
            return;
        }

        self.item_queue
            .extend(
                item_urls
                    .into_iter()
                    .enumerate()
                    .map(|(item_index, url)| ItemJob {
                        coordinate: ItemCoordinate::new(page_index, item_index),
                        url,
                    }),
            );
    }

    /// Stores a finished item until the cursor reaches it
    fn on_item_completed(&mut self, result: ItemResult<B::Item>) {
        match &result {
            ItemResult::Built { coordinate, .. } => {
                tracing::debug!("Built item {}", coordinate);
                self.counters.items_built += 1;
            }
            ItemResult::Placeholder {
                coordinate,
                url,
                error,
            } => {
                tracing::warn!("Item {} ({}) failed: {}", coordinate, url, error);
                self.counters.items_failed += 1;
            }
        }

        self.ledger.record_result(result);
    }

    /// Counts a page whose task died as empty so later pages still deliver
    fn on_page_lost(&mut self, error: JoinError) {
        let Some(job) = self.page_ids.remove(&error.id()) else {
            tracing::error!("Untracked page task lost: {}", error);
            return;
        };

        tracing::warn!(
            "Listing page {} ({}) treated as empty: task lost: {}",
            job.page_index,
            job.url,
            error
        );
        self.counters.pages_fetched += 1;
        self.counters.pages_failed += 1;
        self.ledger.record_page_count(job.page_index, 0);
    }

    /// Turns an item whose task died into a placeholder at its coordinate
    fn on_item_lost(&mut self, error: JoinError) {
        let Some(job) = self.item_ids.remove(&error.id()) else {
            tracing::error!("Untracked item task lost: {}", error);
            return;
        };

        let ItemJob { coordinate, url } = job;
        self.on_item_completed(ItemResult::Placeholder {
            coordinate,
            error: XvError::TaskLost {
                url: url.clone(),
                message: error.to_string(),
            },
            url,
        });
    }
}
