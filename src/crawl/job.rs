// src/crawl/job.rs
// =============================================================================
// Concurrent crawling with one worker task per URL.
//
// How it works:
// 1. crawl() creates a CrawlJob and starts a worker for the seed URL
// 2. A worker fetches its URL, emits exactly one CrawlEvent, then tries to
//    start a worker for every URL the page links to, with depth - 1
// 3. Starting a worker first "claims" the URL: check the visited set,
//    insert, and bump the in-flight counter, all under one lock
// 4. When a worker ends it decrements the counter under the same lock;
//    whoever brings it to zero drops the last Sender, closing the channel
//
// Why one lock for everything?
// - Claiming must be check + insert in one step, or two workers could
//   both see a URL as new and fetch it twice
// - Decrement + compare + close must be one step too, or the channel
//   could close while a child is being started
//
// Children are counted before their parent finishes, so the counter can
// only reach zero once every branch is done.
// =============================================================================

use super::event::CrawlEvent;
use super::fetcher::Fetcher;
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

// Events buffered between workers and the reader
const RESULTS_CAPACITY: usize = 16;

// Everything the workers share, guarded by CrawlJob::state
#[derive(Debug)]
struct JobState {
    visited: HashSet<String>,
    in_flight: usize,
    // Taken (and so dropped) exactly once, when in_flight reaches zero
    results: Option<mpsc::Sender<CrawlEvent>>,
}

/// Shared state of one crawl run.
pub struct CrawlJob {
    state: Mutex<JobState>,
    fetcher: Arc<dyn Fetcher>,
}

impl CrawlJob {
    fn new(fetcher: Arc<dyn Fetcher>) -> (Arc<Self>, mpsc::Receiver<CrawlEvent>) {
        let (tx, rx) = mpsc::channel(RESULTS_CAPACITY);
        let job = CrawlJob {
            state: Mutex::new(JobState {
                visited: HashSet::new(),
                in_flight: 0,
                results: Some(tx),
            }),
            fetcher,
        };
        (Arc::new(job), rx)
    }

    // Never held across an .await. A panicking worker cannot leave the
    // state half-updated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, JobState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims `url` for a new worker. Returns false if it was already seen.
    fn claim(&self, url: &str) -> bool {
        let mut state = self.lock();
        if !state.visited.insert(url.to_string()) {
            return false;
        }
        state.in_flight += 1;
        true
    }

    /// Marks one worker as done and closes the channel if it was the last.
    fn finish(&self) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.in_flight == 0 {
            Self::close(&mut state);
        }
    }

    /// Closes the channel if no worker is running, e.g. when the seed was
    /// never started.
    fn close_if_idle(&self) {
        let mut state = self.lock();
        if state.in_flight == 0 {
            Self::close(&mut state);
        }
    }

    fn close(state: &mut JobState) {
        if state.results.take().is_some() {
            tracing::debug!(visited = state.visited.len(), "crawl finished, closing results");
        }
    }

    async fn emit(&self, event: CrawlEvent) {
        // Clone the Sender out so the lock is released before send().await.
        // The clone is dropped when this returns, before the worker finishes.
        let tx = self.lock().results.clone();
        let Some(tx) = tx else {
            tracing::warn!(url = event.url(), "results already closed, dropping event");
            return;
        };
        if tx.send(event).await.is_err() {
            tracing::debug!("results receiver dropped, event discarded");
        }
    }
}

// Calls CrawlJob::finish when a worker ends, however it ends
struct FinishGuard(Arc<CrawlJob>);

impl Drop for FinishGuard {
    fn drop(&mut self) {
        self.0.finish();
    }
}

/// Crawls pages starting at `seed`, up to `depth` levels deep.
///
/// Depth counts the seed as the first level: `0` fetches nothing, `1` only
/// the seed, `2` the seed and the pages it links to, and so on.
///
/// Returns the receiving end of the results. It yields one event per
/// distinct URL fetched, in no particular order, then `None` once every
/// worker is done. Must be called from inside a tokio runtime.
pub fn crawl(seed: &str, depth: i32, fetcher: Arc<dyn Fetcher>) -> mpsc::Receiver<CrawlEvent> {
    let (job, rx) = CrawlJob::new(fetcher);
    start_worker(&job, seed, depth);
    job.close_if_idle();
    rx
}

/// Runs a crawl to completion and collects every event.
pub async fn crawl_all(seed: &str, depth: i32, fetcher: Arc<dyn Fetcher>) -> Vec<CrawlEvent> {
    let mut rx = crawl(seed, depth, fetcher);
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

fn start_worker(job: &Arc<CrawlJob>, url: &str, depth: i32) {
    if depth <= 0 {
        tracing::trace!(url, "depth exhausted, not crawling");
        return;
    }
    if !job.claim(url) {
        tracing::trace!(url, "already claimed");
        return;
    }

    tracing::debug!(url, depth, "crawling");
    tokio::spawn(visit(Arc::clone(job), url.to_string(), depth));
}

// Boxed so the worker can spawn more of itself without an infinitely
// sized future type
fn visit(job: Arc<CrawlJob>, url: String, depth: i32) -> BoxFuture<'static, ()> {
    async move {
        let _done = FinishGuard(Arc::clone(&job));

        let (event, links) = match job.fetcher.fetch(&url).await {
            Ok(page) => (
                CrawlEvent::Found {
                    url: url.clone(),
                    body: page.body,
                },
                page.urls,
            ),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "fetch failed");
                (
                    CrawlEvent::Failed {
                        url: url.clone(),
                        error: e.to_string(),
                    },
                    Vec::new(),
                )
            }
        };

        job.emit(event).await;

        for link in &links {
            start_worker(&job, link, depth - 1);
        }
    }
    .boxed()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why std::sync::Mutex inside async code?
//    - The lock is only held for a few instructions and never across .await
//    - A blocking mutex is fine (and faster) for that
//    - tokio::sync::Mutex is only needed when holding a lock across .await
//
// 2. How does the channel get closed?
//    - An mpsc channel closes when every Sender is dropped
//    - The job keeps the first Sender in an Option
//    - Workers borrow a clone just long enough to send one event
//    - The last worker to finish take()s the Option, dropping that first Sender
//
// 3. What is FinishGuard for?
//    - Drop runs when the guard goes out of scope, even on early return
//      or panic, so the counter is always decremented
//
// 4. What is BoxFuture?
//    - Pin<Box<dyn Future<Output = T> + Send + 'a>>
//    - A future whose concrete type is hidden behind a pointer
//    - visit() spawns visit(); boxing gives that a nameable type
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::fake::{FakeFetcher, SAMPLE_SEED};
    use crate::crawl::fetcher::{FetchError, Page};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::time::Duration;

    // Counts fetches per URL and sleeps a little to shuffle the interleaving
    struct CountingFetcher {
        inner: FakeFetcher,
        calls: Mutex<HashMap<String, usize>>,
        delay: Duration,
    }

    impl CountingFetcher {
        fn new(inner: FakeFetcher, delay: Duration) -> Self {
            CountingFetcher {
                inner,
                calls: Mutex::new(HashMap::new()),
                delay,
            }
        }

        fn calls(&self) -> HashMap<String, usize> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for CountingFetcher {
        async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
            *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
            tokio::time::sleep(self.delay).await;
            self.inner.fetch(url).await
        }
    }

    async fn run(seed: &str, depth: i32, fetcher: Arc<dyn Fetcher>) -> Vec<CrawlEvent> {
        // A hang means the channel was never closed
        tokio::time::timeout(Duration::from_secs(5), crawl_all(seed, depth, fetcher))
            .await
            .expect("crawl did not finish")
    }

    fn sorted_urls(events: &[CrawlEvent]) -> Vec<String> {
        let mut urls: Vec<String> = events.iter().map(|e| e.url().to_string()).collect();
        urls.sort();
        urls
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_sample_depth_four() {
        let events = run(SAMPLE_SEED, 4, Arc::new(FakeFetcher::sample())).await;

        assert_eq!(events.len(), 5);
        assert_eq!(
            sorted_urls(&events),
            vec![
                "https://docs.example.com/",
                "https://docs.example.com/cmd/",
                "https://docs.example.com/pkg/",
                "https://docs.example.com/pkg/fmt/",
                "https://docs.example.com/pkg/os/",
            ]
        );

        let failed: Vec<_> = events.iter().filter(|e| !e.is_found()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].to_string(), "not found: https://docs.example.com/cmd/");
    }

    #[tokio::test]
    async fn test_sample_lines() {
        let events = run(SAMPLE_SEED, 4, Arc::new(FakeFetcher::sample())).await;
        let lines: HashSet<String> = events.iter().map(|e| e.to_string()).collect();

        assert!(lines.contains(r#"found: https://docs.example.com/ "The Example Documentation""#));
        assert!(lines.contains(r#"found: https://docs.example.com/pkg/ "Packages""#));
        assert!(lines.contains(r#"found: https://docs.example.com/pkg/fmt/ "Package fmt""#));
        assert!(lines.contains(r#"found: https://docs.example.com/pkg/os/ "Package os""#));
        assert!(lines.contains("not found: https://docs.example.com/cmd/"));
    }

    #[tokio::test]
    async fn test_depth_zero_emits_nothing() {
        let events = run(SAMPLE_SEED, 0, Arc::new(FakeFetcher::sample())).await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_negative_depth_emits_nothing() {
        let events = run(SAMPLE_SEED, -3, Arc::new(FakeFetcher::sample())).await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_depth_one_only_seed() {
        let events = run(SAMPLE_SEED, 1, Arc::new(FakeFetcher::sample())).await;
        assert_eq!(sorted_urls(&events), vec![SAMPLE_SEED]);
    }

    #[tokio::test]
    async fn test_depth_two_stops_before_grandchildren() {
        let events = run(SAMPLE_SEED, 2, Arc::new(FakeFetcher::sample())).await;
        assert_eq!(
            sorted_urls(&events),
            vec![
                "https://docs.example.com/",
                "https://docs.example.com/cmd/",
                "https://docs.example.com/pkg/",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_seed_single_error() {
        let fetcher = Arc::new(CountingFetcher::new(FakeFetcher::sample(), Duration::ZERO));
        let events = run("https://nowhere.test/", 4, fetcher.clone()).await;

        assert_eq!(
            events,
            vec![CrawlEvent::Failed {
                url: "https://nowhere.test/".to_string(),
                error: "not found: https://nowhere.test/".to_string(),
            }]
        );
        assert_eq!(fetcher.calls().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_each_url_fetched_once() {
        let fetcher = Arc::new(CountingFetcher::new(
            FakeFetcher::sample(),
            Duration::from_millis(5),
        ));
        let events = run(SAMPLE_SEED, 10, fetcher.clone()).await;

        let calls = fetcher.calls();
        assert_eq!(calls.len(), 5);
        assert!(calls.values().all(|&n| n == 1));
        assert_eq!(events.len(), calls.len());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_dense_graph_dedup() {
        // Every page links to every other page
        const PAGES: usize = 60;
        let urls: Vec<String> = (0..PAGES).map(|i| format!("https://dense.test/{i}")).collect();
        let links: Vec<&str> = urls.iter().map(String::as_str).collect();

        let mut graph = FakeFetcher::default();
        for url in &urls {
            graph.insert(url, url, &links);
        }

        let fetcher = Arc::new(CountingFetcher::new(graph, Duration::from_millis(1)));
        let events = run(&urls[0], 3, fetcher.clone()).await;

        assert_eq!(events.len(), PAGES);
        assert!(events.iter().all(CrawlEvent::is_found));
        assert!(fetcher.calls().values().all(|&n| n == 1));
    }

    #[tokio::test]
    async fn test_dropped_receiver_does_not_stall_workers() {
        let fetcher = Arc::new(CountingFetcher::new(
            FakeFetcher::sample(),
            Duration::from_millis(1),
        ));
        let rx = crawl(SAMPLE_SEED, 4, fetcher.clone());
        drop(rx);

        // The job holds the only other Arc to the fetcher and is freed once
        // the last worker finishes
        tokio::time::timeout(Duration::from_secs(5), async {
            while Arc::strong_count(&fetcher) > 1 {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("workers did not finish after the receiver was dropped");

        let calls = fetcher.calls();
        assert_eq!(calls.len(), 5);
        assert!(calls.values().all(|&n| n == 1));
    }

    #[test]
    fn test_claim_is_once_per_url() {
        let (job, _rx) = CrawlJob::new(Arc::new(FakeFetcher::default()));
        assert!(job.claim("a"));
        assert!(!job.claim("a"));
        assert!(job.claim("b"));
        assert_eq!(job.lock().in_flight, 2);
    }

    #[test]
    fn test_finish_closes_on_last_worker() {
        let (job, mut rx) = CrawlJob::new(Arc::new(FakeFetcher::default()));
        job.claim("a");
        job.claim("b");

        job.finish();
        assert!(job.lock().results.is_some());
        job.finish();
        assert!(job.lock().results.is_none());
        // All senders gone, so the channel reports closed
        assert!(matches!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }
}
