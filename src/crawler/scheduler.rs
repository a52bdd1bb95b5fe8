//! Frontier scheduling and batch dispatch
//!
//! This module owns the traversal state:
//! - FIFO frontier of pending crawl tasks
//! - Visited set (the sole deduplication mechanism)
//! - Per-page depth bookkeeping
//! - Concurrency-bounded batch dispatch
//! - The page budget stop condition
//!
//! Batches never interleave: a new batch is not dispatched until every task
//! of the current one has completed. The frontier and visited set are only
//! touched between batches, so in-flight tasks never share mutable state.

use std::collections::{HashSet, VecDeque};
use url::Url;

use crate::crawler::fetcher::{FetchedPage, PageFetcher};
use crate::robots::DisallowedPaths;
use crate::sitemap::{priority_for_depth, SitemapEntry};
use crate::Result;

/// A page queued for crawling
///
/// Created when a link is accepted into the frontier, consumed exactly once,
/// never mutated.
#[derive(Debug, Clone)]
pub struct CrawlTask {
    /// Absolute URL to fetch
    pub url: Url,

    /// Link distance from the seed
    pub depth: u32,
}

/// Progress callback invoked once per dispatched page with the running page
/// count. The crawl never blocks on it.
pub type ProgressFn = dyn Fn(&Url, usize) + Send + Sync;

/// Scheduler manages the frontier queue and the page budget
pub struct Scheduler {
    frontier: VecDeque<CrawlTask>,
    visited: HashSet<String>,
    entries: Vec<SitemapEntry>,
    max_pages: usize,
    concurrency: usize,
}

impl Scheduler {
    /// Creates a scheduler seeded with the crawl origin at depth 0
    ///
    /// The origin enters the visited set immediately, before any fetch is
    /// issued, so no duplicate of it can race into the frontier.
    pub fn new(origin: Url, max_pages: usize, concurrency: usize) -> Self {
        let mut visited = HashSet::new();
        visited.insert(origin.as_str().to_string());

        let mut frontier = VecDeque::new();
        frontier.push_back(CrawlTask {
            url: origin,
            depth: 0,
        });

        Self {
            frontier,
            visited,
            entries: Vec::new(),
            max_pages,
            concurrency: concurrency.max(1),
        }
    }

    /// Runs the crawl loop to completion and returns the recorded entries
    ///
    /// The loop ends when the frontier empties or the page budget is
    /// reached. A fatal fetch error (browser launch failure) is propagated;
    /// the caller is responsible for closing the browser either way.
    pub async fn run(
        mut self,
        fetcher: &PageFetcher<'_>,
        rules: &DisallowedPaths,
        progress: Option<&ProgressFn>,
    ) -> Result<Vec<SitemapEntry>> {
        while !self.frontier.is_empty() && self.entries.len() < self.max_pages {
            let batch = self.next_batch();

            let fetches = batch.iter().enumerate().map(|(position, task)| {
                if let Some(report) = progress {
                    report(&task.url, self.entries.len() + position + 1);
                }
                tracing::info!("Crawling: {} (depth {})", task.url, task.depth);
                fetcher.fetch_page(&task.url)
            });

            // The next batch is not assembled until every fetch here has
            // completed.
            let results = futures::future::join_all(fetches).await;

            for (task, result) in batch.into_iter().zip(results) {
                let page = result?;
                self.record(task, page, rules);
            }
        }

        Ok(self.entries)
    }

    /// Removes up to one batch of tasks from the frontier
    ///
    /// The batch is capped by the concurrency width and by the remaining
    /// page budget, so no task is dispatched that could not be recorded.
    fn next_batch(&mut self) -> Vec<CrawlTask> {
        let remaining = self.max_pages - self.entries.len();
        let count = self.frontier.len().min(self.concurrency).min(remaining);
        self.frontier.drain(..count).collect()
    }

    /// Records a completed task and folds its accepted links into the frontier
    fn record(&mut self, task: CrawlTask, page: FetchedPage, rules: &DisallowedPaths) {
        if self.entries.len() >= self.max_pages {
            // An in-flight task completed after the budget filled
            return;
        }

        self.entries.push(SitemapEntry {
            url: task.url,
            last_modified: page.last_modified,
            priority: priority_for_depth(task.depth),
        });

        for link in page.links {
            if self.entries.len() >= self.max_pages {
                break;
            }
            if self.visited.contains(link.as_str()) {
                continue;
            }
            if rules.is_disallowed(link.path()) {
                tracing::debug!("Skipping {} (disallowed by robots.txt)", link);
                continue;
            }

            self.visited.insert(link.as_str().to_string());
            self.frontier.push_back(CrawlTask {
                url: link,
                depth: task.depth + 1,
            });
        }
    }

    /// Returns the number of pages recorded so far
    pub fn pages_recorded(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of tasks waiting in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }
}
