//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl controller that coordinates all aspects of
//! a run, including:
//! - Opening one render session per worker
//! - Seeding the frontier and driving the worker pool
//! - Rendering, link extraction, query matching and link filtering per page
//! - Handling cancellation and fatal errors
//! - Closing the output sink with the final run status

use crate::config::CrawlConfig;
use crate::crawler::frontier::{Frontier, FrontierItem};
use crate::crawler::matcher::find_matches;
use crate::crawler::parser::PageResult;
use crate::crawler::render::{RenderEngine, RenderError, RenderSession};
use crate::output::{OutputSink, ScrapeRecord};
use crate::state::CrawlPhase;
use crate::storage::RunStatus;
use crate::url::matches_domain_suffix;
use crate::{CrawlError, Result};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Scraped pages between two progress lines
const PROGRESS_INTERVAL: u64 = 10;

/// Summary of a finished crawl run
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    /// Pages rendered and written to the scrape log
    pub pages_scraped: u64,

    /// Pages skipped because their render failed or timed out
    pub render_failures: u64,

    /// Dequeued items skipped for exceeding the depth limit
    pub depth_skipped: u64,

    /// Links accepted into the frontier (the seed excluded)
    pub links_enqueued: u64,

    /// Records written to the match log
    pub match_records: u64,

    /// Distinct URLs that entered the frontier, seed included
    pub urls_seen: usize,

    /// Phase the controller ended in
    pub phase: CrawlPhase,

    /// Status handed to the output sink
    pub status: RunStatus,

    pub elapsed: Duration,
}

#[derive(Debug, Default)]
struct Counters {
    pages_scraped: AtomicU64,
    render_failures: AtomicU64,
    depth_skipped: AtomicU64,
    links_enqueued: AtomicU64,
    match_records: AtomicU64,
}

/// State shared by every worker of a run
struct Shared {
    config: CrawlConfig,
    frontier: Frontier,
    sink: Arc<dyn OutputSink>,
    cancel: CancellationToken,
    counters: Counters,
    phase: Mutex<CrawlPhase>,
    started: Mutex<Option<Instant>>,
}

impl Shared {
    fn phase(&self) -> CrawlPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, to: CrawlPhase) -> Result<()> {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        if !phase.can_transition_to(to) {
            return Err(CrawlError::InvalidTransition { from: *phase, to });
        }
        tracing::info!("Crawl phase: {} -> {}", *phase, to);
        *phase = to;
        Ok(())
    }

    /// Moves Running to Draining; later calls are no-ops
    fn begin_draining(&self) {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        if *phase == CrawlPhase::Running {
            tracing::info!("Crawl phase: {} -> {}", *phase, CrawlPhase::Draining);
            *phase = CrawlPhase::Draining;
        }
    }

    fn elapsed(&self) -> Duration {
        let started = *self.started.lock().unwrap_or_else(PoisonError::into_inner);
        started.map(|at| at.elapsed()).unwrap_or_default()
    }

    /// Stops dispatching after a fatal error
    fn abort(&self) {
        self.cancel.cancel();
        self.frontier.close();
    }

    /// Processes one frontier item end to end
    ///
    /// Per-page failures are logged and counted. Only a lost render engine
    /// or a sink write error is returned.
    async fn process_item(
        &self,
        session: &mut dyn RenderSession,
        item: &FrontierItem,
    ) -> Result<()> {
        if !self.frontier.depth_allowed(item.depth) {
            tracing::debug!("Skipping {} (depth {} over limit)", item.url, item.depth);
            self.counters.depth_skipped.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }

        tracing::debug!("Rendering {} (depth {})", item.url, item.depth);

        let timeout = self.config.render_timeout;
        let rendered = tokio::time::timeout(timeout, session.render(&item.url, timeout))
            .await
            .unwrap_or_else(|_| Err(RenderError::Timeout(timeout)));

        let rendered = match rendered {
            Ok(rendered) => rendered,
            Err(e) if e.is_fatal() => {
                tracing::error!("Render engine lost while rendering {}: {}", item.url, e);
                return Err(e.into());
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", item.url, e);
                self.counters.render_failures.fetch_add(1, Ordering::Relaxed);
                return Ok(());
            }
        };

        let page = PageResult::from_render(item.url.clone(), &rendered.final_url, rendered.html);

        let matches = find_matches(&page, &self.config.query, self.config.full_page_search);
        if !matches.is_empty() {
            tracing::info!("Query matched on {} ({} records)", item.url, matches.len());
            self.sink.record_matches(&matches)?;
            self.counters
                .match_records
                .fetch_add(matches.len() as u64, Ordering::Relaxed);
        }

        if self.frontier.depth_allowed(item.depth.saturating_add(1)) {
            let mut accepted = 0u64;
            for link in self.select_links(&page.extracted_links) {
                if self.frontier.try_enqueue(item.child(link)) {
                    accepted += 1;
                }
            }
            self.counters
                .links_enqueued
                .fetch_add(accepted, Ordering::Relaxed);
        }

        self.sink
            .record_scrape(&ScrapeRecord::new(item.url.as_str(), item.depth))?;

        let scraped = self.counters.pages_scraped.fetch_add(1, Ordering::Relaxed) + 1;
        if scraped % PROGRESS_INTERVAL == 0 {
            let elapsed = self.elapsed();
            let rate = scraped as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
            tracing::info!(
                "Progress: {} pages scraped, {} in frontier, depth {}, {:.2} pages/sec",
                scraped,
                self.frontier.len(),
                item.depth,
                rate
            );
        }

        Ok(())
    }

    /// Filters a page's links down to the ones worth enqueueing
    ///
    /// Keeps links inside the domain suffix that neither repeat within the
    /// page nor were seen before, truncated to the per-page cap in
    /// extraction order.
    fn select_links(&self, links: &[Url]) -> Vec<Url> {
        let cap = self.config.max_links_per_page;
        let mut on_page = HashSet::new();
        let mut selected = Vec::new();

        for link in links {
            if cap > 0 && selected.len() >= cap {
                break;
            }
            if !matches_domain_suffix(link, &self.config.domain_suffix) {
                continue;
            }
            if !on_page.insert(link.as_str()) || self.frontier.is_seen(link) {
                continue;
            }
            selected.push(link.clone());
        }

        selected
    }
}

/// Pulls items off the frontier until it drains or the run is cancelled
async fn worker(
    shared: Arc<Shared>,
    mut session: Box<dyn RenderSession>,
    worker_id: usize,
) -> Result<()> {
    tracing::debug!("Worker {} started", worker_id);

    let result = loop {
        let claim = tokio::select! {
            biased;
            _ = shared.cancel.cancelled() => break Ok(()),
            claim = shared.frontier.dequeue() => claim,
        };

        let Some(claim) = claim else {
            break Ok(());
        };

        if let Err(e) = shared.process_item(session.as_mut(), claim.item()).await {
            shared.abort();
            break Err(e);
        }
    };

    shared.begin_draining();
    session.close().await;
    tracing::debug!("Worker {} stopped", worker_id);
    result
}

/// Main crawl controller
///
/// Drives a worker pool over a shared frontier. Each worker owns one render
/// session and runs pages through render, match, link selection and the
/// output sink.
pub struct Crawler {
    shared: Arc<Shared>,
    engine: Arc<dyn RenderEngine>,
}

impl Crawler {
    /// Creates a controller in the `Idle` phase
    ///
    /// # Arguments
    ///
    /// * `config` - Immutable crawl parameters
    /// * `engine` - Render engine handing out one session per worker
    /// * `sink` - Destination of the scrape and match logs
    pub fn new(
        config: CrawlConfig,
        engine: Arc<dyn RenderEngine>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        let frontier = Frontier::new(config.max_depth);
        Self {
            shared: Arc::new(Shared {
                config,
                frontier,
                sink,
                cancel: CancellationToken::new(),
                counters: Counters::default(),
                phase: Mutex::new(CrawlPhase::Idle),
                started: Mutex::new(None),
            }),
            engine,
        }
    }

    /// Uses `cancel` as the stop signal instead of a private token
    pub fn with_cancellation(self, cancel: CancellationToken) -> Self {
        let Self { shared, engine } = self;
        let shared = match Arc::try_unwrap(shared) {
            Ok(mut shared) => {
                shared.cancel = cancel;
                Arc::new(shared)
            }
            Err(shared) => {
                tracing::warn!("Crawler already shared; keeping its own cancellation token");
                shared
            }
        };
        Self { shared, engine }
    }

    /// Current controller phase
    pub fn phase(&self) -> CrawlPhase {
        self.shared.phase()
    }

    /// The frontier of this run
    pub fn frontier(&self) -> &Frontier {
        &self.shared.frontier
    }

    /// Runs the crawl to completion
    ///
    /// 1. Opens one render session per worker (failure = engine unreachable)
    /// 2. Seeds the frontier with the start URL at depth 0
    /// 3. Runs the workers until the frontier drains or the run is cancelled
    /// 4. Closes the sink with the final run status
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The frontier drained or the run was cancelled
    /// * `Err(CrawlError)` - The engine was unreachable, lost mid-run, or the
    ///   sink failed
    pub async fn run(&self) -> Result<CrawlReport> {
        let shared = &self.shared;
        let config = &shared.config;

        if shared.phase() != CrawlPhase::Idle {
            return Err(CrawlError::InvalidTransition {
                from: shared.phase(),
                to: CrawlPhase::Running,
            });
        }

        tracing::info!(
            "Starting crawl of {} with {} {} session(s)",
            config.start_url,
            config.concurrency,
            self.engine.name()
        );

        let sessions = match self.open_sessions().await {
            Ok(sessions) => sessions,
            Err(e) => {
                self.close_out(RunStatus::Failed).await;
                return Err(e);
            }
        };

        shared.transition(CrawlPhase::Running)?;
        *shared.started.lock().unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());

        let mut seed = config.start_url.clone();
        seed.set_fragment(None);
        shared.frontier.try_enqueue(FrontierItem::seed(seed));

        let mut workers = JoinSet::new();
        for (worker_id, session) in sessions.into_iter().enumerate() {
            workers.spawn(worker(Arc::clone(shared), session, worker_id));
        }

        let mut first_error: Option<CrawlError> = None;
        while let Some(joined) = workers.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    shared.abort();
                    Err(CrawlError::WorkerPanicked(e.to_string()))
                }
            };
            if let Err(e) = outcome {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        shared.begin_draining();
        if !shared.frontier.is_empty() {
            tracing::info!("{} queued URLs left unvisited", shared.frontier.len());
        }
        shared.transition(CrawlPhase::Done)?;

        let status = if first_error.is_some() {
            RunStatus::Failed
        } else if shared.cancel.is_cancelled() {
            RunStatus::Interrupted
        } else {
            RunStatus::Completed
        };

        let finished = shared.sink.finish(status);
        self.engine.shutdown().await;

        if let Some(e) = first_error {
            tracing::error!("Crawl failed: {}", e);
            return Err(e);
        }
        finished?;

        let report = self.report(status);
        tracing::info!(
            "Crawl {}: {} pages scraped, {} render failures, {} match records in {:?}",
            status,
            report.pages_scraped,
            report.render_failures,
            report.match_records,
            report.elapsed
        );

        Ok(report)
    }

    async fn open_sessions(&self) -> Result<Vec<Box<dyn RenderSession>>> {
        let mut sessions = Vec::with_capacity(self.shared.config.concurrency);
        for _ in 0..self.shared.config.concurrency.max(1) {
            match self.engine.open_session().await {
                Ok(session) => sessions.push(session),
                Err(e) => {
                    for mut session in sessions {
                        session.close().await;
                    }
                    return Err(CrawlError::RenderUnavailable(e.to_string()));
                }
            }
        }
        Ok(sessions)
    }

    /// Best-effort shutdown when the run never started
    async fn close_out(&self, status: RunStatus) {
        if let Err(e) = self.shared.sink.finish(status) {
            tracing::warn!("Failed to close output sink: {}", e);
        }
        self.engine.shutdown().await;
    }

    fn report(&self, status: RunStatus) -> CrawlReport {
        let counters = &self.shared.counters;
        CrawlReport {
            pages_scraped: counters.pages_scraped.load(Ordering::Relaxed),
            render_failures: counters.render_failures.load(Ordering::Relaxed),
            depth_skipped: counters.depth_skipped.load(Ordering::Relaxed),
            links_enqueued: counters.links_enqueued.load(Ordering::Relaxed),
            match_records: counters.match_records.load(Ordering::Relaxed),
            urls_seen: self.shared.frontier.seen_count(),
            phase: self.shared.phase(),
            status,
            elapsed: self.shared.elapsed(),
        }
    }
}
