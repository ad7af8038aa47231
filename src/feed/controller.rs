//! The data synchronization controller.
//!
//! Owns the feed state machine and decides, at any moment, whether to show
//! cached data, issue a network fetch, merge paginated results, debounce
//! search input, or discard a stale response. Fetches run as spawned tasks
//! that report back over a channel; completions are applied from `poll()`
//! on the event-loop tick, so state transitions are atomic from the
//! caller's perspective.
//!
//! Every issued request carries the controller's generation token. A
//! completion is applied only if its token still matches - a newer
//! `start`/`refresh`/`load_more` always wins over a stale in-flight
//! request, even when the stale round-trip finishes later. Superseded
//! tasks are additionally aborted so the transport gives up early.

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{CacheGateway, CachedFeed};
use crate::flickr::{FetchError, PageResult};

use super::debounce::QueryDebouncer;
use super::merge;
use super::state::{FeedState, Phase};

/// A boxed future resolving to one fetched page
type PageFuture = Pin<Box<dyn Future<Output = Result<PageResult, FetchError>> + Send>>;

/// Factory producing page-fetch futures for a (query, page) pair
type PageFetcherFn = Box<dyn Fn(&str, u32) -> PageFuture + Send + Sync>;

/// Tuning knobs, defaulted to the stock policy values.
#[derive(Debug, Clone)]
pub struct FeedOptions {
  /// How long the cached home feed stays usable
  pub cache_ttl: Duration,
  /// Quiet period between the last keystroke and a search dispatch
  pub debounce_delay: Duration,
}

impl Default for FeedOptions {
  fn default() -> Self {
    Self {
      cache_ttl: Duration::from_secs(5 * 60),
      debounce_delay: Duration::from_millis(800),
    }
  }
}

/// What kind of load produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadKind {
  Initial,
  Refresh,
  More,
}

/// Completion delivered from a spawned fetch task.
struct FetchOutcome {
  token: u64,
  kind: LoadKind,
  query: String,
  page: u32,
  result: Result<PageResult, FetchError>,
}

/// The last failed load, kept so `retry` can re-issue the same target.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FailedLoad {
  FirstPage { query: String },
  NextPage { query: String, page: u32 },
}

pub struct FeedController {
  state: FeedState,
  fetcher: PageFetcherFn,
  cache: CacheGateway,
  debouncer: QueryDebouncer,
  options: FeedOptions,

  /// Generation token; bumped on every issued or superseded request
  token: u64,
  in_flight: Option<JoinHandle<()>>,
  tx: mpsc::UnboundedSender<FetchOutcome>,
  rx: mpsc::UnboundedReceiver<FetchOutcome>,

  last_failed: Option<FailedLoad>,
  /// The cache fast path only applies to the very first load
  loaded_once: bool,
  disposed: bool,
}

impl FeedController {
  pub fn new<F, Fut>(cache: CacheGateway, options: FeedOptions, fetcher: F) -> Self
  where
    F: Fn(&str, u32) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<PageResult, FetchError>> + Send + 'static,
  {
    let (tx, rx) = mpsc::unbounded_channel();
    let debouncer = QueryDebouncer::new(options.debounce_delay);

    Self {
      state: FeedState::new(),
      fetcher: Box::new(move |query, page| Box::pin(fetcher(query, page))),
      cache,
      debouncer,
      options,
      token: 0,
      in_flight: None,
      tx,
      rx,
      last_failed: None,
      loaded_once: false,
      disposed: false,
    }
  }

  /// The current snapshot.
  pub fn state(&self) -> &FeedState {
    &self.state
  }

  /// Begin a fresh load for `query` (empty = home feed), superseding
  /// anything in flight. On the very first home-feed load a TTL-valid
  /// cache entry is published immediately as provisional content; the
  /// network fetch is issued regardless.
  pub fn start(&mut self, query: &str) {
    self.begin_first_page(query.to_string(), LoadKind::Initial, true);
  }

  /// Re-fetch page 1 of the current query, always skipping the cache fast
  /// path. Allowed to supersede an in-flight load.
  pub fn refresh(&mut self) {
    let query = self.state.query.clone();
    self.begin_first_page(query, LoadKind::Refresh, false);
  }

  /// Fetch the next page. No-op unless the feed is `Ready`, more pages
  /// exist, and nothing is in flight.
  pub fn load_more(&mut self) {
    if self.disposed
      || self.state.phase != Phase::Ready
      || !self.state.has_more
      || self.in_flight.is_some()
    {
      return;
    }

    self.supersede();
    self.state.phase = Phase::LoadingMore;
    self.state.error_message = None;

    let query = self.state.query.clone();
    let page = self.state.page + 1;
    self.spawn_fetch(query, page, LoadKind::More);
  }

  /// Re-issue the last failed load with the same query/page target.
  pub fn retry(&mut self) {
    if self.disposed {
      return;
    }

    match self.last_failed.take() {
      Some(FailedLoad::FirstPage { query }) => {
        self.begin_first_page(query, LoadKind::Initial, false);
      }
      Some(FailedLoad::NextPage { query, page }) => {
        self.supersede();
        self.state.phase = Phase::LoadingMore;
        self.state.error_message = None;
        self.spawn_fetch(query, page, LoadKind::More);
      }
      None => {}
    }
  }

  /// Record a keystroke in the search box. May arm the debounce timer, or
  /// dispatch a return to the home feed immediately on cleared input.
  pub fn set_query_text(&mut self, text: &str) {
    if self.disposed {
      return;
    }
    if let Some(query) = self.debouncer.text_changed(text) {
      self.start(&query);
    }
  }

  /// Explicit submit: bypasses the debounce delay and cancels a pending
  /// timer. Blank text is ignored.
  pub fn submit_query(&mut self, text: &str) {
    if self.disposed {
      return;
    }
    if let Some(query) = self.debouncer.submit(text) {
      self.start(&query);
    }
  }

  /// Invalidate the current token, abort any in-flight request and drop
  /// the pending debounce timer. Used on disposal; the state is frozen
  /// afterwards.
  pub fn cancel(&mut self) {
    self.supersede();
    self.debouncer.cancel();
    self.disposed = true;
  }

  /// Drain elapsed debounce timers and completed fetches. Returns `true`
  /// if the snapshot changed. Call from the event-loop tick.
  pub fn poll(&mut self) -> bool {
    if self.disposed {
      return false;
    }

    let mut changed = false;

    if let Some(query) = self.debouncer.poll(Instant::now()) {
      self.start(&query);
      changed = true;
    }

    while let Ok(outcome) = self.rx.try_recv() {
      changed |= self.apply(outcome);
    }

    changed
  }

  fn begin_first_page(&mut self, query: String, kind: LoadKind, allow_cache: bool) {
    if self.disposed {
      return;
    }

    self.supersede();

    let cached = if allow_cache && !self.loaded_once && query.is_empty() {
      self.read_fresh_cache()
    } else {
      None
    };
    self.loaded_once = true;

    self.state.query = query.clone();
    self.state.page = 1;
    self.state.has_more = true;
    self.state.error_message = None;
    self.state.phase = match kind {
      LoadKind::Refresh => Phase::Refreshing,
      _ => Phase::LoadingInitial,
    };
    // Provisional content: a TTL-valid cached home feed stays visible while
    // the network round-trip runs. Everything else loads empty, so a failed
    // first page shows the retry affordance rather than partial data.
    self.state.photos = cached.map(|c| c.photos).unwrap_or_default();

    self.spawn_fetch(query, 1, kind);
  }

  /// Cache entry, if present and still within TTL. Validity is decided
  /// here at read time; the gateway never caches it.
  fn read_fresh_cache(&self) -> Option<CachedFeed> {
    let entry = self.cache.read()?;

    let ttl = chrono::Duration::from_std(self.options.cache_ttl).unwrap_or(chrono::Duration::MAX);
    let age = Utc::now().signed_duration_since(entry.stored_at);
    if age < ttl {
      Some(entry)
    } else {
      debug!("cached feed expired");
      None
    }
  }

  /// Bump the token and abort whatever was in flight. Any response from
  /// before the bump fails the token check at apply time.
  fn supersede(&mut self) {
    self.token += 1;
    if let Some(handle) = self.in_flight.take() {
      handle.abort();
    }
  }

  fn spawn_fetch(&mut self, query: String, page: u32, kind: LoadKind) {
    let token = self.token;
    let future = (self.fetcher)(&query, page);
    let tx = self.tx.clone();

    debug!(token, page, query = %query, "issuing fetch");

    self.in_flight = Some(tokio::spawn(async move {
      let result = future.await;
      // Receiver may already be gone on disposal
      let _ = tx.send(FetchOutcome {
        token,
        kind,
        query,
        page,
        result,
      });
    }));
  }

  fn apply(&mut self, outcome: FetchOutcome) -> bool {
    if outcome.token != self.token {
      debug!(
        stale = outcome.token,
        current = self.token,
        "discarding stale response"
      );
      return false;
    }

    self.in_flight = None;

    match (outcome.kind, outcome.result) {
      (LoadKind::More, Ok(page)) => {
        let page_number = page.page_number;
        let has_more = page.has_more();

        let existing = std::mem::take(&mut self.state.photos);
        self.state.photos = merge::merge_append(existing, page.photos);
        self.state.page = page_number;
        self.state.has_more = has_more;
        self.state.phase = Phase::Ready;
        self.state.error_message = None;
        self.last_failed = None;
      }
      (LoadKind::More, Err(e)) => {
        if e.is_cancelled() {
          return false;
        }
        warn!(error = %e, page = outcome.page, "load-more failed");

        // The accumulated list stays; the error is inline
        self.state.phase = Phase::Ready;
        self.state.error_message = Some(e.user_message().to_string());
        self.last_failed = Some(FailedLoad::NextPage {
          query: outcome.query,
          page: outcome.page,
        });
      }
      (_, Ok(page)) => {
        let page_number = page.page_number;
        let has_more = page.has_more();

        self.state.photos = merge::merge_replace(page.photos);
        self.state.page = page_number;
        self.state.has_more = has_more;
        self.state.phase = Phase::Ready;
        self.state.error_message = None;
        self.last_failed = None;

        // Only the successful, unfiltered home feed is cached
        if outcome.query.is_empty() {
          self.cache.write(&self.state.photos, Utc::now());
        }
      }
      (_, Err(e)) => {
        if e.is_cancelled() {
          return false;
        }
        warn!(error = %e, "first-page load failed");

        self.state.phase = Phase::Error;
        self.state.photos.clear();
        self.state.error_message = Some(e.user_message().to_string());
        self.last_failed = Some(FailedLoad::FirstPage {
          query: outcome.query,
        });
      }
    }

    true
  }
}

impl std::fmt::Debug for FeedController {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FeedController")
      .field("state", &self.state)
      .field("token", &self.token)
      .field("in_flight", &self.in_flight.is_some())
      .finish_non_exhaustive()
  }
}
