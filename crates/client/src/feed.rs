//! Incremental loading of paginated, append-only lists.
//!
//! [`FeedLoader`] owns the accumulated items of one list and the cursor into
//! the remote collection. Every "infinite scroll" view (the activity feed, a
//! group's bills) is a loader over a different [`PageSource`].
//!
//! Fetches are guarded: the in-flight flag is checked and set synchronously
//! when a load is requested, before the returned future is polled, so two
//! triggers racing each other produce a single request. A reset bumps the
//! loader's epoch; a page fetched under an older epoch is dropped on arrival.

use std::{
    fmt,
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use api_types::page::Page;
use thiserror::Error;

/// Remote collection read page by page.
pub trait PageSource<T>: Send + Sync + 'static {
    type Error: fmt::Display + Send;

    /// Fetches up to `limit` items starting at `offset`.
    fn fetch_page(
        &self,
        offset: u64,
        limit: u64,
    ) -> impl Future<Output = Result<Page<T>, Self::Error>> + Send;
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FeedError {
    /// The last fetch failed. Loaded items are kept; triggering again retries.
    #[error("{0}")]
    FetchFailed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedStatus {
    /// Nothing requested yet.
    Idle,
    InitialLoading,
    /// Items loaded and more available.
    Steady,
    LoadingMore,
    /// The source reported no further pages.
    Exhausted,
    /// The last fetch failed.
    Error,
}

/// What a single load request ended up doing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was applied.
    Loaded { received: usize, has_more: bool },
    /// Nothing was fetched: a fetch was already in flight or the list is
    /// exhausted.
    Skipped,
    /// The page arrived after a reset and was dropped.
    Stale,
    Failed(FeedError),
}

#[derive(Debug)]
struct FeedState<T> {
    items: Vec<T>,
    offset: u64,
    has_more: bool,
    in_flight: bool,
    initial_in_flight: bool,
    loaded_once: bool,
    total: Option<u64>,
    error: Option<FeedError>,
    epoch: u64,
}

impl<T> Default for FeedState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            offset: 0,
            has_more: true,
            in_flight: false,
            initial_in_flight: false,
            loaded_once: false,
            total: None,
            error: None,
            epoch: 0,
        }
    }
}

/// A fetch that passed the guard.
#[derive(Clone, Copy, Debug)]
struct Ticket {
    epoch: u64,
    offset: u64,
    initial: bool,
}

/// Accumulates the pages of a [`PageSource`].
///
/// Cloning is cheap; clones share the same list.
pub struct FeedLoader<T, S> {
    source: Arc<S>,
    page_size: u64,
    state: Arc<Mutex<FeedState<T>>>,
}

impl<T, S> Clone for FeedLoader<T, S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            page_size: self.page_size,
            state: Arc::clone(&self.state),
        }
    }
}

impl<T, S> FeedLoader<T, S>
where
    T: Send + 'static,
    S: PageSource<T>,
{
    pub fn new(source: S, page_size: u64) -> Self {
        Self {
            source: Arc::new(source),
            page_size: page_size.max(1),
            state: Arc::new(Mutex::new(FeedState::default())),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Requests the next page, or the first one when `initial` is set.
    ///
    /// The guard runs before this returns: if a fetch is already in flight,
    /// or the list is exhausted and `initial` is not set, the returned future
    /// resolves to [`LoadOutcome::Skipped`] without calling the source.
    pub fn load_more(&self, initial: bool) -> impl Future<Output = LoadOutcome> + Send + use<T, S> {
        let ticket = self.begin(initial);
        self.run(ticket)
    }

    /// Clears the list and starts a fresh initial load.
    ///
    /// A fetch still in flight from before the reset is not awaited; its page
    /// is discarded when it arrives.
    pub fn reset(&self) -> impl Future<Output = LoadOutcome> + Send + use<T, S> {
        {
            let mut state = self.lock();
            let epoch = state.epoch.wrapping_add(1);
            *state = FeedState {
                epoch,
                ..FeedState::default()
            };
            tracing::debug!(epoch, "feed reset");
        }
        self.load_more(true)
    }

    /// Sentinel callback: loads the next page when the sentinel becomes
    /// visible, otherwise does nothing.
    pub fn on_visibility(&self, visible: bool) -> impl Future<Output = LoadOutcome> + Send + use<T, S> {
        let ticket = if visible { self.begin(false) } else { None };
        self.run(ticket)
    }

    fn begin(&self, initial: bool) -> Option<Ticket> {
        let mut state = self.lock();
        if state.in_flight {
            tracing::debug!(initial, "fetch already in flight, skipping");
            return None;
        }
        if !state.has_more && !initial {
            return None;
        }

        state.in_flight = true;
        state.initial_in_flight = initial;
        Some(Ticket {
            epoch: state.epoch,
            offset: if initial { 0 } else { state.offset },
            initial,
        })
    }

    fn run(&self, ticket: Option<Ticket>) -> impl Future<Output = LoadOutcome> + Send + use<T, S> {
        let source = Arc::clone(&self.source);
        let limit = self.page_size;
        // Built before the future is polled so dropping it unpolled still
        // releases the guard.
        let flight = ticket.map(|ticket| Flight {
            state: Arc::clone(&self.state),
            ticket,
            settled: false,
        });
        async move {
            let Some(flight) = flight else {
                return LoadOutcome::Skipped;
            };
            let result = source.fetch_page(flight.ticket.offset, limit).await;
            flight.settle(result)
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedState<T>> {
        lock_state(&self.state)
    }

    pub fn status(&self) -> FeedStatus {
        let state = self.lock();
        if state.in_flight {
            if state.initial_in_flight {
                FeedStatus::InitialLoading
            } else {
                FeedStatus::LoadingMore
            }
        } else if state.error.is_some() {
            FeedStatus::Error
        } else if !state.loaded_once {
            FeedStatus::Idle
        } else if state.has_more {
            FeedStatus::Steady
        } else {
            FeedStatus::Exhausted
        }
    }

    pub fn loading(&self) -> bool {
        self.lock().in_flight
    }

    pub fn has_more(&self) -> bool {
        self.lock().has_more
    }

    pub fn error(&self) -> Option<FeedError> {
        self.lock().error.clone()
    }

    /// Number of items consumed from the source so far.
    pub fn offset(&self) -> u64 {
        self.lock().offset
    }

    /// Total reported by the most recent page.
    pub fn total(&self) -> Option<u64> {
        self.lock().total
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Runs `f` over the loaded items without copying them.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.lock().items)
    }

    pub fn items(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.lock().items.clone()
    }
}

fn lock_state<T>(state: &Mutex<FeedState<T>>) -> MutexGuard<'_, FeedState<T>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A fetch in progress. Dropped before [`Flight::settle`], it gives the
/// in-flight guard back so a later trigger can retry.
struct Flight<T> {
    state: Arc<Mutex<FeedState<T>>>,
    ticket: Ticket,
    settled: bool,
}

impl<T> Flight<T> {
    fn settle<E: fmt::Display>(mut self, result: Result<Page<T>, E>) -> LoadOutcome {
        self.settled = true;
        let mut state = lock_state(&self.state);
        apply(&mut state, self.ticket, result)
    }
}

impl<T> Drop for Flight<T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = lock_state(&self.state);
        if state.epoch == self.ticket.epoch && state.in_flight {
            state.in_flight = false;
            state.initial_in_flight = false;
            tracing::debug!(offset = self.ticket.offset, "fetch abandoned, releasing guard");
        }
    }
}

fn apply<T, E: fmt::Display>(
    state: &mut FeedState<T>,
    ticket: Ticket,
    result: Result<Page<T>, E>,
) -> LoadOutcome {
    if ticket.epoch != state.epoch {
        // The in-flight flag now belongs to the post-reset fetch.
        tracing::debug!(
            fetched_epoch = ticket.epoch,
            current_epoch = state.epoch,
            "discarding stale page"
        );
        return LoadOutcome::Stale;
    }

    state.in_flight = false;
    state.initial_in_flight = false;

    match result {
        Ok(page) => {
            let received = page.items.len();
            if ticket.initial {
                state.items = page.items;
                state.offset = received as u64;
            } else {
                state.items.extend(page.items);
                state.offset += received as u64;
            }
            state.has_more = page.has_more;
            state.total = Some(page.total);
            state.error = None;
            state.loaded_once = true;
            tracing::debug!(
                received,
                offset = state.offset,
                has_more = state.has_more,
                "page applied"
            );
            LoadOutcome::Loaded {
                received,
                has_more: page.has_more,
            }
        }
        Err(err) => {
            let error = FeedError::FetchFailed(err.to_string());
            tracing::debug!(offset = ticket.offset, %error, "page fetch failed");
            state.error = Some(error.clone());
            LoadOutcome::Failed(error)
        }
    }
}
