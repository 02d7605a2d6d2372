//! Listing pagination
//!
//! [`PaginationState`] is the accumulated listing: the first page rendered at
//! build time plus every page appended after a user asked for more. It is
//! only ever replaced through [`append_page`], never edited in place.
//!
//! [`LoadMore`] drives the "load more" interaction. It allows a single
//! outstanding request, tags it with a ticket and only applies a completion
//! whose ticket matches, so overlapping triggers cannot append pages twice or
//! out of order. A failed fetch leaves the state exactly as it was.

use std::fmt;

use thiserror::Error;

use crate::cms::ContentSource;
use crate::content::{PostPage, PostSummary};

/// Posts accumulated so far and the cursor of the next batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    pub results: Vec<PostSummary>,
    pub next_page: Option<String>,
}

impl PaginationState {
    /// Whether the "load more" control should be offered
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl From<PostPage> for PaginationState {
    fn from(page: PostPage) -> Self {
        append_page(PaginationState::default(), page)
    }
}

/// Append a fetched page to the listing.
///
/// Results keep their order and are not deduplicated; the cursor is replaced
/// by the incoming page's cursor.
pub fn append_page(state: PaginationState, page: PostPage) -> PaginationState {
    let PaginationState { mut results, .. } = state;
    results.extend(page.results);
    PaginationState {
        results,
        next_page: page.next_page.filter(|cursor| !cursor.trim().is_empty()),
    }
}

/// Handle for one outstanding "load more" request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    ticket: u64,
    cursor: String,
}

impl LoadRequest {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Cursor the request must fetch
    pub fn cursor(&self) -> &str {
        &self.cursor
    }
}

#[derive(Debug, Error)]
pub enum LoadMoreError<E: fmt::Display + fmt::Debug> {
    #[error("a request for more posts is already in flight")]
    InFlight,
    #[error("there are no more posts to load")]
    Exhausted,
    #[error("completion for request #{0} does not match the outstanding request")]
    StaleTicket(u64),
    #[error("failed to fetch more posts: {0}")]
    Fetch(E),
}

/// "Load more" controller over a [`PaginationState`]
#[derive(Debug, Default)]
pub struct LoadMore {
    state: PaginationState,
    in_flight: Option<u64>,
    last_ticket: u64,
}

impl LoadMore {
    /// Start from the page rendered at build time
    pub fn new(initial: PostPage) -> Self {
        Self {
            state: initial.into(),
            in_flight: None,
            last_ticket: 0,
        }
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    pub fn into_state(self) -> PaginationState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the control should be shown and enabled
    pub fn can_load_more(&self) -> bool {
        self.state.has_more() && !self.is_loading()
    }

    /// Register a user trigger.
    ///
    /// Rejected while another request is outstanding or once the listing is
    /// exhausted.
    pub fn begin<E>(&mut self) -> Result<LoadRequest, LoadMoreError<E>>
    where
        E: fmt::Display + fmt::Debug,
    {
        if self.in_flight.is_some() {
            tracing::debug!("Ignoring load more trigger, request already in flight");
            return Err(LoadMoreError::InFlight);
        }
        let cursor = self.state.next_page.clone().ok_or(LoadMoreError::Exhausted)?;

        self.last_ticket += 1;
        self.in_flight = Some(self.last_ticket);
        Ok(LoadRequest {
            ticket: self.last_ticket,
            cursor,
        })
    }

    /// Apply the outcome of the request started by [`LoadMore::begin`].
    ///
    /// The page is appended whole or not at all.
    pub fn complete<E>(
        &mut self,
        request: LoadRequest,
        outcome: Result<PostPage, E>,
    ) -> Result<&PaginationState, LoadMoreError<E>>
    where
        E: fmt::Display + fmt::Debug,
    {
        if self.in_flight != Some(request.ticket) {
            tracing::warn!(ticket = request.ticket, "Discarding stale load more completion");
            return Err(LoadMoreError::StaleTicket(request.ticket));
        }
        self.in_flight = None;

        match outcome {
            Ok(page) => {
                let fetched = page.results.len();
                let state = std::mem::take(&mut self.state);
                self.state = append_page(state, page);
                tracing::debug!(
                    fetched,
                    total = self.state.len(),
                    has_more = self.state.has_more(),
                    "Appended page"
                );
                Ok(&self.state)
            }
            Err(e) => {
                tracing::warn!(cursor = %request.cursor, "Load more failed: {}", e);
                Err(LoadMoreError::Fetch(e))
            }
        }
    }

    /// Fetch the next page from `source` and append it
    pub async fn load_more<S>(
        &mut self,
        source: &S,
    ) -> Result<&PaginationState, LoadMoreError<S::Error>>
    where
        S: ContentSource,
    {
        let request = self.begin()?;
        let outcome = source.fetch_next_page(request.cursor()).await;
        self.complete(request, outcome)
    }
}
