use std::future::Future;

use crate::api::context::AuthContext;
use crate::error::Result;
use crate::notice::Notice;
use crate::report::pipeline::{self, Page};
use crate::report::record::Tabular;
use crate::report::view_state::ViewState;

/// Where a screen is in its fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Nothing requested yet.
    Idle,
    /// A fetch is in flight; rows are not shown.
    Loading,
    Ready,
    /// The last fetch failed; shown until the next fetch starts.
    Failed(Notice),
}

/// Handle for one issued fetch. Only the newest ticket may land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<P> {
    generation: u64,
    pub params: P,
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer fetch was issued after this one; the result was dropped.
    Superseded,
    /// The screen was left; the result was dropped.
    Unmounted,
}

/// Fetch state machine and view state of one list screen.
///
/// A parameter change is an explicit event: it supersedes whatever is in
/// flight and issues a new ticket. Results are applied only for the newest
/// ticket and only while mounted.
pub struct ScreenController<T: Tabular, P> {
    context: AuthContext,
    view: ViewState<T::Column>,
    records: Vec<T>,
    phase: Phase,
    params: Option<P>,
    generation: u64,
    mounted: bool,
    page_size: usize,
}

impl<T: Tabular, P: Clone + PartialEq> ScreenController<T, P> {
    /// Creates a mounted, idle controller acting as `context`.
    pub fn new(context: AuthContext, page_size: usize) -> Self {
        Self {
            context,
            view: ViewState::default(),
            records: Vec::new(),
            phase: Phase::Idle,
            params: None,
            generation: 0,
            mounted: true,
            page_size: page_size.max(1),
        }
    }

    pub fn context(&self) -> &AuthContext {
        &self.context
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// The date/month (or other) parameters of the latest fetch.
    pub fn params(&self) -> Option<&P> {
        self.params.as_ref()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn view(&self) -> &ViewState<T::Column> {
        &self.view
    }

    /// Search, filter and sort changes go through here.
    pub fn view_mut(&mut self) -> &mut ViewState<T::Column> {
        &mut self.view
    }

    /// The fetch parameters changed: cancel what is in flight, start anew.
    ///
    /// Resets the page to 1. Returns `None` once unmounted.
    pub fn params_changed(&mut self, params: P) -> Option<FetchTicket<P>> {
        if !self.mounted {
            return None;
        }

        if self.phase == Phase::Loading {
            tracing::debug!("Superseding in-flight fetch #{}", self.generation);
        }

        self.view.set_page(1);
        self.params = Some(params.clone());
        Some(self.issue(params))
    }

    /// Re-issues the last parameters after a failure.
    pub fn retry(&mut self) -> Option<FetchTicket<P>> {
        if !self.mounted {
            return None;
        }
        let params = self.params.clone()?;
        Some(self.issue(params))
    }

    /// Delivers the result of the fetch behind `ticket`.
    ///
    /// Stale tickets and results arriving after unmount change nothing.
    pub fn complete(&mut self, ticket: FetchTicket<P>, result: Result<Vec<T>>) -> Completion {
        self.settle(ticket, result.map_err(|e| e.notice()))
    }

    /// Issues a ticket for `params`, runs `fetch`, and delivers the result.
    ///
    /// A failed fetch is recorded in the phase and also handed back, so the
    /// caller can pass it to `SessionGuard::handle_error`.
    pub async fn load<F, Fut>(&mut self, params: P, fetch: F) -> Result<Completion>
    where
        F: FnOnce(AuthContext, P) -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        let Some(ticket) = self.params_changed(params) else {
            return Ok(Completion::Unmounted);
        };

        match fetch(self.context.clone(), ticket.params.clone()).await {
            Ok(records) => Ok(self.settle(ticket, Ok(records))),
            Err(e) => {
                self.settle(ticket, Err(e.notice()));
                Err(e)
            }
        }
    }

    /// The screen is gone; later completions are discarded.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The page to render, or `None` while nothing is ready to show.
    pub fn page(&self) -> Option<Page<'_, T>> {
        match self.phase {
            Phase::Ready => Some(pipeline::run(&self.records, &self.view, self.page_size)),
            _ => None,
        }
    }

    fn settle(&mut self, ticket: FetchTicket<P>, result: std::result::Result<Vec<T>, Notice>) -> Completion {
        if !self.mounted {
            tracing::debug!("Dropping fetch #{} after unmount", ticket.generation);
            return Completion::Unmounted;
        }

        if ticket.generation != self.generation {
            tracing::debug!(
                "Dropping superseded fetch #{} (current #{})",
                ticket.generation,
                self.generation
            );
            return Completion::Superseded;
        }

        match result {
            Ok(records) => {
                tracing::debug!("Fetch #{} loaded {} records", ticket.generation, records.len());
                self.records = records;
                self.phase = Phase::Ready;
            }
            Err(notice) => {
                self.phase = Phase::Failed(notice);
            }
        }
        Completion::Applied
    }

    fn issue(&mut self, params: P) -> FetchTicket<P> {
        self.generation += 1;
        self.phase = Phase::Loading;
        FetchTicket {
            generation: self.generation,
            params,
        }
    }
}
