use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::api::PageSource;
use crate::config::CHANNEL_CAPACITY;
use crate::error::{FetchErrorKind, Result};
use crate::fetch::ticket::{Sequencer, Ticket};
use crate::notify::Notifier;
use crate::types::{PageRequest, PageResult};

/// Everything a renderer needs to know about one paginated resource.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub loading: bool,
    pub current_page: u32,
    pub last_result: Option<PageResult<T>>,
    pub last_error: Option<FetchErrorKind>,
}

impl<T> FetchState<T> {
    fn initial() -> Self {
        Self { loading: true, current_page: 1, last_result: None, last_error: None }
    }

    /// Last known page count. One until the first result lands.
    pub fn total_pages(&self) -> u32 {
        self.last_result.as_ref().map_or(1, |r| r.total_pages)
    }

    pub fn can_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_next(&self) -> bool {
        self.current_page < self.total_pages()
    }
}

/// A completed fetch on its way back to the controller.
#[derive(Debug)]
pub struct FetchOutcome<T> {
    pub ticket: Ticket,
    pub request: PageRequest,
    pub result: Result<PageResult<T>>,
}

/// Owns the request lifecycle for one paginated resource.
///
/// Each page or filter change issues exactly one fetch on a spawned task.
/// The task reports back over a channel; the owner feeds outcomes in through
/// [`drain`](Self::drain). Outcomes
/// whose ticket has been superseded are dropped without touching state.
pub struct PageController<T> {
    resource: &'static str,
    source: Arc<dyn PageSource<T>>,
    notifier: Arc<dyn Notifier>,
    page_size: u32,
    filters: BTreeMap<String, String>,
    state: FetchState<T>,
    sequencer: Sequencer,
    outcome_tx: mpsc::Sender<FetchOutcome<T>>,
    outcome_rx: mpsc::Receiver<FetchOutcome<T>>,
    revision: watch::Sender<u64>,
}

impl<T: Send + 'static> PageController<T> {
    /// Builds the controller and issues the first fetch (page 1).
    /// Must be called inside a tokio runtime.
    pub fn new(
        resource: &'static str,
        source: Arc<dyn PageSource<T>>,
        notifier: Arc<dyn Notifier>,
        page_size: u32,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (revision, _) = watch::channel(0);
        let mut controller = Self {
            resource,
            source,
            notifier,
            page_size: page_size.max(1),
            filters: BTreeMap::new(),
            state: FetchState::initial(),
            sequencer: Sequencer::default(),
            outcome_tx,
            outcome_rx,
            revision,
        };
        controller.issue();
        controller
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Revision counter bumped on every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn request(&self) -> PageRequest {
        PageRequest {
            page_number: self.state.current_page,
            page_size: self.page_size,
            filters: self.filters.clone(),
        }
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }

    fn issue(&mut self) {
        let ticket = self.sequencer.issue();
        let request = self.request();
        self.state.loading = true;
        self.bump();

        debug!(resource = self.resource, %ticket, page = request.page_number, "issuing fetch");

        let source = Arc::clone(&self.source);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_page(request.clone()).await;
            if tx.send(FetchOutcome { ticket, request, result }).await.is_err() {
                debug!(%ticket, "controller gone before fetch completed");
            }
        });
    }

    /// Folds one outcome into state. Returns false if it was stale.
    pub fn apply(&mut self, outcome: FetchOutcome<T>) -> bool {
        if !self.sequencer.is_current(outcome.ticket) {
            debug!(
                resource = self.resource,
                ticket = %outcome.ticket,
                page = outcome.request.page_number,
                "discarding stale response"
            );
            return false;
        }

        self.state.loading = false;
        match outcome.result {
            Ok(page) => {
                info!(
                    resource = self.resource,
                    page = outcome.request.page_number,
                    rows = page.items.len(),
                    total_pages = page.total_pages,
                    "page loaded"
                );
                self.state.last_result = Some(page);
                self.state.last_error = None;
            }
            Err(e) => {
                warn!(
                    resource = self.resource,
                    page = outcome.request.page_number,
                    error = %e,
                    "fetch failed"
                );
                self.state.last_error = Some(e.kind());
                self.notifier
                    .notify_error(&format!("Could not load {}: {}", self.resource, e.kind()));
            }
        }
        self.bump();
        true
    }

    /// Applies every outcome already waiting. Returns how many were current.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if self.apply(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next outcome and applies it. `Some(false)` means it was stale.
    #[cfg(test)]
    pub async fn next_outcome(&mut self) -> Option<bool> {
        let outcome = self.outcome_rx.recv().await?;
        Some(self.apply(outcome))
    }

    fn set_page(&mut self, page: u32) -> bool {
        if page == self.state.current_page {
            return false;
        }
        self.state.current_page = page;
        self.issue();
        true
    }

    pub fn next(&mut self) -> bool {
        if !self.state.can_next() {
            return false;
        }
        self.set_page(self.state.current_page + 1)
    }

    pub fn previous(&mut self) -> bool {
        if !self.state.can_previous() {
            return false;
        }
        self.set_page(self.state.current_page - 1)
    }

    /// Jumps to `page`, clamped into `1..=total_pages`.
    pub fn go_to(&mut self, page: i64) -> bool {
        let total = i64::from(self.state.total_pages());
        self.set_page(page.clamp(1, total) as u32)
    }

    pub fn first(&mut self) -> bool {
        self.go_to(1)
    }

    pub fn last(&mut self) -> bool {
        self.go_to(i64::from(self.state.total_pages()))
    }

    /// Sets a filter and restarts from page 1.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        let value = value.into();
        if self.filters.get(&key) == Some(&value) {
            return false;
        }
        self.filters.insert(key, value);
        self.state.current_page = 1;
        self.issue();
        true
    }

    pub fn clear_filter(&mut self, key: &str) -> bool {
        if self.filters.remove(key).is_none() {
            return false;
        }
        self.state.current_page = 1;
        self.issue();
        true
    }

    /// Re-issues the current request.
    pub fn reload(&mut self) {
        self.issue();
    }
}
