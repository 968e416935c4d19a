use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::api::DashboardSource;
use crate::config::CHANNEL_CAPACITY;
use crate::error::{FetchErrorKind, Result};
use crate::fetch::{Sequencer, Ticket};
use crate::notify::Notifier;
use crate::types::{ChartSeries, DashboardStats, DateRange};

/// Stats and chart for one date range, applied together.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub chart: ChartSeries,
}

#[derive(Debug)]
pub struct PanelOutcome {
    ticket: Ticket,
    range: DateRange,
    result: Result<DashboardData>,
}

/// Aggregate panel: metric cards plus revenue chart, keyed by one date range.
///
/// Both fetches run in parallel on one task; the panel only leaves the loading
/// state once both are back. Data is replaced only when both succeed.
pub struct DashboardPanel {
    source: Arc<dyn DashboardSource>,
    notifier: Arc<dyn Notifier>,
    range: DateRange,
    loading: bool,
    data: Option<DashboardData>,
    last_error: Option<FetchErrorKind>,
    sequencer: Sequencer,
    outcome_tx: mpsc::Sender<PanelOutcome>,
    outcome_rx: mpsc::Receiver<PanelOutcome>,
    revision: watch::Sender<u64>,
}

impl DashboardPanel {
    /// Builds the panel and issues the first pair of fetches.
    pub fn new(source: Arc<dyn DashboardSource>, notifier: Arc<dyn Notifier>, range: DateRange) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (revision, _) = watch::channel(0);
        let mut panel = Self {
            source,
            notifier,
            range,
            loading: true,
            data: None,
            last_error: None,
            sequencer: Sequencer::default(),
            outcome_tx,
            outcome_rx,
            revision,
        };
        panel.issue();
        panel
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn data(&self) -> Option<&DashboardData> {
        self.data.as_ref()
    }

    pub fn last_error(&self) -> Option<FetchErrorKind> {
        self.last_error
    }

    pub fn source(&self) -> Arc<dyn DashboardSource> {
        Arc::clone(&self.source)
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }

    fn issue(&mut self) {
        let ticket = self.sequencer.issue();
        let range = self.range;
        self.loading = true;
        self.bump();
        debug!(%ticket, %range, "issuing dashboard fetch");

        let source = Arc::clone(&self.source);
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let (stats, chart) = tokio::join!(source.stats(), source.chart(range));
            let result = match (stats, chart) {
                (Ok(stats), Ok(chart)) => Ok(DashboardData { stats, chart }),
                (Err(e), _) | (_, Err(e)) => Err(e),
            };
            if tx.send(PanelOutcome { ticket, range, result }).await.is_err() {
                debug!(%ticket, "dashboard gone before fetch completed");
            }
        });
    }

    pub fn set_range(&mut self, range: DateRange) -> bool {
        if range == self.range {
            return false;
        }
        self.range = range;
        self.issue();
        true
    }

    pub fn reload(&mut self) {
        self.issue();
    }

    /// Folds one outcome into state. Returns false if it was stale.
    pub fn apply(&mut self, outcome: PanelOutcome) -> bool {
        if !self.sequencer.is_current(outcome.ticket) {
            debug!(ticket = %outcome.ticket, range = %outcome.range, "discarding stale dashboard response");
            return false;
        }

        self.loading = false;
        match outcome.result {
            Ok(data) => {
                info!(range = %outcome.range, points = data.chart.labels.len(), "dashboard loaded");
                self.data = Some(data);
                self.last_error = None;
            }
            Err(e) => {
                warn!(range = %outcome.range, error = %e, "dashboard fetch failed");
                self.last_error = Some(e.kind());
                self.notifier.notify_error(&format!("Could not load dashboard: {}", e.kind()));
            }
        }
        self.bump();
        true
    }

    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if self.apply(outcome) {
                applied += 1;
            }
        }
        applied
    }

    #[cfg(test)]
    pub async fn next_outcome(&mut self) -> Option<bool> {
        let outcome = self.outcome_rx.recv().await?;
        Some(self.apply(outcome))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::notify::testing::RecordingNotifier;

    fn panel() -> (DashboardPanel, Arc<FakeDashboard>, Arc<RecordingNotifier>, ChartReply) {
        let fake = Arc::new(FakeDashboard::default());
        let first = fake.script_chart(DateRange::Week);
        let notifier = Arc::new(RecordingNotifier::default());
        let panel = DashboardPanel::new(fake.clone(), notifier.clone(), DateRange::Week);
        (panel, fake, notifier, first)
    }

    #[tokio::test]
    async fn loading_clears_only_after_both_fetches() {
        let (mut panel, _, _, first) = panel();
        assert!(panel.loading());
        assert!(panel.data().is_none());

        first.send(Ok(chart_for(DateRange::Week))).unwrap();
        assert_eq!(panel.next_outcome().await, Some(true));

        assert!(!panel.loading());
        let data = panel.data().unwrap();
        assert_eq!(data.stats.dau.value, 42.0);
        assert_eq!(data.chart.labels, vec!["week"]);
    }

    #[tokio::test]
    async fn one_failure_notifies_once_and_keeps_prior_data() {
        let (mut panel, fake, notifier, first) = panel();
        first.send(Ok(chart_for(DateRange::Week))).unwrap();
        panel.next_outcome().await;

        let month = fake.script_chart(DateRange::Month);
        fake.set_fail_stats(true);
        assert!(panel.set_range(DateRange::Month));
        month.send(Ok(chart_for(DateRange::Month))).unwrap();
        assert_eq!(panel.next_outcome().await, Some(true));

        assert_eq!(notifier.error_count(), 1);
        assert_eq!(panel.last_error(), Some(FetchErrorKind::Status(500)));
        assert_eq!(panel.data().unwrap().chart.labels, vec!["week"]);
        assert!(!panel.loading());
    }

    #[tokio::test]
    async fn failure_without_prior_data_leaves_it_absent() {
        let (mut panel, _, notifier, first) = panel();
        first.send(Err(network_error())).unwrap();
        panel.next_outcome().await;
        assert!(panel.data().is_none());
        assert_eq!(notifier.error_count(), 1);
    }

    #[tokio::test]
    async fn chart_failure_alone_notifies_once() {
        let (mut panel, fake, notifier, first) = panel();
        first.send(Ok(chart_for(DateRange::Week))).unwrap();
        panel.next_outcome().await;

        let month = fake.script_chart(DateRange::Month);
        assert!(panel.set_range(DateRange::Month));
        month.send(Err(network_error())).unwrap();
        assert_eq!(panel.next_outcome().await, Some(true));

        assert_eq!(notifier.error_count(), 1);
        assert_eq!(panel.last_error(), Some(FetchErrorKind::Io));
        assert_eq!(panel.data().unwrap().chart.labels, vec!["week"]);
        assert!(!panel.loading());
    }

    #[tokio::test]
    async fn both_failing_notifies_once() {
        let (mut panel, fake, notifier, first) = panel();
        first.send(Ok(chart_for(DateRange::Week))).unwrap();
        panel.next_outcome().await;

        let month = fake.script_chart(DateRange::Month);
        fake.set_fail_stats(true);
        assert!(panel.set_range(DateRange::Month));
        month.send(Err(network_error())).unwrap();
        assert_eq!(panel.next_outcome().await, Some(true));

        assert_eq!(notifier.error_count(), 1);
        assert!(panel.last_error().is_some());
        assert_eq!(panel.data().unwrap().chart.labels, vec!["week"]);
        assert!(!panel.loading());
    }

    #[tokio::test]
    async fn superseded_range_is_discarded() {
        let (mut panel, fake, _, first) = panel();
        first.send(Ok(chart_for(DateRange::Week))).unwrap();
        panel.next_outcome().await;

        let month = fake.script_chart(DateRange::Month);
        let year = fake.script_chart(DateRange::Year);
        assert!(panel.set_range(DateRange::Month));
        assert!(panel.set_range(DateRange::Year));
        assert!(!panel.set_range(DateRange::Year));

        year.send(Ok(chart_for(DateRange::Year))).unwrap();
        assert_eq!(panel.next_outcome().await, Some(true));
        month.send(Ok(chart_for(DateRange::Month))).unwrap();
        assert_eq!(panel.next_outcome().await, Some(false));

        assert_eq!(panel.range(), DateRange::Year);
        assert_eq!(panel.data().unwrap().chart.labels, vec!["year"]);
    }
}
