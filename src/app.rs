use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::KeyCode;
use tokio::sync::watch;
use tracing::info;

use crate::api::{DashboardSource, PageSource};
use crate::config::Config;
use crate::dashboard::{spawn_export, DashboardPanel};
use crate::fetch::PageController;
use crate::notify::{Notifier, ToastQueue};
use crate::types::{BonusRow, BonusStatus, DateRange};
use crate::view::format::Locale;
use crate::view::ChartContext;

/// Query parameter the user-bonus endpoint filters on.
const STATUS_FILTER: &str = "status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Bonuses,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Dashboard, Tab::Bonuses];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Bonuses => "User Bonuses",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Dashboard => 0,
            Tab::Bonuses => 1,
        }
    }

    fn toggled(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Bonuses,
            Tab::Bonuses => Tab::Dashboard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    SwitchTab,
    PreviousPage,
    NextPage,
    FirstPage,
    LastPage,
    Reload,
    SetRange(DateRange),
    Export,
    CycleStatusFilter,
}

impl Action {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        let action = match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
            KeyCode::Tab | KeyCode::BackTab => Action::SwitchTab,
            KeyCode::Left | KeyCode::Char('h') => Action::PreviousPage,
            KeyCode::Right | KeyCode::Char('l') => Action::NextPage,
            KeyCode::Home | KeyCode::Char('g') => Action::FirstPage,
            KeyCode::End | KeyCode::Char('G') => Action::LastPage,
            KeyCode::Char('r') | KeyCode::Char('R') => Action::Reload,
            KeyCode::Char('w') => Action::SetRange(DateRange::Week),
            KeyCode::Char('m') => Action::SetRange(DateRange::Month),
            KeyCode::Char('y') => Action::SetRange(DateRange::Year),
            KeyCode::Char('e') => Action::Export,
            KeyCode::Char('s') => Action::CycleStatusFilter,
            _ => return None,
        };
        Some(action)
    }
}

/// Top-level screen state: the promotions tab layout and both data sources.
pub struct App {
    pub tab: Tab,
    pub bonuses: PageController<BonusRow>,
    pub dashboard: DashboardPanel,
    pub toasts: Arc<ToastQueue>,
    pub chart: ChartContext,
    pub locale: Locale,
    export_dir: PathBuf,
    bonus_rev: watch::Receiver<u64>,
    dashboard_rev: watch::Receiver<u64>,
}

impl App {
    /// Wires both screens to their sources. Issues the initial fetches.
    pub fn new(
        cfg: &Config,
        bonus_source: Arc<dyn PageSource<BonusRow>>,
        dashboard_source: Arc<dyn DashboardSource>,
        toasts: Arc<ToastQueue>,
    ) -> Self {
        let notifier: Arc<dyn Notifier> = toasts.clone();
        let bonuses = PageController::new("user bonuses", bonus_source, Arc::clone(&notifier), cfg.page_size);
        let dashboard = DashboardPanel::new(dashboard_source, notifier, DateRange::default());
        let bonus_rev = bonuses.subscribe();
        let dashboard_rev = dashboard.subscribe();
        Self {
            tab: Tab::Dashboard,
            bonuses,
            dashboard,
            toasts,
            chart: ChartContext::default(),
            locale: cfg.locale.clone(),
            export_dir: cfg.export_dir.clone(),
            bonus_rev,
            dashboard_rev,
        }
    }

    /// Applies a user action. Returns false when the app should exit.
    pub fn handle(&mut self, action: Action) -> bool {
        match (action, self.tab) {
            (Action::Quit, _) => return false,
            (Action::SwitchTab, _) => self.tab = self.tab.toggled(),
            (Action::Reload, Tab::Bonuses) => self.bonuses.reload(),
            (Action::Reload, Tab::Dashboard) => self.dashboard.reload(),
            (Action::PreviousPage, Tab::Bonuses) => {
                self.bonuses.previous();
            }
            (Action::NextPage, Tab::Bonuses) => {
                self.bonuses.next();
            }
            (Action::FirstPage, Tab::Bonuses) => {
                self.bonuses.first();
            }
            (Action::LastPage, Tab::Bonuses) => {
                self.bonuses.last();
            }
            (Action::CycleStatusFilter, Tab::Bonuses) => self.cycle_status_filter(),
            (Action::SetRange(range), Tab::Dashboard) => {
                self.dashboard.set_range(range);
            }
            (Action::Export, Tab::Dashboard) => {
                let range = self.dashboard.range();
                info!(%range, "export requested");
                let notifier: Arc<dyn Notifier> = self.toasts.clone();
                spawn_export(self.dashboard.source(), notifier, range, self.export_dir.clone());
            }
            _ => {}
        }
        true
    }

    /// Steps the server-side status filter: all → active → … → forfeited → all.
    fn cycle_status_filter(&mut self) {
        let current = self.status_filter();
        let next = match current {
            None => Some(BonusStatus::KNOWN[0]),
            Some(s) => BonusStatus::KNOWN
                .iter()
                .position(|k| *k == s)
                .and_then(|i| BonusStatus::KNOWN.get(i + 1))
                .copied(),
        };
        match next {
            Some(status) => self.bonuses.set_filter(STATUS_FILTER, status.to_string()),
            None => self.bonuses.clear_filter(STATUS_FILTER),
        };
    }

    pub fn status_filter(&self) -> Option<BonusStatus> {
        self.bonuses
            .filters()
            .get(STATUS_FILTER)
            .and_then(|s| BonusStatus::KNOWN.iter().find(|k| k.to_string() == *s))
            .copied()
    }

    /// Folds in every finished fetch. Returns the number of outcomes applied.
    pub fn drain(&mut self) -> usize {
        self.bonuses.drain() + self.dashboard.drain()
    }

    /// True if either screen's state changed since the last call.
    pub fn take_changed(&mut self) -> bool {
        let bonus = self.bonus_rev.has_changed().unwrap_or(false);
        let dash = self.dashboard_rev.has_changed().unwrap_or(false);
        self.bonus_rev.mark_unchanged();
        self.dashboard_rev.mark_unchanged();
        bonus || dash
    }
}
