use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// User bonus rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BonusStatus {
    Active,
    Completed,
    Expired,
    Forfeited,
    /// Any status string the backend sends that we don't know about.
    #[serde(other)]
    Unknown,
}

impl BonusStatus {
    pub const KNOWN: [BonusStatus; 4] = [
        BonusStatus::Active,
        BonusStatus::Completed,
        BonusStatus::Expired,
        BonusStatus::Forfeited,
    ];
}

impl std::fmt::Display for BonusStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BonusStatus::Active => "active",
            BonusStatus::Completed => "completed",
            BonusStatus::Expired => "expired",
            BonusStatus::Forfeited => "forfeited",
            BonusStatus::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusRow {
    pub id: String,
    pub user_display_name: String,
    pub user_email: String,
    pub promotion_title: String,
    pub amount_cents: i64,
    pub wager_required: i64,
    pub wager_remaining: i64,
    pub status: BonusStatus,
    pub expires_at: DateTime<Utc>,
}

impl BonusRow {
    /// Pulls `wager_remaining` back into `0..=wager_required`.
    /// Returns true if the row had to be corrected.
    pub fn clamp_wager(&mut self) -> bool {
        let required = self.wager_required.max(0);
        let clamped = self.wager_remaining.clamp(0, required);
        let changed = clamped != self.wager_remaining || required != self.wager_required;
        self.wager_required = required;
        self.wager_remaining = clamped;
        changed
    }
}

/// Wire shape of `GET /api/admin/promotions/user-bonuses`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBonusesResponse {
    pub bonuses: Vec<BonusRow>,
    pub pages: u32,
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

/// One immutable request for a page. Rebuilt whenever the page or filters change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
    pub filters: BTreeMap<String, String>,
}

impl PageRequest {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page_number.to_string()),
            ("limit".to_string(), self.page_size.to_string()),
        ];
        pairs.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
}

impl<T> PageResult<T> {
    /// The backend reports `pages: 0` for an empty set; the UI always has at least one page.
    pub fn new(items: Vec<T>, total_pages: u32) -> Self {
        Self { items, total_pages: total_pages.max(1) }
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    Week,
    Month,
    Year,
}

impl DateRange {
    pub const ALL: [DateRange; 3] = [DateRange::Week, DateRange::Month, DateRange::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateRange::Week => "week",
            DateRange::Month => "month",
            DateRange::Year => "year",
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metric {
    pub value: f64,
    /// Change versus the previous period, in percent.
    pub percentage: f64,
}

/// Wire shape of `GET /api/admin/stats`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Gross gaming revenue, in cents.
    pub ggr: Metric,
    /// Return to player, in percent.
    pub rtp: Metric,
    /// Daily active users.
    pub dau: Metric,
    /// Total amount wagered, in cents.
    pub total_bets: Metric,
}

/// Wire shape of `GET /api/admin/charts`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub revenue: Vec<f64>,
    pub expenses: Vec<f64>,
}
