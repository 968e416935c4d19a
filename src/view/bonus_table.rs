use ratatui::style::Style;

use crate::error::FetchErrorKind;
use crate::fetch::FetchState;
use crate::types::{BonusRow, BonusStatus};
use crate::view::format::{
    format_currency, format_date, progress_bar, status_color, wager_progress_percent, Locale,
};

/// Width of the text progress bar in the wager column.
const PROGRESS_BAR_WIDTH: usize = 10;

/// Display values for one bonus row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub user: String,
    pub email: String,
    pub promotion: String,
    pub amount: String,
    pub progress_percent: f64,
    pub progress: String,
    pub status: BonusStatus,
    pub status_style: Style,
    pub expires: String,
}

impl RowView {
    pub fn from_row(row: &BonusRow, locale: &Locale) -> Self {
        let progress_percent = wager_progress_percent(row.wager_required, row.wager_remaining);
        Self {
            user: row.user_display_name.clone(),
            email: row.user_email.clone(),
            promotion: row.promotion_title.clone(),
            amount: format_currency(row.amount_cents, locale),
            progress_percent,
            progress: progress_bar(progress_percent, PROGRESS_BAR_WIDTH),
            status: row.status,
            status_style: status_color(row.status),
            expires: format_date(row.expires_at, locale),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableBody {
    /// First load still in flight.
    Loading,
    /// A page came back with no rows.
    Empty,
    Rows(Vec<RowView>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationView {
    pub visible: bool,
    pub can_previous: bool,
    pub can_next: bool,
    pub current_page: u32,
    pub total_pages: u32,
}

impl PaginationView {
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages)
    }
}

/// Everything the bonus screen draws, derived from controller state alone.
#[derive(Debug, Clone, PartialEq)]
pub struct BonusTableView {
    pub body: TableBody,
    pub pagination: PaginationView,
    /// Loading a new page while the previous rows stay on screen.
    pub refreshing: bool,
    pub error: Option<FetchErrorKind>,
}

impl BonusTableView {
    pub fn derive(state: &FetchState<BonusRow>, locale: &Locale) -> Self {
        let body = match &state.last_result {
            None if state.loading => TableBody::Loading,
            None => TableBody::Empty,
            Some(page) if page.items.is_empty() => TableBody::Empty,
            Some(page) => {
                TableBody::Rows(page.items.iter().map(|r| RowView::from_row(r, locale)).collect())
            }
        };

        let total_pages = state.total_pages();
        let pagination = PaginationView {
            visible: total_pages > 1,
            can_previous: state.can_previous(),
            can_next: state.can_next(),
            current_page: state.current_page,
            total_pages,
        };

        Self {
            refreshing: state.loading && state.last_result.is_some(),
            body,
            pagination,
            error: state.last_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::PageResult;

    fn row(i: usize, status: BonusStatus) -> BonusRow {
        BonusRow {
            id: format!("b{i}"),
            user_display_name: format!("user{i}"),
            user_email: format!("user{i}@example.com"),
            promotion_title: "Weekend reload".to_string(),
            amount_cents: 12_345,
            wager_required: 1000,
            wager_remaining: 250,
            status,
            expires_at: Utc.with_ymd_and_hms(2026, 12, 1, 0, 0, 0).unwrap(),
        }
    }

    fn state(rows: Vec<BonusRow>, pages: u32, page: u32) -> FetchState<BonusRow> {
        FetchState {
            loading: false,
            current_page: page,
            last_result: Some(PageResult::new(rows, pages)),
            last_error: None,
        }
    }

    #[test]
    fn first_load_shows_loading_placeholder() {
        let s = FetchState::<BonusRow> {
            loading: true,
            current_page: 1,
            last_result: None,
            last_error: None,
        };
        let view = BonusTableView::derive(&s, &Locale::default());
        assert_eq!(view.body, TableBody::Loading);
        assert!(!view.pagination.visible);
        assert!(!view.refreshing);
    }

    #[test]
    fn empty_single_page_hides_pagination() {
        let view = BonusTableView::derive(&state(Vec::new(), 1, 1), &Locale::default());
        assert_eq!(view.body, TableBody::Empty);
        assert!(!view.pagination.visible);
    }

    #[test]
    fn five_rows_of_three_pages_on_first_page() {
        let rows = (0..5).map(|i| row(i, BonusStatus::Active)).collect();
        let view = BonusTableView::derive(&state(rows, 3, 1), &Locale::default());

        let TableBody::Rows(rows) = &view.body else { panic!("expected rows") };
        assert_eq!(rows.len(), 5);
        assert!(view.pagination.visible);
        assert!(!view.pagination.can_previous);
        assert!(view.pagination.can_next);
        assert_eq!(view.pagination.label(), "Page 1 of 3");
    }

    #[test]
    fn failed_fetch_keeps_rows_and_reports_error() {
        let before = state(vec![row(1, BonusStatus::Completed)], 2, 1);
        let mut after = before.clone();
        after.current_page = 2;
        after.last_error = Some(FetchErrorKind::Network);

        let view_before = BonusTableView::derive(&before, &Locale::default());
        let view_after = BonusTableView::derive(&after, &Locale::default());
        assert_eq!(view_after.body, view_before.body);
        assert_eq!(view_after.error, Some(FetchErrorKind::Network));
        assert!(!view_after.refreshing);
    }

    #[test]
    fn loading_over_rows_is_refreshing() {
        let mut s = state(vec![row(1, BonusStatus::Active)], 2, 1);
        s.loading = true;
        let view = BonusTableView::derive(&s, &Locale::default());
        assert!(view.refreshing);
        assert!(matches!(view.body, TableBody::Rows(_)));
    }

    #[test]
    fn row_view_derives_presentation_values() {
        let v = RowView::from_row(&row(7, BonusStatus::Forfeited), &Locale::default());
        assert_eq!(v.amount, "$123.45");
        assert_eq!(v.progress_percent, 75.0);
        assert_eq!(v.expires, "12/01/2026");
        assert_eq!(v.status_style, status_color(BonusStatus::Forfeited));
    }
}
