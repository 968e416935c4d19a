use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs},
    Frame,
};

use crate::app::{App, Tab};
use crate::error::FetchErrorKind;
use crate::notify::ToastLevel;
use crate::types::DateRange;
use crate::view::format::truncate;
use crate::view::{metric_cards, BonusTableView, MetricCard, PaginationView, TableBody};

const BORDER: Style = Style::new().fg(Color::DarkGray);
const TITLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const HEADER: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MUTED: Style = Style::new().fg(Color::DarkGray);

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // tabs
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    render_tabs(f, app, chunks[0]);
    match app.tab {
        Tab::Dashboard => render_dashboard(f, app, chunks[1]),
        Tab::Bonuses => render_bonuses(f, app, chunks[1]),
    }
    render_footer(f, app, chunks[2]);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(format!(" {} ", t.title()))).collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(BORDER)
                .title(Span::styled(" Promotions Admin ", TITLE)),
        );
    f.render_widget(tabs, area);
}

fn placeholder(f: &mut Frame, area: Rect, title: Line, text: &str) {
    let p = Paragraph::new(Line::from(Span::styled(text.to_string(), MUTED)))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(BORDER).title(title));
    f.render_widget(p, area);
}

// ---------------------------------------------------------------------------
// User bonuses
// ---------------------------------------------------------------------------

fn render_bonuses(f: &mut Frame, app: &App, area: Rect) {
    let view = BonusTableView::derive(app.bonuses.state(), &app.locale);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search
            Constraint::Min(0),    // table
            Constraint::Length(1), // pagination
        ])
        .split(area);

    render_search_placeholder(f, chunks[0]);

    let mut title = vec![Span::styled(" USER BONUSES ", TITLE)];
    if let Some(status) = app.status_filter() {
        title.push(Span::styled(format!("[{status}] "), Style::default().fg(Color::Yellow)));
    }
    if view.refreshing {
        title.push(Span::styled("loading… ", MUTED));
    }
    if let Some(err) = view.error {
        title.push(Span::styled(format!("⚠ {err} "), Style::default().fg(Color::Red)));
    }

    match &view.body {
        TableBody::Loading => placeholder(f, chunks[1], Line::from(title), "Loading bonuses…"),
        TableBody::Empty if view.error.is_some() => {
            placeholder(f, chunks[1], Line::from(title), "Could not load bonuses")
        }
        TableBody::Empty => placeholder(f, chunks[1], Line::from(title), "No bonuses found"),
        TableBody::Rows(rows) => {
            let header = Row::new(
                ["User", "Email", "Promotion", "Amount", "Wagering", "Status", "Expires"]
                    .iter()
                    .map(|h| Cell::from(*h).style(HEADER)),
            )
            .height(1);

            let body: Vec<Row> = rows
                .iter()
                .map(|r| {
                    Row::new(vec![
                        Cell::from(truncate(&r.user, 16)),
                        Cell::from(truncate(&r.email, 24)).style(MUTED),
                        Cell::from(truncate(&r.promotion, 22)),
                        Cell::from(r.amount.clone()),
                        Cell::from(r.progress.clone()),
                        Cell::from(r.status.to_string()).style(r.status_style),
                        Cell::from(r.expires.clone()).style(MUTED),
                    ])
                })
                .collect();

            let table = Table::new(
                body,
                [
                    Constraint::Length(16),
                    Constraint::Min(12),
                    Constraint::Min(12),
                    Constraint::Length(14),
                    Constraint::Length(15),
                    Constraint::Length(10),
                    Constraint::Length(10),
                ],
            )
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(BORDER)
                    .title(Line::from(title)),
            );
            f.render_widget(table, chunks[1]);
        }
    }

    if view.pagination.visible {
        render_pagination(f, view.pagination, chunks[2]);
    }
}

fn render_search_placeholder(f: &mut Frame, area: Rect) {
    let p = Paragraph::new(Span::styled("Search by user or promotion (coming soon)", MUTED)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MUTED)
            .title(Span::styled(" Search ", MUTED)),
    );
    f.render_widget(p, area);
}

fn render_pagination(f: &mut Frame, p: PaginationView, area: Rect) {
    let enabled = |on: bool| if on { Style::default().fg(Color::Yellow) } else { MUTED };
    let line = Line::from(vec![
        Span::styled("◀ prev", enabled(p.can_previous)),
        Span::raw("   "),
        Span::styled(p.label(), Style::default().fg(Color::White)),
        Span::raw("   "),
        Span::styled("next ▶", enabled(p.can_next)),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

fn render_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // range selector
            Constraint::Length(5), // metric cards
            Constraint::Min(0),    // chart
        ])
        .split(area);

    render_range_selector(
        f,
        app.dashboard.range(),
        app.dashboard.loading(),
        app.dashboard.last_error(),
        chunks[0],
    );

    let Some(data) = app.dashboard.data() else {
        let text = match (app.dashboard.loading(), app.dashboard.last_error()) {
            (true, _) => "Loading dashboard…",
            (false, Some(_)) => "Could not load dashboard",
            (false, None) => "No data available",
        };
        let title = Line::from(Span::styled(" DASHBOARD ", TITLE));
        placeholder(f, chunks[1].union(chunks[2]), title, text);
        return;
    };

    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[1]);
    for (card, area) in metric_cards(&data.stats, &app.locale).iter().zip(card_areas.iter()) {
        render_metric_card(f, card, *area);
    }

    app.chart
        .render(f, chunks[2], &data.chart, &format!("REVENUE · {}", app.dashboard.range()));
}

fn render_range_selector(
    f: &mut Frame,
    current: DateRange,
    loading: bool,
    error: Option<FetchErrorKind>,
    area: Rect,
) {
    let mut spans = vec![Span::styled(" Range: ", MUTED)];
    for range in DateRange::ALL {
        let style = if range == current {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!(" {range} "), style));
        spans.push(Span::raw(" "));
    }
    if loading {
        spans.push(Span::styled("loading…", MUTED));
    } else if let Some(err) = error {
        spans.push(Span::styled(format!("⚠ {err}"), Style::default().fg(Color::Red)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_metric_card(f: &mut Frame, card: &MetricCard, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            card.value.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(card.change.clone(), Style::default().fg(card.change_color))),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(BORDER)
            .title(Span::styled(format!(" {} ", card.title), HEADER)),
    );
    f.render_widget(p, area);
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    if let Some(toast) = app.toasts.visible().last() {
        let color = match toast.level {
            ToastLevel::Info => Color::Green,
            ToastLevel::Error => Color::Red,
        };
        let line = Line::from(Span::styled(format!(" {} ", toast.message), Style::default().fg(color)));
        f.render_widget(Paragraph::new(line), area);
        return;
    }

    let keys: &[(&str, &str)] = match app.tab {
        Tab::Dashboard => &[("[q] ", "quit  "), ("[tab] ", "bonuses  "), ("[w/m/y] ", "range  "), ("[e] ", "export  "), ("[r] ", "reload")],
        Tab::Bonuses => &[("[q] ", "quit  "), ("[tab] ", "dashboard  "), ("[←→ / h l] ", "page  "), ("[g G] ", "first/last  "), ("[s] ", "status  "), ("[r] ", "reload")],
    };
    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(k, label)| [Span::styled(*k, Style::default().fg(Color::Yellow)), Span::raw(*label)])
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
