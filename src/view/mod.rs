pub mod bonus_table;
pub mod chart;
pub mod format;
pub mod metrics;

pub use bonus_table::{BonusTableView, PaginationView, TableBody};
pub use chart::ChartContext;
pub use metrics::{metric_cards, MetricCard};
