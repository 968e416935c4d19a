pub mod export;
pub mod panel;

pub use export::spawn_export;
pub use panel::DashboardPanel;
