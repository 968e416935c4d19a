pub mod client;
pub mod source;

pub use client::AdminClient;
pub use source::{DashboardSource, PageSource};
