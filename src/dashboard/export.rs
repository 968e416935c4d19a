use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::DashboardSource;
use crate::error::Result;
use crate::notify::Notifier;
use crate::types::DateRange;

pub fn report_file_name(range: DateRange, timestamp_ms: i64) -> String {
    format!("report-{range}-{timestamp_ms}.csv")
}

/// Downloads the report for `range` and writes it under `dir`. No retry.
pub async fn export_report(source: &dyn DashboardSource, range: DateRange, dir: &Path) -> Result<PathBuf> {
    let body = source.export(range).await?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(report_file_name(range, Utc::now().timestamp_millis()));
    tokio::fs::write(&path, &body).await?;
    info!(path = %path.display(), bytes = body.len(), %range, "report exported");
    Ok(path)
}

/// Fire-and-forget export. The outcome only surfaces as a toast.
pub fn spawn_export(
    source: Arc<dyn DashboardSource>,
    notifier: Arc<dyn Notifier>,
    range: DateRange,
    dir: PathBuf,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match export_report(source.as_ref(), range, &dir).await {
            Ok(path) => notifier.notify_info(&format!("Exported {}", path.display())),
            Err(e) => {
                warn!(%range, error = %e, "report export failed");
                notifier.notify_error(&format!("Export failed: {}", e.kind()));
            }
        }
    })
}
