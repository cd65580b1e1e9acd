//! Per-stage debug artifacts: screenshot and page source keyed by stage name.
//!
//! Artifact capture must never fail the run; every error here is logged and
//! swallowed.

use async_trait::async_trait;
use clockin_drivers::clockin_browser::page::PortalPage;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

/// Sink for stage snapshots. The flow records through this seam so tests and
/// debug-off runs can plug in [`NullSink`].
#[async_trait]
pub trait StageSink: Send + Sync {
    async fn record(&self, page: &PortalPage, stage: &str);
}

/// Discards every snapshot.
pub struct NullSink;

#[async_trait]
impl StageSink for NullSink {
    async fn record(&self, _page: &PortalPage, _stage: &str) {}
}

/// Writes `<stage>_screenshot.png` and `<stage>_page_source.html` into a
/// per-run directory.
pub struct FsDiagnostics {
    dir: PathBuf,
}

impl FsDiagnostics {
    /// `base` defaults to the system temp directory; the run id keeps
    /// concurrent or repeated runs from clobbering each other's artifacts.
    pub fn new(base: Option<PathBuf>, run_id: Uuid) -> Self {
        let base = base.unwrap_or_else(std::env::temp_dir);
        Self {
            dir: base.join(format!("clockin-{run_id}")),
        }
    }

    /// Where this run's artifacts land.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn capture(&self, page: &PortalPage, stage: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let screenshot_path = self.dir.join(format!("{stage}_screenshot.png"));
        let png = page.screenshot_png().await?;
        std::fs::write(&screenshot_path, png)?;

        let source_path = self.dir.join(format!("{stage}_page_source.html"));
        let html = page.source().await?;
        std::fs::write(&source_path, html)?;

        let url = page.current_url().await?;
        info!(
            target: "portal.diagnostics",
            stage,
            url = %url,
            dir = %self.dir.display(),
            "stage artifacts saved"
        );
        Ok(())
    }
}

#[async_trait]
impl StageSink for FsDiagnostics {
    async fn record(&self, page: &PortalPage, stage: &str) {
        if let Err(e) = self.capture(page, stage).await {
            warn!(target: "portal.diagnostics", stage, error = %e, "failed to save stage artifacts");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_dir_is_run_scoped() {
        let tmp = tempfile::TempDir::new().unwrap();
        let id = Uuid::new_v4();
        let diag = FsDiagnostics::new(Some(tmp.path().to_path_buf()), id);
        assert!(diag.dir().starts_with(tmp.path()));
        assert_eq!(
            diag.dir().file_name().unwrap().to_string_lossy(),
            format!("clockin-{id}")
        );
    }

    #[test]
    fn default_base_is_system_temp() {
        let id = Uuid::new_v4();
        let diag = FsDiagnostics::new(None, id);
        assert!(diag.dir().starts_with(std::env::temp_dir()));
    }
}
