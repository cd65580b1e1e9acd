use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Datelike, FixedOffset, Utc, Weekday};
use clap::Parser;
use clockin_common::observability::{init_logging, LogConfig};
use clockin_config::{ClockinConfig, ClockinConfigLoader};
use clockin_portal::{AttendanceFlow, FsDiagnostics, NullSink, StageSink};
use tracing::{error, info};
use uuid::Uuid;

/// Attendance sign-in automation for the HR portal.
#[derive(Debug, Parser)]
#[command(name = "clockin", version, about)]
struct Cli {
    /// Optional YAML config file; environment variables win over it.
    #[arg(long, default_value = "clockin.yaml")]
    config: PathBuf,

    /// Run with a visible browser window.
    #[arg(long)]
    headed: bool,

    /// Capture stage artifacts regardless of DEBUG_MODE.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut cfg = match ClockinConfigLoader::new().with_file(&cli.config).load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if cli.headed {
        cfg.browser.headless = false;
    }
    if cli.debug {
        cfg.debug.enabled = true;
    }

    if let Err(e) = init_logging(LogConfig::default()) {
        eprintln!("failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    let run_id = Uuid::new_v4();
    banner(&cfg, run_id);

    if let Err(e) = cfg.validate() {
        error!(error = %e, "refusing to start");
        return ExitCode::FAILURE;
    }

    let sink: Box<dyn StageSink> = if cfg.debug.enabled || cfg.debug.manual_run {
        let diagnostics = FsDiagnostics::new(cfg.debug.artifact_dir.clone(), run_id);
        info!(dir = %diagnostics.dir().display(), "stage artifacts enabled");
        Box::new(diagnostics)
    } else {
        Box::new(NullSink)
    };

    let flow = AttendanceFlow::new(cfg, sink);
    match flow.run().await {
        Ok(outcome) if outcome.success() => {
            info!(%outcome, "attendance sign-in successful");
            ExitCode::SUCCESS
        }
        Ok(outcome) => {
            error!(%outcome, "attendance sign-in failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "automation failed");
            ExitCode::FAILURE
        }
    }
}

/// One structured line with everything an operator checks first when a
/// scheduled run missed its punch.
fn banner(cfg: &ClockinConfig, run_id: Uuid) {
    let now = Utc::now();
    // The portal's working day is IST, whatever timezone the runner is in.
    let ist_offset = FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("valid IST offset");
    let ist = now.with_timezone(&ist_offset);
    let weekend = matches!(now.weekday(), Weekday::Sat | Weekday::Sun);

    info!(
        %run_id,
        utc = %now.format("%Y-%m-%d %H:%M:%S"),
        ist = %ist.format("%H:%M"),
        weekend,
        manual_run = cfg.debug.manual_run,
        debug = cfg.debug.enabled,
        headless = cfg.effective_headless(),
        "starting attendance run"
    );
    if cfg.debug.manual_run {
        info!("manual run: artifacts are captured even on success");
    }
}
