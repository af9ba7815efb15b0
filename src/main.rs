use anyhow::{Context, Result};
use clinic_crm::api::CrmApi;
use clinic_crm::app::App;
use clinic_crm::config::Config;
use clinic_crm::dispatch::Dispatcher;
use clinic_crm::tui::Tui;
use crossterm::{
    event::DisableMouseCapture,
    terminal::{self, LeaveAlternateScreen},
};
use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load().context("invalid configuration")?;

    // The terminal belongs to the UI, so logs go to a file.
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_crm=info".parse()?),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    info!(
        domain = %config.domain_url,
        log_file = %config.log_file.display(),
        timeout_secs = config.request_timeout.as_secs(),
        prefilled_identity = config.user_sub.is_some(),
        "starting clinic-crm"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let api = CrmApi::new(&config.domain_url, config.request_timeout)?;
    let (dispatcher, responses) = Dispatcher::new(runtime.handle().clone(), api, None);

    let _guard = CleanupGuard;

    let mut tui = Tui::new()?;
    tui.init()?;

    let mut app = App::new(config, dispatcher, responses);
    let res = app.run(&mut tui);

    tui.exit()?;

    if let Err(e) = res {
        error!(error = %e, "application error");
        eprintln!("Application Error: {e}");
    }
    Ok(())
}

struct CleanupGuard;

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        // Ignore errors during cleanup
        let _ = terminal::disable_raw_mode();
        let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    }
}
