// src/main.rs
use anyhow::{Context, Result};
use district_dashboard::{
    config::Config,
    console::{Command, ConsoleView, HELP},
    dashboard::{Dashboard, FixedLocator},
    store::{CachedSource, HttpRecordSource, RecordSource},
};
use std::{env, path::PathBuf, sync::Arc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    // stderr, so diagnostics stay out of the rendered output
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) load config ──────────────────────────────────────────────
    let config_path = env::var("DASHBOARD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("dashboard.yaml"));
    let cfg = Config::load(&config_path)?;
    if cfg.endpoint.api_key.is_none() {
        warn!("no API key configured; set DASHBOARD_API_KEY");
    }

    // ─── 3) build record source ──────────────────────────────────────
    let client = HttpRecordSource::client_with_timeout(cfg.request_timeout())
        .context("building HTTP client")?;
    let http = HttpRecordSource::new(client, cfg.endpoint_url()?)
        .with_retries(cfg.max_retries, cfg.backoff_ms);

    match cfg.cache_ttl() {
        Some(ttl) => {
            info!(ttl_secs = ttl.as_secs(), "record cache enabled");
            run(CachedSource::new(http, ttl), &cfg).await
        }
        None => run(http, &cfg).await,
    }
}

async fn run<S: RecordSource>(source: S, cfg: &Config) -> Result<()> {
    // ─── 4) wire the dashboard ───────────────────────────────────────
    let view = Arc::new(ConsoleView::default());
    let dash = Dashboard::new(
        source,
        view.clone(),
        view.clone(),
        Arc::new(FixedLocator::new(cfg.location)),
    )
    .with_aliases(cfg.aliases())
    .with_limit(cfg.chart_limit);

    dash.start().await;
    println!("{}", HELP);

    // ─── 5) command loop ─────────────────────────────────────────────
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        match Command::parse(&line) {
            Some(Command::List) => {
                for name in view.options() {
                    println!("  {}", name);
                }
            }
            Some(Command::Show(name)) => {
                dash.select_region(&name).await;
            }
            Some(Command::Compare(a, b)) => {
                dash.compare_regions(&a, &b).await;
            }
            Some(Command::Locate) => {
                dash.locate();
            }
            Some(Command::Help) => println!("{}", HELP),
            Some(Command::Quit) => break,
            None if line.trim().is_empty() => {}
            None => println!("unknown command; {}", HELP),
        }
    }

    info!("all done");
    Ok(())
}
