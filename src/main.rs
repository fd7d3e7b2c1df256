use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hostcheck::application::config::AppConfig;
use hostcheck::application::services::diagnostic::DiagnosticService;
use hostcheck::domain::ports::provider::{MetricProvider, ProcessLister};
use hostcheck::domain::ports::store::SnapshotStore;
use hostcheck::domain::rules::{LadderCatalog, RuleEngine};
use hostcheck::infrastructure::persistence::FileSnapshotStore;
use hostcheck::infrastructure::providers::{StaticProvider, SysinfoProvider};
use hostcheck::presentation::cli::app::{Cli, Commands};
use hostcheck::presentation::cli::commands::fixes::run_fixes;
use hostcheck::presentation::cli::commands::scan::run_scan;

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    // Logs go to stderr so `--json` output stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    // Load configuration
    let config = if let Some(ref path) = cli.config {
        AppConfig::load_from(path)?
    } else {
        AppConfig::load()?
    };

    let command = cli.command.unwrap_or(Commands::Scan {
        json: false,
        no_history: false,
    });

    // Manual DI: main.rs is the only place that knows concrete types
    let fixture;
    let sampled;
    let (provider, lister): (&dyn MetricProvider, &dyn ProcessLister) =
        if let Some(ref path) = cli.fixture {
            fixture = StaticProvider::load_from(path)?;
            (&fixture, &fixture)
        } else {
            sampled = SysinfoProvider::new();
            (&sampled, &sampled)
        };

    // Only `scan` touches history; `fixes` is a read-only pass
    let history_wanted = matches!(command, Commands::Scan { no_history: false, .. });
    let file_store = (config.history.enabled && history_wanted)
        .then(|| FileSnapshotStore::from_config_path(&config.history.path));
    let store = file_store.as_ref().map(|s| s as &dyn SnapshotStore);

    let catalog = LadderCatalog::from_thresholds(&config.threshold_set())
        .context("Invalid threshold configuration")?;
    let engine = RuleEngine::new(catalog);
    let matcher = config.bundle_matcher();
    let service = DiagnosticService::new(
        provider,
        lister,
        store,
        &engine,
        &matcher,
        config.general.top_k,
    );

    match command {
        Commands::Scan { json, .. } => {
            let report = run_scan(&service, json)?;
            if report.exit_code() != 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Fixes { select, json } => {
            run_fixes(&service, select.as_deref(), json)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
