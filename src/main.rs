// Main entry point - Dependency injection and dashboard session
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::application::dashboard_shell::DashboardShell;
use crate::application::data_cache::LocalDataCache;
use crate::application::data_provider::DataProvider;
use crate::application::key_value_store::KeyValueStore;
use crate::application::session_script::run_script;
use crate::domain::parameter;
use crate::infrastructure::config::{load_dashboard_config, ProviderKind, StorageKind};
use crate::infrastructure::mock_provider::MockDataProvider;
use crate::infrastructure::storage::{FileStore, MemoryStore};
use crate::infrastructure::stored_provider::StoredDataProvider;
use crate::presentation::map_svg::write_snapshots;
use crate::presentation::status::{status_line, timeline_caption};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Storage and providers (infrastructure layer)
    let store: Arc<dyn KeyValueStore> = match config.storage.kind {
        StorageKind::File => {
            let store = FileStore::open(&config.storage.dir)?;
            tracing::info!("Using file store at {}", store.dir().display());
            Arc::new(store)
        }
        StorageKind::Memory => {
            tracing::info!(quota_bytes = ?config.storage.quota_bytes, "Using in-memory store");
            Arc::new(match config.storage.quota_bytes {
                Some(quota) => MemoryStore::with_quota(quota),
                None => MemoryStore::new(),
            })
        }
    };
    let mock: Arc<dyn DataProvider> = match config.session.seed {
        Some(seed) => Arc::new(MockDataProvider::with_seed(seed)),
        None => Arc::new(MockDataProvider::new()),
    };
    let panel_provider: Arc<dyn DataProvider> = match config.panels.provider {
        ProviderKind::Mock => mock.clone(),
        ProviderKind::Stored => Arc::new(StoredDataProvider::new(store.clone())),
    };

    // Cache and shell (application layer)
    let cache = LocalDataCache::new(store, mock, config.refresh_latency());
    let mut shell = DashboardShell::mount(cache, panel_provider, config.shell_options());
    tracing::info!("{}", status_line(shell.last_update(), shell.missing_files(), shell.is_updating()));

    if shell.missing_files() > 0 {
        shell.trigger_refresh();
    }
    let mut opening: Vec<&str> = config.session.extra_maps.iter().map(String::as_str).collect();
    if let Some(filter) = &config.session.parameter_filter {
        let matched = parameter::filter(&filter.search, filter.category);
        tracing::info!(
            search = %filter.search,
            category = ?filter.category,
            "Parameter filter matched {} parameters",
            matched.len()
        );
        opening.extend(matched.iter().map(|p| p.id));
    }
    for parameter_id in opening {
        if let Some(id) = shell.add_map(parameter_id) {
            if let Some(panel) = shell.panel(&id) {
                tracing::info!(panel = %id, "Opened map: {}", panel.instance().title);
            }
        }
    }
    if let Some(granularity) = config.session.granularity {
        shell.set_granularity(granularity);
    }
    if let Some(position) = config.session.start_position {
        shell.scrub(position);
    }
    let applied = run_script(&mut shell, &config.session.actions);
    if !config.session.actions.is_empty() {
        tracing::info!("Applied {} of {} session actions", applied, config.session.actions.len());
    }

    let range = shell.time_range();
    tracing::info!(
        start = %range.start,
        end = %range.end,
        granularity = range.granularity.label(),
        "Viewing window"
    );
    if config.session.autoplay && !shell.timeline().is_playing() {
        shell.toggle_autoplay();
    }

    // Play the week once (if autoplaying), logging each new day
    let mut last_day = 0;
    loop {
        if shell.is_idle() {
            break;
        }
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, shutting down");
                break;
            }
            handled = shell.process_next() => {
                if !handled {
                    break;
                }
            }
        }

        let day = shell.timeline().day_of_week();
        if shell.timeline().is_playing() && day != last_day {
            last_day = day;
            tracing::info!("{}", timeline_caption(shell.timeline()));
        }
    }

    tracing::info!("{}", status_line(shell.last_update(), shell.missing_files(), shell.is_updating()));

    if let Some(dir) = &config.session.render_dir {
        write_snapshots(&shell, dir)?;
    }

    Ok(())
}
