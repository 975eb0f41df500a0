use crate::application::dashboard_shell::ShellOptions;
use crate::application::session_script::SessionAction;
use crate::domain::parameter::ParameterCategory;
use crate::domain::timeline::Granularity;
use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub storage: StorageSettings,
    pub timing: TimingSettings,
    pub panels: PanelSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    File,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub kind: StorageKind,
    /// Used by the file store
    pub dir: PathBuf,
    /// Used by the memory store
    pub quota_bytes: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TimingSettings {
    pub panel_delay_ms: u64,
    pub refresh_delay_ms: u64,
    pub autoplay_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Mock,
    Stored,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PanelSettings {
    pub samples_per_panel: usize,
    pub provider: ProviderKind,
}

/// Opens a map for every catalog entry matching both criteria
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ParameterFilter {
    #[serde(default)]
    pub search: String,
    /// Absent means all categories
    pub category: Option<ParameterCategory>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionSettings {
    pub render_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub granularity: Option<Granularity>,
    pub start_position: Option<u8>,
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default)]
    pub extra_maps: Vec<String>,
    pub parameter_filter: Option<ParameterFilter>,
    #[serde(default)]
    pub actions: Vec<SessionAction>,
}

impl DashboardConfig {
    pub fn shell_options(&self) -> ShellOptions {
        ShellOptions {
            panel_delay: Duration::from_millis(self.timing.panel_delay_ms),
            autoplay_interval: Duration::from_millis(self.timing.autoplay_interval_ms),
            samples_per_panel: self.panels.samples_per_panel,
        }
    }

    pub fn refresh_latency(&self) -> Duration {
        Duration::from_millis(self.timing.refresh_delay_ms)
    }
}

fn with_defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
    Ok(config::Config::builder()
        .set_default("storage.kind", "file")?
        .set_default("storage.dir", ".ningaloo")?
        .set_default("timing.panel_delay_ms", 1000_i64)?
        .set_default("timing.refresh_delay_ms", 2000_i64)?
        .set_default("timing.autoplay_interval_ms", 500_i64)?
        .set_default("panels.samples_per_panel", 20_i64)?
        .set_default("panels.provider", "mock")?
        .set_default("session.autoplay", true)?)
}

/// Defaults, then `config/dashboard.*` if present, then `NINGALOO__*` variables
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = with_defaults()?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("NINGALOO").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
