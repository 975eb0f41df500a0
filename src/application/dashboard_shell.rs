// Dashboard shell - open map panels, shared timeline and data refresh
use crate::application::data_cache::{CacheError, LocalDataCache};
use crate::application::data_provider::DataProvider;
use crate::application::scheduled_task::ScheduledTask;
use crate::domain::map_instance::MapInstance;
use crate::domain::parameter::{self, DEFAULT_PARAMETER};
use crate::domain::telemetry::{DataPoint, StoreMetadata};
use crate::domain::timeline::{AutoplayStep, Granularity, TimeRange, Timeline};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};
use tokio_stream::wrappers::IntervalStream;

const EVENT_BUFFER: usize = 100;

#[derive(Debug, Clone, Copy)]
pub struct ShellOptions {
    pub panel_delay: Duration,
    pub autoplay_interval: Duration,
    pub samples_per_panel: usize,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            panel_delay: Duration::from_millis(1000),
            autoplay_interval: Duration::from_millis(500),
            samples_per_panel: 20,
        }
    }
}

/// Completions of background work, applied one at a time by the shell
#[derive(Debug)]
pub enum ShellEvent {
    PanelLoaded {
        panel_id: String,
        generation: u64,
        result: Result<Vec<DataPoint>, String>,
    },
    AutoplayTick {
        generation: u64,
    },
    RefreshFinished(Result<StoreMetadata, CacheError>),
}

#[derive(Debug)]
pub struct MapPanel {
    instance: MapInstance,
    points: Vec<DataPoint>,
    loading: bool,
    generation: u64,
    pending: Option<ScheduledTask>,
}

impl MapPanel {
    fn new(instance: MapInstance) -> Self {
        Self {
            instance,
            points: Vec::new(),
            loading: false,
            generation: 0,
            pending: None,
        }
    }

    pub fn instance(&self) -> &MapInstance {
        &self.instance
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

pub struct DashboardShell {
    panels: Vec<MapPanel>,
    timeline: Timeline,
    time_range: TimeRange,
    fullscreen: Option<String>,
    cache: LocalDataCache,
    provider: Arc<dyn DataProvider>,
    options: ShellOptions,
    last_update: Option<DateTime<Utc>>,
    missing_files: usize,
    updating: bool,
    refresh_task: Option<ScheduledTask>,
    autoplay_task: Option<ScheduledTask>,
    autoplay_generation: u64,
    events_tx: mpsc::Sender<ShellEvent>,
    events_rx: mpsc::Receiver<ShellEvent>,
}

impl DashboardShell {
    /// Reads the cache status and opens the default panel.
    /// Must be called from within a tokio runtime.
    pub fn mount(cache: LocalDataCache, provider: Arc<dyn DataProvider>, options: ShellOptions) -> Self {
        let status = cache.init();
        let timeline = Timeline::new();
        let time_range = timeline.time_range();
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);

        let mut shell = Self {
            panels: Vec::new(),
            timeline,
            time_range,
            fullscreen: None,
            cache,
            provider,
            options,
            last_update: status.last_update,
            missing_files: status.missing_files,
            updating: false,
            refresh_task: None,
            autoplay_task: None,
            autoplay_generation: 0,
            events_tx,
            events_rx,
        };
        shell.add_map(DEFAULT_PARAMETER);
        shell
    }

    pub fn panels(&self) -> &[MapPanel] {
        &self.panels
    }

    pub fn panel(&self, id: &str) -> Option<&MapPanel> {
        self.panels.iter().find(|p| p.instance.id == id)
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    pub fn fullscreen(&self) -> Option<&str> {
        self.fullscreen.as_deref()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn missing_files(&self) -> usize {
        self.missing_files
    }

    pub fn is_updating(&self) -> bool {
        self.updating
    }

    /// No refresh, playback or panel load outstanding
    pub fn is_idle(&self) -> bool {
        !self.updating && !self.timeline.is_playing() && self.panels.iter().all(|p| !p.loading)
    }

    // Panels

    /// Opens a panel for a catalog parameter. Unknown parameters are ignored.
    pub fn add_map(&mut self, parameter_id: &str) -> Option<String> {
        let Some(parameter) = parameter::find(parameter_id) else {
            tracing::warn!(parameter = parameter_id, "Ignoring map for unknown parameter");
            return None;
        };

        let instance = MapInstance::new(parameter);
        let id = instance.id.clone();
        self.panels.push(MapPanel::new(instance));
        self.schedule_load(self.panels.len() - 1);

        tracing::debug!(panel = %id, parameter = parameter_id, "Map added");
        Some(id)
    }

    /// Closes a panel unless it is the last one.
    pub fn remove_map(&mut self, id: &str) -> bool {
        if self.panels.len() <= 1 {
            return false;
        }
        let Some(index) = self.panels.iter().position(|p| p.instance.id == id) else {
            return false;
        };

        // Dropping the panel cancels its pending load
        self.panels.remove(index);
        if self.fullscreen.as_deref() == Some(id) {
            self.fullscreen = None;
        }

        tracing::debug!(panel = id, "Map removed");
        true
    }

    pub fn change_parameter(&mut self, id: &str, parameter_id: &str) -> bool {
        let Some(parameter) = parameter::find(parameter_id) else {
            tracing::warn!(parameter = parameter_id, "Ignoring switch to unknown parameter");
            return false;
        };
        let Some(index) = self.panels.iter().position(|p| p.instance.id == id) else {
            return false;
        };

        self.panels[index].instance.set_parameter(parameter);
        self.schedule_load(index);
        true
    }

    pub fn toggle_fullscreen(&mut self, id: &str) -> bool {
        if self.panel(id).is_none() {
            return false;
        }
        self.fullscreen = match self.fullscreen.as_deref() {
            Some(current) if current == id => None,
            _ => Some(id.to_string()),
        };
        true
    }

    // Timeline

    pub fn scrub(&mut self, position: u8) {
        self.timeline.scrub(position);
        self.sync_time_range();
    }

    pub fn step_back(&mut self) {
        self.timeline.step_back();
        self.sync_time_range();
    }

    pub fn step_forward(&mut self) {
        self.timeline.step_forward();
        self.sync_time_range();
    }

    pub fn jump_to_start(&mut self) {
        self.timeline.jump_to_start();
        self.sync_time_range();
    }

    pub fn jump_to_end(&mut self) {
        self.timeline.jump_to_end();
        self.sync_time_range();
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.timeline.set_granularity(granularity);
        self.sync_time_range();
    }

    pub fn toggle_autoplay(&mut self) {
        if self.timeline.is_playing() {
            self.stop_autoplay();
        } else {
            self.start_autoplay();
        }
    }

    fn start_autoplay(&mut self) {
        self.timeline.set_playing(true);
        self.autoplay_generation += 1;

        let generation = self.autoplay_generation;
        let period = self.options.autoplay_interval.max(Duration::from_millis(1));
        let tx = self.events_tx.clone();
        self.autoplay_task = Some(ScheduledTask::spawn(async move {
            let mut ticks = IntervalStream::new(interval_at(Instant::now() + period, period));
            while ticks.next().await.is_some() {
                if tx.send(ShellEvent::AutoplayTick { generation }).await.is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(position = self.timeline.position(), "Autoplay started");
    }

    fn stop_autoplay(&mut self) {
        self.timeline.set_playing(false);
        drop(self.autoplay_task.take());
        tracing::debug!(position = self.timeline.position(), "Autoplay stopped");
    }

    /// The shared range only ever comes from the timeline.
    fn sync_time_range(&mut self) {
        let range = self.timeline.time_range();
        if range == self.time_range {
            return;
        }
        self.time_range = range;
        for index in 0..self.panels.len() {
            self.schedule_load(index);
        }
    }

    // Data

    /// Starts a cache refresh. Ignored while one is already running.
    pub fn trigger_refresh(&mut self) -> bool {
        if self.updating {
            tracing::debug!("Refresh already in flight");
            return false;
        }
        self.updating = true;

        let cache = self.cache.clone();
        let tx = self.events_tx.clone();
        self.refresh_task = Some(ScheduledTask::spawn(async move {
            let result = cache.refresh().await;
            let _ = tx.send(ShellEvent::RefreshFinished(result)).await;
        }));
        tracing::info!("Research data refresh started");
        true
    }

    /// Empties the local cache. Refused while a refresh is writing to it.
    pub fn clear_cache(&mut self) -> bool {
        if self.updating {
            tracing::warn!("Not clearing the cache during a refresh");
            return false;
        }
        match self.cache.clear() {
            Ok(_) => {
                self.last_update = None;
                self.missing_files = self.cache.check_missing();
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to clear local data");
                self.missing_files = self.cache.check_missing();
                false
            }
        }
    }

    fn schedule_load(&mut self, index: usize) {
        let range = self.time_range;
        let delay = self.options.panel_delay;
        let count = self.options.samples_per_panel;
        let provider = self.provider.clone();
        let tx = self.events_tx.clone();

        let Some(panel) = self.panels.get_mut(index) else {
            return;
        };
        panel.generation += 1;
        panel.loading = true;

        let panel_id = panel.instance.id.clone();
        let parameter = panel.instance.parameter.clone();
        let generation = panel.generation;

        tracing::debug!(panel = %panel_id, parameter = %parameter, generation, "Scheduling panel load");

        // Replacing the handle aborts the previous load
        panel.pending = Some(ScheduledTask::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = provider
                .sample_points(&parameter, &range, count)
                .await
                .map_err(|e| format!("{:#}", e));
            let _ = tx
                .send(ShellEvent::PanelLoaded {
                    panel_id,
                    generation,
                    result,
                })
                .await;
        }));
    }

    // Event loop

    /// Waits for the next background completion and applies it.
    pub async fn process_next(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub async fn run_until_idle(&mut self) {
        while !self.is_idle() {
            if !self.process_next().await {
                break;
            }
        }
    }

    fn apply(&mut self, event: ShellEvent) {
        match event {
            ShellEvent::PanelLoaded {
                panel_id,
                generation,
                result,
            } => {
                let Some(panel) = self.panels.iter_mut().find(|p| p.instance.id == panel_id) else {
                    tracing::debug!(panel = %panel_id, "Discarding load for closed panel");
                    return;
                };

                // A load queued before a newer range still lands; the newer one follows it
                match result {
                    Ok(points) => panel.points = points,
                    Err(reason) => {
                        tracing::warn!(panel = %panel_id, error = %reason, "Panel data load failed");
                        panel.points.clear();
                    }
                }
                if generation == panel.generation {
                    panel.loading = false;
                    drop(panel.pending.take());
                }
            }
            ShellEvent::AutoplayTick { generation } => {
                // Ticks queued by an earlier run are stale even if playback restarted
                if !self.timeline.is_playing() || generation != self.autoplay_generation {
                    return;
                }
                if self.timeline.advance() == AutoplayStep::Finished {
                    drop(self.autoplay_task.take());
                    tracing::info!("Autoplay reached the end of the week");
                }
                self.sync_time_range();
            }
            ShellEvent::RefreshFinished(result) => {
                self.updating = false;
                drop(self.refresh_task.take());
                match result {
                    Ok(metadata) => {
                        self.last_update = Some(metadata.last_update);
                        self.missing_files = 0;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to update data");
                        self.missing_files = self.cache.check_missing();
                    }
                }
            }
        }
    }
}
