// Session script - dashboard interactions replayed from configuration
use crate::application::dashboard_shell::DashboardShell;
use crate::domain::timeline::Granularity;
use serde::Deserialize;

/// One user interaction. Panels are numbered from 1 in display order,
/// matching the snapshot file names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionAction {
    AddMap { parameter: String },
    RemoveMap { panel: usize },
    ChangeParameter { panel: usize, parameter: String },
    ToggleFullscreen { panel: usize },
    Scrub { position: u8 },
    StepBack,
    StepForward,
    JumpToStart,
    JumpToEnd,
    SetGranularity { granularity: Granularity },
    ToggleAutoplay,
    Refresh,
    ClearCache,
}

fn panel_id(shell: &DashboardShell, number: usize) -> Option<String> {
    let index = number.checked_sub(1)?;
    shell.panels().get(index).map(|p| p.instance().id.clone())
}

impl SessionAction {
    /// Returns false when the shell ignored the action
    pub fn apply(&self, shell: &mut DashboardShell) -> bool {
        match self {
            SessionAction::AddMap { parameter } => shell.add_map(parameter).is_some(),
            SessionAction::RemoveMap { panel } => {
                panel_id(shell, *panel).is_some_and(|id| shell.remove_map(&id))
            }
            SessionAction::ChangeParameter { panel, parameter } => {
                panel_id(shell, *panel).is_some_and(|id| shell.change_parameter(&id, parameter))
            }
            SessionAction::ToggleFullscreen { panel } => {
                panel_id(shell, *panel).is_some_and(|id| shell.toggle_fullscreen(&id))
            }
            SessionAction::Scrub { position } => {
                shell.scrub(*position);
                true
            }
            SessionAction::StepBack => {
                shell.step_back();
                true
            }
            SessionAction::StepForward => {
                shell.step_forward();
                true
            }
            SessionAction::JumpToStart => {
                shell.jump_to_start();
                true
            }
            SessionAction::JumpToEnd => {
                shell.jump_to_end();
                true
            }
            SessionAction::SetGranularity { granularity } => {
                shell.set_granularity(*granularity);
                true
            }
            SessionAction::ToggleAutoplay => {
                shell.toggle_autoplay();
                true
            }
            SessionAction::Refresh => shell.trigger_refresh(),
            SessionAction::ClearCache => shell.clear_cache(),
        }
    }
}

/// Applies actions in order; returns how many took effect.
pub fn run_script(shell: &mut DashboardShell, actions: &[SessionAction]) -> usize {
    let mut applied = 0;
    for action in actions {
        if action.apply(shell) {
            applied += 1;
            tracing::debug!(?action, "Session action applied");
        } else {
            tracing::warn!(?action, "Session action ignored");
        }
    }
    applied
}
