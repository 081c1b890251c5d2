// src/config/state.rs
use super::options::AppOptions;

#[derive(Clone, Debug)]
pub struct GuiState {
    /// Options read from the first widget by "List axes"
    pub known_axes: Vec<String>,

    /// Show the internal (optimized) axis order next to the table
    pub show_assignment: bool,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            known_axes: Vec::new(),
            show_assignment: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: AppOptions,
    pub gui: GuiState,
}
