use egui::{Color32, Visuals};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    /// Color of the error bars, chosen to contrast with the plot background.
    pub fn error_bar_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_gray(230),
            Theme::Light => Color32::from_gray(20),
        }
    }

    pub fn warning_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(255, 170, 60),
            Theme::Light => Color32::from_rgb(190, 100, 0),
        }
    }

    pub fn toggle_label(&self) -> &'static str {
        match self {
            Theme::Dark => "Light Mode",
            Theme::Light => "Dark Mode",
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}
