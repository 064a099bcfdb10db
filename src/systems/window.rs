//! Window management system
//!
//! Handles window creation, fullscreen toggle, and title updates.

use std::sync::Arc;
use winit::{
    event_loop::ActiveEventLoop,
    window::{Fullscreen, Window},
};
use crate::config::WindowConfig;

/// Manages the application window
pub struct WindowSystem {
    window: Arc<Window>,
    base_title: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let mut attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.width,
                config.height,
            ));

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            base_title: config.title.clone(),
        })
    }

    /// Get window reference (for RenderContext creation)
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn is_fullscreen(&self) -> bool {
        self.window.fullscreen().is_some()
    }

    /// Toggle borderless fullscreen
    pub fn toggle_fullscreen(&self) {
        let new_fullscreen = if self.is_fullscreen() {
            None
        } else {
            Some(Fullscreen::Borderless(None))
        };
        let on = new_fullscreen.is_some();
        self.window.set_fullscreen(new_fullscreen);
        log::info!("Fullscreen: {}", fullscreen_label(on));
    }

    /// Show the selected panel parameter in the title, or the plain title
    pub fn update_title(&self, panel_selection: Option<&str>) {
        self.window.set_title(&format_title(&self.base_title, panel_selection));
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

fn fullscreen_label(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

fn format_title(base: &str, panel_selection: Option<&str>) -> String {
    match panel_selection {
        Some(selection) => format!("{} - {} [arrows to adjust, H to hide]", base, selection),
        None => base.to_string(),
    }
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_with_panel_selection() {
        let title = format_title("Night Street", Some("Fog / density: 0.027"));
        assert_eq!(title, "Night Street - Fog / density: 0.027 [arrows to adjust, H to hide]");
    }

    #[test]
    fn test_title_without_panel() {
        assert_eq!(format_title("Night Street", None), "Night Street");
    }

    #[test]
    fn test_fullscreen_label() {
        assert_eq!(fullscreen_label(true), "ON");
        assert_eq!(fullscreen_label(false), "OFF");
    }

    #[test]
    fn test_window_error_display() {
        let e = WindowError::CreationFailed("no display".to_string());
        assert_eq!(e.to_string(), "Window creation failed: no display");
    }
}
