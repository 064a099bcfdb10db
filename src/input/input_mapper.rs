//! Input mapping from raw events to semantic actions
//!
//! Maps keyboard and mouse input to high-level actions like ToggleFullscreen, Exit, etc.
//! Mouse drags and the wheel are NOT mapped here - they go directly to the OrbitController.

use std::time::{Duration, Instant};

use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Actions triggered by special input (not orbiting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Exit application (Escape)
    Exit,
    /// Toggle fullscreen mode (F key or double-click)
    ToggleFullscreen,
    /// Show or hide the debug panel (H key)
    TogglePanel,
    /// Reset camera to starting position (R key)
    ResetCamera,
    /// Select the previous panel parameter (Up)
    PanelPrev,
    /// Select the next panel parameter (Down)
    PanelNext,
    /// Adjust the selected parameter (Left/Right); `coarse` while Shift is held
    PanelAdjust { direction: i8, coarse: bool },
}

/// Maps raw input events to semantic actions
///
/// Panel navigation keys only produce actions while the panel is visible.
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `Some(action)` for special keys, `None` otherwise
    pub fn map_keyboard(
        key: KeyCode,
        state: ElementState,
        panel_visible: bool,
        shift_held: bool,
    ) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Escape => Some(InputAction::Exit),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            KeyCode::KeyH => Some(InputAction::TogglePanel),
            KeyCode::KeyR => Some(InputAction::ResetCamera),
            KeyCode::ArrowUp if panel_visible => Some(InputAction::PanelPrev),
            KeyCode::ArrowDown if panel_visible => Some(InputAction::PanelNext),
            KeyCode::ArrowLeft if panel_visible => Some(InputAction::PanelAdjust {
                direction: -1,
                coarse: shift_held,
            }),
            KeyCode::ArrowRight if panel_visible => Some(InputAction::PanelAdjust {
                direction: 1,
                coarse: shift_held,
            }),
            _ => None,
        }
    }

    pub fn is_shift(key: KeyCode) -> bool {
        matches!(key, KeyCode::ShiftLeft | KeyCode::ShiftRight)
    }
}

/// Detects two left presses within a time window
#[derive(Debug)]
pub struct DoubleClickDetector {
    window: Duration,
    last_press: Option<Instant>,
}

impl Default for DoubleClickDetector {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}

impl DoubleClickDetector {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_press: None,
        }
    }

    /// Feed a mouse button event at `now`
    ///
    /// Returns `Some(ToggleFullscreen)` on the second press of a double-click.
    /// A detected double-click resets the detector, so a third press starts over.
    pub fn map_mouse_button(
        &mut self,
        button: MouseButton,
        state: ElementState,
        now: Instant,
    ) -> Option<InputAction> {
        if button != MouseButton::Left || state != ElementState::Pressed {
            return None;
        }

        match self.last_press {
            Some(previous) if now.saturating_duration_since(previous) <= self.window => {
                self.last_press = None;
                Some(InputAction::ToggleFullscreen)
            }
            _ => {
                self.last_press = Some(now);
                None
            }
        }
    }
}
