//! Raw browser input to game actions

use crate::sim::GamePhase;

/// What an input event asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// The single gameplay trigger (flap)
    Trigger,
    /// Pause / resume
    TogglePause,
    /// Start from the welcome screen or restart after game over
    Start,
    ToggleMute,
    VolumeDown,
    VolumeUp,
    /// Autopilot on/off
    ToggleDemo,
    /// Image avatar vs procedural bird
    ToggleSprites,
}

impl InputAction {
    /// Actions that change persisted settings rather than the session
    pub fn changes_settings(self) -> bool {
        matches!(
            self,
            Self::ToggleMute | Self::VolumeDown | Self::VolumeUp | Self::ToggleDemo | Self::ToggleSprites
        )
    }
}

/// Map a `KeyboardEvent.code`
pub fn action_for_key(code: &str) -> Option<InputAction> {
    match code {
        "Space" => Some(InputAction::Trigger),
        "Escape" | "KeyP" => Some(InputAction::TogglePause),
        "Enter" => Some(InputAction::Start),
        "KeyM" => Some(InputAction::ToggleMute),
        "Minus" | "NumpadSubtract" => Some(InputAction::VolumeDown),
        "Equal" | "NumpadAdd" => Some(InputAction::VolumeUp),
        "KeyD" => Some(InputAction::ToggleDemo),
        "KeyS" => Some(InputAction::ToggleSprites),
        _ => None,
    }
}

/// Pointer press and touch start both map to the trigger
pub fn action_for_pointer() -> InputAction {
    InputAction::Trigger
}

/// Whether the browser default (page scroll, touch gestures) should be suppressed
pub fn should_prevent_default(action: InputAction, phase: GamePhase) -> bool {
    match action {
        InputAction::Trigger => true,
        InputAction::TogglePause => matches!(phase, GamePhase::Running | GamePhase::Paused),
        InputAction::Start => matches!(phase, GamePhase::Idle | GamePhase::GameOver),
        // Leave browser shortcuts such as zoom alone
        _ => false,
    }
}
