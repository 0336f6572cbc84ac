//! Global shortcut commands and the actions they trigger.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MeterError;

/// Label of the always-on-top meter window.
pub const LIVE_WINDOW: &str = "live";

/// Event emitted to a window to change its route.
pub const NAVIGATE_EVENT: &str = "navigate";

/// Logical shortcut command ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShortcutCommand {
    ToggleLiveMeter,
    ShowDpsTab,
    ShowHealTab,
    ToggleClickthrough,
    ResetEncounter,
    HardReset,
}

impl ShortcutCommand {
    pub const ALL: [ShortcutCommand; 6] = [
        Self::ToggleLiveMeter,
        Self::ShowDpsTab,
        Self::ShowHealTab,
        Self::ToggleClickthrough,
        Self::ResetEncounter,
        Self::HardReset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToggleLiveMeter => "toggleLiveMeter",
            Self::ShowDpsTab => "showDpsTab",
            Self::ShowHealTab => "showHealTab",
            Self::ToggleClickthrough => "toggleClickthrough",
            Self::ResetEncounter => "resetEncounter",
            Self::HardReset => "hardReset",
        }
    }

    /// What pressing the shortcut does.
    pub fn action(&self) -> ShortcutAction {
        match self {
            Self::ToggleLiveMeter => ShortcutAction::ToggleWindow {
                label: LIVE_WINDOW,
            },
            Self::ShowDpsTab => ShortcutAction::Navigate {
                window: LIVE_WINDOW,
                route: "/",
            },
            Self::ShowHealTab => ShortcutAction::Navigate {
                window: LIVE_WINDOW,
                route: "/heal",
            },
            Self::ToggleClickthrough => ShortcutAction::ToggleClickthrough,
            Self::ResetEncounter => ShortcutAction::ResetEncounter,
            Self::HardReset => ShortcutAction::HardReset,
        }
    }
}

impl fmt::Display for ShortcutCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShortcutCommand {
    type Err = MeterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.as_str() == s)
            .ok_or_else(|| MeterError::not_found("shortcut command", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Show the window if hidden, hide it if visible.
    ToggleWindow { label: &'static str },
    /// Emit [`NAVIGATE_EVENT`] with `route` to `window`.
    Navigate {
        window: &'static str,
        route: &'static str,
    },
    /// Flip cursor pass-through on the live window.
    ToggleClickthrough,
    /// Backend: close the current encounter.
    ResetEncounter,
    /// Backend: drop all live state.
    HardReset,
}

/// Key state reported by the shortcut host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShortcutState {
    Pressed,
    Released,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        for command in ShortcutCommand::ALL {
            assert_eq!(command.as_str().parse::<ShortcutCommand>().unwrap(), command);
        }
    }

    #[test]
    fn test_unknown_command_is_not_found() {
        let err = "openBossTimer".parse::<ShortcutCommand>().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_tab_shortcuts_navigate_live_window() {
        assert_eq!(
            ShortcutCommand::ShowHealTab.action(),
            ShortcutAction::Navigate {
                window: LIVE_WINDOW,
                route: "/heal"
            }
        );
        assert_eq!(
            ShortcutCommand::ShowDpsTab.action(),
            ShortcutAction::Navigate {
                window: LIVE_WINDOW,
                route: "/"
            }
        );
    }
}
