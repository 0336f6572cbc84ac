//! Global shortcut registration and dispatch.

use std::sync::Arc;

use meter_core::error::Result;
use meter_core::host::{EncounterCommands, GlobalShortcutHost, WindowHost};
use meter_core::settings::ShortcutSettings;
use meter_core::shortcut::{NAVIGATE_EVENT, ShortcutAction, ShortcutCommand, ShortcutState};

use crate::clickthrough::ClickthroughController;

/// Binds the configured accelerators and runs their actions.
pub struct ShortcutRegistry {
    host: Arc<dyn GlobalShortcutHost>,
    windows: Arc<dyn WindowHost>,
    commands: Arc<dyn EncounterCommands>,
    clickthrough: Arc<ClickthroughController>,
}

impl ShortcutRegistry {
    pub fn new(
        host: Arc<dyn GlobalShortcutHost>,
        windows: Arc<dyn WindowHost>,
        commands: Arc<dyn EncounterCommands>,
        clickthrough: Arc<ClickthroughController>,
    ) -> Self {
        Self {
            host,
            windows,
            commands,
            clickthrough,
        }
    }

    /// Replaces every registration with the bindings in `settings`.
    ///
    /// Returns how many shortcuts were registered.
    pub async fn setup(&self, settings: &ShortcutSettings) -> Result<usize> {
        self.host.unregister_all().await?;

        let mut registered = 0;
        for (command_id, accelerator) in settings.entries() {
            match self.register_shortcut(command_id, accelerator).await {
                Ok(true) => registered += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!(
                    command = command_id,
                    accelerator,
                    error = %e,
                    "Failed to register shortcut"
                ),
            }
        }

        tracing::info!(registered, "Global shortcuts registered");
        Ok(registered)
    }

    /// Registers one binding. Empty accelerators and unknown command ids are
    /// skipped and reported as `Ok(false)`.
    pub async fn register_shortcut(&self, command_id: &str, accelerator: &str) -> Result<bool> {
        if accelerator.is_empty() {
            return Ok(false);
        }
        let command = match command_id.parse::<ShortcutCommand>() {
            Ok(command) => command,
            Err(_) => {
                tracing::info!(command = command_id, "Unknown shortcut command; skipping");
                return Ok(false);
            }
        };

        self.host.register(accelerator, command).await?;
        tracing::debug!(command = %command, accelerator, "Shortcut registered");
        Ok(true)
    }

    /// Entry point for the host when a registered accelerator fires.
    pub async fn dispatch(&self, command: ShortcutCommand, state: ShortcutState) {
        if state != ShortcutState::Pressed {
            return;
        }
        if let Err(e) = self.run(command.action()).await {
            tracing::warn!(command = %command, error = %e, "Shortcut action failed");
        }
    }

    async fn run(&self, action: ShortcutAction) -> Result<()> {
        match action {
            ShortcutAction::ToggleWindow { label } => match self.windows.is_visible(label).await? {
                Some(true) => self.windows.hide(label).await,
                Some(false) => self.windows.show(label).await,
                None => {
                    tracing::debug!(window = label, "Window not found");
                    Ok(())
                }
            },
            ShortcutAction::Navigate { window, route } => {
                self.windows.emit_to(window, NAVIGATE_EVENT, route).await
            }
            ShortcutAction::ToggleClickthrough => self.clickthrough.toggle().await.map(|_| ()),
            ShortcutAction::ResetEncounter => self.commands.reset_encounter().await,
            ShortcutAction::HardReset => self.commands.hard_reset().await,
        }
    }
}
