// ============================================================================
// EDITOR - routes pointer and keyboard input to tools, history and zoom
// ============================================================================

use eframe::egui::{Key, Pos2};

use crate::canvas::{CellColor, ColorParseError, PointerEvent, ZoomScale};
use crate::components::tools::{Tool, ToolOutcome, ToolsPanel};
use crate::keybindings::{BindableAction, HeldKeys, KeyBindings};
use crate::project::Project;
use crate::settings::AppSettings;

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PointerState {
    #[default]
    Up,
    Down,
}

/// A keyboard transition. The command modifier is reported separately from keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Command { pressed: bool },
    Key { key: Key, pressed: bool },
}

pub struct Editor {
    pub project: Project,
    pub tools: ToolsPanel,
    pub zoom: ZoomScale,
    pub keybindings: KeyBindings,
    held: HeldKeys,
    pointer: PointerState,
    /// Human-readable result of the last action, for the status bar.
    status: String,
}

impl Editor {
    pub fn new(settings: &AppSettings) -> Self {
        Self {
            project: Project::new_untitled(1, settings.max_undo_steps),
            tools: ToolsPanel::new(settings.default_color),
            zoom: settings.zoom,
            keybindings: settings.keybindings.clone(),
            held: HeldKeys::default(),
            pointer: PointerState::Up,
            status: String::new(),
        }
    }

    pub fn pointer_state(&self) -> PointerState {
        self.pointer
    }

    pub fn active_tool(&self) -> Tool {
        self.tools.active_tool
    }

    pub fn color(&self) -> CellColor {
        self.tools.color
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    // ------------------------------------------------------------------------
    // Pointer
    // ------------------------------------------------------------------------

    pub fn handle_pointer(&mut self, event: PointerEvent) -> ToolOutcome {
        match event {
            PointerEvent::Down(offset) => {
                self.pointer = PointerState::Down;
                self.dispatch(offset)
            }
            PointerEvent::Move(offset) if self.pointer == PointerState::Down => {
                self.dispatch(offset)
            }
            PointerEvent::Move(_) => ToolOutcome::Unchanged,
            PointerEvent::Up | PointerEvent::Leave => {
                self.pointer = PointerState::Up;
                ToolOutcome::Unchanged
            }
        }
    }

    fn dispatch(&mut self, offset: Pos2) -> ToolOutcome {
        let Some(pos) = self.project.canvas_state.cell_at_pointer(offset, self.zoom) else {
            return ToolOutcome::Unchanged;
        };
        let project = &mut self.project;
        let outcome = self
            .tools
            .apply(pos, &mut project.canvas_state, &mut project.history);

        match outcome {
            ToolOutcome::Unchanged => {}
            ToolOutcome::Picked(color) => {
                log_info!("Picked {} at {}", color, pos);
                self.status = outcome.describe();
            }
            _ => {
                project.is_dirty = true;
                self.status = outcome.describe();
            }
        }
        outcome
    }

    // ------------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------------

    /// Feed one key transition. Returns the action it triggered, if any.
    pub fn handle_key(&mut self, input: KeyInput) -> Option<BindableAction> {
        let action = match input {
            KeyInput::Command { pressed } => {
                let fresh = self.held.set_command(pressed);
                if fresh {
                    self.keybindings.action_for_command_press(&self.held)
                } else {
                    None
                }
            }
            KeyInput::Key { key, pressed: true } => {
                if self.held.press(key) {
                    self.keybindings.action_for_press(&self.held, key)
                } else {
                    None
                }
            }
            KeyInput::Key { key, pressed: false } => {
                self.held.release(key);
                None
            }
        };

        if let Some(action) = action {
            self.perform(action);
        }
        action
    }

    /// Drop all held-key state, e.g. when the window loses focus.
    pub fn release_all_keys(&mut self) {
        self.held.release_all();
    }

    pub fn perform(&mut self, action: BindableAction) {
        if let Some(tool) = Tool::from_action(action) {
            self.select_tool(tool);
            return;
        }
        match action {
            BindableAction::Undo => {
                self.undo();
            }
            BindableAction::ViewZoomIn => {
                self.zoom_in();
            }
            BindableAction::ViewZoomOut => {
                self.zoom_out();
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Takes effect immediately; an in-progress drag continues with the new tool.
    pub fn select_tool(&mut self, tool: Tool) {
        self.tools.change_tool(tool);
    }

    pub fn undo(&mut self) -> Option<String> {
        let description = self.project.undo()?;
        log_info!("Undo: {}", description);
        self.status = t!("outcome.undone", action = description);
        Some(description)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom.zoom_out()
    }

    pub fn set_color(&mut self, color: CellColor) {
        self.tools.color = color;
    }

    /// Set the paint color from a hex string such as the color input emits.
    pub fn set_color_hex(&mut self, hex: &str) -> Result<CellColor, ColorParseError> {
        let color = hex.parse()?;
        self.set_color(color);
        Ok(color)
    }
}
