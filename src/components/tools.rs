use crate::canvas::{CanvasState, CellColor, CellPos};
use crate::components::history::{CellChange, HistoryEntry, HistoryManager, StrokeKind};
use crate::keybindings::{BindableAction, KeyBindings};
use crate::ops::fill::flood_fill;
use eframe::egui;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
    Bucket,
    Picker,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Pencil, Tool::Eraser, Tool::Bucket, Tool::Picker];

    pub fn label(self) -> String {
        match self {
            Tool::Pencil => t!("tool.pencil"),
            Tool::Eraser => t!("tool.eraser"),
            Tool::Bucket => t!("tool.bucket"),
            Tool::Picker => t!("tool.picker"),
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Tool::Pencil => "✏",
            Tool::Eraser => "⌫",
            Tool::Bucket => "🪣",
            Tool::Picker => "💧",
        }
    }

    /// The keybinding that selects this tool.
    pub fn action(self) -> BindableAction {
        match self {
            Tool::Pencil => BindableAction::ToolPencil,
            Tool::Eraser => BindableAction::ToolEraser,
            Tool::Bucket => BindableAction::ToolBucket,
            Tool::Picker => BindableAction::ToolPicker,
        }
    }

    pub fn from_action(action: BindableAction) -> Option<Tool> {
        Tool::ALL.into_iter().find(|t| t.action() == action)
    }
}

/// What a single tool dispatch did to the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolOutcome {
    Painted,
    Erased,
    Filled(usize),
    Picked(CellColor),
    Unchanged,
}

impl ToolOutcome {
    pub fn describe(self) -> String {
        match self {
            ToolOutcome::Painted => t!("outcome.painted"),
            ToolOutcome::Erased => t!("outcome.erased"),
            ToolOutcome::Filled(count) => t!("outcome.filled", count = count),
            ToolOutcome::Picked(color) => t!("outcome.picked", color = color),
            ToolOutcome::Unchanged => String::new(),
        }
    }
}

// ============================================================================
// TOOLS PANEL - active tool, active color, per-tool handlers
// ============================================================================

pub struct ToolsPanel {
    pub active_tool: Tool,
    /// Active paint color.
    pub color: CellColor,
}

impl Default for ToolsPanel {
    fn default() -> Self {
        Self::new(CellColor::default())
    }
}

impl ToolsPanel {
    pub fn new(color: CellColor) -> Self {
        Self {
            active_tool: Tool::default(),
            color,
        }
    }

    pub fn change_tool(&mut self, tool: Tool) {
        self.active_tool = tool;
    }

    /// Run the active tool once on `pos`.
    pub fn apply(
        &mut self,
        pos: CellPos,
        canvas: &mut CanvasState,
        history: &mut HistoryManager,
    ) -> ToolOutcome {
        if !canvas.contains(pos) {
            return ToolOutcome::Unchanged;
        }
        match self.active_tool {
            Tool::Pencil => self.draw_pixel(pos, canvas, history),
            Tool::Eraser => Self::erase_pixel(pos, canvas, history),
            Tool::Bucket => self.fill_color(pos, canvas, history),
            Tool::Picker => self.pick_color(pos, canvas),
        }
    }

    fn draw_pixel(
        &self,
        pos: CellPos,
        canvas: &mut CanvasState,
        history: &mut HistoryManager,
    ) -> ToolOutcome {
        let previous = canvas.sample_color(pos);
        // dragging across the same cell
        if history.is_repeat(StrokeKind::Pencil, pos) && previous == Some(self.color) {
            return ToolOutcome::Unchanged;
        }

        history.record(HistoryEntry::Stroke {
            kind: StrokeKind::Pencil,
            change: CellChange::new(pos, previous),
        });
        canvas.paint_cell(pos, self.color);
        ToolOutcome::Painted
    }

    fn erase_pixel(
        pos: CellPos,
        canvas: &mut CanvasState,
        history: &mut HistoryManager,
    ) -> ToolOutcome {
        if history.is_repeat(StrokeKind::Eraser, pos) {
            return ToolOutcome::Unchanged;
        }
        let Some(previous) = canvas.sample_color(pos) else {
            return ToolOutcome::Unchanged;
        };

        history.record(HistoryEntry::Stroke {
            kind: StrokeKind::Eraser,
            change: CellChange::new(pos, Some(previous)),
        });
        canvas.clear_cell(pos);
        ToolOutcome::Erased
    }

    fn fill_color(
        &self,
        pos: CellPos,
        canvas: &mut CanvasState,
        history: &mut HistoryManager,
    ) -> ToolOutcome {
        let target = canvas.sample_color(pos);
        let changes = flood_fill(canvas, pos, target, self.color);
        if changes.is_empty() {
            return ToolOutcome::Unchanged;
        }

        let count = changes.len();
        history.record(HistoryEntry::Fill { changes });
        log_info!("Fill at {} replaced {} cells with {}", pos, count, self.color);
        ToolOutcome::Filled(count)
    }

    fn pick_color(&mut self, pos: CellPos, canvas: &CanvasState) -> ToolOutcome {
        match canvas.sample_color(pos) {
            Some(color) => {
                self.color = color;
                ToolOutcome::Picked(color)
            }
            None => ToolOutcome::Unchanged,
        }
    }

    /// Tool selector buttons. Returns the tool the user clicked, if any.
    pub fn show(&self, ui: &mut egui::Ui, keybindings: &KeyBindings) -> Option<Tool> {
        let mut clicked = None;
        for tool in Tool::ALL {
            let selected = self.active_tool == tool;
            let text = egui::RichText::new(format!("{} {}", tool.icon(), tool.label())).size(14.0);
            let mut response = ui.selectable_label(selected, text);
            if let Some(combo) = keybindings.get(tool.action()) {
                response = response.on_hover_text(t!("tool.shortcut", key = combo));
            }
            if response.clicked() {
                clicked = Some(tool);
            }
        }
        clicked
    }
}
