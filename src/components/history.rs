use eframe::egui;
use std::collections::VecDeque;

use crate::canvas::{CanvasState, CellColor, CellPos};

// ============================================================================
// HISTORY ENTRIES
// ============================================================================

/// One cell as it was before a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellChange {
    pub pos: CellPos,
    pub previous: Option<CellColor>,
}

impl CellChange {
    pub fn new(pos: CellPos, previous: Option<CellColor>) -> Self {
        Self { pos, previous }
    }

    fn revert(&self, canvas: &mut CanvasState) {
        canvas.restore_cell(self.pos, self.previous);
    }
}

/// Tools that mutate a single cell per dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeKind {
    Pencil,
    Eraser,
}

/// An undoable grid mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryEntry {
    Stroke { kind: StrokeKind, change: CellChange },
    Fill { changes: Vec<CellChange> },
}

impl HistoryEntry {
    pub fn undo(&self, canvas: &mut CanvasState) {
        match self {
            HistoryEntry::Stroke { change, .. } => change.revert(canvas),
            // each change targets a distinct cell, so order does not matter
            HistoryEntry::Fill { changes } => {
                for change in changes {
                    change.revert(canvas);
                }
            }
        }
    }

    pub fn description(&self) -> String {
        match self {
            HistoryEntry::Stroke { kind: StrokeKind::Pencil, change } => {
                t!("history.pencil", cell = change.pos)
            }
            HistoryEntry::Stroke { kind: StrokeKind::Eraser, change } => {
                t!("history.eraser", cell = change.pos)
            }
            HistoryEntry::Fill { changes } => t!("history.fill", count = changes.len()),
        }
    }

    /// Number of cells this entry restores on undo.
    pub fn cell_count(&self) -> usize {
        match self {
            HistoryEntry::Stroke { .. } => 1,
            HistoryEntry::Fill { changes } => changes.len(),
        }
    }

    fn is_stroke_at(&self, kind: StrokeKind, pos: CellPos) -> bool {
        matches!(self, HistoryEntry::Stroke { kind: k, change } if *k == kind && change.pos == pos)
    }
}

// ============================================================================
// HISTORY MANAGER - undo-only stack
// ============================================================================

/// Ordered undo history. Popped entries are discarded; there is no redo.
pub struct HistoryManager {
    undo_stack: VecDeque<HistoryEntry>,
    /// 0 = unlimited.
    max_history_size: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(0)
    }
}

impl HistoryManager {
    pub fn new(max_history_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            max_history_size,
        }
    }

    /// Whether a stroke of `kind` on `pos` repeats the newest entry.
    pub fn is_repeat(&self, kind: StrokeKind, pos: CellPos) -> bool {
        self.undo_stack
            .back()
            .is_some_and(|last| last.is_stroke_at(kind, pos))
    }

    /// Append an entry, dropping the oldest one past the cap. Callers decide
    /// whether a stroke is a repeat (see `is_repeat`).
    pub fn record(&mut self, entry: HistoryEntry) {
        self.undo_stack.push_back(entry);
        self.prune();
    }

    /// Pop the newest entry and restore every cell it recorded.
    pub fn undo_last(&mut self, canvas: &mut CanvasState) -> Option<String> {
        let entry = self.undo_stack.pop_back()?;
        entry.undo(canvas);
        Some(entry.description())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.undo_stack.back()
    }

    /// All entry descriptions, most recent first.
    pub fn undo_history(&self) -> Vec<String> {
        self.undo_stack.iter().rev().map(|e| e.description()).collect()
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Total cells restorable across all entries.
    pub fn total_cells(&self) -> usize {
        self.undo_stack.iter().map(HistoryEntry::cell_count).sum()
    }

    pub fn set_max_history_size(&mut self, max: usize) {
        self.max_history_size = max;
        self.prune();
    }

    fn prune(&mut self) {
        if self.max_history_size == 0 {
            return;
        }
        while self.undo_stack.len() > self.max_history_size {
            self.undo_stack.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
    }
}

// ============================================================================
// HISTORY PANEL - UI for displaying history
// ============================================================================

#[derive(Default)]
pub struct HistoryPanel {
    show_cell_info: bool,
}

impl HistoryPanel {
    /// Draws the history list. Returns `true` when the Undo button was clicked.
    pub fn show(&mut self, ui: &mut egui::Ui, history: &HistoryManager) -> bool {
        let mut undo_clicked = false;

        ui.horizontal(|ui| {
            ui.strong(t!("history.title"));
            ui.label(format!("({})", history.len()));

            if ui
                .small_button("ℹ")
                .on_hover_text(t!("history.cell_info"))
                .clicked()
            {
                self.show_cell_info = !self.show_cell_info;
            }
        });

        if self.show_cell_info {
            ui.label(t!("history.cells", count = history.total_cells()));
        }

        if ui
            .add_enabled(history.can_undo(), egui::Button::new(t!("history.undo")))
            .clicked()
        {
            undo_clicked = true;
        }
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            let items = history.undo_history();
            if items.is_empty() {
                ui.weak(t!("history.empty"));
            } else {
                for (i, desc) in items.iter().enumerate() {
                    let text = if i == 0 {
                        egui::RichText::new(format!("▶ {}", desc)).strong().size(11.0)
                    } else {
                        egui::RichText::new(format!("  {}", desc)).weak().size(11.0)
                    };
                    ui.label(text);
                }
            }
        });

        undo_clicked
    }
}
