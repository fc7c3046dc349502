use uuid::Uuid;

use crate::canvas::CanvasState;
use crate::components::history::HistoryManager;

/// The open drawing: its grid and the undo history that belongs to it.
pub struct Project {
    pub id: Uuid,
    pub canvas_state: CanvasState,
    pub history: HistoryManager,

    /// Display name ("Untitled-X")
    pub name: String,

    /// True once anything has been drawn since the project was created.
    pub is_dirty: bool,
}

impl Project {
    pub fn new_untitled(untitled_counter: usize, max_undo_steps: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            canvas_state: CanvasState::new(),
            history: HistoryManager::new(max_undo_steps),
            name: format!("Untitled-{}", untitled_counter),
            is_dirty: false,
        }
    }

    /// Undo the newest history entry. Returns its description, `None` if empty.
    pub fn undo(&mut self) -> Option<String> {
        self.history.undo_last(&mut self.canvas_state)
    }

    /// Window title, with `*` once the grid has been touched.
    pub fn title(&self) -> String {
        let dirty = if self.is_dirty { "*" } else { "" };
        format!("{} - {}{}", t!("app.title"), self.name, dirty)
    }
}
