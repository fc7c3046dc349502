use super::*;
use crate::canvas::{CellPos, GRID_HEIGHT, GRID_WIDTH};
use crate::components::history::HistoryEntry;
use eframe::egui::pos2;

fn editor() -> Editor {
    Editor::new(&AppSettings::default())
}

fn red() -> CellColor {
    CellColor::new(0xff, 0, 0)
}

fn blue() -> CellColor {
    CellColor::new(0, 0, 0xff)
}

/// Pointer offset at the centre of a cell at zoom 1.
fn centre(col: u32, row: u32) -> Pos2 {
    pos2(col as f32 * 20.0 + 10.0, row as f32 * 20.0 + 10.0)
}

fn click(editor: &mut Editor, offset: Pos2) -> ToolOutcome {
    let outcome = editor.handle_pointer(PointerEvent::Down(offset));
    editor.handle_pointer(PointerEvent::Up);
    outcome
}

fn sample(editor: &Editor, col: u32, row: u32) -> Option<CellColor> {
    editor
        .project
        .canvas_state
        .sample_color(CellPos::from_grid(col, row))
}

// --- Scenarios ---

#[test]
fn pencil_click_then_undo() {
    let mut ed = editor();
    ed.select_tool(Tool::Pencil);
    ed.set_color_hex("#ff0000").unwrap();

    click(&mut ed, centre(0, 0));
    assert_eq!(sample(&ed, 0, 0), Some(red()));
    assert_eq!(sample(&ed, 0, 0).map(|c| c.to_hex()).as_deref(), Some("#ff0000"));
    assert_eq!(ed.project.history.len(), 1);

    assert!(ed.undo().is_some());
    assert_eq!(sample(&ed, 0, 0), None);
    assert_eq!(ed.project.history.len(), 0);
}

#[test]
fn bucket_skips_disconnected_painted_cell() {
    let mut ed = editor();
    ed.set_color(red());
    click(&mut ed, centre(1, 1));

    ed.select_tool(Tool::Bucket);
    ed.set_color(blue());
    assert_eq!(click(&mut ed, centre(0, 0)), ToolOutcome::Filled(1295));

    assert_eq!(sample(&ed, 1, 1), Some(red()));
    for row in 0..GRID_HEIGHT {
        for col in 0..GRID_WIDTH {
            if (col, row) != (1, 1) {
                assert_eq!(sample(&ed, col, row), Some(blue()));
            }
        }
    }
    assert_eq!(ed.project.history.len(), 2);
}

#[test]
fn bucket_on_empty_grid_records_one_batch() {
    let mut ed = editor();
    ed.select_tool(Tool::Bucket);
    ed.set_color(blue());
    click(&mut ed, centre(20, 20));

    assert_eq!(ed.project.history.len(), 1);
    assert_eq!(ed.project.history.total_cells(), 1296);
    assert!(matches!(ed.project.history.last(), Some(HistoryEntry::Fill { .. })));

    ed.undo();
    assert_eq!(ed.project.canvas_state.painted_count(), 0);
}

// --- Pointer state machine ---

#[test]
fn drag_over_one_cell_records_once() {
    let mut ed = editor();
    ed.set_color(red());
    ed.handle_pointer(PointerEvent::Down(pos2(5.0, 5.0)));
    for i in 0..10 {
        ed.handle_pointer(PointerEvent::Move(pos2(5.0 + i as f32, 6.0)));
    }
    ed.handle_pointer(PointerEvent::Up);
    assert_eq!(ed.project.history.len(), 1);
}

#[test]
fn drag_across_cells_records_each_cell() {
    let mut ed = editor();
    ed.set_color(red());
    ed.handle_pointer(PointerEvent::Down(centre(0, 0)));
    ed.handle_pointer(PointerEvent::Move(centre(1, 0)));
    ed.handle_pointer(PointerEvent::Move(centre(1, 0)));
    ed.handle_pointer(PointerEvent::Move(centre(2, 0)));
    ed.handle_pointer(PointerEvent::Leave);
    // pointer is up now; further moves paint nothing
    ed.handle_pointer(PointerEvent::Move(centre(3, 0)));

    assert_eq!(ed.project.history.len(), 3);
    assert_eq!(sample(&ed, 3, 0), None);
    assert_eq!(ed.pointer_state(), PointerState::Up);
}

#[test]
fn hover_without_press_does_nothing() {
    let mut ed = editor();
    ed.handle_pointer(PointerEvent::Move(centre(4, 4)));
    assert_eq!(ed.project.canvas_state.painted_count(), 0);
    assert!(!ed.project.is_dirty);
}

#[test]
fn drag_erase_records_each_painted_cell_once() {
    let mut ed = editor();
    ed.set_color(red());
    for col in 0..3 {
        click(&mut ed, centre(col, 0));
    }
    ed.select_tool(Tool::Eraser);
    ed.handle_pointer(PointerEvent::Down(centre(0, 0)));
    ed.handle_pointer(PointerEvent::Move(centre(0, 0)));
    ed.handle_pointer(PointerEvent::Move(centre(1, 0)));
    ed.handle_pointer(PointerEvent::Move(centre(2, 0)));
    ed.handle_pointer(PointerEvent::Move(centre(3, 0)));
    ed.handle_pointer(PointerEvent::Up);

    assert_eq!(ed.project.history.len(), 6);
    assert_eq!(ed.project.canvas_state.painted_count(), 0);
}

#[test]
fn tool_change_mid_drag_applies_immediately() {
    let mut ed = editor();
    ed.set_color(red());
    ed.handle_pointer(PointerEvent::Down(centre(0, 0)));
    ed.select_tool(Tool::Eraser);
    assert_eq!(ed.pointer_state(), PointerState::Down);
    ed.handle_pointer(PointerEvent::Move(centre(0, 1)));
    ed.handle_pointer(PointerEvent::Move(centre(0, 0)));
    assert_eq!(sample(&ed, 0, 0), None);
}

#[test]
fn zoomed_clicks_land_on_logical_cells() {
    let mut ed = editor();
    ed.set_color(red());
    ed.zoom_in();
    ed.zoom_in();
    assert_eq!(ed.zoom.get(), 3);
    // 3x: screen offset 65 is grid cell 1 (screen cells 3..=5)
    click(&mut ed, pos2(65.0, 5.0));
    assert_eq!(sample(&ed, 1, 0), Some(red()));
}

#[test]
fn off_canvas_press_is_ignored() {
    let mut ed = editor();
    assert_eq!(click(&mut ed, pos2(730.0, 10.0)), ToolOutcome::Unchanged);
    assert!(ed.project.history.is_empty());
}

#[test]
fn picker_updates_active_color() {
    let mut ed = editor();
    ed.set_color(red());
    click(&mut ed, centre(5, 5));
    ed.set_color(blue());
    ed.select_tool(Tool::Picker);
    assert_eq!(click(&mut ed, centre(5, 5)), ToolOutcome::Picked(red()));
    assert_eq!(ed.color(), red());
    assert_eq!(ed.project.history.len(), 1);
}

#[test]
fn invalid_hex_keeps_current_color() {
    let mut ed = editor();
    let before = ed.color();
    assert!(ed.set_color_hex("not-a-color").is_err());
    assert_eq!(ed.color(), before);
}

// --- Keyboard ---

fn press(ed: &mut Editor, key: Key) -> Option<BindableAction> {
    ed.handle_key(KeyInput::Key { key, pressed: true })
}

fn release(ed: &mut Editor, key: Key) {
    ed.handle_key(KeyInput::Key { key, pressed: false });
}

#[test]
fn letter_shortcuts_switch_tools() {
    let mut ed = editor();
    for (key, tool) in [
        (Key::E, Tool::Eraser),
        (Key::B, Tool::Bucket),
        (Key::I, Tool::Picker),
        (Key::P, Tool::Pencil),
    ] {
        press(&mut ed, key);
        release(&mut ed, key);
        assert_eq!(ed.active_tool(), tool);
    }
}

#[test]
fn shortcuts_need_modifier_state_to_match() {
    let mut ed = editor();
    ed.handle_key(KeyInput::Command { pressed: true });
    assert_eq!(press(&mut ed, Key::E), None);
    assert_eq!(ed.active_tool(), Tool::Pencil);
}

#[test]
fn undo_chord_fires_once_per_press() {
    let mut ed = editor();
    ed.set_color(red());
    for col in 0..3 {
        click(&mut ed, centre(col, 0));
    }

    ed.handle_key(KeyInput::Command { pressed: true });
    assert_eq!(press(&mut ed, Key::Z), Some(BindableAction::Undo));
    // auto-repeat of a held Z is not a new press
    assert_eq!(press(&mut ed, Key::Z), None);
    assert_eq!(ed.project.history.len(), 2);

    release(&mut ed, Key::Z);
    press(&mut ed, Key::Z);
    assert_eq!(ed.project.history.len(), 1);
}

#[test]
fn undo_chord_in_either_order() {
    let mut ed = editor();
    ed.set_color(red());
    click(&mut ed, centre(0, 0));

    press(&mut ed, Key::Z);
    assert_eq!(
        ed.handle_key(KeyInput::Command { pressed: true }),
        Some(BindableAction::Undo)
    );
    assert!(ed.project.history.is_empty());
}

#[test]
fn z_alone_does_not_undo() {
    let mut ed = editor();
    ed.set_color(red());
    click(&mut ed, centre(0, 0));
    press(&mut ed, Key::Z);
    release(&mut ed, Key::Z);
    assert_eq!(ed.project.history.len(), 1);
}

#[test]
fn undo_with_empty_history_is_a_noop() {
    let mut ed = editor();
    ed.handle_key(KeyInput::Command { pressed: true });
    press(&mut ed, Key::Z);
    assert!(ed.project.history.is_empty());
    assert_eq!(ed.status(), "");
}

#[test]
fn zoom_shortcuts_are_clamped() {
    let mut ed = editor();
    ed.handle_key(KeyInput::Command { pressed: true });
    for _ in 0..6 {
        press(&mut ed, Key::PlusEquals);
        release(&mut ed, Key::PlusEquals);
    }
    assert_eq!(ed.zoom.get(), 4);
    for _ in 0..6 {
        press(&mut ed, Key::Minus);
        release(&mut ed, Key::Minus);
    }
    assert_eq!(ed.zoom.get(), 1);
}

#[test]
fn zoom_is_not_recorded_in_history() {
    let mut ed = editor();
    ed.zoom_in();
    ed.zoom_out();
    assert!(ed.project.history.is_empty());
}

#[test]
fn settings_seed_initial_state() {
    let mut settings = AppSettings::default();
    settings.default_color = blue();
    settings.zoom = ZoomScale::new(2);
    settings.max_undo_steps = 1;
    let mut ed = Editor::new(&settings);
    assert_eq!(ed.color(), blue());
    assert_eq!(ed.zoom.get(), 2);

    click(&mut ed, pos2(5.0, 5.0));
    click(&mut ed, pos2(45.0, 5.0));
    assert_eq!(ed.project.history.len(), 1);
}
