use super::*;
use eframe::egui::{pos2, vec2};

fn red() -> CellColor {
    CellColor::new(0xff, 0, 0)
}

// --- CellColor ---

#[test]
fn parses_long_hex_with_and_without_hash() {
    assert_eq!("#ff0000".parse::<CellColor>(), Ok(red()));
    assert_eq!("FF0000".parse::<CellColor>(), Ok(red()));
}

#[test]
fn parses_short_hex() {
    assert_eq!("#0f8".parse::<CellColor>(), Ok(CellColor::new(0x00, 0xff, 0x88)));
}

#[test]
fn rejects_bad_color_strings() {
    assert_eq!("".parse::<CellColor>(), Err(ColorParseError::Empty));
    assert_eq!("#".parse::<CellColor>(), Err(ColorParseError::Empty));
    assert_eq!("#ff00".parse::<CellColor>(), Err(ColorParseError::BadLength(4)));
    assert!(matches!("#gg0000".parse::<CellColor>(), Err(ColorParseError::BadDigit(_))));
}

#[test]
fn hex_output_is_lowercase_and_padded() {
    assert_eq!(CellColor::new(0xAB, 0x0C, 0x01).to_hex(), "#ab0c01");
    assert_eq!(format!("{}", CellColor::default()), "#707070");
}

#[test]
fn transparent_pixel_reads_as_empty() {
    assert_eq!(CellColor::from_rgba(Rgba([0, 0, 0, 0])), None);
    assert_eq!(CellColor::from_rgba(Rgba([10, 20, 30, 0])), None);
    assert_eq!(
        CellColor::from_rgba(Rgba([0, 0, 0, 255])),
        Some(CellColor::new(0, 0, 0))
    );
}

// --- Geometry ---

#[test]
fn pointer_maps_to_cell_anchor() {
    let scale = ZoomScale::new(1);
    assert_eq!(cell_from_pointer(0.0, 0.0, scale), CellPos::new(0, 0));
    assert_eq!(cell_from_pointer(19.9, 19.9, scale), CellPos::new(0, 0));
    assert_eq!(cell_from_pointer(20.0, 45.0, scale), CellPos::new(20, 40));
}

#[test]
fn pointer_mapping_undoes_zoom() {
    let scale = ZoomScale::new(2);
    // screen cell 3 at 2x belongs to grid cell 1
    assert_eq!(cell_from_pointer(60.0, 79.0, scale), CellPos::new(20, 20));
    let scale = ZoomScale::new(4);
    assert_eq!(cell_from_pointer(79.0, 80.0, scale), CellPos::new(0, 20));
}

#[test]
fn pointer_mapping_is_always_cell_aligned() {
    for scale in MIN_ZOOM..=MAX_ZOOM {
        for offset in [0.0, 7.5, 33.3, 401.0, 719.9] {
            let pos = cell_from_pointer(offset, offset, ZoomScale::new(scale));
            assert_eq!(pos.x % CELL_SIZE, 0);
            assert_eq!(pos.y % CELL_SIZE, 0);
        }
    }
}

#[test]
fn negative_pointer_offsets_saturate() {
    assert_eq!(cell_from_pointer(-5.0, -50.0, ZoomScale::default()), CellPos::new(0, 0));
}

#[test]
fn cell_at_pointer_rejects_off_grid_positions() {
    let state = CanvasState::new();
    let scale = ZoomScale::new(1);
    assert_eq!(state.cell_at_pointer(egui::pos2(-1.0, 5.0), scale), None);
    assert_eq!(state.cell_at_pointer(egui::pos2(720.0, 5.0), scale), None);
    assert_eq!(
        state.cell_at_pointer(egui::pos2(719.0, 719.0), scale),
        Some(CellPos::new(700, 700))
    );
}

#[test]
fn neighbors_follow_down_right_up_left() {
    let n: Vec<_> = CellPos::from_grid(5, 5).neighbors().collect();
    assert_eq!(
        n,
        vec![
            CellPos::from_grid(5, 6),
            CellPos::from_grid(6, 5),
            CellPos::from_grid(5, 4),
            CellPos::from_grid(4, 5),
        ]
    );
}

#[test]
fn corner_neighbors_stay_on_grid() {
    let n: Vec<_> = CellPos::from_grid(0, 0).neighbors().collect();
    assert_eq!(n, vec![CellPos::from_grid(0, 1), CellPos::from_grid(1, 0)]);

    let last = CellPos::from_grid(GRID_WIDTH - 1, GRID_HEIGHT - 1);
    let n: Vec<_> = last.neighbors().collect();
    assert_eq!(
        n,
        vec![
            CellPos::from_grid(GRID_WIDTH - 1, GRID_HEIGHT - 2),
            CellPos::from_grid(GRID_WIDTH - 2, GRID_HEIGHT - 1),
        ]
    );
}

// --- Zoom ---

#[test]
fn zoom_is_clamped() {
    let mut zoom = ZoomScale::default();
    assert!(!zoom.zoom_out());
    assert_eq!(zoom.get(), 1);
    for _ in 0..10 {
        zoom.zoom_in();
    }
    assert_eq!(zoom.get(), MAX_ZOOM);
    assert!(!zoom.can_zoom_in());
    assert_eq!(ZoomScale::new(0).get(), MIN_ZOOM);
    assert_eq!(ZoomScale::new(9).get(), MAX_ZOOM);
}

// --- CanvasState ---

#[test]
fn unpainted_cells_are_empty() {
    let state = CanvasState::new();
    for row in 0..GRID_HEIGHT {
        for col in 0..GRID_WIDTH {
            let pos = CellPos::from_grid(col, row);
            assert_eq!(state.sample_color(pos), None);
            assert_eq!(state.read_back(pos), None);
        }
    }
    assert_eq!(state.painted_count(), 0);
}

#[test]
fn paint_then_sample() {
    let mut state = CanvasState::new();
    let pos = CellPos::new(40, 100);
    state.paint_cell(pos, red());
    assert_eq!(state.sample_color(pos), Some(red()));
    assert_eq!(state.read_back(pos), Some(red()));
    // whole rectangle is covered, neighbors are untouched
    assert_eq!(*state.pixels().get_pixel(59, 119), red().to_rgba());
    assert_eq!(*state.pixels().get_pixel(60, 119), Rgba([0, 0, 0, 0]));
}

#[test]
fn clear_then_sample() {
    let mut state = CanvasState::new();
    let pos = CellPos::new(0, 0);
    state.paint_cell(pos, red());
    state.clear_cell(pos);
    assert_eq!(state.sample_color(pos), None);
    assert_eq!(state.read_back(pos), None);
}

#[test]
fn off_grid_mutations_are_ignored() {
    let mut state = CanvasState::new();
    state.take_dirty();
    state.paint_cell(CellPos::new(720, 0), red());
    state.paint_cell(CellPos::new(5, 0), red());
    assert_eq!(state.painted_count(), 0);
    assert!(!state.take_dirty());
}

#[test]
fn mutations_mark_surface_dirty() {
    let mut state = CanvasState::new();
    assert!(state.take_dirty());
    assert!(!state.take_dirty());
    state.paint_cell(CellPos::new(20, 20), red());
    assert!(state.take_dirty());
}

// --- Widget input ---

/// Drives `Canvas::show` headlessly inside the app's layout: a fixed-width
/// panel on the right and the zoomed canvas in a scroll area in the middle.
struct WidgetHarness {
    ctx: egui::Context,
    canvas: Canvas,
    state: CanvasState,
}

impl WidgetHarness {
    fn new() -> Self {
        let mut harness = Self {
            ctx: egui::Context::default(),
            canvas: Canvas::new(),
            state: CanvasState::new(),
        };
        harness.frame(Vec::new());
        harness
    }

    fn frame(&mut self, events: Vec<egui::Event>) -> Vec<PointerEvent> {
        let input = egui::RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, vec2(600.0, 600.0))),
            events,
            ..Default::default()
        };
        let mut out = Vec::new();
        let Self { ctx, canvas, state } = self;
        let _ = ctx.run(input, |ctx| {
            egui::SidePanel::right("history")
                .exact_width(150.0)
                .show(ctx, |ui| {
                    ui.label("history");
                });
            egui::CentralPanel::default().show(ctx, |ui| {
                egui::ScrollArea::both().drag_to_scroll(false).show(ui, |ui| {
                    out = canvas.show(ui, state, ZoomScale::new(2), true);
                });
            });
        });
        out
    }

    fn offset(&self, screen: Pos2) -> Pos2 {
        let rect = self.canvas.last_canvas_rect.expect("canvas was shown");
        (screen - rect.min).to_pos2()
    }
}

fn moved(x: f32, y: f32) -> egui::Event {
    egui::Event::PointerMoved(pos2(x, y))
}

fn button(x: f32, y: f32, pressed: bool) -> egui::Event {
    egui::Event::PointerButton {
        pos: pos2(x, y),
        button: egui::PointerButton::Primary,
        pressed,
        modifiers: egui::Modifiers::NONE,
    }
}

#[test]
fn press_drag_release_become_pointer_events() {
    let mut h = WidgetHarness::new();

    let events = h.frame(vec![moved(100.0, 100.0)]);
    assert_eq!(events, vec![PointerEvent::Move(h.offset(pos2(100.0, 100.0)))]);

    let events = h.frame(vec![button(100.0, 100.0, true)]);
    assert_eq!(events, vec![PointerEvent::Down(h.offset(pos2(100.0, 100.0)))]);

    let events = h.frame(vec![moved(140.0, 100.0)]);
    assert_eq!(events, vec![PointerEvent::Move(h.offset(pos2(140.0, 100.0)))]);

    // no motion, no repeat
    assert!(h.frame(Vec::new()).is_empty());

    let events = h.frame(vec![button(140.0, 100.0, false)]);
    assert_eq!(events, vec![PointerEvent::Up]);
}

#[test]
fn press_and_release_in_one_frame() {
    let mut h = WidgetHarness::new();
    let events = h.frame(vec![
        moved(60.0, 60.0),
        button(60.0, 60.0, true),
        button(60.0, 60.0, false),
    ]);
    assert_eq!(
        events,
        vec![PointerEvent::Down(h.offset(pos2(60.0, 60.0))), PointerEvent::Up]
    );
}

#[test]
fn dragging_onto_a_side_panel_leaves_the_canvas() {
    let mut h = WidgetHarness::new();
    h.frame(vec![moved(100.0, 100.0), button(100.0, 100.0, true)]);

    // still inside the zoomed canvas rect, but hidden behind the panel
    let hidden = pos2(520.0, 100.0);
    assert!(h.canvas.last_canvas_rect.is_some_and(|r| r.contains(hidden)));

    let events = h.frame(vec![moved(hidden.x, hidden.y)]);
    assert_eq!(events, vec![PointerEvent::Leave]);
    assert!(h.canvas.hover_offset().is_none());

    // further motion over the panel is not reported
    assert!(h.frame(vec![moved(540.0, 120.0)]).is_empty());
}

#[test]
fn press_outside_then_drag_in_is_only_a_move() {
    let mut h = WidgetHarness::new();
    h.frame(vec![moved(520.0, 100.0), button(520.0, 100.0, true)]);
    let events = h.frame(vec![moved(100.0, 100.0)]);
    assert_eq!(events, vec![PointerEvent::Move(h.offset(pos2(100.0, 100.0)))]);
}

#[test]
fn pointer_leaving_the_window_leaves_the_canvas() {
    let mut h = WidgetHarness::new();
    h.frame(vec![moved(100.0, 100.0)]);
    assert_eq!(h.frame(vec![egui::Event::PointerGone]), vec![PointerEvent::Leave]);
}
