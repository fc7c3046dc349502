use std::fmt;
use std::str::FromStr;

use eframe::egui;
use egui::{Color32, ColorImage, Pos2, Rect, Stroke, TextureOptions, Vec2};
use image::{Rgba, RgbaImage};

#[cfg(test)]
#[path = "canvas_test.rs"]
mod canvas_test;

/// Side length of one grid cell in surface units.
pub const CELL_SIZE: u32 = 20;
/// Grid width in cells.
pub const GRID_WIDTH: u32 = 36;
/// Grid height in cells.
pub const GRID_HEIGHT: u32 = 36;

pub const MIN_ZOOM: u32 = 1;
pub const MAX_ZOOM: u32 = 4;

const EMPTY_PIXEL: Rgba<u8> = Rgba([0, 0, 0, 0]);

// ============================================================================
// CELL COLOR
// ============================================================================

/// An opaque cell color. The "empty" state is modelled as `Option<CellColor>::None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("color string is empty")]
    Empty,
    #[error("expected 3 or 6 hex digits, got {0}")]
    BadLength(usize),
    #[error("invalid hex digit in {0:?}")]
    BadDigit(String),
}

impl CellColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }

    /// Maps a raster pixel back to a cell color. Fully transparent pixels are empty.
    pub fn from_rgba(pixel: Rgba<u8>) -> Option<Self> {
        if pixel.0[3] == 0 {
            None
        } else {
            Some(Self::new(pixel.0[0], pixel.0[1], pixel.0[2]))
        }
    }

    pub fn to_color32(self) -> Color32 {
        Color32::from_rgb(self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

impl Default for CellColor {
    fn default() -> Self {
        Self::new(0x70, 0x70, 0x70)
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for CellColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if digits.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigit(s.to_string()));
        }

        let channel = |hex: &str| {
            u8::from_str_radix(hex, 16).map_err(|_| ColorParseError::BadDigit(s.to_string()))
        };

        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            // #rgb shorthand: each digit is doubled
            3 => {
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                Ok(Self::new(r * 17, g * 17, b * 17))
            }
            n => Err(ColorParseError::BadLength(n)),
        }
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Top-left anchor of a cell in surface units (always a multiple of `CELL_SIZE`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct CellPos {
    pub x: u32,
    pub y: u32,
}

impl CellPos {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Anchor of the cell at grid column/row.
    pub const fn from_grid(col: u32, row: u32) -> Self {
        Self::new(col * CELL_SIZE, row * CELL_SIZE)
    }

    pub const fn col(self) -> u32 {
        self.x / CELL_SIZE
    }

    pub const fn row(self) -> u32 {
        self.y / CELL_SIZE
    }

    /// Neighbors in fill order: down, right, up, left. Off-grid neighbors are skipped.
    pub fn neighbors(self) -> impl Iterator<Item = CellPos> {
        let (col, row) = (self.col(), self.row());
        let down = (row + 1 < GRID_HEIGHT).then(|| Self::from_grid(col, row + 1));
        let right = (col + 1 < GRID_WIDTH).then(|| Self::from_grid(col + 1, row));
        let up = (row > 0).then(|| Self::from_grid(col, row - 1));
        let left = (col > 0).then(|| Self::from_grid(col - 1, row));
        [down, right, up, left].into_iter().flatten()
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Display scale of the canvas, clamped to `MIN_ZOOM..=MAX_ZOOM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoomScale(u32);

impl ZoomScale {
    pub fn new(scale: u32) -> Self {
        Self(scale.clamp(MIN_ZOOM, MAX_ZOOM))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn zoom_in(&mut self) -> bool {
        if self.0 < MAX_ZOOM {
            self.0 += 1;
            true
        } else {
            false
        }
    }

    pub fn zoom_out(&mut self) -> bool {
        if self.0 > MIN_ZOOM {
            self.0 -= 1;
            true
        } else {
            false
        }
    }

    pub fn can_zoom_in(self) -> bool {
        self.0 < MAX_ZOOM
    }

    pub fn can_zoom_out(self) -> bool {
        self.0 > MIN_ZOOM
    }
}

impl Default for ZoomScale {
    fn default() -> Self {
        Self(MIN_ZOOM)
    }
}

/// Converts a pointer offset (relative to the canvas origin, in screen units) to the
/// anchor of the containing cell, undoing the zoom. Not bounds-checked: negative
/// offsets saturate to zero and large ones may land past the grid.
pub fn cell_from_pointer(offset_x: f32, offset_y: f32, scale: ZoomScale) -> CellPos {
    let axis = |offset: f32| {
        let screen_cell = (offset / CELL_SIZE as f32).floor();
        let cell = (screen_cell / scale.get() as f32).floor();
        // `as` saturates, so negative input clamps to cell 0
        (cell as u32).saturating_mul(CELL_SIZE)
    };
    CellPos::new(axis(offset_x), axis(offset_y))
}

// ============================================================================
// CANVAS STATE - logical grid + raster projection
// ============================================================================

/// The drawing surface. `cells` is the source of truth; `pixels` is the raster
/// projection that the widget uploads as a texture.
pub struct CanvasState {
    cells: Vec<Option<CellColor>>,
    pixels: RgbaImage,
    dirty: bool,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasState {
    pub fn new() -> Self {
        Self {
            cells: vec![None; (GRID_WIDTH * GRID_HEIGHT) as usize],
            pixels: RgbaImage::from_pixel(
                GRID_WIDTH * CELL_SIZE,
                GRID_HEIGHT * CELL_SIZE,
                EMPTY_PIXEL,
            ),
            dirty: true,
        }
    }

    /// Surface width in units.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Surface height in units.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        pos.x % CELL_SIZE == 0
            && pos.y % CELL_SIZE == 0
            && pos.col() < GRID_WIDTH
            && pos.row() < GRID_HEIGHT
    }

    /// Cell under a pointer offset, or `None` when the pointer is off the grid.
    pub fn cell_at_pointer(&self, offset: Pos2, scale: ZoomScale) -> Option<CellPos> {
        if offset.x < 0.0 || offset.y < 0.0 {
            return None;
        }
        let pos = cell_from_pointer(offset.x, offset.y, scale);
        self.contains(pos).then_some(pos)
    }

    fn index(&self, pos: CellPos) -> Option<usize> {
        self.contains(pos)
            .then(|| (pos.row() * GRID_WIDTH + pos.col()) as usize)
    }

    /// Current color of the cell; `None` means empty (or off-grid).
    pub fn sample_color(&self, pos: CellPos) -> Option<CellColor> {
        self.index(pos).and_then(|i| self.cells[i])
    }

    /// Reads the rendered pixel at the cell anchor.
    pub fn read_back(&self, pos: CellPos) -> Option<CellColor> {
        if !self.contains(pos) {
            return None;
        }
        CellColor::from_rgba(*self.pixels.get_pixel(pos.x, pos.y))
    }

    pub fn paint_cell(&mut self, pos: CellPos, color: CellColor) {
        self.set_cell(pos, Some(color));
    }

    pub fn clear_cell(&mut self, pos: CellPos) {
        self.set_cell(pos, None);
    }

    /// Puts a recorded previous state back: repaint if `Some`, clear if `None`.
    pub fn restore_cell(&mut self, pos: CellPos, previous: Option<CellColor>) {
        self.set_cell(pos, previous);
    }

    fn set_cell(&mut self, pos: CellPos, color: Option<CellColor>) {
        let Some(idx) = self.index(pos) else { return };
        self.cells[idx] = color;

        let pixel = color.map_or(EMPTY_PIXEL, CellColor::to_rgba);
        for y in pos.y..pos.y + CELL_SIZE {
            for x in pos.x..pos.x + CELL_SIZE {
                self.pixels.put_pixel(x, y, pixel);
            }
        }
        self.dirty = true;
    }

    /// Number of non-empty cells.
    pub fn painted_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Returns whether the raster changed since the last call, and resets the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

// ============================================================================
// CANVAS WIDGET
// ============================================================================

/// Pointer input relative to the canvas origin, in screen units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up,
    Leave,
}

/// Renders a `CanvasState` and turns egui pointer input into `PointerEvent`s.
pub struct Canvas {
    texture: Option<egui::TextureHandle>,
    /// Last hover offset inside the canvas, `None` while the pointer is outside.
    last_hover: Option<Pos2>,
    pub last_canvas_rect: Option<Rect>,
    pub background: Color32,
    pub grid_line_color: Color32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            texture: None,
            last_hover: None,
            last_canvas_rect: None,
            background: Color32::from_gray(250),
            grid_line_color: Color32::from_gray(215),
        }
    }

    /// Hover offset of the pointer over the canvas during the last frame.
    pub fn hover_offset(&self) -> Option<Pos2> {
        self.last_hover
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        state: &mut CanvasState,
        zoom: ZoomScale,
        show_grid_lines: bool,
    ) -> Vec<PointerEvent> {
        let scale = zoom.get() as f32;
        let size = Vec2::new(state.width() as f32 * scale, state.height() as f32 * scale);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
        self.last_canvas_rect = Some(rect);

        self.upload_texture(ui.ctx(), state);

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, self.background);
        if let Some(texture) = &self.texture {
            let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(texture.id(), rect, uv, Color32::WHITE);
        }
        if show_grid_lines {
            self.paint_grid_lines(&painter, rect, scale);
        }

        let (pressed, released, hover) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.hover_pos(),
            )
        });

        // only the part of the canvas the scroll viewport shows, and only where
        // no other layer (popup, menu) sits on top of it
        let visible = rect.intersect(ui.clip_rect());
        let layer = ui.layer_id();
        let over_canvas = |p: &Pos2| visible.contains(*p) && ui.ctx().layer_id_at(*p) == Some(layer);

        let mut events = Vec::new();
        match hover.filter(over_canvas) {
            Some(pos) => {
                let offset = (pos - rect.min).to_pos2();
                if pressed && response.hovered() {
                    events.push(PointerEvent::Down(offset));
                } else if self.last_hover != Some(offset) {
                    events.push(PointerEvent::Move(offset));
                }
                if released {
                    events.push(PointerEvent::Up);
                }
                self.last_hover = Some(offset);
            }
            None => {
                if self.last_hover.take().is_some() {
                    events.push(PointerEvent::Leave);
                }
            }
        }
        events
    }

    fn upload_texture(&mut self, ctx: &egui::Context, state: &mut CanvasState) {
        let dirty = state.take_dirty();
        if self.texture.is_some() && !dirty {
            return;
        }
        let pixels = state.pixels();
        let image = ColorImage::from_rgba_unmultiplied(
            [pixels.width() as usize, pixels.height() as usize],
            pixels.as_raw(),
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("pixel_grid", image, TextureOptions::NEAREST));
            }
        }
    }

    fn paint_grid_lines(&self, painter: &egui::Painter, rect: Rect, scale: f32) {
        let stroke = Stroke::new(1.0, self.grid_line_color);
        let step = CELL_SIZE as f32 * scale;
        for col in 1..GRID_WIDTH {
            let x = rect.min.x + col as f32 * step;
            painter.line_segment([egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)], stroke);
        }
        for row in 1..GRID_HEIGHT {
            let y = rect.min.y + row as f32 * step;
            painter.line_segment([egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)], stroke);
        }
    }
}
