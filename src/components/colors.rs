use crate::canvas::CellColor;
use eframe::egui;
use egui::{Color32, Stroke};

// ============================================================================
// ColorsPanel - swatch picker + hex field for the active paint color
// ============================================================================

#[derive(Default)]
pub struct ColorsPanel {
    /// Text in the hex field while the user is typing.
    hex_input: String,
    /// Set when the hex field holds something that is not a color.
    invalid: bool,
}

impl ColorsPanel {
    /// Draw the color input. Returns a new color when the user picked one.
    pub fn show(&mut self, ui: &mut egui::Ui, current: CellColor) -> Option<CellColor> {
        let mut picked = None;

        ui.label(t!("color.label"));

        let mut rgb = current.to_array();
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            picked = Some(CellColor::from_array(rgb));
        }

        let id = ui.make_persistent_id("hex_color_input");
        let has_focus = ui.memory(|m| m.has_focus(id));
        if !has_focus {
            // follow external changes (picker tool, swatch) while not typing
            self.hex_input = picked.unwrap_or(current).to_hex();
            self.invalid = false;
        }

        let mut edit = egui::TextEdit::singleline(&mut self.hex_input)
            .id(id)
            .desired_width(72.0)
            .font(egui::TextStyle::Monospace);
        if self.invalid {
            edit = edit.text_color(Color32::from_rgb(200, 40, 40));
        }
        let response = ui.add(edit);
        if response.changed() {
            let text = self.hex_input.clone();
            if let Some(color) = self.commit_hex(&text) {
                picked = Some(color);
            }
        }
        if self.invalid {
            response.on_hover_text(t!("color.invalid"));
        }

        // swatch of the active color, as it will land on the grid
        let (rect, _) = ui.allocate_exact_size(egui::vec2(18.0, 18.0), egui::Sense::hover());
        let swatch = picked.unwrap_or(current).to_color32();
        ui.painter().rect_filled(rect, 2.0, swatch);
        ui.painter()
            .rect_stroke(rect, 2.0, Stroke::new(1.0, Color32::from_gray(120)));

        picked
    }

    /// Parse typed text; on success the text becomes the active color verbatim.
    fn commit_hex(&mut self, text: &str) -> Option<CellColor> {
        match text.parse::<CellColor>() {
            Ok(color) => {
                self.invalid = false;
                Some(color)
            }
            Err(_) => {
                self.invalid = true;
                None
            }
        }
    }
}
