use crate::canvas::Canvas;
use crate::components::*;
use crate::editor::{Editor, KeyInput};
use crate::settings::AppSettings;
use eframe::egui;

pub struct PixelpadApp {
    editor: Editor,

    // Shared Canvas Renderer
    canvas: Canvas,

    // UI Components
    colors_panel: colors::ColorsPanel,
    history_panel: history::HistoryPanel,

    settings: AppSettings,

    /// Command modifier state seen last frame, to turn it into press/release events.
    command_was_down: bool,
}

impl PixelpadApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: AppSettings, tool: Option<tools::Tool>) -> Self {
        Self::configure_context(&cc.egui_ctx);
        Self::with_settings(settings, tool)
    }

    /// Ctrl+= / Ctrl+- belong to the canvas zoom, so egui must not also scale the UI.
    pub fn configure_context(ctx: &egui::Context) {
        ctx.options_mut(|o| o.zoom_with_keyboard = false);
    }

    fn with_settings(settings: AppSettings, tool: Option<tools::Tool>) -> Self {
        let mut editor = Editor::new(&settings);
        if let Some(tool) = tool {
            editor.select_tool(tool);
        }
        Self {
            editor,
            canvas: Canvas::new(),
            colors_panel: colors::ColorsPanel::default(),
            history_panel: history::HistoryPanel::default(),
            settings,
            command_was_down: false,
        }
    }

    fn save_settings(&self) {
        if let Err(e) = self.settings.save() {
            log_err!("Failed to save settings: {}", e);
        }
    }

    /// Translate this frame's keyboard events into editor key transitions.
    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        // typing in the hex field must not switch tools
        if ctx.wants_keyboard_input() {
            self.editor.release_all_keys();
            self.command_was_down = false;
            return;
        }

        let (command_down, keys, focused) = ctx.input(|i| {
            let keys: Vec<(egui::Key, bool)> = i
                .events
                .iter()
                .filter_map(|ev| match ev {
                    egui::Event::Key { key, pressed, .. } => Some((*key, *pressed)),
                    _ => None,
                })
                .collect();
            (i.modifiers.command, keys, i.focused)
        });

        if !focused {
            // releases that happen while unfocused never reach us
            self.editor.release_all_keys();
            self.command_was_down = false;
            return;
        }

        if command_down != self.command_was_down {
            self.command_was_down = command_down;
            self.editor.handle_key(KeyInput::Command { pressed: command_down });
        }
        for (key, pressed) in keys {
            self.editor.handle_key(KeyInput::Key { key, pressed });
        }
    }

    fn show_menu_bar(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button(t!("menu.view"), |ui| {
                if ui
                    .checkbox(&mut self.settings.show_grid_lines, t!("menu.grid_lines"))
                    .changed()
                {
                    self.save_settings();
                }
                ui.separator();
                ui.label(t!("menu.language"));
                for (code, name) in crate::i18n::LANGUAGES {
                    let selected = crate::i18n::current_language() == *code;
                    if ui.selectable_label(selected, *name).clicked() {
                        crate::i18n::set_language(code);
                        self.settings.language = code.to_string();
                        self.save_settings();
                        ui.close_menu();
                    }
                }
            });
        });
    }

    fn show_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(tool) = self.editor.tools.show(ui, &self.editor.keybindings) {
                self.editor.select_tool(tool);
            }

            ui.separator();

            let zoom = self.editor.zoom;
            if ui
                .add_enabled(zoom.can_zoom_in(), egui::Button::new(format!("🔍+ {}", t!("zoom.in"))))
                .clicked()
            {
                self.editor.zoom_in();
            }
            if ui
                .add_enabled(zoom.can_zoom_out(), egui::Button::new(format!("🔍− {}", t!("zoom.out"))))
                .clicked()
            {
                self.editor.zoom_out();
            }
            ui.label(t!("zoom.level", scale = self.editor.zoom.get()));

            ui.separator();

            if let Some(color) = self.colors_panel.show(ui, self.editor.color()) {
                self.editor.set_color(color);
            }
        });
    }

    fn show_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(t!("status.tool", tool = self.editor.active_tool().label()));
            ui.separator();
            ui.label(t!("status.zoom", scale = self.editor.zoom.get()));
            ui.separator();
            ui.monospace(self.editor.color().to_hex());
            if let Some(offset) = self.canvas.hover_offset()
                && let Some(cell) = self
                    .editor
                    .project
                    .canvas_state
                    .cell_at_pointer(offset, self.editor.zoom)
            {
                ui.separator();
                ui.label(t!("status.cell", cell = cell));
            }
            if !self.editor.status().is_empty() {
                ui.separator();
                ui.weak(self.editor.status());
            }
        });
    }
}

impl eframe::App for PixelpadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.editor.project.title()));

        self.handle_keyboard(ctx);

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.show_menu_bar(ui);
        });

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.show_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.show_status_bar(ui);
        });

        egui::SidePanel::right("history_panel")
            .default_width(200.0)
            .show(ctx, |ui| {
                if self.history_panel.show(ui, &self.editor.project.history) {
                    self.editor.undo();
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().drag_to_scroll(false).show(ui, |ui| {
                let events = self.canvas.show(
                    ui,
                    &mut self.editor.project.canvas_state,
                    self.editor.zoom,
                    self.settings.show_grid_lines,
                );
                for event in events {
                    self.editor.handle_pointer(event);
                }
            });
        });
    }
}
