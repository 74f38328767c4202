//! Debug panel.

use crate::control::ColorControl;
use crate::params::SmokeColor;

/// Draw the smoke panel. Edits go straight through `control`, so the new
/// color is already in effect when this returns.
pub fn smoke_panel(ctx: &egui::Context, control: &mut ColorControl) {
    egui::Window::new("Smoke")
        .default_pos([12.0, 12.0])
        .resizable(false)
        .show(ctx, |ui| {
            let mut rgb = control.value().to_array();
            ui.horizontal(|ui| {
                ui.label(control.label());
                if ui.color_edit_button_rgb(&mut rgb).changed() {
                    control.set(SmokeColor::from_array(rgb));
                }
            });
        });
}
