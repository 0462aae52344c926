use donutfield_common::MatcapPreset;
use donutfield_tools::{MaterialControls, PanelCommand, PanelState, SceneSummary};

/// Draw the debug panel. Returns the commands its buttons triggered.
pub fn draw_panel(
    ctx: &egui::Context,
    panel: &mut PanelState,
    summary: &SceneSummary,
) -> Vec<PanelCommand> {
    let mut commands = Vec::new();

    egui::Window::new("Debug")
        .default_width(280.0)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(summary.to_string());
            ui.separator();

            folder(ui, "Controls", |ui| {
                ui.checkbox(&mut panel.enable_damping, "enableDamping");
                ui.checkbox(&mut panel.controls_enabled, "enabled");
                if ui.button("Go Fullscreen").clicked() {
                    commands.push(PanelCommand::ToggleFullscreen);
                }
            });

            folder(ui, "Text Object", |ui| {
                folder(ui, "Font Material", |ui| {
                    material_controls(ui, "text", &mut panel.text_material);
                });
                folder(ui, "Font Text", |ui| {
                    ui.text_edit_singleline(&mut panel.text);
                });
                if ui.button("Update Text").clicked() {
                    commands.push(PanelCommand::RebuildText);
                }
            });

            folder(ui, "Donuts", |ui| {
                folder(ui, "Donuts Material", |ui| {
                    material_controls(ui, "donuts", &mut panel.donut_material);
                });
                folder(ui, "Donuts Movement", |ui| {
                    ui.add(
                        egui::Slider::new(&mut panel.rotation, PanelState::ROTATION_RANGE)
                            .step_by(PanelState::ROTATION_STEP as f64)
                            .text("rotation"),
                    );
                    ui.add(
                        egui::Slider::new(&mut panel.count, PanelState::COUNT_RANGE)
                            .logarithmic(true)
                            .text("count"),
                    );
                    ui.add(
                        egui::Slider::new(&mut panel.radius, PanelState::RADIUS_RANGE)
                            .step_by(PanelState::RADIUS_STEP as f64)
                            .text("radius"),
                    );
                    ui.checkbox(&mut panel.spin, "spin");
                });
                if ui.button("Update Donuts").clicked() {
                    commands.push(PanelCommand::RebuildDonuts);
                }
            });

            ui.separator();
            ui.small("LMB: Orbit | RMB: Pan | Wheel: Zoom | Double-click: Leave fullscreen");
        });

    commands
}

fn folder(ui: &mut egui::Ui, title: &str, body: impl FnOnce(&mut egui::Ui)) {
    egui::CollapsingHeader::new(title)
        .default_open(true)
        .show(ui, body);
}

fn material_controls(ui: &mut egui::Ui, id: &str, controls: &mut MaterialControls) {
    ui.add(
        egui::Slider::new(&mut controls.opacity, MaterialControls::OPACITY_RANGE)
            .step_by(MaterialControls::OPACITY_STEP as f64)
            .text("opacity"),
    );
    egui::ComboBox::from_id_salt(id)
        .selected_text(controls.matcap.name())
        .show_ui(ui, |ui| {
            for preset in MatcapPreset::ALL {
                ui.selectable_value(&mut controls.matcap, preset, preset.name());
            }
        });
    ui.checkbox(&mut controls.visible, "visible");
}

#[cfg(test)]
mod tests {
    use super::*;
    use donutfield_scene::Scene;
    use donutfield_tools::SceneInspector;
    use egui::epaint::{ClippedShape, Shape};
    use std::collections::HashMap;

    fn collect_text(shape: &Shape, out: &mut HashMap<String, f32>) {
        match shape {
            Shape::Text(text) => {
                out.entry(text.galley.text().to_owned()).or_insert(text.pos.x);
            }
            Shape::Vec(shapes) => shapes.iter().for_each(|s| collect_text(s, out)),
            _ => {}
        }
    }

    /// Left edge of every piece of text the panel draws, keyed by the text.
    fn drawn_text(panel: &mut PanelState) -> (HashMap<String, f32>, Vec<PanelCommand>) {
        let ctx = egui::Context::default();
        let summary = SceneInspector::summary(&Scene::new());
        let mut commands = Vec::new();
        let mut output = None;
        // the first passes only size the window
        for _ in 0..3 {
            output = Some(ctx.run(egui::RawInput::default(), |ctx| {
                commands = draw_panel(ctx, panel, &summary);
            }));
        }
        let mut text = HashMap::new();
        for ClippedShape { shape, .. } in output.map(|o| o.shapes).unwrap_or_default() {
            collect_text(&shape, &mut text);
        }
        (text, commands)
    }

    #[test]
    fn top_level_folders_are_siblings() {
        let (text, commands) = drawn_text(&mut PanelState::default());
        assert!(commands.is_empty());

        let x = |label: &str| *text.get(label).unwrap_or_else(|| panic!("{label} not drawn"));
        assert_eq!(x("Text Object"), x("Controls"));
        assert_eq!(x("Donuts"), x("Controls"));
        for sub in ["Font Material", "Font Text", "Donuts Material", "Donuts Movement"] {
            assert!(x(sub) > x("Controls"), "{sub} should be nested");
        }
        assert_eq!(x("Font Material"), x("Donuts Movement"));
    }
}
