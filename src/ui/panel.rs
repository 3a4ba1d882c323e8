// src/ui/panel.rs
//! Playground control panel
//!
//! The single ImGui window wired to the playground: tool selection, shape
//! configuration for the add tool, gravity and shading controls, appearance
//! overrides, and the radius editor for the current selection. The panel is
//! thin glue — every mutation goes through a playground entry point.

use crate::gfx::paint::ShadingMode;
use crate::interact::{AppearanceScope, ShapeKind, ToolMode};
use crate::playground::Playground;
use crate::scene::body::Color;

/// Scratch state the panel keeps between frames (values not yet applied).
pub struct PanelState {
    pub radius_edit: f32,
    pub override_color: [f32; 3],
    pub override_opacity: f32,
    pub scope_selection: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            radius_edit: 50.0,
            override_color: [1.0, 1.0, 1.0],
            override_opacity: 1.0,
            scope_selection: false,
        }
    }
}

/// Builds the playground control panel for this frame.
pub fn playground_panel(ui: &imgui::Ui, playground: &mut Playground, panel: &mut PanelState) {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }

    ui.window("Playground")
        .size([320.0, 560.0], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            tool_section(ui, playground);
            ui.separator();
            shape_section(ui, playground);
            ui.separator();
            world_section(ui, playground);
            ui.separator();
            appearance_section(ui, playground, panel);
            ui.separator();
            selection_section(ui, playground, panel);
        });
}

fn tool_section(ui: &imgui::Ui, playground: &mut Playground) {
    ui.text("Tool");
    let mut mode = playground.tool_mode();
    let mut changed = false;
    changed |= ui.radio_button("Drag", &mut mode, ToolMode::Neutral);
    ui.same_line();
    changed |= ui.radio_button("Add", &mut mode, ToolMode::Add);
    ui.same_line();
    changed |= ui.radio_button("Delete", &mut mode, ToolMode::Delete);
    changed |= ui.radio_button("Select", &mut mode, ToolMode::Select);
    ui.same_line();
    changed |= ui.radio_button("Unselect", &mut mode, ToolMode::Unselect);
    if changed {
        playground.set_tool(mode);
    }
}

fn shape_section(ui: &imgui::Ui, playground: &mut Playground) {
    ui.text("New shape");
    let config = &mut playground.shape_config;

    let mut kind_index = match config.kind {
        ShapeKind::Circle => 0,
        ShapeKind::RoundedRect => 1,
        ShapeKind::Polygon => 2,
    };
    if ui.combo_simple_string("Shape", &mut kind_index, &["Circle", "Rounded box", "Polygon"]) {
        config.kind = match kind_index {
            0 => ShapeKind::Circle,
            1 => ShapeKind::RoundedRect,
            _ => ShapeKind::Polygon,
        };
    }

    match config.kind {
        ShapeKind::Circle => {
            ui.slider("Radius", 10.0_f32, 150.0, &mut config.radius);
        }
        ShapeKind::Polygon => {
            ui.slider("Radius", 10.0_f32, 150.0, &mut config.radius);
            ui.slider("Sides", 3_u32, 8, &mut config.sides);
        }
        ShapeKind::RoundedRect => {
            ui.slider("Width", 20.0_f32, 300.0, &mut config.width);
            ui.slider("Height", 20.0_f32, 300.0, &mut config.height);
            ui.slider("Corner radius", 0.0_f32, 60.0, &mut config.corner_radius);
        }
    }

    ui.checkbox("Random color", &mut config.use_random_color);
    if !config.use_random_color {
        let mut rgb = config.color.channels_f32();
        if ui.color_edit3("Fill color", &mut rgb) {
            config.color = color_from_floats(rgb);
        }
    }
    ui.slider("Opacity", 0.05_f32, 1.0, &mut config.opacity);
}

fn world_section(ui: &imgui::Ui, playground: &mut Playground) {
    ui.text("World");

    let mut gravity = playground.gravity();
    if ui.slider("Gravity", 0.0_f32, 3.0, &mut gravity) {
        playground.set_gravity(gravity);
    }

    let mut shading_index = match playground.options.shading {
        ShadingMode::Flat => 0,
        ShadingMode::SoftShadow => 1,
        ShadingMode::Pseudo3d => 2,
    };
    if ui.combo_simple_string(
        "Shading",
        &mut shading_index,
        &["Flat", "Soft shadow", "Pseudo 3D"],
    ) {
        playground.options.shading = match shading_index {
            0 => ShadingMode::Flat,
            1 => ShadingMode::SoftShadow,
            _ => ShadingMode::Pseudo3d,
        };
    }

    if ui.button("Reset scene (R)") {
        playground.reset();
    }
}

fn appearance_section(ui: &imgui::Ui, playground: &mut Playground, panel: &mut PanelState) {
    ui.text("Recolor bodies");
    ui.color_edit3("Color", &mut panel.override_color);
    ui.slider("New opacity", 0.05_f32, 1.0, &mut panel.override_opacity);
    ui.checkbox("Selection only", &mut panel.scope_selection);

    if ui.button("Apply color") {
        playground.apply_appearance(
            Some(color_from_floats(panel.override_color)),
            None,
            scope(panel),
        );
    }
    ui.same_line();
    if ui.button("Apply opacity") {
        playground.apply_appearance(None, Some(panel.override_opacity), scope(panel));
    }
}

fn selection_section(ui: &imgui::Ui, playground: &mut Playground, panel: &mut PanelState) {
    ui.text(format!(
        "Selected: {} of {}",
        playground.selection.len(),
        playground.registry.dynamic_count()
    ));

    ui.input_float("New radius", &mut panel.radius_edit).build();
    if ui.button("Resize selected circles") && !playground.selection.is_empty() {
        playground.set_selected_radius(panel.radius_edit);
    }
}

fn scope(panel: &PanelState) -> AppearanceScope {
    if panel.scope_selection {
        AppearanceScope::Selection
    } else {
        AppearanceScope::AllDynamic
    }
}

fn color_from_floats(rgb: [f32; 3]) -> Color {
    Color::new(
        (rgb[0].clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb[1].clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb[2].clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}
