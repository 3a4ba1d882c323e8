//! # Frame Painter
//!
//! Composes one frame of CPU-side geometry from the scene registry: every
//! visible body in draw order with its shading mode applied, plus the drag
//! spring visualization. The render engine uploads the result and draws it
//! in a single pass.
//!
//! Shading is one of three mutually exclusive modes:
//!
//! - `Flat` - plain fills
//! - `SoftShadow` - plain fills over a uniform soft drop-shadow
//! - `Pseudo3d` - dynamic bodies get a directional-light gradient and a
//!   larger drop-shadow; static bodies stay flat
//!
//! The pseudo-3D effect is a 2D illusion: a gradient from a lightened
//! variant of the fill through the base to a darkened variant, oriented
//! along the line from a fixed light point to the body center.

use cgmath::{InnerSpace, Vector2};
use log::debug;

use super::tessellate::{
    fill_circle, fill_convex, spring_path, stroke_loop, stroke_polyline, FrameGeometry,
};
use crate::physics::{DragConstraint, PhysicsWorld};
use crate::scene::body::{Color, Geometry};
use crate::scene::registry::SceneRegistry;

/// Per-channel offset for the gradient highlight and shadow variants.
pub const GRADIENT_OFFSET: u8 = 40;

/// The fixed light source sits at this fraction of the viewport extents.
const LIGHT_FRACTION: f32 = 0.3;

/// Drop-shadow preset: pixel offset, blur footprint, and opacity.
#[derive(Clone, Copy)]
struct ShadowPreset {
    offset: [f32; 2],
    blur: f32,
    alpha: f32,
}

const SHADOW_3D: ShadowPreset = ShadowPreset {
    offset: [7.0, 7.0],
    blur: 15.0,
    alpha: 0.3,
};
const SHADOW_SOFT: ShadowPreset = ShadowPreset {
    offset: [2.0, 2.0],
    blur: 5.0,
    alpha: 0.1,
};

const HIGHLIGHT_STROKE: [f32; 4] = [1.0, 1.0, 1.0, 0.3];
const EDGE_STROKE: [f32; 4] = [0.0, 0.0, 0.0, 0.1];

const SPRING_STROKE: [f32; 4] = [0.0, 0.0, 0.0, 0.2];
const SPRING_DOT: [f32; 4] = [0.0, 0.0, 0.0, 0.3];
const SPRING_DOT_RADIUS: f32 = 4.0;

/// Body shading mode for the whole scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingMode {
    Flat,
    SoftShadow,
    Pseudo3d,
}

/// Renderer options bag.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub background: Color,
    pub shading: ShadingMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            background: Color::new(0xf0, 0xf0, 0xf0),
            shading: ShadingMode::Pseudo3d,
        }
    }
}

/// Builds the triangle batch for one frame.
///
/// Bodies are painted in registry insertion order (back-to-front). Bodies
/// with `visible = false`, a missing engine position, or a degenerate
/// outline are skipped without aborting the frame.
pub fn build_frame(
    world: &PhysicsWorld,
    registry: &SceneRegistry,
    drag: &DragConstraint,
    options: &RenderOptions,
    viewport: (f32, f32),
) -> FrameGeometry {
    let mut geo = FrameGeometry::new();
    let light = Vector2::new(viewport.0 * LIGHT_FRACTION, viewport.1 * LIGHT_FRACTION);

    for body in registry.iter() {
        if !body.appearance.visible {
            continue;
        }
        let Some(center) = world.position(body.handle) else {
            debug!("skipping body {:?} with no engine state", body.handle);
            continue;
        };
        let outline = world_outline(&body.geometry, center, world.rotation(body.handle));
        if outline.len() < 3 {
            debug!("skipping body {:?} with degenerate outline", body.handle);
            continue;
        }

        let gradient = options.shading == ShadingMode::Pseudo3d && !body.is_static;

        // Drop shadow under the body, before its fill.
        match options.shading {
            ShadingMode::Pseudo3d if !body.is_static => {
                shadow(&mut geo, &outline, center, body.geometry.bounding_radius(), SHADOW_3D);
            }
            ShadingMode::SoftShadow => {
                shadow(&mut geo, &outline, center, body.geometry.bounding_radius(), SHADOW_SOFT);
            }
            _ => {}
        }

        // Fill: gradient for pseudo-3D dynamic bodies, flat otherwise.
        let opacity = body.appearance.opacity.clamp(0.0, 1.0);
        if gradient {
            let base = body.appearance.fill;
            let radius = body.geometry.bounding_radius();
            let circular = body.geometry.is_circular();
            fill_convex(&mut geo, &outline, |point| {
                gradient_color_at(point, center, light, base, radius, circular).with_alpha(opacity)
            });
        } else {
            let fill = body.appearance.fill.with_alpha(opacity);
            fill_convex(&mut geo, &outline, |_| fill);
        }

        // Stroke: the selection marker wins; otherwise the mode default.
        if let Some(stroke) = body.appearance.stroke {
            stroke_loop(&mut geo, &outline, stroke.width, stroke.color.with_alpha(stroke.alpha));
        } else if gradient {
            stroke_loop(&mut geo, &outline, 1.0, HIGHLIGHT_STROKE);
        } else {
            stroke_loop(&mut geo, &outline, 1.0, EDGE_STROKE);
        }
    }

    draw_spring(&mut geo, world, drag);
    geo
}

/// Spring visualization between the pointer and the grappled body: a wavy
/// polyline plus small dots at both endpoints.
fn draw_spring(geo: &mut FrameGeometry, world: &PhysicsWorld, drag: &DragConstraint) {
    if !drag.is_dragging() {
        return;
    }
    let Some(handle) = drag.grabbed() else { return };
    let Some(body_center) = world.position(handle) else { return };
    let pointer = drag.pointer();

    let path = spring_path(pointer, body_center);
    stroke_polyline(geo, &path, 2.0, SPRING_STROKE);
    fill_circle(geo, pointer, SPRING_DOT_RADIUS, 16, SPRING_DOT);
    fill_circle(geo, body_center, SPRING_DOT_RADIUS, 16, SPRING_DOT);
}

/// Body outline in world space at its current engine pose.
fn world_outline(geometry: &Geometry, center: Vector2<f32>, angle: f32) -> Vec<Vector2<f32>> {
    let (sin, cos) = angle.sin_cos();
    geometry
        .local_outline()
        .into_iter()
        .map(|v| center + Vector2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos))
        .collect()
}

/// Layered translucent silhouettes approximating a blurred drop shadow:
/// each layer expands the outline a little further and fades.
fn shadow(
    geo: &mut FrameGeometry,
    outline: &[Vector2<f32>],
    center: Vector2<f32>,
    bounding_radius: f32,
    preset: ShadowPreset,
) {
    let offset = Vector2::new(preset.offset[0], preset.offset[1]);
    let layers = [(0.0, 0.55), (0.5, 0.30), (1.0, 0.15)];
    for (spread, weight) in layers {
        let grow = 1.0 + (preset.blur * spread) / bounding_radius.max(1.0);
        let color = [0.0, 0.0, 0.0, preset.alpha * weight];
        let expanded: Vec<Vector2<f32>> = outline
            .iter()
            .map(|&v| center + (v - center) * grow + offset)
            .collect();
        fill_convex(geo, &expanded, |_| color);
    }
}

/// Gradient color at `point` for a body centered at `center`.
///
/// The gradient axis runs from the point 0.7 radii away from the center
/// on the far side of the light to the mirror point on the near side;
/// stops are highlight, base, shadow at 0 / 0.5 / 1. Circular bodies use
/// radial falloff from the axis start (inner stop at 0.1 radii, outer at
/// 1.1 radii), everything else interpolates linearly along the axis.
fn gradient_color_at(
    point: Vector2<f32>,
    center: Vector2<f32>,
    light: Vector2<f32>,
    base: Color,
    radius: f32,
    circular: bool,
) -> Color {
    let toward_light = light - center;
    if toward_light.magnitude2() <= f32::EPSILON || radius <= f32::EPSILON {
        return base;
    }
    let dir = toward_light.normalize();
    let start = center - dir * radius * 0.7;
    let end = center + dir * radius * 0.7;

    let t = if circular {
        (((point - start).magnitude() - radius * 0.1) / radius).clamp(0.0, 1.0)
    } else {
        let axis = end - start;
        ((point - start).dot(axis) / axis.magnitude2()).clamp(0.0, 1.0)
    };

    let highlight = base.lighten(GRADIENT_OFFSET);
    let shadow = base.darken(GRADIENT_OFFSET);
    if t < 0.5 {
        highlight.lerp(base, t * 2.0)
    } else {
        base.lerp(shadow, (t - 0.5) * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::body::Geometry;
    use crate::scene::factory::ShapeFactory;
    use crate::scene::registry::SceneRegistry;

    #[test]
    fn test_gradient_endpoints() {
        let base = Color::from_hex("#808080").unwrap();
        let center = Vector2::new(0.0, 0.0);
        let light = Vector2::new(100.0, 0.0);
        let radius = 50.0;

        // Linear gradient along the light axis: the axis start is the
        // highlight, the axis end is the shadow, the center is the base.
        let start = Vector2::new(-35.0, 0.0);
        let end = Vector2::new(35.0, 0.0);
        assert_eq!(
            gradient_color_at(start, center, light, base, radius, false),
            Color::new(168, 168, 168)
        );
        assert_eq!(
            gradient_color_at(end, center, light, base, radius, false),
            Color::new(88, 88, 88)
        );
        assert_eq!(
            gradient_color_at(center, center, light, base, radius, false),
            base
        );
    }

    #[test]
    fn test_gradient_degenerate_light_falls_back_to_base() {
        let base = Color::new(10, 20, 30);
        let center = Vector2::new(50.0, 50.0);
        assert_eq!(
            gradient_color_at(center, center, center, base, 40.0, true),
            base
        );
    }

    #[test]
    fn test_invisible_bodies_skipped() {
        let mut world = PhysicsWorld::new();
        let mut registry = SceneRegistry::new();
        let mut factory = ShapeFactory::with_seed(5);

        let spec = factory.create(
            Vector2::new(100.0, 100.0),
            Geometry::Circle { radius: 40.0 },
            None,
        );
        let handle = registry.spawn(&mut world, spec);
        registry.get_mut(handle).unwrap().appearance.visible = false;

        let drag = DragConstraint::new();
        let frame = build_frame(
            &world,
            &registry,
            &drag,
            &RenderOptions::default(),
            (800.0, 600.0),
        );
        assert!(frame.is_empty());
    }

    #[test]
    fn test_spring_drawn_only_while_dragging() {
        let mut world = PhysicsWorld::new();
        let mut registry = SceneRegistry::new();
        let mut factory = ShapeFactory::with_seed(5);
        let handle = registry.spawn(
            &mut world,
            factory.create(Vector2::new(100.0, 100.0), Geometry::Circle { radius: 40.0 }, None),
        );

        let options = RenderOptions {
            shading: ShadingMode::Flat,
            ..RenderOptions::default()
        };

        let mut drag = DragConstraint::new();
        let idle = build_frame(&world, &registry, &drag, &options, (800.0, 600.0));

        drag.attach();
        drag.set_pointer_physical(200.0, 200.0);
        drag.begin(Some(handle));
        let dragging = build_frame(&world, &registry, &drag, &options, (800.0, 600.0));

        assert!(dragging.indices.len() > idle.indices.len());
    }

    #[test]
    fn test_static_bodies_never_gradient_shaded() {
        let mut world = PhysicsWorld::new();
        let mut registry = SceneRegistry::new();
        registry.install_walls(&mut world, 800.0, 600.0);

        let options = RenderOptions::default();
        let frame = build_frame(
            &world,
            &registry,
            &DragConstraint::new(),
            &options,
            (800.0, 600.0),
        );

        // Four flat-filled walls with their edge strokes; every fill vertex
        // carries the wall color unchanged (no highlight/shadow variants).
        let wall = Color::new(0x2c, 0x3e, 0x50).with_alpha(1.0);
        let fill_vertices: Vec<_> = frame
            .vertices
            .iter()
            .filter(|v| v.color[3] == 1.0)
            .collect();
        assert!(!fill_vertices.is_empty());
        assert!(fill_vertices.iter().all(|v| v.color == wall));
    }
}
