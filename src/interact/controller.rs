//! # Interaction Controller
//!
//! A finite set of mutually exclusive tool modes drives what a pointer
//! press does; pointer movement feeds the drag-spring force model while a
//! body is grappled. The controller also owns the radius-edit flow, which
//! rebuilds selected circles in place because the engine has no mutable
//! geometry on live bodies.

use cgmath::Vector2;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rapier2d::prelude::RigidBodyHandle;

use crate::physics::{DragConstraint, PhysicsWorld};
use crate::scene::body::{Color, Geometry};
use crate::scene::factory::{
    BodySpec, ShapeFactory, DENSITY, FRICTION, MIN_EXTENT, RESTITUTION,
};
use crate::scene::registry::SceneRegistry;
use crate::scene::selection::SelectionSet;

/// Magnitude of the random feedback impulse applied on a press over a
/// dynamic body, per unit mass (delta-v in px/s at full jitter).
const CLICK_FEEDBACK: f32 = 40.0;

/// The active tool. Exactly one at a time; switching into `Neutral` is the
/// only transition with a side effect (it clears the selection set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolMode {
    Neutral,
    Add,
    Delete,
    Select,
    Unselect,
}

/// Shape kind picked in the UI for the add tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    RoundedRect,
    Polygon,
}

/// Shape-configuration inputs, read at the moment of body creation.
#[derive(Debug, Clone)]
pub struct ShapeConfig {
    pub kind: ShapeKind,
    pub radius: f32,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
    pub sides: u32,
    pub use_random_color: bool,
    pub color: Color,
    pub opacity: f32,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            kind: ShapeKind::Circle,
            radius: 50.0,
            width: 120.0,
            height: 80.0,
            corner_radius: 20.0,
            sides: 5,
            use_random_color: true,
            color: Color::new(0xe7, 0x4c, 0x3c),
            opacity: 1.0,
        }
    }
}

impl ShapeConfig {
    fn geometry(&self) -> Geometry {
        match self.kind {
            ShapeKind::Circle => Geometry::Circle { radius: self.radius },
            ShapeKind::RoundedRect => Geometry::RoundedRect {
                width: self.width,
                height: self.height,
                corner_radius: self.corner_radius,
            },
            ShapeKind::Polygon => Geometry::Polygon {
                sides: self.sides,
                radius: self.radius,
            },
        }
    }
}

/// Scope of a UI-driven appearance override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppearanceScope {
    AllDynamic,
    Selection,
}

pub struct InteractionController {
    mode: ToolMode,
    factory: ShapeFactory,
    rng: StdRng,
}

impl InteractionController {
    pub fn new(factory: ShapeFactory) -> Self {
        Self {
            mode: ToolMode::Neutral,
            factory,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic controller for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            mode: ToolMode::Neutral,
            factory: ShapeFactory::with_seed(seed),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn factory_mut(&mut self) -> &mut ShapeFactory {
        &mut self.factory
    }

    /// Switches tools. Any state may transition to any other; entering
    /// `Neutral` clears the selection set and its markers.
    pub fn set_mode(
        &mut self,
        mode: ToolMode,
        registry: &mut SceneRegistry,
        selection: &mut SelectionSet,
    ) {
        if mode == ToolMode::Neutral {
            selection.clear_all(registry);
        }
        self.mode = mode;
    }

    /// Pointer-press dispatch. One hit test serves the grapple, the click
    /// feedback impulse, and the active tool.
    pub fn pointer_down(
        &mut self,
        position: Vector2<f32>,
        config: &ShapeConfig,
        world: &mut PhysicsWorld,
        registry: &mut SceneRegistry,
        selection: &mut SelectionSet,
        drag: &mut DragConstraint,
    ) {
        let hit = registry.first_dynamic_at(world, position);
        drag.begin(hit);

        if let Some(handle) = hit {
            let jitter = Vector2::new(
                self.rng.random::<f32>() - 0.5,
                self.rng.random::<f32>() - 0.5,
            );
            let impulse = jitter * CLICK_FEEDBACK * world.mass(handle);
            world.apply_impulse_at(handle, impulse, position);
        }

        match self.mode {
            ToolMode::Add => {
                let color = (!config.use_random_color).then_some(config.color);
                let mut spec = self.factory.create(position, config.geometry(), color);
                spec.appearance.opacity = config.opacity.clamp(f32::EPSILON, 1.0);
                registry.spawn(world, spec);
            }
            ToolMode::Delete => {
                if let Some(handle) = hit {
                    selection.purge(handle);
                    drag.forget(handle);
                    registry.remove(world, handle);
                }
            }
            ToolMode::Select => {
                if let Some(handle) = hit {
                    selection.toggle(registry, handle);
                }
            }
            ToolMode::Unselect => {
                if let Some(handle) = hit {
                    selection.deselect(registry, handle);
                }
            }
            ToolMode::Neutral => {}
        }
    }

    /// Pointer moved while a body is grappled: apply the spring nudge.
    /// Independent of the active tool.
    pub fn pointer_move(&mut self, world: &mut PhysicsWorld, drag: &DragConstraint) {
        drag.nudge(world);
    }

    pub fn pointer_up(&mut self, drag: &mut DragConstraint) {
        drag.release();
    }

    /// Rebuilds every selected circular body with the requested radius at
    /// its current position, preserving appearance, draw order, and
    /// selection membership. Non-circular selections are silently skipped.
    pub fn set_selected_radius(
        &mut self,
        radius: f32,
        world: &mut PhysicsWorld,
        registry: &mut SceneRegistry,
        selection: &mut SelectionSet,
        drag: &mut DragConstraint,
    ) {
        let radius = radius.max(MIN_EXTENT);
        let targets: Vec<RigidBodyHandle> = selection.handles().to_vec();

        for old in targets {
            let Some(body) = registry.get(old) else { continue };
            if !body.geometry.is_circular() {
                debug!("radius edit skipped non-circular body {:?}", old);
                continue;
            }
            let appearance = body.appearance;
            let Some(position) = world.position(old) else { continue };
            let Some(index) = registry.index_of(old) else { continue };

            registry.remove(world, old);
            drag.forget(old);

            let spec = BodySpec {
                position,
                geometry: Geometry::Circle { radius },
                appearance,
                is_static: false,
                restitution: RESTITUTION,
                friction: FRICTION,
                density: DENSITY,
            };
            let new = registry.spawn_at(world, index, spec);
            selection.replace(old, new);
        }
    }

    /// Applies a fill color and/or opacity override, either to every
    /// dynamic body or scoped to the current selection.
    pub fn apply_appearance(
        &mut self,
        color: Option<Color>,
        opacity: Option<f32>,
        scope: AppearanceScope,
        registry: &mut SceneRegistry,
        selection: &SelectionSet,
    ) {
        let opacity = opacity.map(|o| o.clamp(f32::EPSILON, 1.0));
        let selected: Vec<RigidBodyHandle> = selection.handles().to_vec();

        for body in registry.dynamic_bodies_mut() {
            if scope == AppearanceScope::Selection && !selected.contains(&body.handle) {
                continue;
            }
            if let Some(color) = color {
                body.appearance.fill = color;
            }
            if let Some(opacity) = opacity {
                body.appearance.opacity = opacity;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        world: PhysicsWorld,
        registry: SceneRegistry,
        selection: SelectionSet,
        drag: DragConstraint,
        controller: InteractionController,
        config: ShapeConfig,
    }

    fn fixture() -> Fixture {
        let mut world = PhysicsWorld::new();
        let mut registry = SceneRegistry::new();
        registry.install_walls(&mut world, 800.0, 600.0);
        let mut drag = DragConstraint::new();
        drag.attach();
        Fixture {
            world,
            registry,
            selection: SelectionSet::new(),
            drag,
            controller: InteractionController::with_seed(21),
            config: ShapeConfig::default(),
        }
    }

    fn press(f: &mut Fixture, x: f32, y: f32) {
        f.controller.pointer_down(
            Vector2::new(x, y),
            &f.config,
            &mut f.world,
            &mut f.registry,
            &mut f.selection,
            &mut f.drag,
        );
    }

    #[test]
    fn test_add_tool_creates_body_at_pointer() {
        let mut f = fixture();
        f.config.kind = ShapeKind::Circle;
        f.config.radius = 50.0;
        f.controller
            .set_mode(ToolMode::Add, &mut f.registry, &mut f.selection);

        press(&mut f, 100.0, 100.0);

        assert_eq!(f.registry.dynamic_count(), 1);
        let body = f.registry.dynamic_bodies().next().unwrap();
        assert_eq!(body.geometry, Geometry::Circle { radius: 50.0 });
        let pos = f.world.position(body.handle).unwrap();
        assert_eq!(pos, Vector2::new(100.0, 100.0));
    }

    #[test]
    fn test_delete_tool_removes_hit_body_and_selection_entry() {
        let mut f = fixture();
        f.controller
            .set_mode(ToolMode::Add, &mut f.registry, &mut f.selection);
        press(&mut f, 200.0, 200.0);
        let handle = f.registry.dynamic_bodies().next().unwrap().handle;

        f.controller
            .set_mode(ToolMode::Select, &mut f.registry, &mut f.selection);
        press(&mut f, 200.0, 200.0);
        assert!(f.selection.contains(handle));

        f.controller
            .set_mode(ToolMode::Delete, &mut f.registry, &mut f.selection);
        press(&mut f, 200.0, 200.0);

        assert_eq!(f.registry.dynamic_count(), 0);
        assert!(f.selection.is_empty());
        assert!(!f.world.contains(handle));
    }

    #[test]
    fn test_delete_miss_is_noop() {
        let mut f = fixture();
        f.controller
            .set_mode(ToolMode::Delete, &mut f.registry, &mut f.selection);
        press(&mut f, 400.0, 300.0);
        assert_eq!(f.registry.dynamic_count(), 0);
    }

    #[test]
    fn test_select_toggles_and_unselect_removes() {
        let mut f = fixture();
        f.controller
            .set_mode(ToolMode::Add, &mut f.registry, &mut f.selection);
        press(&mut f, 300.0, 300.0);
        let handle = f.registry.dynamic_bodies().next().unwrap().handle;

        f.controller
            .set_mode(ToolMode::Select, &mut f.registry, &mut f.selection);
        press(&mut f, 300.0, 300.0);
        assert!(f.selection.contains(handle));
        press(&mut f, 300.0, 300.0);
        assert!(!f.selection.contains(handle));

        press(&mut f, 300.0, 300.0);
        f.controller
            .set_mode(ToolMode::Unselect, &mut f.registry, &mut f.selection);
        press(&mut f, 300.0, 300.0);
        assert!(f.selection.is_empty());
        // Unselecting an unselected body stays a no-op.
        press(&mut f, 300.0, 300.0);
        assert!(f.selection.is_empty());
    }

    #[test]
    fn test_entering_neutral_clears_selection() {
        let mut f = fixture();
        f.controller
            .set_mode(ToolMode::Add, &mut f.registry, &mut f.selection);
        press(&mut f, 300.0, 300.0);
        f.controller
            .set_mode(ToolMode::Select, &mut f.registry, &mut f.selection);
        press(&mut f, 300.0, 300.0);
        assert_eq!(f.selection.len(), 1);

        f.controller
            .set_mode(ToolMode::Neutral, &mut f.registry, &mut f.selection);
        assert!(f.selection.is_empty());
        let body = f.registry.dynamic_bodies().next().unwrap();
        assert_eq!(body.appearance.stroke, None);
    }

    #[test]
    fn test_radius_edit_rebuilds_selected_circles() {
        let mut f = fixture();
        f.controller
            .set_mode(ToolMode::Add, &mut f.registry, &mut f.selection);
        press(&mut f, 150.0, 150.0);
        press(&mut f, 500.0, 150.0);

        f.controller
            .set_mode(ToolMode::Select, &mut f.registry, &mut f.selection);
        press(&mut f, 150.0, 150.0);
        press(&mut f, 500.0, 150.0);
        let old: Vec<RigidBodyHandle> = f.selection.handles().to_vec();
        assert_eq!(old.len(), 2);

        f.controller.set_selected_radius(
            80.0,
            &mut f.world,
            &mut f.registry,
            &mut f.selection,
            &mut f.drag,
        );

        assert_eq!(f.selection.len(), 2);
        assert_eq!(f.registry.dynamic_count(), 2);
        for (i, &new) in f.selection.handles().iter().enumerate() {
            assert_ne!(new, old[i]);
            assert!(!f.world.contains(old[i]));
            let body = f.registry.get(new).unwrap();
            assert_eq!(body.geometry, Geometry::Circle { radius: 80.0 });
            // Replacement inherits the selection marker.
            assert!(body.appearance.stroke.is_some());
        }
        let positions: Vec<Vector2<f32>> = f
            .selection
            .handles()
            .iter()
            .map(|&h| f.world.position(h).unwrap())
            .collect();
        assert_eq!(positions[0], Vector2::new(150.0, 150.0));
        assert_eq!(positions[1], Vector2::new(500.0, 150.0));
    }

    #[test]
    fn test_radius_edit_skips_non_circles() {
        let mut f = fixture();
        f.config.kind = ShapeKind::Polygon;
        f.controller
            .set_mode(ToolMode::Add, &mut f.registry, &mut f.selection);
        press(&mut f, 150.0, 150.0);

        f.controller
            .set_mode(ToolMode::Select, &mut f.registry, &mut f.selection);
        press(&mut f, 150.0, 150.0);
        let before = f.selection.handles().to_vec();

        f.controller.set_selected_radius(
            80.0,
            &mut f.world,
            &mut f.registry,
            &mut f.selection,
            &mut f.drag,
        );

        // Untouched: same handle, same geometry.
        assert_eq!(f.selection.handles(), &before[..]);
        let body = f.registry.get(before[0]).unwrap();
        assert!(matches!(body.geometry, Geometry::Polygon { .. }));
    }

    #[test]
    fn test_neutral_press_mutates_nothing() {
        let mut f = fixture();
        f.controller
            .set_mode(ToolMode::Add, &mut f.registry, &mut f.selection);
        press(&mut f, 250.0, 250.0);

        f.controller
            .set_mode(ToolMode::Neutral, &mut f.registry, &mut f.selection);
        press(&mut f, 250.0, 250.0);
        assert_eq!(f.registry.dynamic_count(), 1);
        assert!(f.selection.is_empty());
        // Though a press over a body still grapples it for dragging.
        assert!(f.drag.is_dragging());
    }

    #[test]
    fn test_appearance_override_scopes() {
        let mut f = fixture();
        f.controller
            .set_mode(ToolMode::Add, &mut f.registry, &mut f.selection);
        press(&mut f, 150.0, 150.0);
        press(&mut f, 500.0, 150.0);

        f.controller
            .set_mode(ToolMode::Select, &mut f.registry, &mut f.selection);
        press(&mut f, 150.0, 150.0);

        let teal = Color::new(0x1a, 0xbc, 0x9c);
        f.controller.apply_appearance(
            Some(teal),
            Some(0.5),
            AppearanceScope::Selection,
            &mut f.registry,
            &f.selection,
        );

        let selected = f.selection.handles()[0];
        for body in f.registry.dynamic_bodies() {
            if body.handle == selected {
                assert_eq!(body.appearance.fill, teal);
                assert_eq!(body.appearance.opacity, 0.5);
            } else {
                assert_ne!(body.appearance.opacity, 0.5);
            }
        }

        f.controller.apply_appearance(
            None,
            Some(0.25),
            AppearanceScope::AllDynamic,
            &mut f.registry,
            &f.selection,
        );
        for body in f.registry.dynamic_bodies() {
            assert_eq!(body.appearance.opacity, 0.25);
        }
    }

    #[test]
    fn test_opacity_clamped_into_range() {
        let mut f = fixture();
        f.config.opacity = 7.5;
        f.controller
            .set_mode(ToolMode::Add, &mut f.registry, &mut f.selection);
        press(&mut f, 150.0, 150.0);

        let body = f.registry.dynamic_bodies().next().unwrap();
        assert!(body.appearance.opacity > 0.0 && body.appearance.opacity <= 1.0);
    }
}
